//! Business layer for roster: session handling and the paginated user directory.
//!
//! - [`SessionStore`]: login, logout, and a persisted session token
//! - [`DirectoryController`]: one page of users plus the edit and delete workflows
//! - [`BusinessConfig`]: endpoint, timeouts, and page-load policy

mod config;
pub mod directory;
pub mod error;
pub mod http;
mod route;
pub mod session;
pub mod token_store;

pub use config::{BusinessConfig, PageLoadPolicy};
pub use directory::{
    ActionKind, DirectoryApi, DirectoryController, Notification, NotificationLevel, PageState,
    PendingAction, UserId, UserRecord,
};
pub use error::{AuthError, DirectoryError, RemoteAction, RemoteError, TokenStoreError};
pub use route::Route;
pub use session::{SessionState, SessionStore};
pub use token_store::{FileTokenStore, MemoryTokenStore, TokenStore};
