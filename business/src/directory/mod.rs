//! User directory domain module.
//!
//! This module is the single home for:
//! - Wire types for the `/users` endpoints
//! - API helpers that perform the network IO
//! - Page and pending-action state owned by [`DirectoryController`]
//!
//! Presentation code should only read snapshots or subscribe, and drive changes through
//! the controller's methods.

pub mod api;
pub mod controller;
pub mod notification;
pub mod state;
pub mod types;

pub use api::{DirectoryApi, DirectoryApiError};
pub use controller::DirectoryController;
pub use notification::{Notification, NotificationLevel};
pub use state::{ActionKind, PageState, PendingAction};
pub use types::{ListUsersResponse, UserId, UserRecord};
