//! Command implementations for the roster CLI.
//!
//! Each subcommand is implemented in its own module.

pub mod login;
pub mod logout;
pub mod status;
pub mod users;

pub use login::run_login;
pub use logout::run_logout;
pub use status::run_status;
pub use users::{run_delete, run_edit, run_list};
