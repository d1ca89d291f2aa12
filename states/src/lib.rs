//! Observable state primitives shared by the roster crates.
//!
//! - [`StateCell`] / [`StateReader`]: level-triggered state with atomic updates
//! - [`Notifier`]: exactly-once event queue for user-facing notifications
//! - [`LatestTask`] / [`TaskHandle`]: generation tracking and cancellation for
//!   latest-only async work

mod error;
mod notify;
mod state;
mod task;

pub use error::Error;
pub use notify::Notifier;
pub use state::{State, StateCell, StateReader};
pub use task::{LatestTask, TaskHandle, TaskId};
