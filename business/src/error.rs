//! Error taxonomy for the session and directory layers.
//!
//! Remote failures are converted into these types at the component boundary; none of
//! them leaves a component in a partially updated state.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::directory::{ActionKind, UserId};

/// Login failed; the session is left exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Email and password are required")]
    MissingCredentials,
    #[error("Login rejected (status {status}): {message}")]
    Rejected { status: u16, message: String },
    #[error("Network error during login: {0}")]
    Transport(String),
    #[error("Unexpected login response: {0}")]
    InvalidResponse(String),
    #[error("Failed to persist session token: {0}")]
    Storage(String),
}

/// The remote call a [`RemoteError`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteAction {
    Load,
    Update,
    Delete,
}

impl RemoteAction {
    /// Generic text shown to the operator when this action fails.
    pub fn failure_message(self) -> &'static str {
        match self {
            Self::Load => "Failed to load users. Please try again.",
            Self::Update => "Failed to update user. Please try again.",
            Self::Delete => "Failed to delete user. Please try again.",
        }
    }
}

impl fmt::Display for RemoteAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Load => "load users",
            Self::Update => "update user",
            Self::Delete => "delete user",
        })
    }
}

/// A page load, update or delete did not succeed. Never retried automatically.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Failed to {action}: {reason}")]
pub struct RemoteError {
    pub action: RemoteAction,
    pub reason: String,
}

impl RemoteError {
    pub fn new(action: RemoteAction, reason: impl Into<String>) -> Self {
        Self {
            action,
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DirectoryError {
    /// A directory operation was attempted without an authenticated session.
    #[error("Not signed in")]
    Unauthorized,
    #[error(transparent)]
    Remote(#[from] RemoteError),
    #[error("Page numbers start at 1, got {0}")]
    InvalidPage(u32),
    #[error("No pending {0} action")]
    NoPendingAction(ActionKind),
    #[error("Pending {kind} action targets user {expected}, not {got}")]
    ActionMismatch {
        kind: ActionKind,
        expected: UserId,
        got: UserId,
    },
    #[error("A {0} confirmation is already in flight")]
    ActionInFlight(ActionKind),
}

#[derive(Debug, Error)]
pub enum TokenStoreError {
    #[error("Could not determine a config directory for the session file")]
    NoConfigDir,
    #[error("Session file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Session file {} is not valid JSON: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
