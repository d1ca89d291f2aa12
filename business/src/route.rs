//! Route state for page navigation.
//!
//! The core never navigates; a presentation adapter derives the route from the session
//! and redirects away from the directory while signed out.

use serde::{Deserialize, Serialize};

use crate::session::SessionState;

/// Which view the presentation layer should show.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Route {
    /// Shown when the user is not authenticated.
    #[default]
    Login,
    /// The paginated user directory.
    Directory,
}

impl Route {
    pub fn for_session(session: &SessionState) -> Self {
        if session.is_authenticated() {
            Self::Directory
        } else {
            Self::Login
        }
    }

    pub fn requires_session(self) -> bool {
        matches!(self, Self::Directory)
    }
}
