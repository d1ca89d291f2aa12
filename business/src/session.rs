//! Session state and authentication.
//!
//! [`SessionStore`] is the single source of truth for whether the caller may touch the
//! directory. It owns the token, mirrors it into a watch cell for observers, and
//! persists it through a [`TokenStore`] so a session survives process restarts.
//!
//! ## Flow
//!
//! 1. `restore()` at startup reads the persisted token (no network call)
//! 2. `login()` posts credentials to `/login`, persists the token, then flips the state
//! 3. `logout()` clears storage and state; it never fails

use std::sync::Arc;

use log::{error, info, warn};
use roster_states::{State, StateCell, StateReader};
use serde::{Deserialize, Serialize};

use crate::BusinessConfig;
use crate::error::AuthError;
use crate::http::Client;
use crate::token_store::TokenStore;

/// Authentication status. Authenticated iff `token` is present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    token: Option<String>,
}

impl State for SessionState {
    const NAME: &'static str = "session";
}

impl SessionState {
    /// An authenticated state. Empty tokens are treated as absent.
    pub fn authenticated(token: impl Into<String>) -> Self {
        let token = token.into();
        Self {
            token: (!token.is_empty()).then_some(token),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }
}

/// Request payload for `POST /login`.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// Successful `POST /login` body.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: Option<String>,
}

/// Failure body, e.g. `{"error": "user not found"}`.
#[derive(Debug, Clone, Deserialize)]
struct ErrorResponse {
    error: Option<String>,
}

/// Extracts the server's error message from a response, falling back to `default`.
fn extract_error_message(body: &[u8], default: &str) -> String {
    serde_json::from_slice::<ErrorResponse>(body)
        .ok()
        .and_then(|r| r.error)
        .filter(|message| !message.is_empty())
        .unwrap_or_else(|| default.to_owned())
}

#[derive(Debug)]
struct SessionInner {
    login_url: String,
    http: Client,
    store: Arc<dyn TokenStore>,
    state: StateCell<SessionState>,
}

/// Cheaply cloneable handle; clones share one session.
#[derive(Debug, Clone)]
pub struct SessionStore {
    inner: Arc<SessionInner>,
}

impl SessionStore {
    /// A new, unauthenticated session. Call [`Self::restore`] to pick up a persisted token.
    pub fn new(config: &BusinessConfig, http: Client, store: Arc<dyn TokenStore>) -> Self {
        Self {
            inner: Arc::new(SessionInner {
                login_url: format!("{}/login", config.api_url()),
                http,
                store,
                state: StateCell::default(),
            }),
        }
    }

    /// Load the persisted token, if any. Returns whether the session is now authenticated.
    ///
    /// The token is not validated remotely; a stale token surfaces as a failed page load.
    pub fn restore(&self) -> bool {
        match self.inner.store.load() {
            Ok(Some(token)) => {
                info!("SessionStore: restored persisted session");
                self.inner.state.set(SessionState::authenticated(token));
            }
            Ok(None) => {
                info!("SessionStore: no persisted session");
            }
            Err(e) => {
                warn!("SessionStore: failed to read persisted session: {e}");
            }
        }
        self.is_authenticated()
    }

    /// Exchange credentials for a token.
    ///
    /// The token is written to storage before the state flips, so an observer that sees
    /// an authenticated session can rely on it being durable. On any error the session is
    /// left as it was.
    pub async fn login(&self, email: &str, password: &str) -> Result<(), AuthError> {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            info!("SessionStore: login attempted with blank credentials");
            return Err(AuthError::MissingCredentials);
        }

        info!("SessionStore: logging in as '{email}'");

        let request = self
            .inner
            .http
            .post(&self.inner.login_url)
            .json(&LoginRequest { email, password })
            .map_err(|e| AuthError::InvalidResponse(format!("Failed to serialize login: {e}")))?;

        let response = request.send().await.map_err(|e| {
            error!("SessionStore: login request failed: {e}");
            AuthError::Transport(e.to_string())
        })?;

        if !response.is_success() {
            let message = extract_error_message(&response.body, "Invalid email or password");
            info!(
                "SessionStore: login rejected with status {}: {message}",
                response.status
            );
            return Err(AuthError::Rejected {
                status: response.status,
                message,
            });
        }

        let token = response
            .json::<LoginResponse>()
            .map_err(|e| {
                error!("SessionStore: failed to parse login response: {e}");
                AuthError::InvalidResponse(e.to_string())
            })?
            .token
            .filter(|token| !token.is_empty())
            .ok_or_else(|| AuthError::InvalidResponse("response carried no token".to_owned()))?;

        self.inner.store.save(&token).map_err(|e| {
            error!("SessionStore: failed to persist token: {e}");
            AuthError::Storage(e.to_string())
        })?;

        self.inner.state.set(SessionState::authenticated(token));
        info!("SessionStore: signed in");
        Ok(())
    }

    /// Forget the session locally. Idempotent; nothing is sent to the server.
    pub fn logout(&self) {
        if let Err(e) = self.inner.store.clear() {
            warn!("SessionStore: failed to clear persisted session: {e}");
        }

        let changed = self.inner.state.update_if(|state| {
            let was_authenticated = state.is_authenticated();
            *state = SessionState::default();
            was_authenticated
        });

        if changed {
            info!("SessionStore: signed out");
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner.state.with(SessionState::is_authenticated)
    }

    pub fn token(&self) -> Option<String> {
        self.inner.state.with(|state| state.token().map(str::to_owned))
    }

    /// `Authorization` header value for directory requests.
    pub fn bearer(&self) -> Option<String> {
        self.inner
            .state
            .with(|state| state.token().map(|token| format!("Bearer {token}")))
    }

    pub fn state(&self) -> SessionState {
        self.inner.state.get()
    }

    /// Level-triggered: a reader created or polled after a transition sees the new value.
    pub fn subscribe(&self) -> StateReader<SessionState> {
        self.inner.state.subscribe()
    }
}
