//! Durable storage for the session token.
//!
//! The token is the only thing persisted. [`FileTokenStore`] keeps it in a small JSON
//! document under the user's config directory (`<config>/roster/session.json`):
//!
//! ```json
//! { "auth_token": "QpwL5tke4Pnpja7X4" }
//! ```

use std::fmt::Debug;
use std::fs;
use std::io::{ErrorKind, Write as _};
use std::path::{Path, PathBuf};

use log::{debug, info};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::BusinessConfig;
use crate::error::TokenStoreError;

/// Key the token is stored under.
pub const TOKEN_KEY: &str = "auth_token";

pub trait TokenStore: Send + Sync + Debug {
    /// The stored token, if any. Empty values read as `None`.
    fn load(&self) -> Result<Option<String>, TokenStoreError>;

    fn save(&self, token: &str) -> Result<(), TokenStoreError>;

    /// Remove the stored token. Clearing an empty store succeeds.
    fn clear(&self) -> Result<(), TokenStoreError>;
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct SessionFile {
    #[serde(rename = "auth_token", default, skip_serializing_if = "Option::is_none")]
    token: Option<String>,
}

#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Uses `config.token_path` when set, otherwise [`Self::default_path`].
    pub fn from_config(config: &BusinessConfig) -> Result<Self, TokenStoreError> {
        match &config.token_path {
            Some(path) => Ok(Self::new(path.clone())),
            None => Ok(Self::new(Self::default_path()?)),
        }
    }

    pub fn default_path() -> Result<PathBuf, TokenStoreError> {
        let config_dir = dirs::config_dir().ok_or(TokenStoreError::NoConfigDir)?;
        Ok(config_dir.join("roster").join("session.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> TokenStoreError {
        TokenStoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<String>, TokenStoreError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("FileTokenStore: no session file at {}", self.path.display());
                return Ok(None);
            }
            Err(e) => return Err(self.io_error(e)),
        };

        let file: SessionFile =
            serde_json::from_str(&content).map_err(|source| TokenStoreError::Json {
                path: self.path.clone(),
                source,
            })?;

        Ok(file.token.filter(|token| !token.is_empty()))
    }

    fn save(&self, token: &str) -> Result<(), TokenStoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }

        let file = SessionFile {
            token: Some(token.to_owned()),
        };
        let content =
            serde_json::to_string_pretty(&file).map_err(|source| TokenStoreError::Json {
                path: self.path.clone(),
                source,
            })?;

        write_private(&self.path, content.as_bytes()).map_err(|e| self.io_error(e))?;

        info!("FileTokenStore: token saved to {}", self.path.display());
        Ok(())
    }

    fn clear(&self) -> Result<(), TokenStoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                info!("FileTokenStore: removed {}", self.path.display());
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.io_error(e)),
        }
    }
}

/// Write `content`, creating the file owner-only (0600 on Unix) so the token is never
/// readable by others, even briefly.
fn write_private(path: &Path, content: &[u8]) -> std::io::Result<()> {
    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt as _;
        options.mode(0o600);
    }

    let mut file = options.open(path)?;
    // `mode` only applies on creation; tighten a file left by an older write.
    restrict_permissions(&file)?;
    file.write_all(content)?;
    file.sync_all()
}

#[cfg(unix)]
fn restrict_permissions(file: &fs::File) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt as _;
    file.set_permissions(fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn restrict_permissions(_file: &fs::File) -> std::io::Result<()> {
    Ok(())
}

/// Process-local store for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Mutex::new(Some(token.into())),
        }
    }

    /// Current stored value, bypassing the empty-token filter.
    pub fn stored(&self) -> Option<String> {
        self.token.lock().clone()
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<String>, TokenStoreError> {
        Ok(self.token.lock().clone().filter(|token| !token.is_empty()))
    }

    fn save(&self, token: &str) -> Result<(), TokenStoreError> {
        *self.token.lock() = Some(token.to_owned());
        Ok(())
    }

    fn clear(&self) -> Result<(), TokenStoreError> {
        *self.token.lock() = None;
        Ok(())
    }
}
