//! Session and controller wiring for CLI commands.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context as _, Result, bail};
use roster_business::http::Client;
use roster_business::{
    BusinessConfig, DirectoryApi, DirectoryController, FileTokenStore, Route, SessionStore,
};
use tracing::{debug, instrument};

/// Everything a command needs, built once per invocation.
pub struct AppContext {
    pub config: BusinessConfig,
    pub http: Client,
    pub session: SessionStore,
    pub token_path: PathBuf,
}

impl AppContext {
    /// Load config from the environment, apply CLI overrides and restore any saved session.
    #[instrument(skip_all, name = "build_context")]
    pub fn build(api_url: Option<String>) -> Result<Self> {
        let mut config = BusinessConfig::from_env()?;
        if let Some(api_url) = api_url {
            config.api_base_url = api_url;
        }
        Self::with_config(config)
    }

    pub fn with_config(config: BusinessConfig) -> Result<Self> {
        let http = Client::new(&config).context("Failed to build HTTP client")?;
        let store = FileTokenStore::from_config(&config)
            .context("Failed to locate the session file")?;
        let token_path = store.path().to_path_buf();

        let session = SessionStore::new(&config, http.clone(), Arc::new(store));
        let restored = session.restore();
        debug!(restored, api = %config.api_url(), "context ready");

        Ok(Self {
            config,
            http,
            session,
            token_path,
        })
    }

    pub fn route(&self) -> Route {
        Route::for_session(&self.session.state())
    }

    /// Refuse `target` when it needs a session and there is none.
    pub fn gate(&self, target: Route) -> Result<()> {
        if target.requires_session() && self.route() != target {
            bail!("Not signed in. Run `roster login` first.");
        }
        Ok(())
    }

    /// A controller for the directory, or an error pointing at `roster login` when signed
    /// out.
    pub fn directory(&self) -> Result<DirectoryController> {
        self.gate(Route::Directory)?;

        Ok(DirectoryController::new(
            self.session.clone(),
            DirectoryApi::new(&self.config, self.http.clone()),
            self.config.page_load_policy,
        ))
    }
}
