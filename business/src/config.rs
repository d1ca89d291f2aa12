use std::env::vars;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context as _;
use log::info;
use serde::Deserialize;

const DEFAULT_API_BASE_URL: &str = "https://reqres.in";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const ENV_PREFIX: &str = "ROSTER_";

/// How overlapping `load_page` calls are reconciled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum PageLoadPolicy {
    /// Loads run independently; whichever response resolves last is shown.
    #[serde(rename = "last_response_wins")]
    LastResponseWins,
    /// A new load cancels the one in flight; only the newest request may update the page.
    #[default]
    #[serde(rename = "latest_request_wins")]
    LatestRequestWins,
}

#[derive(Debug, Clone)]
pub struct BusinessConfig {
    pub api_base_url: String,
    /// Sent as `x-api-key` on every request when present.
    pub api_key: Option<String>,
    pub request_timeout: Duration,
    pub page_load_policy: PageLoadPolicy,
    /// Overrides the default session file location.
    pub token_path: Option<PathBuf>,
}

/// Raw `ROSTER_*` variables, prefix stripped.
#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    api_base_url: Option<String>,
    api_key: Option<String>,
    timeout_secs: Option<u64>,
    page_load_policy: Option<PageLoadPolicy>,
    token_path: Option<PathBuf>,
}

impl BusinessConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Reads `ROSTER_API_BASE_URL`, `ROSTER_API_KEY`, `ROSTER_TIMEOUT_SECS`,
    /// `ROSTER_PAGE_LOAD_POLICY` and `ROSTER_TOKEN_PATH`, falling back to defaults.
    pub fn from_env() -> anyhow::Result<Self> {
        info!("Loading configuration from environment variables");
        Self::from_vars(vars())
    }

    fn from_vars(vars: impl IntoIterator<Item = (String, String)>) -> anyhow::Result<Self> {
        let scoped: Vec<(String, String)> = vars
            .into_iter()
            .filter_map(|(key, value)| {
                key.strip_prefix(ENV_PREFIX)
                    .map(|key| (key.to_owned(), value))
            })
            .collect();

        let raw: RawConfig =
            serde_env::from_iter(scoped).context("Invalid ROSTER_* environment variables")?;
        Ok(Self::from_raw(raw))
    }

    fn from_raw(raw: RawConfig) -> Self {
        let defaults = Self::default();
        Self {
            api_base_url: raw
                .api_base_url
                .filter(|url| !url.trim().is_empty())
                .unwrap_or(defaults.api_base_url),
            api_key: raw.api_key.filter(|key| !key.is_empty()),
            request_timeout: raw
                .timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.request_timeout),
            page_load_policy: raw.page_load_policy.unwrap_or_default(),
            token_path: raw.token_path,
        }
    }

    /// Base URL of the REST API, e.g. `https://reqres.in/api`.
    pub fn api_url(&self) -> String {
        let base = self.api_base_url.trim_end_matches('/');
        if base.is_empty() {
            "/api".to_owned()
        } else {
            format!("{base}/api")
        }
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }
}

impl Default for BusinessConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_owned(),
            api_key: None,
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            page_load_policy: PageLoadPolicy::default(),
            token_path: None,
        }
    }
}
