//! API configuration.
//!
//! Resolution order, later wins:
//! 1. Built-in defaults (`http://localhost:8000/api`)
//! 2. `~/.pixrec/config.json` (any subset of fields)
//! 3. `PIXREC_API_URL` from the environment at start-up, or the value baked
//!    in at build time when the variable is absent

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use url::Url;

/// Environment variable holding the API base URL.
pub const API_URL_ENV: &str = "PIXREC_API_URL";

pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL every endpoint path is appended to
    pub base_url: String,
    /// Timeout for ordinary JSON requests
    pub request_timeout_secs: u64,
    /// Timeout for uploads, which stream the whole file
    pub upload_timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            request_timeout_secs: 30,
            upload_timeout_secs: 300,
        }
    }
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: normalize_base_url(&base_url.into()),
            ..Self::default()
        }
    }

    /// Load defaults, then the user file, then the environment.
    pub fn load() -> Self {
        let mut config = Self::default();

        if let Some(path) = Self::config_path() {
            if let Ok(contents) = std::fs::read_to_string(&path) {
                match serde_json::from_str::<ApiConfig>(&contents) {
                    Ok(file_config) => {
                        config = file_config;
                        log::info!("ApiConfig: loaded {:?}", path);
                    }
                    Err(e) => {
                        log::warn!("ApiConfig: failed to parse {:?}: {}", path, e);
                    }
                }
            }
        }

        let env_url = std::env::var(API_URL_ENV)
            .ok()
            .or_else(|| option_env!("PIXREC_API_URL").map(str::to_string));
        if let Some(url) = env_url.filter(|u| !u.trim().is_empty()) {
            config.base_url = url;
        }

        config.base_url = normalize_base_url(&config.base_url);
        log::info!("ApiConfig: using API at {}", config.base_url);
        config
    }

    /// `~/.pixrec/config.json`
    pub fn config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".pixrec").join("config.json"))
    }

    /// Resolve an asset URL from the API. The server hands out
    /// origin-relative paths such as `/uploads/abc.jpg`.
    pub fn resolve_asset_url(&self, raw: &str) -> Option<Url> {
        if let Ok(absolute) = Url::parse(raw) {
            return Some(absolute);
        }
        Url::parse(&self.base_url).ok()?.join(raw).ok()
    }
}

fn normalize_base_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_string()
}
