//! Configuration management for ConnectIdade

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, Result};
use crate::types::LoginRequest;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub ui: UiConfig,
    pub account: Option<AccountConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Timings used by the navigator and the front end loop
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_toast_ms")]
    pub toast_ms: u64,
    #[serde(default = "default_settings_debounce_ms")]
    pub settings_debounce_ms: u64,
    #[serde(default = "default_tick_rate_ms")]
    pub tick_rate_ms: u64,
}

/// Identity presented to the login endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountConfig {
    pub google_id: String,
    pub email: String,
    pub display_name: String,
}

fn default_base_url() -> String {
    "http://localhost:4502".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_toast_ms() -> u64 {
    3000
}

fn default_settings_debounce_ms() -> u64 {
    1000
}

fn default_tick_rate_ms() -> u64 {
    100
}

impl AccountConfig {
    pub fn login_request(&self) -> LoginRequest {
        LoginRequest {
            google_id: self.google_id.clone(),
            email: self.email.clone(),
            display_name: self.display_name.clone(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            toast_ms: default_toast_ms(),
            settings_debounce_ms: default_settings_debounce_ms(),
            tick_rate_ms: default_tick_rate_ms(),
        }
    }
}

impl Config {
    /// Load configuration from the default location
    ///
    /// A missing file yields the defaults. `CONNECTIDADE_API_URL` overrides
    /// the backend address either way.
    pub fn load() -> Result<Self> {
        let config_path = resolve_config_path()?;
        let mut config = if config_path.exists() {
            Self::load_from_path(&config_path)?
        } else {
            tracing::debug!("No config file at {}, using defaults", config_path.display());
            Self::default()
        };

        if let Ok(url) = std::env::var("CONNECTIDADE_API_URL") {
            config.api.base_url = url;
        }

        Ok(config)
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadError)?;
        let config: Config = toml::from_str(&content).map_err(ConfigError::ParseError)?;
        Ok(config)
    }

    /// The configured account, required by anything that logs in
    pub fn account(&self) -> Result<&AccountConfig> {
        self.account
            .as_ref()
            .ok_or_else(|| ConfigError::MissingField("account".to_string()).into())
    }
}

/// Resolve the configuration file path under the XDG config directory
pub fn resolve_config_path() -> Result<PathBuf> {
    if let Ok(path) = std::env::var("CONNECTIDADE_CONFIG") {
        return Ok(PathBuf::from(shellexpand::tilde(&path).to_string()));
    }

    let config_dir = dirs::config_dir()
        .ok_or_else(|| ConfigError::MissingField("config directory".to_string()))?;

    Ok(config_dir.join("connectidade").join("config.toml"))
}
