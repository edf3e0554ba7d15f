//! Runtime configuration.
//!
//! Read from a YAML (or JSON, which YAML accepts) file. The path is given
//! explicitly or through `ROSTER_CONFIG_PATH`; without either, defaults apply.
//!
//! ```yaml
//! store:
//!   base_url: "https://roster.example.org"
//!   timeout_secs: 10
//! pulse_ms: 450
//! ```

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use std::{env, fs};

pub const CONFIG_PATH_ENV: &str = "ROSTER_CONFIG_PATH";
pub const API_TOKEN_ENV: &str = "ROSTER_API_TOKEN";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RosterConfig {
    pub store: StoreConfig,
    /// Merge highlight duration in milliseconds.
    pub pulse_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub base_url: String,
    /// Bearer token for the admin API.
    pub token: Option<String>,
    /// Per-request timeout. Unset means requests may wait indefinitely.
    pub timeout_secs: Option<u64>,
}

impl Default for RosterConfig {
    fn default() -> Self {
        Self { store: StoreConfig::default(), pulse_ms: 450 }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self { base_url: "http://localhost:8000".to_string(), token: None, timeout_secs: None }
    }
}

impl RosterConfig {
    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        let config: RosterConfig = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)
            .map_err(|source| ConfigError::Io { path: path.display().to_string(), source })?;
        Self::from_yaml_str(&content)
    }

    /// Load from `path`, else from `ROSTER_CONFIG_PATH`, else defaults; then
    /// apply `ROSTER_API_TOKEN` if set.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_path(path)?,
            None => match env::var(CONFIG_PATH_ENV) {
                Ok(p) if !p.trim().is_empty() => Self::from_path(Path::new(p.trim()))?,
                _ => Self::default(),
            },
        };

        if let Ok(token) = env::var(API_TOKEN_ENV) {
            if !token.trim().is_empty() {
                config.store.token = Some(token.trim().to_string());
            }
        }

        log::debug!("Using constraint store at {}", config.store.base_url);
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.store.base_url.trim().is_empty() {
            return Err(ConfigError::Invalid("store.base_url must not be empty".to_string()));
        }
        if self.pulse_ms == 0 {
            return Err(ConfigError::Invalid("pulse_ms must be greater than zero".to_string()));
        }
        if self.store.timeout_secs == Some(0) {
            return Err(ConfigError::Invalid("store.timeout_secs must be greater than zero".to_string()));
        }
        Ok(())
    }

    pub fn pulse_duration(&self) -> Duration {
        Duration::from_millis(self.pulse_ms)
    }
}
