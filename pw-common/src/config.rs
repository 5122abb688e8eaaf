//! Configuration loading and API base URL resolution
//!
//! Resolution follows a fixed priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable (`PREDICTWELL_API_URL`)
//! 3. TOML config file
//! 4. Compiled default (fallback)
//!
//! A missing config file is not an error: the client warns and starts with
//! compiled defaults. An explicitly named config file must exist and parse.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

/// Environment variable overriding the API base URL
pub const API_URL_ENV: &str = "PREDICTWELL_API_URL";

/// Compiled default API base URL
pub const DEFAULT_API_URL: &str = "http://localhost:5000";

/// Prediction budget; covers a cold start of the hosted service
pub const DEFAULT_PREDICT_TIMEOUT_SECS: u64 = 45;

/// Budget for history, contact and report calls
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Visibility window of the contact success banner
pub const DEFAULT_BANNER_SECS: u64 = 3;

/// Configuration file contents
///
/// Every key is optional; absent keys fall through to compiled defaults.
///
/// ```toml
/// api_url = "https://predictwell-backend.onrender.com"
/// predict_timeout_secs = 45
///
/// [logging]
/// level = "debug"
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    /// Base URL of the remote service
    #[serde(default)]
    pub api_url: Option<String>,

    #[serde(default)]
    pub predict_timeout_secs: Option<u64>,

    #[serde(default)]
    pub request_timeout_secs: Option<u64>,

    #[serde(default)]
    pub banner_secs: Option<u64>,

    /// Logging configuration (optional)
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl TomlConfig {
    /// Read and parse a config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Cannot read config file {}: {}", path.display(), e))
        })?;

        toml::from_str(&content).map_err(|e| {
            Error::Config(format!("Invalid config file {}: {}", path.display(), e))
        })
    }
}

/// Locate the platform config file, if one exists
///
/// Linux checks `~/.config/predictwell/config.toml` then
/// `/etc/predictwell/config.toml`; other platforms use the user config dir only.
pub fn default_config_path() -> Option<PathBuf> {
    let user_config = dirs::config_dir().map(|d| d.join("predictwell").join("config.toml"));

    if let Some(path) = user_config {
        if path.exists() {
            return Some(path);
        }
    }

    if cfg!(target_os = "linux") {
        let system_config = PathBuf::from("/etc/predictwell/config.toml");
        if system_config.exists() {
            return Some(system_config);
        }
    }

    None
}

/// Fully resolved client configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_url: String,
    pub predict_timeout: Duration,
    pub request_timeout: Duration,
    pub banner_duration: Duration,
    pub log_level: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            predict_timeout: Duration::from_secs(DEFAULT_PREDICT_TIMEOUT_SECS),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            banner_duration: Duration::from_secs(DEFAULT_BANNER_SECS),
            log_level: default_log_level(),
        }
    }
}

impl ClientConfig {
    /// Resolve configuration from all sources
    ///
    /// `config_path` names an explicit config file; when `None` the platform
    /// default location is tried and silently skipped if absent.
    pub fn resolve(cli_api_url: Option<&str>, config_path: Option<&Path>) -> Result<Self> {
        let toml_config = match config_path {
            Some(path) => TomlConfig::load(path)?,
            None => match default_config_path() {
                Some(path) => match TomlConfig::load(&path) {
                    Ok(config) => {
                        debug!("Loaded config file {}", path.display());
                        config
                    }
                    Err(e) => {
                        warn!("Ignoring config file: {}", e);
                        TomlConfig::default()
                    }
                },
                None => {
                    debug!("No config file found, using compiled defaults");
                    TomlConfig::default()
                }
            },
        };

        let env_api_url = std::env::var(API_URL_ENV).ok();
        Self::from_sources(cli_api_url, env_api_url.as_deref(), &toml_config)
    }

    /// Combine already-loaded sources in priority order
    pub fn from_sources(
        cli_api_url: Option<&str>,
        env_api_url: Option<&str>,
        toml_config: &TomlConfig,
    ) -> Result<Self> {
        fn non_empty(v: Option<&str>) -> Option<&str> {
            v.map(str::trim).filter(|s| !s.is_empty())
        }

        let api_url = non_empty(cli_api_url)
            .or_else(|| non_empty(env_api_url))
            .or_else(|| non_empty(toml_config.api_url.as_deref()))
            .unwrap_or(DEFAULT_API_URL)
            .to_string();

        let config = Self {
            api_url,
            predict_timeout: Duration::from_secs(
                toml_config
                    .predict_timeout_secs
                    .unwrap_or(DEFAULT_PREDICT_TIMEOUT_SECS),
            ),
            request_timeout: Duration::from_secs(
                toml_config
                    .request_timeout_secs
                    .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
            ),
            banner_duration: Duration::from_secs(
                toml_config.banner_secs.unwrap_or(DEFAULT_BANNER_SECS),
            ),
            log_level: toml_config.logging.level.clone(),
        };

        config.validate()?;
        Ok(config)
    }

    /// Check invariants that would otherwise surface as confusing HTTP errors
    pub fn validate(&self) -> Result<()> {
        if !(self.api_url.starts_with("http://") || self.api_url.starts_with("https://")) {
            return Err(Error::Config(format!(
                "API URL must start with http:// or https://, got {:?}",
                self.api_url
            )));
        }

        if self.predict_timeout.is_zero() || self.request_timeout.is_zero() {
            return Err(Error::Config("Timeouts must be greater than zero".to_string()));
        }

        // A zero window would hide the contact confirmation entirely
        if self.banner_duration.is_zero() {
            return Err(Error::Config("banner_secs must be greater than zero".to_string()));
        }

        Ok(())
    }
}
