//! Client configuration.
//!
//! # Responsibility
//! - Resolve API base URL, timeouts and logging settings from the process
//!   environment, with defaults for local development.
//!
//! # Invariants
//! - `api_base_url` is absolute http(s) and has no trailing slash.
//! - Resolution never panics; bad values surface as `ConfigError`.

use crate::logging::default_log_level;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::time::Duration;

pub const ENV_API_URL: &str = "GRADEBOOK_API_URL";
pub const ENV_TIMEOUT_SECS: &str = "GRADEBOOK_TIMEOUT_SECS";
pub const ENV_LOG_LEVEL: &str = "GRADEBOOK_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "GRADEBOOK_LOG_DIR";

const DEFAULT_API_URL: &str = "http://127.0.0.1:8000/api";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const CONNECT_TIMEOUT_SECS: u64 = 10;
const LOG_DIR_NAME: &str = "gradebook-logs";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidBaseUrl(String),
    InvalidTimeout(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidBaseUrl(value) => {
                write!(f, "invalid API base URL `{value}`; expected http:// or https://")
            }
            Self::InvalidTimeout(value) => {
                write!(f, "invalid timeout `{value}`; expected a positive number of seconds")
            }
        }
    }
}

impl Error for ConfigError {}

/// Resolved settings for one client process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub log_level: String,
    pub log_dir: PathBuf,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            connect_timeout: Duration::from_secs(CONNECT_TIMEOUT_SECS),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            log_level: default_log_level().to_string(),
            log_dir: std::env::temp_dir().join(LOG_DIR_NAME),
        }
    }
}

impl ClientConfig {
    /// Resolves configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Resolves configuration through `lookup`, treating blank values as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |name: &str| {
            lookup(name)
                .map(|raw| raw.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let mut config = Self::default();
        if let Some(url) = get(ENV_API_URL) {
            config.api_base_url = normalize_base_url(&url)?;
        }
        if let Some(raw) = get(ENV_TIMEOUT_SECS) {
            config.request_timeout = parse_timeout(&raw)?;
        }
        if let Some(level) = get(ENV_LOG_LEVEL) {
            config.log_level = level;
        }
        if let Some(dir) = get(ENV_LOG_DIR) {
            config.log_dir = PathBuf::from(dir);
        }
        Ok(config)
    }

    /// Replaces the API base URL after normalizing it.
    pub fn with_api_base_url(mut self, raw: &str) -> Result<Self, ConfigError> {
        self.api_base_url = normalize_base_url(raw)?;
        Ok(self)
    }
}

/// Trims whitespace and trailing slashes and checks the scheme.
pub fn normalize_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let rest = trimmed
        .strip_prefix("https://")
        .or_else(|| trimmed.strip_prefix("http://"));
    match rest {
        Some(host) if !host.is_empty() => Ok(trimmed.to_string()),
        _ => Err(ConfigError::InvalidBaseUrl(raw.trim().to_string())),
    }
}

fn parse_timeout(raw: &str) -> Result<Duration, ConfigError> {
    match raw.parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(ConfigError::InvalidTimeout(raw.to_string())),
    }
}
