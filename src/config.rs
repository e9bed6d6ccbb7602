//! Service configuration
//!
//! Read once at startup from environment variables.

use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;

/// Default listen address
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:5000";
/// Default number of history entries served by `/api/memory`
pub const DEFAULT_HISTORY_LIMIT: i64 = 5;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid UNITCONV_BIND_ADDR '{value}': {source}")]
    BindAddr {
        value: String,
        source: std::net::AddrParseError,
    },

    #[error("Invalid UNITCONV_HISTORY_LIMIT '{0}': expected a positive integer")]
    HistoryLimit(String),
}

/// FeatureHub connection settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureHubConfig {
    pub url: String,
    pub api_key: String,
}

/// Runtime configuration
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub bind_addr: SocketAddr,
    pub database_path: PathBuf,
    pub history_limit: i64,
    pub featurehub: Option<FeatureHubConfig>,
}

impl ServiceConfig {
    /// Load from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using `lookup` in place of the environment
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind_value = lookup("UNITCONV_BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_value
            .parse()
            .map_err(|source| ConfigError::BindAddr {
                value: bind_value.clone(),
                source,
            })?;

        let history_limit = match lookup("UNITCONV_HISTORY_LIMIT") {
            Some(raw) => match raw.trim().parse::<i64>() {
                Ok(n) if n > 0 => n,
                _ => return Err(ConfigError::HistoryLimit(raw)),
            },
            None => DEFAULT_HISTORY_LIMIT,
        };

        let database_path = lookup("UNITCONV_DATABASE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(default_database_path);

        let featurehub = match (lookup("FEATUREHUB_URL"), lookup("FEATUREHUB_API_KEY")) {
            (Some(url), Some(api_key)) if !url.is_empty() && !api_key.is_empty() => {
                Some(FeatureHubConfig { url, api_key })
            }
            _ => None,
        };

        Ok(Self {
            bind_addr,
            database_path,
            history_limit,
            featurehub,
        })
    }
}

/// `<project>/data/unitconv.db`, resolved from the executable location
pub fn default_database_path() -> PathBuf {
    let mut path = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."));

    // Go up from target/release or target/debug to project root
    if path.ends_with("release") || path.ends_with("debug") {
        if let Some(parent) = path.parent() {
            if let Some(grandparent) = parent.parent() {
                path = grandparent.to_path_buf();
            }
        }
    }

    path.push("data");
    path.push("unitconv.db");
    path
}

/// Map a `LOG_LEVEL` value onto a tracing level directive
pub fn log_level_directive(level: Option<&str>) -> &'static str {
    match level.map(|l| l.trim().to_uppercase()).as_deref() {
        Some("VERBOSE") => "trace",
        Some("DEBUG") => "debug",
        Some("INFORMATION") => "info",
        Some("WARNING") => "warn",
        Some("ERROR") | Some("FATAL") => "error",
        _ => "info",
    }
}
