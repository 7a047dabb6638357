//! Configuration management for the feature client.
//!
//! This module handles client configuration (the API base URL), the dev
//! server's bind settings, and logging.

use crate::error::{FeatureError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Client configuration
    #[serde(default)]
    pub client: ClientConfig,

    /// Dev server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL every request path is built on
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// User-Agent header sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

/// Dev server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// Port number (0 picks an ephemeral port)
    #[serde(default = "default_port")]
    pub port: u16,

    /// Prefix mounted in front of `/features`, e.g. `/api`
    #[serde(default)]
    pub path_prefix: String,

    /// Enable CORS
    #[serde(default = "default_enable_cors")]
    pub enable_cors: bool,

    /// CORS allowed origins
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,

    /// GeoJSON FeatureCollection loaded into the store at startup
    #[serde(default)]
    pub seed_file: Option<PathBuf>,

    /// Worker threads (defaults to the number of CPUs)
    #[serde(default)]
    pub workers: Option<usize>,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format
    #[serde(default = "default_log_format")]
    pub format: LogFormat,
}

/// Log format enumeration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    Pretty,
    Compact,
}

// Default value functions
fn default_base_url() -> String {
    crate::DEFAULT_BASE_URL.to_string()
}
fn default_user_agent() -> String {
    format!("{}/{}", crate::CLIENT_NAME, crate::CLIENT_VERSION)
}
fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}
fn default_port() -> u16 {
    8000
}
fn default_enable_cors() -> bool {
    true
}
fn default_cors_origins() -> Vec<String> {
    vec!["*".to_string()]
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_format() -> LogFormat {
    LogFormat::Compact
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_port(),
            path_prefix: String::new(),
            enable_cors: default_enable_cors(),
            cors_origins: default_cors_origins(),
            seed_file: None,
            workers: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| FeatureError::Config(format!("Failed to read config file: {}", e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| FeatureError::Config(format!("Failed to parse config file: {}", e)))?;

        Ok(config)
    }

    /// Save configuration to a file
    pub fn to_file(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| FeatureError::Config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| FeatureError::Config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        let base_url = url::Url::parse(&self.client.base_url).map_err(|e| {
            FeatureError::Config(format!(
                "Invalid client base_url '{}': {}",
                self.client.base_url, e
            ))
        })?;

        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(FeatureError::Config(format!(
                "Client base_url must use http or https, got '{}'",
                base_url.scheme()
            )));
        }

        if self.server.bind_address.trim().is_empty() {
            return Err(FeatureError::Config(
                "Server bind_address must not be empty".to_string(),
            ));
        }

        let prefix = &self.server.path_prefix;
        if !prefix.is_empty() && (!prefix.starts_with('/') || prefix.ends_with('/')) {
            return Err(FeatureError::Config(format!(
                "Server path_prefix must start with '/' and not end with '/', got '{}'",
                prefix
            )));
        }

        if self.server.workers == Some(0) {
            return Err(FeatureError::Config(
                "Server workers must be at least 1".to_string(),
            ));
        }

        if self.server.enable_cors && self.server.cors_origins.is_empty() {
            return Err(FeatureError::Config(
                "CORS enabled but no allowed origins provided".to_string(),
            ));
        }

        Ok(())
    }
}
