//! Service configuration
//!
//! Layers, lowest precedence first:
//! 1. Built-in defaults
//! 2. Optional TOML file
//! 3. Environment variables (`GAUVEDA_*`, plus `PORT`)
//! 4. Command-line flags (applied by the binary)
//!
//! ```toml
//! [server]
//! host = "0.0.0.0"
//! port = 5000
//!
//! [store]
//! backend = "sled"
//! data_dir = "/var/lib/gauveda/inquiries"
//!
//! [logging]
//! format = "json"
//! level = "info"
//!
//! [metrics]
//! enabled = true
//! ```

use gauveda_contact_core::StoreBackend;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Top-level service configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub server: ServerConfig,
    pub store: StoreConfig,
    pub logging: LoggingConfig,
    pub metrics: MetricsConfig,
}

/// HTTP listener settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Maximum request body size in bytes
    pub max_body_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            max_body_size: 64 * 1024,
        }
    }
}

/// Inquiry store selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub backend: BackendKind,
    /// Database directory, used by the sled backend only
    pub data_dir: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::Memory,
            data_dir: PathBuf::from("data/inquiries"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    #[default]
    Memory,
    Sled,
}

impl FromStr for BackendKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "memory" => Ok(BackendKind::Memory),
            "sled" => Ok(BackendKind::Sled),
            _ => Err(ConfigError::InvalidValue {
                key: "store.backend".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendKind::Memory => write!(f, "memory"),
            BackendKind::Sled => write!(f, "sled"),
        }
    }
}

/// Log output settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub format: LogFormat,
    /// Default filter directive when `RUST_LOG` is unset
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::Json,
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Json,
    Pretty,
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "pretty" | "text" => Ok(LogFormat::Pretty),
            _ => Err(ConfigError::InvalidValue {
                key: "logging.format".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    pub enabled: bool,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl ServiceConfig {
    /// Load defaults, an optional file, then environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Apply environment overrides using `lookup` to read variables
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("GAUVEDA_HOST") {
            self.server.host = host;
        }
        // GAUVEDA_PORT wins over the platform-provided PORT
        if let Some(port) = lookup("GAUVEDA_PORT").or_else(|| lookup("PORT")) {
            self.server.port = parse_value("server.port", &port)?;
        }
        if let Some(size) = lookup("GAUVEDA_MAX_BODY_SIZE") {
            self.server.max_body_size = parse_value("server.max_body_size", &size)?;
        }
        if let Some(backend) = lookup("GAUVEDA_STORE") {
            self.store.backend = backend.parse()?;
        }
        if let Some(dir) = lookup("GAUVEDA_DATA_DIR") {
            self.store.data_dir = PathBuf::from(dir);
        }
        if let Some(format) = lookup("GAUVEDA_LOG_FORMAT") {
            self.logging.format = format.parse()?;
        }
        if let Some(level) = lookup("GAUVEDA_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(enabled) = lookup("GAUVEDA_METRICS_ENABLED") {
            self.metrics.enabled = parse_value("metrics.enabled", &enabled)?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.host.trim().is_empty() {
            return Err(ConfigError::Invalid("server.host must not be empty".to_string()));
        }
        if self.server.max_body_size == 0 {
            return Err(ConfigError::Invalid(
                "server.max_body_size must be greater than zero".to_string(),
            ));
        }
        if self.store.backend == BackendKind::Sled && self.store.data_dir.as_os_str().is_empty() {
            return Err(ConfigError::Invalid(
                "store.data_dir is required for the sled backend".to_string(),
            ));
        }
        Ok(())
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let addr = format!("{}:{}", self.server.host, self.server.port);
        addr.parse().map_err(|_| ConfigError::InvalidValue {
            key: "server.host".to_string(),
            value: addr,
        })
    }

    pub fn store_backend(&self) -> StoreBackend {
        match self.store.backend {
            BackendKind::Memory => StoreBackend::Memory,
            BackendKind::Sled => StoreBackend::Sled {
                path: self.store.data_dir.clone(),
            },
        }
    }
}

fn parse_value<T: FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    })
}
