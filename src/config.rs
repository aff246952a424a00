//! Configuration loading.
//!
//! One TOML file, read once at startup and passed down. Every section is
//! optional; missing values take the defaults below. Library code never
//! reads the process environment.
//!
//! ```toml
//! [server]
//! bind = "0.0.0.0:3000"
//!
//! [store]               # omit for the in-memory store
//! url = "https://project.example.co"
//! api_key = "service-key"
//!
//! [blobs]
//! bucket = "xml-storage"
//!
//! [invoke.read]
//! retries = 3
//! retryDelay = 1000
//! timeoutMs = 15000
//!
//! [log]
//! filter = "product_hub=debug,info"
//! json = false
//! ```

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::blob::DEFAULT_BUCKET;
use crate::invoke::InvokePresets;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid config value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub server: ServerConfig,
    /// Hosted store connection. `None` runs against the in-memory store.
    pub store: Option<StoreConfig>,
    pub blobs: BlobConfig,
    pub invoke: InvokePresets,
    pub log: LogConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:3000".into(),
        }
    }
}

/// Base URL and key of the hosted project; the same pair serves the
/// table API, the storage API and the function endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StoreConfig {
    pub url: String,
    pub api_key: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BlobConfig {
    pub bucket: String,
}

impl Default for BlobConfig {
    fn default() -> Self {
        Self {
            bucket: DEFAULT_BUCKET.into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogConfig {
    /// `EnvFilter` directives; `RUST_LOG` takes precedence when set.
    pub filter: String,
    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "product_hub=info,tower_http=info,warn".into(),
            json: false,
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.bind.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "server.bind",
                reason: "must not be empty".to_string(),
            });
        }
        if let Some(store) = &self.store {
            if !store.url.starts_with("http://") && !store.url.starts_with("https://") {
                return Err(ConfigError::InvalidValue {
                    field: "store.url",
                    reason: format!("expected an http(s) URL, got {:?}", store.url),
                });
            }
            if store.api_key.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: "store.api_key",
                    reason: "must not be empty".to_string(),
                });
            }
        }
        if self.blobs.bucket.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "blobs.bucket",
                reason: "must not be empty".to_string(),
            });
        }
        if self.invoke.read.retries == 0 || self.invoke.write.retries == 0 {
            return Err(ConfigError::InvalidValue {
                field: "invoke",
                reason: "retries must be >= 1".to_string(),
            });
        }
        Ok(())
    }
}
