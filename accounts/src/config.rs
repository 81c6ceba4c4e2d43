//! Configuration for the accounts service.

use std::sync::Arc;

use config::{Config as ConfigLoader, ConfigError, Environment, File};
use serde::Deserialize;

use crate::store::{KeyValueStore, MemoryStore, SqliteStore, StoreError};

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Which medium persists the `users` and `currentUser` slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    /// SQLite file at `storage.url`
    Sqlite,
    /// Process memory; nothing survives a restart
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_backend")]
    pub backend: StorageBackend,
    /// SQLite database URL (default: sqlite:./data/heiwa.db)
    #[serde(default = "default_storage_url")]
    pub url: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            url: default_storage_url(),
        }
    }
}

impl StorageConfig {
    /// Open the configured store.
    pub fn open_store(&self) -> Result<Arc<dyn KeyValueStore>, StoreError> {
        match self.backend {
            StorageBackend::Sqlite => Ok(Arc::new(SqliteStore::open(&self.url)?)),
            StorageBackend::Memory => {
                tracing::warn!("Using in-memory storage, accounts will not persist");
                Ok(Arc::new(MemoryStore::new()))
            }
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level used when RUST_LOG is unset (default: info)
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

// Default values
fn default_backend() -> StorageBackend {
    StorageBackend::Sqlite
}
fn default_storage_url() -> String {
    "sqlite:./data/heiwa.db".to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from file and environment variables.
    ///
    /// Configuration sources (in order of precedence):
    /// 1. Environment variables (HEIWA__SECTION__KEY format)
    /// 2. config.toml file (if present)
    /// 3. Built-in defaults
    pub fn load() -> Result<Self, ConfigError> {
        let config = ConfigLoader::builder()
            .set_default("storage.backend", "sqlite")?
            .set_default("storage.url", default_storage_url())?
            .set_default("logging.level", default_log_level())?
            .add_source(File::with_name("config").required(false))
            .add_source(
                Environment::with_prefix("HEIWA")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
