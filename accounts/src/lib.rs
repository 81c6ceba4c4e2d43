//! Heiwa accounts: a local user directory, a single-session login and
//! per-user coin balances, persisted in a key/value store.
//!
//! Passwords are protected only by [`heiwa_common::legacy_hash`], which is
//! not a security boundary.

pub mod config;
pub mod directory;
pub mod error;
pub mod logging;
pub mod session;
pub mod store;

pub use crate::config::{Config, LoggingConfig, StorageBackend, StorageConfig};
pub use directory::UserDirectory;
pub use error::{AccountError, Result};
pub use session::SessionBalance;
pub use store::{KeyValueStore, MemoryStore, SqliteStore, StoreError};

pub use heiwa_common::{DirectoryStats, UserRecord};
