//! Key/value persistence layer.
//!
//! Accounts are stored under two string keys, each holding a JSON document.
//! The `KeyValueStore` trait abstracts the medium so the directory can run
//! against an in-memory map in tests and a SQLite file in production.

mod memory;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use serde::de::DeserializeOwned;
use serde::Serialize;

/// Key holding the JSON array of all user records.
pub const USERS_KEY: &str = "users";
/// Key holding the JSON snapshot of the logged-in user.
pub const CURRENT_USER_KEY: &str = "currentUser";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Encoding error: {0}")]
    Encode(String),
}

/// String-keyed, string-valued persistent storage.
///
/// Implementations provide no transactions: each call is applied on its own.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Remove `key`. Removing an absent key succeeds.
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// Read and decode a JSON value.
///
/// A value that fails to decode is logged and reported as absent, so a
/// corrupted slot behaves like an empty one.
pub(crate) fn read_json<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> Result<Option<T>, StoreError> {
    let Some(raw) = store.get(key)? else {
        return Ok(None);
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Ok(Some(value)),
        Err(e) => {
            tracing::warn!(key, error = %e, "Ignoring malformed stored value");
            Ok(None)
        }
    }
}

/// Encode a value as JSON and store it.
pub(crate) fn write_json<T: Serialize + ?Sized>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), StoreError> {
    let raw = serde_json::to_string(value).map_err(|e| StoreError::Encode(e.to_string()))?;
    store.set(key, &raw)
}
