//! Heiwa Common Types
//!
//! Shared types used by the account directory and anything that reads its
//! persisted records.

pub mod password;
pub mod user;

pub use password::legacy_hash;
pub use user::{DirectoryStats, UserRecord};
