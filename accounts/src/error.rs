//! Error types for account operations.

use crate::store::StoreError;

/// Errors returned by directory and balance operations.
///
/// Every failing operation leaves both the directory and the session
/// snapshot exactly as they were.
#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    #[error("Username already taken: {0}")]
    DuplicateUsername(String),

    #[error("User not found: {0}")]
    NotFound(u64),

    #[error("Insufficient funds: balance {balance}, requested {requested}")]
    InsufficientFunds { balance: u64, requested: u64 },

    #[error("No active session")]
    NoActiveSession,

    #[error("Balance overflow")]
    BalanceOverflow,

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

pub type Result<T> = std::result::Result<T, AccountError>;
