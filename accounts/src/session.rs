//! Current-user session and coin balance mutations.
//!
//! The session is a snapshot of one directory record kept in its own store
//! slot. Balance changes must land in both places, so they all go through
//! [`SessionBalance::write_through_balance`].

use heiwa_common::UserRecord;

use crate::directory::UserDirectory;
use crate::error::{AccountError, Result};
use crate::store::{read_json, write_json, KeyValueStore, StoreError, CURRENT_USER_KEY};

pub(crate) fn load(store: &dyn KeyValueStore) -> std::result::Result<Option<UserRecord>, StoreError> {
    read_json(store, CURRENT_USER_KEY)
}

pub(crate) fn save(store: &dyn KeyValueStore, user: &UserRecord) -> std::result::Result<(), StoreError> {
    write_json(store, CURRENT_USER_KEY, user)
}

pub(crate) fn clear(store: &dyn KeyValueStore) -> std::result::Result<(), StoreError> {
    store.remove(CURRENT_USER_KEY)
}

/// Tracks the logged-in user and moves coins in and out of their balance.
#[derive(Clone)]
pub struct SessionBalance {
    directory: UserDirectory,
}

impl SessionBalance {
    /// Build over the same store as `directory`.
    pub fn new(directory: UserDirectory) -> Self {
        Self { directory }
    }

    pub fn directory(&self) -> &UserDirectory {
        &self.directory
    }

    /// The persisted session snapshot, if someone is logged in.
    pub fn get_session(&self) -> Result<Option<UserRecord>> {
        Ok(load(self.directory.store())?)
    }

    /// Replace the session snapshot. Does not touch the directory.
    pub fn set_session(&self, user: &UserRecord) -> Result<()> {
        Ok(save(self.directory.store(), user)?)
    }

    /// Drop the session snapshot. Does not touch the directory.
    pub fn clear_session(&self) -> Result<()> {
        Ok(clear(self.directory.store())?)
    }

    /// Balance of the logged-in user, 0 when browsing anonymously.
    pub fn current_balance(&self) -> Result<u64> {
        Ok(self.get_session()?.map_or(0, |user| user.coins))
    }

    /// Add coins to the logged-in user's balance. Returns the new balance.
    pub fn credit(&self, amount: u64) -> Result<u64> {
        let user = self.session_record()?;
        let balance = user
            .coins
            .checked_add(amount)
            .ok_or(AccountError::BalanceOverflow)?;

        let user = self.write_through_balance(user.id, balance)?;
        tracing::info!(user_id = user.id, balance, "+{} coins credited", amount);
        Ok(balance)
    }

    /// Take coins from the logged-in user's balance. Returns the new balance.
    ///
    /// Fails with [`AccountError::InsufficientFunds`] rather than going
    /// below zero.
    pub fn debit(&self, amount: u64) -> Result<u64> {
        let user = self.session_record()?;
        let balance = user
            .coins
            .checked_sub(amount)
            .ok_or(AccountError::InsufficientFunds {
                balance: user.coins,
                requested: amount,
            })?;

        let user = self.write_through_balance(user.id, balance)?;
        tracing::info!(user_id = user.id, balance, "-{} coins debited", amount);
        Ok(balance)
    }

    /// Directory record of the logged-in user.
    ///
    /// Balance operations start from the directory copy, not the snapshot.
    fn session_record(&self) -> Result<UserRecord> {
        let session = self.get_session()?.ok_or(AccountError::NoActiveSession)?;
        self.directory
            .find_by_id(session.id)?
            .ok_or(AccountError::NotFound(session.id))
    }

    /// Set `id`'s balance in the directory, then mirror the record into the
    /// session snapshot.
    fn write_through_balance(&self, id: u64, balance: u64) -> Result<UserRecord> {
        let user = self.directory.set_balance(id, balance)?;
        self.set_session(&user)?;
        Ok(user)
    }
}
