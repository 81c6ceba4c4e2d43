//! Durable directory of user records.
//!
//! The directory keeps no copy of its own: every call reads the `users`
//! slot, applies its change and writes the whole collection back.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use heiwa_common::{DirectoryStats, UserRecord};

use crate::error::{AccountError, Result};
use crate::session;
use crate::store::{read_json, write_json, KeyValueStore, USERS_KEY};

/// Authoritative store of all user records.
#[derive(Clone)]
pub struct UserDirectory {
    store: Arc<dyn KeyValueStore>,
}

impl UserDirectory {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub(crate) fn store(&self) -> &dyn KeyValueStore {
        self.store.as_ref()
    }

    /// Process-start initialization.
    ///
    /// Zeroes every balance (directory and session snapshot) on each start,
    /// then seeds the default accounts if the directory is empty. Seeding
    /// never happens while any record exists; the balance reset always does.
    pub fn initialize(&self) -> Result<()> {
        let mut users = self.load()?;
        self.reset_balances(&mut users)?;
        self.seed_defaults(&mut users)?;
        Ok(())
    }

    fn reset_balances(&self, users: &mut [UserRecord]) -> Result<()> {
        for user in users.iter_mut() {
            user.coins = 0;
        }
        self.save(users)?;

        if let Some(mut current) = session::load(self.store())? {
            current.coins = 0;
            session::save(self.store(), &current)?;
        }

        tracing::info!("Reset coin balance of {} users", users.len());
        Ok(())
    }

    fn seed_defaults(&self, users: &mut Vec<UserRecord>) -> Result<()> {
        if !users.is_empty() {
            return Ok(());
        }

        let now = Utc::now();
        users.push(UserRecord::new(1, "admin", "admin@heiwa.fr", "admin123", true, now));
        users.push(UserRecord::new(2, "user", "user@heiwa.fr", "password", false, now));
        self.save(users)?;

        tracing::info!("Seeded default users: admin, user");
        Ok(())
    }

    /// Create an account and make it the active session.
    pub fn register(&self, username: &str, email: &str, password: &str) -> Result<UserRecord> {
        let mut users = self.load()?;

        if users.iter().any(|u| u.username == username) {
            return Err(AccountError::DuplicateUsername(username.to_string()));
        }

        let now = Utc::now();
        let user = UserRecord::new(next_id(&users, now), username, email, password, false, now);
        users.push(user.clone());
        self.save(&users)?;
        session::save(self.store(), &user)?;

        tracing::info!("Registered user: {} (id {})", user.username, user.id);
        Ok(user)
    }

    /// Check credentials and, on a match, start a session.
    ///
    /// Returns `None` when no record matches both username and password,
    /// without saying which one was wrong.
    pub fn login(&self, username: &str, password: &str) -> Result<Option<UserRecord>> {
        let mut users = self.load()?;

        let Some(user) = users
            .iter_mut()
            .find(|u| u.username == username && u.password_matches(password))
        else {
            tracing::debug!("Login rejected");
            return Ok(None);
        };

        user.last_login = Utc::now();
        let user = user.clone();
        self.save(&users)?;
        session::save(self.store(), &user)?;

        tracing::info!("User logged in: {} (id {})", user.username, user.id);
        Ok(Some(user))
    }

    /// End the active session, if any.
    pub fn logout(&self) -> Result<()> {
        session::clear(self.store())?;
        tracing::info!("User logged out");
        Ok(())
    }

    pub fn find_by_id(&self, id: u64) -> Result<Option<UserRecord>> {
        Ok(self.load()?.into_iter().find(|u| u.id == id))
    }

    pub fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>> {
        Ok(self.load()?.into_iter().find(|u| u.username == username))
    }

    /// Overwrite a record's balance and return the updated record.
    ///
    /// This only touches the directory; balance changes for the logged-in
    /// user go through [`crate::SessionBalance`].
    pub fn set_balance(&self, id: u64, coins: u64) -> Result<UserRecord> {
        let mut users = self.load()?;

        let user = users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or(AccountError::NotFound(id))?;
        user.coins = coins;
        let user = user.clone();
        self.save(&users)?;

        tracing::debug!(user_id = id, coins, "Balance updated");
        Ok(user)
    }

    /// Remove a record. Deleting an unknown id succeeds.
    pub fn delete(&self, id: u64) -> Result<()> {
        let mut users = self.load()?;
        let before = users.len();
        users.retain(|u| u.id != id);
        self.save(&users)?;

        if users.len() < before {
            tracing::info!("Deleted user: {}", id);
        }
        Ok(())
    }

    /// All records in insertion order.
    pub fn list_all(&self) -> Result<Vec<UserRecord>> {
        self.load()
    }

    pub fn stats(&self) -> Result<DirectoryStats> {
        Ok(DirectoryStats::from_records(&self.load()?))
    }

    fn load(&self) -> Result<Vec<UserRecord>> {
        Ok(read_json(self.store(), USERS_KEY)?.unwrap_or_default())
    }

    fn save(&self, users: &[UserRecord]) -> Result<()> {
        write_json(self.store(), USERS_KEY, users)?;
        Ok(())
    }
}

/// Millisecond timestamp id, bumped past the highest existing id on collision.
fn next_id(users: &[UserRecord], now: DateTime<Utc>) -> u64 {
    let candidate = u64::try_from(now.timestamp_millis()).unwrap_or(0);
    let floor = users
        .iter()
        .map(|u| u.id.saturating_add(1))
        .max()
        .unwrap_or(0);
    candidate.max(floor)
}
