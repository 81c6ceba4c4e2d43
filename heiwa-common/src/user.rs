//! User record and directory statistics.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::password::legacy_hash;

/// A registered account.
///
/// Field names serialize in camelCase so records written by the original web
/// client deserialize unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    /// Unique, immutable identifier
    pub id: u64,
    /// Unique, case-sensitive login name
    pub username: String,
    /// Contact email (informational only)
    pub email: String,
    /// Legacy hash of the password, see [`legacy_hash`]
    #[serde(rename = "password")]
    pub password_hash: String,
    /// Coin balance
    #[serde(deserialize_with = "lenient_coins")]
    pub coins: u64,
    /// Whether the account has admin rights
    pub is_admin: bool,
    /// When the account was created
    pub created_at: DateTime<Utc>,
    /// When the account last logged in
    pub last_login: DateTime<Utc>,
}

impl UserRecord {
    /// Build a record with zero coins, hashing `password`.
    pub fn new(
        id: u64,
        username: impl Into<String>,
        email: impl Into<String>,
        password: &str,
        is_admin: bool,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            username: username.into(),
            email: email.into(),
            password_hash: legacy_hash(password),
            coins: 0,
            is_admin,
            created_at: now,
            last_login: now,
        }
    }

    /// Check a plaintext password against the stored hash.
    pub fn password_matches(&self, password: &str) -> bool {
        self.password_hash == legacy_hash(password)
    }
}

/// Accept any JSON number for a stored balance.
///
/// Older clients could write negative or fractional balances. Negative
/// values read as 0 and fractions are truncated, so one odd record does not
/// make the whole collection undecodable.
fn lenient_coins<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawCoins {
        Unsigned(u64),
        Signed(i64),
        Float(f64),
    }

    Ok(match RawCoins::deserialize(deserializer)? {
        RawCoins::Unsigned(coins) => coins,
        RawCoins::Signed(_) => 0,
        RawCoins::Float(coins) if coins.is_finite() && coins > 0.0 => coins as u64,
        RawCoins::Float(_) => 0,
    })
}

/// Aggregate figures over the whole directory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryStats {
    pub count: u64,
    pub total_coins: u64,
    /// Mean balance rounded to the nearest integer, halves rounding up.
    pub average_coins: u64,
    pub admin_count: u64,
}

impl DirectoryStats {
    pub fn from_records(records: &[UserRecord]) -> Self {
        let count = records.len() as u64;
        let total_coins = records
            .iter()
            .fold(0u64, |sum, user| sum.saturating_add(user.coins));
        let admin_count = records.iter().filter(|user| user.is_admin).count() as u64;

        let average_coins = if count > 0 {
            let quotient = total_coins / count;
            let remainder = total_coins % count;
            if remainder * 2 >= count {
                quotient + 1
            } else {
                quotient
            }
        } else {
            0
        };

        Self {
            count,
            total_coins,
            average_coins,
            admin_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: u64, coins: u64, is_admin: bool) -> UserRecord {
        let mut user = UserRecord::new(id, format!("user{id}"), "", "pw", is_admin, Utc::now());
        user.coins = coins;
        user
    }

    #[test]
    fn test_new_record_starts_empty() {
        let user = UserRecord::new(7, "alice", "alice@example.com", "pw", false, Utc::now());
        assert_eq!(user.coins, 0);
        assert!(!user.is_admin);
        assert_eq!(user.created_at, user.last_login);
        assert_ne!(user.password_hash, "pw");
        assert!(user.password_matches("pw"));
        assert!(!user.password_matches("PW"));
    }

    #[test]
    fn test_record_json_uses_legacy_keys() {
        let user = UserRecord::new(1, "admin", "admin@heiwa.fr", "admin123", true, Utc::now());
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["password"], "-969161597");
        assert_eq!(json["isAdmin"], true);
        assert!(json.get("createdAt").is_some());
        assert!(json.get("lastLogin").is_some());
        assert!(json.get("password_hash").is_none());
    }

    #[test]
    fn test_record_parses_browser_json() {
        let json = r#"{
            "id": 1700000000000,
            "username": "bob",
            "email": "bob@heiwa.fr",
            "password": "97",
            "coins": 500,
            "isAdmin": false,
            "createdAt": "2024-01-01T10:00:00.000Z",
            "lastLogin": "2024-01-02T10:00:00.000Z"
        }"#;
        let user: UserRecord = serde_json::from_str(json).unwrap();
        assert_eq!(user.id, 1_700_000_000_000);
        assert_eq!(user.coins, 500);
        assert!(user.password_matches("a"));
    }

    fn parse_with_coins(coins: &str) -> UserRecord {
        let json = format!(
            r#"{{"id": 3, "username": "eve", "email": "", "password": "0", "coins": {coins},
                "isAdmin": false, "createdAt": "2024-01-01T10:00:00.000Z",
                "lastLogin": "2024-01-01T10:00:00.000Z"}}"#
        );
        serde_json::from_str(&json).unwrap()
    }

    #[test]
    fn test_record_parses_odd_legacy_balances() {
        assert_eq!(parse_with_coins("-5").coins, 0);
        assert_eq!(parse_with_coins("12.7").coins, 12);
        assert_eq!(parse_with_coins("-0.5").coins, 0);
        assert_eq!(parse_with_coins("42").coins, 42);
    }

    #[test]
    fn test_record_rejects_non_numeric_balance() {
        let json = r#"{"id": 3, "username": "eve", "email": "", "password": "0", "coins": "lots",
            "isAdmin": false, "createdAt": "2024-01-01T10:00:00.000Z",
            "lastLogin": "2024-01-01T10:00:00.000Z"}"#;
        assert!(serde_json::from_str::<UserRecord>(json).is_err());
    }

    #[test]
    fn test_stats_empty() {
        assert_eq!(DirectoryStats::from_records(&[]), DirectoryStats::default());
    }

    #[test]
    fn test_stats_rounds_average() {
        let stats = DirectoryStats::from_records(&[
            record(1, 1, true),
            record(2, 2, false),
        ]);
        assert_eq!(stats.count, 2);
        assert_eq!(stats.total_coins, 3);
        // 1.5 rounds up
        assert_eq!(stats.average_coins, 2);
        assert_eq!(stats.admin_count, 1);

        let stats = DirectoryStats::from_records(&[
            record(1, 10, false),
            record(2, 0, false),
            record(3, 0, false),
        ]);
        // 3.33 rounds down
        assert_eq!(stats.average_coins, 3);
        assert_eq!(stats.admin_count, 0);
    }
}
