//! Account entity model.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::role::Role;
use super::token::RefreshTokenRecord;

/// A registered account of any actor type.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Account {
    /// Unique account identifier.
    pub id: Uuid,
    /// Actor type.
    pub role: Role,
    /// Login identifier: username (admin) or email (company, undergraduate).
    pub login: String,
    /// Human-readable name (admin name, company name, student name).
    pub display_name: Option<String>,
    /// Argon2 password hash.
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Last successful login time.
    pub last_login: Option<DateTime<Utc>>,
    /// Number of consecutive failed login attempts.
    pub failed_login_attempts: i32,
    /// Account locked until this time (if locked).
    pub lock_until: Option<DateTime<Utc>>,
    /// Active refresh tokens, loaded separately from the token table.
    #[sqlx(skip)]
    #[serde(skip_serializing)]
    pub refresh_tokens: Vec<RefreshTokenRecord>,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
    /// When the account was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Check if the account is locked at `now`.
    pub fn is_locked(&self, now: DateTime<Utc>) -> bool {
        self.login_attempts().is_locked(now)
    }

    /// Current failed-login bookkeeping.
    pub fn login_attempts(&self) -> LoginAttemptState {
        LoginAttemptState {
            failed_attempts: self.failed_login_attempts,
            lock_until: self.lock_until,
        }
    }

    /// Sanitized view safe to return to clients.
    pub fn profile(&self) -> AccountProfile {
        AccountProfile {
            id: self.id,
            role: self.role,
            login: self.login.clone(),
            display_name: self.display_name.clone(),
            last_login: self.last_login,
            created_at: self.created_at,
        }
    }
}

/// Failed-login counter and lock expiry for one account.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginAttemptState {
    /// Consecutive failed verifications.
    pub failed_attempts: i32,
    /// Lock expiry, if a lock was ever set and not cleared.
    pub lock_until: Option<DateTime<Utc>>,
}

impl LoginAttemptState {
    /// An account is locked iff `lock_until` is present and in the future.
    pub fn is_locked(&self, now: DateTime<Utc>) -> bool {
        self.lock_until.is_some_and(|until| until > now)
    }

    /// State after one more failed verification at `now`.
    ///
    /// A live lock is left untouched. An expired lock restarts the count at
    /// one. Reaching `max_attempts` sets `lock_until = now + window`.
    pub fn after_failure(&self, now: DateTime<Utc>, max_attempts: i32, window: Duration) -> Self {
        if self.is_locked(now) {
            return *self;
        }

        let previous = if self.lock_until.is_some() {
            0
        } else {
            self.failed_attempts
        };
        let failed_attempts = previous.saturating_add(1);
        let lock_until = (failed_attempts >= max_attempts)
            .then(|| now.checked_add_signed(window))
            .flatten();

        Self {
            failed_attempts,
            lock_until,
        }
    }
}

/// Account fields exposed by `/me` and login responses.
///
/// Excludes the password hash, refresh tokens and lockout bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountProfile {
    /// Account ID.
    pub id: Uuid,
    /// Actor type.
    pub role: Role,
    /// Login identifier.
    pub login: String,
    /// Display name.
    pub display_name: Option<String>,
    /// Last successful login.
    pub last_login: Option<DateTime<Utc>>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

/// Data required to create a new account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAccount {
    /// Actor type.
    pub role: Role,
    /// Login identifier.
    pub login: String,
    /// Display name (optional).
    pub display_name: Option<String>,
    /// Pre-hashed password.
    pub password_hash: String,
}
