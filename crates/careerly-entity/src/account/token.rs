//! Refresh-token records owned by an account.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One active refresh token of an account (one per signed-in device).
///
/// `token` holds whatever the store keys records by; the persistent store
/// keeps a SHA-256 digest rather than the raw value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshTokenRecord {
    /// Token value (or its digest, depending on the store).
    pub token: String,
    /// Instant after which the token can no longer be exchanged.
    pub expires_at: DateTime<Utc>,
}

impl RefreshTokenRecord {
    /// Creates a new record.
    pub fn new(token: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        Self {
            token: token.into(),
            expires_at,
        }
    }

    /// Whether the record is past its expiry at `now`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}
