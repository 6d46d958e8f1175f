//! Response DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use careerly_entity::AccountProfile;

/// Login response. The refresh token travels only in the cookie.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    /// Access JWT.
    pub access_token: String,
    /// Access token expiry.
    pub access_expires_at: DateTime<Utc>,
    /// Authenticated account.
    pub user: AccountProfile,
}

/// Refresh response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    /// New access JWT.
    pub access_token: String,
    /// Access token expiry.
    pub access_expires_at: DateTime<Utc>,
}

/// Simple message response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Message.
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `"ok"` or `"degraded"`.
    pub status: String,
    /// Server version.
    pub version: String,
    /// `"connected"` or `"unavailable"`.
    pub database: String,
}
