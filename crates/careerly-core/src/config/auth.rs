//! Authentication configuration.
//!
//! Each actor type (admin, company, undergraduate) gets its own realm block
//! with independent signing secrets, token lifetimes and lockout policy.

use serde::{Deserialize, Serialize};

/// Authentication and credential configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Minimum password length for newly registered accounts.
    #[serde(default = "default_password_min")]
    pub password_min_length: usize,
    /// Whether refresh-token cookies carry the `Secure` attribute.
    #[serde(default = "default_true")]
    pub cookie_secure: bool,
    /// Admin realm.
    #[serde(default = "default_admin_realm")]
    pub admin: RealmConfig,
    /// Company realm.
    #[serde(default = "default_company_realm")]
    pub company: RealmConfig,
    /// Undergraduate realm.
    #[serde(default = "default_undergraduate_realm")]
    pub undergraduate: RealmConfig,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            password_min_length: default_password_min(),
            cookie_secure: true,
            admin: default_admin_realm(),
            company: default_company_realm(),
            undergraduate: default_undergraduate_realm(),
        }
    }
}

impl AuthConfig {
    /// Select a realm block by role name (`admin`, `company`, `undergraduate`).
    pub fn realm(&self, name: &str) -> Option<&RealmConfig> {
        match name {
            "admin" => Some(&self.admin),
            "company" => Some(&self.company),
            "undergraduate" => Some(&self.undergraduate),
            _ => None,
        }
    }
}

/// Per-actor token and lockout settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RealmConfig {
    /// HMAC-SHA256 secret for access tokens.
    #[serde(default = "default_secret")]
    pub access_secret: String,
    /// HMAC-SHA256 secret for refresh tokens.
    #[serde(default = "default_secret")]
    pub refresh_secret: String,
    /// Access token TTL in minutes.
    #[serde(default = "default_access_ttl")]
    pub access_ttl_minutes: u64,
    /// Refresh token TTL in days.
    #[serde(default = "default_refresh_ttl")]
    pub refresh_ttl_days: u64,
    /// Failed-login lockout. `None` disables lockout for the realm.
    #[serde(default)]
    pub lockout: Option<LockoutConfig>,
}

/// Account lockout thresholds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct LockoutConfig {
    /// Consecutive failed attempts that trigger a lock.
    #[serde(default = "default_max_failed")]
    pub max_failed_attempts: u32,
    /// Lock window in minutes.
    #[serde(default = "default_lockout")]
    pub lockout_duration_minutes: u64,
}

impl Default for LockoutConfig {
    fn default() -> Self {
        Self {
            max_failed_attempts: default_max_failed(),
            lockout_duration_minutes: default_lockout(),
        }
    }
}

fn realm(prefix: &str, access_ttl_minutes: u64, lockout: Option<LockoutConfig>) -> RealmConfig {
    RealmConfig {
        access_secret: format!("{prefix}_access_CHANGE_ME_IN_PRODUCTION"),
        refresh_secret: format!("{prefix}_refresh_CHANGE_ME_IN_PRODUCTION"),
        access_ttl_minutes,
        refresh_ttl_days: default_refresh_ttl(),
        lockout,
    }
}

fn default_admin_realm() -> RealmConfig {
    realm("admin", 15, Some(LockoutConfig::default()))
}

fn default_company_realm() -> RealmConfig {
    realm("company", 60, None)
}

fn default_undergraduate_realm() -> RealmConfig {
    realm("undergraduate", 60, None)
}

fn default_secret() -> String {
    "CHANGE_ME_IN_PRODUCTION".to_string()
}

fn default_access_ttl() -> u64 {
    15
}

fn default_refresh_ttl() -> u64 {
    30
}

fn default_password_min() -> usize {
    8
}

fn default_max_failed() -> u32 {
    5
}

fn default_lockout() -> u64 {
    30
}

fn default_true() -> bool {
    true
}
