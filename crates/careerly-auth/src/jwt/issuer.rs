//! Signed token creation and validation for a single role.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use tracing::debug;
use uuid::Uuid;

use careerly_core::config::RealmConfig;
use careerly_core::error::AppError;
use careerly_entity::Role;

use super::claims::{Claims, TokenType};

/// Clock-skew allowance when checking `exp`, in seconds.
const LEEWAY_SECONDS: u64 = 5;

/// Caller-visible message for every verification failure.
const INVALID_TOKEN: &str = "Invalid or expired token";

/// A signed token together with its expiry.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct IssuedToken {
    /// Compact JWS string.
    pub token: String,
    /// Instant the token stops verifying.
    pub expires_at: DateTime<Utc>,
}

/// Access + refresh token pair minted together.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct TokenPair {
    /// Short-lived access token.
    pub access_token: String,
    /// Long-lived refresh token.
    pub refresh_token: String,
    /// Access token expiration timestamp.
    pub access_expires_at: DateTime<Utc>,
    /// Refresh token expiration timestamp.
    pub refresh_expires_at: DateTime<Utc>,
}

/// Mints and verifies HS256 tokens for one role.
///
/// Access and refresh tokens are signed with distinct secrets, and every
/// verification checks that the token's role matches the issuer's.
#[derive(Clone)]
pub struct TokenIssuer {
    role: Role,
    access_encoding: EncodingKey,
    access_decoding: DecodingKey,
    refresh_encoding: EncodingKey,
    refresh_decoding: DecodingKey,
    access_ttl: Duration,
    refresh_ttl: Duration,
    validation: Validation,
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("role", &self.role)
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .finish()
    }
}

impl TokenIssuer {
    /// Creates an issuer for `role` from its realm configuration.
    ///
    /// Fails with `Configuration` when a token lifetime does not fit a
    /// `chrono::Duration`.
    pub fn new(role: Role, config: &RealmConfig) -> Result<Self, AppError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = LEEWAY_SECONDS;

        let access_ttl = i64::try_from(config.access_ttl_minutes)
            .ok()
            .and_then(Duration::try_minutes)
            .ok_or_else(|| {
                AppError::configuration(format!(
                    "access_ttl_minutes for role '{role}' is out of range"
                ))
            })?;
        let refresh_ttl = i64::try_from(config.refresh_ttl_days)
            .ok()
            .and_then(Duration::try_days)
            .ok_or_else(|| {
                AppError::configuration(format!("refresh_ttl_days for role '{role}' is out of range"))
            })?;

        Ok(Self {
            role,
            access_encoding: EncodingKey::from_secret(config.access_secret.as_bytes()),
            access_decoding: DecodingKey::from_secret(config.access_secret.as_bytes()),
            refresh_encoding: EncodingKey::from_secret(config.refresh_secret.as_bytes()),
            refresh_decoding: DecodingKey::from_secret(config.refresh_secret.as_bytes()),
            access_ttl,
            refresh_ttl,
            validation,
        })
    }

    /// Role this issuer serves.
    pub fn role(&self) -> Role {
        self.role
    }

    /// Refresh token lifetime.
    pub fn refresh_ttl(&self) -> Duration {
        self.refresh_ttl
    }

    /// Mints a short-lived access token.
    pub fn issue_access_token(&self, account_id: Uuid, login: &str) -> Result<IssuedToken, AppError> {
        self.issue(account_id, login, TokenType::Access)
    }

    /// Mints a refresh token. A fresh `jti` makes every value unique.
    pub fn issue_refresh_token(
        &self,
        account_id: Uuid,
        login: &str,
    ) -> Result<IssuedToken, AppError> {
        self.issue(account_id, login, TokenType::Refresh)
    }

    /// Mints an access + refresh pair.
    pub fn issue_pair(&self, account_id: Uuid, login: &str) -> Result<TokenPair, AppError> {
        let access = self.issue_access_token(account_id, login)?;
        let refresh = self.issue_refresh_token(account_id, login)?;

        Ok(TokenPair {
            access_token: access.token,
            refresh_token: refresh.token,
            access_expires_at: access.expires_at,
            refresh_expires_at: refresh.expires_at,
        })
    }

    /// Verifies an access token: signature, expiry, type and role.
    pub fn verify_access_token(&self, token: &str) -> Result<Claims, AppError> {
        self.verify(token, TokenType::Access)
    }

    /// Verifies a refresh token: signature, expiry, type and role.
    pub fn verify_refresh_token(&self, token: &str) -> Result<Claims, AppError> {
        self.verify(token, TokenType::Refresh)
    }

    fn issue(
        &self,
        account_id: Uuid,
        login: &str,
        token_type: TokenType,
    ) -> Result<IssuedToken, AppError> {
        let now = Utc::now();
        let (key, ttl) = match token_type {
            TokenType::Access => (&self.access_encoding, self.access_ttl),
            TokenType::Refresh => (&self.refresh_encoding, self.refresh_ttl),
        };
        let expires_at = now.checked_add_signed(ttl).ok_or_else(|| {
            AppError::configuration(format!("{token_type:?} token lifetime overflows the clock"))
        })?;

        let claims = Claims {
            sub: account_id,
            role: self.role,
            login: login.to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
            jti: Uuid::new_v4(),
            token_type,
        };

        let token = encode(&Header::default(), &claims, key).map_err(|e| {
            AppError::internal(format!("Failed to encode {token_type:?} token: {e}"))
        })?;

        Ok(IssuedToken { token, expires_at })
    }

    fn verify(&self, token: &str, expected: TokenType) -> Result<Claims, AppError> {
        let key = match expected {
            TokenType::Access => &self.access_decoding,
            TokenType::Refresh => &self.refresh_decoding,
        };

        let claims = decode::<Claims>(token, key, &self.validation)
            .map_err(|e| {
                debug!(role = %self.role, reason = ?e.kind(), "Token rejected");
                AppError::unauthenticated(INVALID_TOKEN)
            })?
            .claims;

        if claims.token_type != expected {
            debug!(role = %self.role, token_type = ?claims.token_type, "Token rejected: wrong type");
            return Err(AppError::unauthenticated(INVALID_TOKEN));
        }

        if claims.role != self.role {
            debug!(
                role = %self.role,
                token_role = %claims.role,
                "Token rejected: role mismatch"
            );
            return Err(AppError::unauthenticated(INVALID_TOKEN));
        }

        Ok(claims)
    }
}
