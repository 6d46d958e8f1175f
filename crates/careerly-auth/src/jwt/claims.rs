//! JWT claims structure used in access and refresh tokens.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use careerly_entity::Role;

/// JWT claims payload embedded in every token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject: the account ID.
    pub sub: Uuid,
    /// Actor type the token was minted for.
    pub role: Role,
    /// Login identifier at the time of issuance.
    pub login: String,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
    /// Random token ID; makes every issued value distinct.
    pub jti: Uuid,
    /// Token type: "access" or "refresh".
    pub token_type: TokenType,
}

/// Distinguishes access tokens from refresh tokens.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TokenType {
    /// Short-lived token presented on API requests.
    Access,
    /// Long-lived token exchanged for a new pair.
    Refresh,
}
