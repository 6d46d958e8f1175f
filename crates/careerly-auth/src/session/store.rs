//! Refresh-token storage operations wrapping the account store.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use careerly_core::error::AppError;
use careerly_database::AccountStore;
use careerly_entity::{Account, RefreshTokenRecord, Role};

/// Hex-encoded SHA-256 digest of a token.
pub fn token_digest(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

/// Refresh-token collection operations keyed by token digest.
///
/// Raw token values never reach the store: every call hashes the presented
/// token first.
#[derive(Clone)]
pub struct RefreshTokenStore {
    accounts: Arc<dyn AccountStore>,
}

impl std::fmt::Debug for RefreshTokenStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RefreshTokenStore").finish()
    }
}

impl RefreshTokenStore {
    /// Creates a new refresh-token store.
    pub fn new(accounts: Arc<dyn AccountStore>) -> Self {
        Self { accounts }
    }

    /// Append a token to an account's collection.
    pub async fn add(
        &self,
        account_id: Uuid,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), AppError> {
        let record = RefreshTokenRecord::new(token_digest(token), expires_at);
        self.accounts.add_refresh_token(account_id, &record).await
    }

    /// Remove one token; absent tokens are a no-op.
    pub async fn remove(&self, role: Role, token: &str) -> Result<bool, AppError> {
        self.accounts
            .remove_refresh_token(role, &token_digest(token))
            .await
    }

    /// Remove every token of an account.
    pub async fn remove_all(&self, account_id: Uuid) -> Result<u64, AppError> {
        self.accounts.remove_all_refresh_tokens(account_id).await
    }

    /// Owner of an unexpired token.
    pub async fn find_owner(
        &self,
        role: Role,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<Account>, AppError> {
        self.accounts
            .find_by_refresh_token(role, &token_digest(token), now)
            .await
    }

    /// Consume a token, returning its owner if it was present and unexpired.
    pub async fn take(
        &self,
        role: Role,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<Account>, AppError> {
        self.accounts
            .take_refresh_token(role, &token_digest(token), now)
            .await
    }

    /// Delete expired tokens across all accounts.
    pub async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64, AppError> {
        self.accounts.purge_expired_refresh_tokens(now).await
    }
}
