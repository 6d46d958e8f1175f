//! In-memory account store using a Tokio `RwLock` for single-process runs.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use careerly_core::error::AppError;
use careerly_core::result::AppResult;
use careerly_entity::{Account, LoginAttemptState, NewAccount, RefreshTokenRecord, Role};

use crate::store::AccountStore;

/// In-memory account store.
///
/// Each account keeps its refresh tokens embedded in
/// [`Account::refresh_tokens`]. Every mutation runs under the write lock, so
/// `take_refresh_token` is atomic with respect to other callers.
#[derive(Debug, Clone, Default)]
pub struct MemoryAccountStore {
    accounts: Arc<RwLock<HashMap<Uuid, Account>>>,
}

impl MemoryAccountStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

fn owner_of<'a>(
    accounts: &'a HashMap<Uuid, Account>,
    role: Role,
    token: &str,
) -> Option<&'a Account> {
    accounts
        .values()
        .filter(|a| a.role == role)
        .find(|a| a.refresh_tokens.iter().any(|r| r.token == token))
}

#[async_trait]
impl AccountStore for MemoryAccountStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Account>> {
        Ok(self.accounts.read().await.get(&id).cloned())
    }

    async fn find_by_login(&self, role: Role, login: &str) -> AppResult<Option<Account>> {
        let accounts = self.accounts.read().await;
        Ok(accounts
            .values()
            .find(|a| a.role == role && a.login.eq_ignore_ascii_case(login))
            .cloned())
    }

    async fn list_by_role(&self, role: Role) -> AppResult<Vec<Account>> {
        let accounts = self.accounts.read().await;
        let mut matching: Vec<Account> = accounts
            .values()
            .filter(|a| a.role == role)
            .cloned()
            .collect();
        matching.sort_by_key(|a| a.created_at);
        Ok(matching)
    }

    async fn create(&self, data: &NewAccount) -> AppResult<Account> {
        let mut accounts = self.accounts.write().await;

        let taken = accounts
            .values()
            .any(|a| a.role == data.role && a.login.eq_ignore_ascii_case(&data.login));
        if taken {
            return Err(AppError::conflict(format!(
                "Login '{}' is already registered for {} accounts",
                data.login, data.role
            )));
        }

        let now = Utc::now();
        let account = Account {
            id: Uuid::new_v4(),
            role: data.role,
            login: data.login.clone(),
            display_name: data.display_name.clone(),
            password_hash: data.password_hash.clone(),
            last_login: None,
            failed_login_attempts: 0,
            lock_until: None,
            refresh_tokens: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        accounts.insert(account.id, account.clone());
        Ok(account)
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        Ok(self.accounts.write().await.remove(&id).is_some())
    }

    async fn update_login_attempts(&self, id: Uuid, state: LoginAttemptState) -> AppResult<()> {
        if let Some(account) = self.accounts.write().await.get_mut(&id) {
            account.failed_login_attempts = state.failed_attempts;
            account.lock_until = state.lock_until;
            account.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn register_failed_login(
        &self,
        id: Uuid,
        now: DateTime<Utc>,
        max_attempts: i32,
        window: Duration,
    ) -> AppResult<Option<LoginAttemptState>> {
        let mut accounts = self.accounts.write().await;
        let Some(account) = accounts.get_mut(&id) else {
            return Ok(None);
        };

        let next = account
            .login_attempts()
            .after_failure(now, max_attempts, window);
        account.failed_login_attempts = next.failed_attempts;
        account.lock_until = next.lock_until;
        account.updated_at = Utc::now();
        Ok(Some(next))
    }

    async fn record_successful_login(&self, id: Uuid, at: DateTime<Utc>) -> AppResult<()> {
        if let Some(account) = self.accounts.write().await.get_mut(&id) {
            account.last_login = Some(at);
            account.failed_login_attempts = 0;
            account.lock_until = None;
            account.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn add_refresh_token(
        &self,
        account_id: Uuid,
        record: &RefreshTokenRecord,
    ) -> AppResult<()> {
        let mut accounts = self.accounts.write().await;
        let account = accounts
            .get_mut(&account_id)
            .ok_or_else(|| AppError::not_found("Account not found"))?;
        account.refresh_tokens.push(record.clone());
        Ok(())
    }

    async fn remove_refresh_token(&self, role: Role, token: &str) -> AppResult<bool> {
        let mut accounts = self.accounts.write().await;
        for account in accounts.values_mut().filter(|a| a.role == role) {
            let before = account.refresh_tokens.len();
            account.refresh_tokens.retain(|r| r.token != token);
            if account.refresh_tokens.len() != before {
                return Ok(true);
            }
        }
        Ok(false)
    }

    async fn remove_all_refresh_tokens(&self, account_id: Uuid) -> AppResult<u64> {
        let mut accounts = self.accounts.write().await;
        Ok(accounts
            .get_mut(&account_id)
            .map(|a| std::mem::take(&mut a.refresh_tokens).len() as u64)
            .unwrap_or(0))
    }

    async fn find_by_refresh_token(
        &self,
        role: Role,
        token: &str,
        now: DateTime<Utc>,
    ) -> AppResult<Option<Account>> {
        let accounts = self.accounts.read().await;
        Ok(owner_of(&accounts, role, token)
            .filter(|a| {
                a.refresh_tokens
                    .iter()
                    .any(|r| r.token == token && !r.is_expired(now))
            })
            .cloned())
    }

    async fn take_refresh_token(
        &self,
        role: Role,
        token: &str,
        now: DateTime<Utc>,
    ) -> AppResult<Option<Account>> {
        let mut accounts = self.accounts.write().await;

        let Some(owner_id) = owner_of(&accounts, role, token).map(|a| a.id) else {
            return Ok(None);
        };
        let Some(account) = accounts.get_mut(&owner_id) else {
            return Ok(None);
        };
        let Some(pos) = account.refresh_tokens.iter().position(|r| r.token == token) else {
            return Ok(None);
        };

        let record = account.refresh_tokens.remove(pos);
        if record.is_expired(now) {
            return Ok(None);
        }
        Ok(Some(account.clone()))
    }

    async fn purge_expired_refresh_tokens(&self, now: DateTime<Utc>) -> AppResult<u64> {
        let mut accounts = self.accounts.write().await;
        let mut purged = 0u64;
        for account in accounts.values_mut() {
            let before = account.refresh_tokens.len();
            account.refresh_tokens.retain(|r| !r.is_expired(now));
            purged += (before - account.refresh_tokens.len()) as u64;
        }
        Ok(purged)
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}
