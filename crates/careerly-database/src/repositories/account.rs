//! Account repository implementation.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use careerly_core::error::{AppError, ErrorKind};
use careerly_core::result::AppResult;
use careerly_entity::{Account, LoginAttemptState, NewAccount, RefreshTokenRecord, Role};

use crate::store::AccountStore;

/// PostgreSQL-backed account store.
#[derive(Debug, Clone)]
pub struct PgAccountStore {
    pool: PgPool,
}

impl PgAccountStore {
    /// Create a new account store over `pool`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Populate `refresh_tokens` for a loaded account.
    async fn with_tokens(&self, mut account: Account) -> AppResult<Account> {
        let rows: Vec<(String, DateTime<Utc>)> = sqlx::query_as(
            "SELECT token_hash, expires_at FROM refresh_tokens \
             WHERE account_id = $1 ORDER BY created_at ASC",
        )
        .bind(account.id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to load refresh tokens", e)
        })?;

        account.refresh_tokens = rows
            .into_iter()
            .map(|(token, expires_at)| RefreshTokenRecord::new(token, expires_at))
            .collect();
        Ok(account)
    }

    async fn with_tokens_opt(&self, account: Option<Account>) -> AppResult<Option<Account>> {
        match account {
            Some(account) => self.with_tokens(account).await.map(Some),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl AccountStore for PgAccountStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Account>> {
        let account = sqlx::query_as::<_, Account>("SELECT * FROM accounts WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find account by id", e)
            })?;
        self.with_tokens_opt(account).await
    }

    async fn find_by_login(&self, role: Role, login: &str) -> AppResult<Option<Account>> {
        let account = sqlx::query_as::<_, Account>(
            "SELECT * FROM accounts WHERE role = $1 AND LOWER(login) = LOWER($2)",
        )
        .bind(role)
        .bind(login)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find account by login", e)
        })?;
        self.with_tokens_opt(account).await
    }

    async fn list_by_role(&self, role: Role) -> AppResult<Vec<Account>> {
        let accounts = sqlx::query_as::<_, Account>(
            "SELECT * FROM accounts WHERE role = $1 ORDER BY created_at ASC",
        )
        .bind(role)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list accounts", e))?;

        let mut loaded = Vec::with_capacity(accounts.len());
        for account in accounts {
            loaded.push(self.with_tokens(account).await?);
        }
        Ok(loaded)
    }

    async fn create(&self, data: &NewAccount) -> AppResult<Account> {
        sqlx::query_as::<_, Account>(
            "INSERT INTO accounts (id, role, login, display_name, password_hash) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(data.role)
        .bind(&data.login)
        .bind(&data.display_name)
        .bind(&data.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err)
                if db_err.constraint() == Some("accounts_role_login_key") =>
            {
                AppError::conflict(format!(
                    "Login '{}' is already registered for {} accounts",
                    data.login, data.role
                ))
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to create account", e),
        })
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM accounts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete account", e)
            })?;
        Ok(result.rows_affected() > 0)
    }

    async fn update_login_attempts(&self, id: Uuid, state: LoginAttemptState) -> AppResult<()> {
        sqlx::query(
            "UPDATE accounts SET failed_login_attempts = $2, lock_until = $3, updated_at = NOW() \
             WHERE id = $1",
        )
        .bind(id)
        .bind(state.failed_attempts)
        .bind(state.lock_until)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to update login attempts", e)
        })?;
        Ok(())
    }

    async fn register_failed_login(
        &self,
        id: Uuid,
        now: DateTime<Utc>,
        max_attempts: i32,
        window: Duration,
    ) -> AppResult<Option<LoginAttemptState>> {
        let lock_until = now.checked_add_signed(window);

        // SET expressions read the pre-update row, so the increment and the
        // threshold check see the same counter.
        let row: Option<(i32, Option<DateTime<Utc>>)> = sqlx::query_as(
            "UPDATE accounts SET \
                failed_login_attempts = CASE \
                    WHEN lock_until > $2 THEN failed_login_attempts \
                    WHEN lock_until IS NOT NULL THEN 1 \
                    ELSE failed_login_attempts + 1 END, \
                lock_until = CASE \
                    WHEN lock_until > $2 THEN lock_until \
                    WHEN (CASE WHEN lock_until IS NOT NULL THEN 1 \
                               ELSE failed_login_attempts + 1 END) >= $3 THEN $4 \
                    ELSE NULL END, \
                updated_at = NOW() \
             WHERE id = $1 \
             RETURNING failed_login_attempts, lock_until",
        )
        .bind(id)
        .bind(now)
        .bind(max_attempts)
        .bind(lock_until)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to record failed login", e)
        })?;

        Ok(row.map(|(failed_attempts, lock_until)| LoginAttemptState {
            failed_attempts,
            lock_until,
        }))
    }

    async fn record_successful_login(&self, id: Uuid, at: DateTime<Utc>) -> AppResult<()> {
        sqlx::query(
            "UPDATE accounts SET last_login = $2, failed_login_attempts = 0, lock_until = NULL, \
             updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to record successful login", e)
        })?;
        Ok(())
    }

    async fn add_refresh_token(
        &self,
        account_id: Uuid,
        record: &RefreshTokenRecord,
    ) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO refresh_tokens (token_hash, account_id, expires_at) VALUES ($1, $2, $3)",
        )
        .bind(&record.token)
        .bind(account_id)
        .bind(record.expires_at)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to store refresh token", e))?;
        Ok(())
    }

    async fn remove_refresh_token(&self, role: Role, token: &str) -> AppResult<bool> {
        let result = sqlx::query(
            "DELETE FROM refresh_tokens rt USING accounts a \
             WHERE rt.token_hash = $1 AND rt.account_id = a.id AND a.role = $2",
        )
        .bind(token)
        .bind(role)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to remove refresh token", e)
        })?;
        Ok(result.rows_affected() > 0)
    }

    async fn remove_all_refresh_tokens(&self, account_id: Uuid) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM refresh_tokens WHERE account_id = $1")
            .bind(account_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to remove refresh tokens", e)
            })?;
        Ok(result.rows_affected())
    }

    async fn find_by_refresh_token(
        &self,
        role: Role,
        token: &str,
        now: DateTime<Utc>,
    ) -> AppResult<Option<Account>> {
        let account = sqlx::query_as::<_, Account>(
            "SELECT a.* FROM accounts a \
             JOIN refresh_tokens rt ON rt.account_id = a.id \
             WHERE rt.token_hash = $1 AND a.role = $2 AND rt.expires_at > $3",
        )
        .bind(token)
        .bind(role)
        .bind(now)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(
                ErrorKind::Database,
                "Failed to find account by refresh token",
                e,
            )
        })?;
        self.with_tokens_opt(account).await
    }

    async fn take_refresh_token(
        &self,
        role: Role,
        token: &str,
        now: DateTime<Utc>,
    ) -> AppResult<Option<Account>> {
        // A single DELETE ... RETURNING: of two concurrent takes, only one
        // sees the row.
        let taken: Option<(Uuid, DateTime<Utc>)> = sqlx::query_as(
            "DELETE FROM refresh_tokens rt USING accounts a \
             WHERE rt.token_hash = $1 AND rt.account_id = a.id AND a.role = $2 \
             RETURNING rt.account_id, rt.expires_at",
        )
        .bind(token)
        .bind(role)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to consume refresh token", e)
        })?;

        match taken {
            Some((account_id, expires_at)) if expires_at > now => self.find_by_id(account_id).await,
            _ => Ok(None),
        }
    }

    async fn purge_expired_refresh_tokens(&self, now: DateTime<Utc>) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM refresh_tokens WHERE expires_at <= $1")
            .bind(now)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Database,
                    "Failed to purge expired refresh tokens",
                    e,
                )
            })?;
        Ok(result.rows_affected())
    }

    async fn health_check(&self) -> AppResult<bool> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|v| v == 1)
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Health check failed", e))
    }
}
