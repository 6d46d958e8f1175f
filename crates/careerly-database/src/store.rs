//! The account persistence seam.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use careerly_core::result::AppResult;
use careerly_entity::{Account, LoginAttemptState, NewAccount, RefreshTokenRecord, Role};

/// Persistence operations for accounts and their refresh tokens.
///
/// Refresh tokens are addressed by an opaque key. The session layer passes
/// a digest of the token, so implementations never see raw token values.
/// Token lookups are scoped by role: a token minted for one realm never
/// resolves an account of another.
///
/// Two implementations are provided:
/// - [`PgAccountStore`](crate::PgAccountStore) backed by PostgreSQL
/// - [`MemoryAccountStore`](crate::MemoryAccountStore) for tests and local runs
#[async_trait]
pub trait AccountStore: Send + Sync + 'static {
    /// Find an account by primary key.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Account>>;

    /// Find an account of `role` by login identifier (case-insensitive).
    async fn find_by_login(&self, role: Role, login: &str) -> AppResult<Option<Account>>;

    /// List every account of `role`, oldest first.
    async fn list_by_role(&self, role: Role) -> AppResult<Vec<Account>>;

    /// Insert a new account. Fails with `Conflict` if the login is taken
    /// within the role.
    async fn create(&self, data: &NewAccount) -> AppResult<Account>;

    /// Delete an account and, with it, all of its refresh tokens.
    ///
    /// Returns `true` if a row was removed.
    async fn delete(&self, id: Uuid) -> AppResult<bool>;

    /// Overwrite the failed-login bookkeeping of an account.
    async fn update_login_attempts(&self, id: Uuid, state: LoginAttemptState) -> AppResult<()>;

    /// Count one failed login in a single atomic step and return the new
    /// state, or `None` if the account no longer exists.
    ///
    /// Follows [`LoginAttemptState::after_failure`]: concurrent failures
    /// each increment the stored counter, so none of them is lost.
    async fn register_failed_login(
        &self,
        id: Uuid,
        now: DateTime<Utc>,
        max_attempts: i32,
        window: Duration,
    ) -> AppResult<Option<LoginAttemptState>>;

    /// Stamp `last_login` and clear the failed-login bookkeeping.
    async fn record_successful_login(&self, id: Uuid, at: DateTime<Utc>) -> AppResult<()>;

    /// Append a refresh token to an account's collection.
    async fn add_refresh_token(&self, account_id: Uuid, record: &RefreshTokenRecord)
    -> AppResult<()>;

    /// Remove one refresh token. Returns `true` if a record was removed.
    async fn remove_refresh_token(&self, role: Role, token: &str) -> AppResult<bool>;

    /// Remove every refresh token of an account. Returns the number removed.
    async fn remove_all_refresh_tokens(&self, account_id: Uuid) -> AppResult<u64>;

    /// Owner of an unexpired refresh token, without consuming it.
    async fn find_by_refresh_token(
        &self,
        role: Role,
        token: &str,
        now: DateTime<Utc>,
    ) -> AppResult<Option<Account>>;

    /// Atomically remove a refresh token and return its owner.
    ///
    /// At most one caller observes a given token: concurrent takes of the
    /// same key yield `Some` once and `None` for everyone else. An expired
    /// record is removed and reported as `None`.
    async fn take_refresh_token(
        &self,
        role: Role,
        token: &str,
        now: DateTime<Utc>,
    ) -> AppResult<Option<Account>>;

    /// Delete every refresh token that expired at or before `now`.
    async fn purge_expired_refresh_tokens(&self, now: DateTime<Utc>) -> AppResult<u64>;

    /// Check that the backend is reachable.
    async fn health_check(&self) -> AppResult<bool>;
}
