//! Session lifecycle manager: login, refresh rotation and logout flows.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use careerly_core::config::AuthConfig;
use careerly_core::error::AppError;
use careerly_database::AccountStore;
use careerly_entity::{Account, AccountProfile, NewAccount, Role};

use crate::jwt::{TokenIssuer, TokenPair};
use crate::lockout::LockoutPolicy;
use crate::password::{PasswordHasher, PasswordValidator};

use super::store::RefreshTokenStore;

/// Message returned for every failed credential check.
pub const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Message returned when a refresh token cannot be exchanged.
pub const INVALID_REFRESH_TOKEN: &str = "Invalid refresh token";

/// Result of a successful login.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    /// Newly minted token pair.
    pub tokens: TokenPair,
    /// The authenticated account, as persisted after the login.
    pub account: Account,
}

/// Result of a successful refresh rotation.
#[derive(Debug, Clone)]
pub struct RefreshOutcome {
    /// Replacement token pair.
    pub tokens: TokenPair,
    /// Owner of the consumed refresh token.
    pub account: Account,
}

/// Input for creating an account.
#[derive(Debug, Clone)]
pub struct RegisterAccount {
    /// Username (admin) or email (company, undergraduate).
    pub login: String,
    /// Plaintext password; validated and hashed before storage.
    pub password: String,
    /// Optional display name.
    pub display_name: Option<String>,
}

/// Orchestrates the session lifecycle for one role.
#[derive(Clone)]
pub struct SessionManager {
    role: Role,
    issuer: Arc<TokenIssuer>,
    accounts: Arc<dyn AccountStore>,
    tokens: RefreshTokenStore,
    hasher: PasswordHasher,
    validator: PasswordValidator,
    lockout: Option<LockoutPolicy>,
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("role", &self.role)
            .field("lockout", &self.lockout)
            .finish()
    }
}

impl SessionManager {
    /// Builds the manager for `role` from the matching realm block.
    pub fn new(
        role: Role,
        config: &AuthConfig,
        accounts: Arc<dyn AccountStore>,
    ) -> Result<Self, AppError> {
        let realm = config.realm(role.as_str()).ok_or_else(|| {
            AppError::configuration(format!("No auth realm configured for role '{role}'"))
        })?;

        let lockout = realm
            .lockout
            .as_ref()
            .map(LockoutPolicy::from_config)
            .transpose()?;

        Ok(Self {
            role,
            issuer: Arc::new(TokenIssuer::new(role, realm)?),
            tokens: RefreshTokenStore::new(accounts.clone()),
            accounts,
            hasher: PasswordHasher::new(),
            validator: PasswordValidator::new(config),
            lockout,
        })
    }

    /// Role this manager serves.
    pub fn role(&self) -> Role {
        self.role
    }

    /// Token issuer for this role.
    pub fn issuer(&self) -> &TokenIssuer {
        &self.issuer
    }

    /// Performs the login flow:
    ///
    /// 1. Find the account, spending a full verification even when none matches
    /// 2. Reject if locked, without checking the password
    /// 3. Verify the password, recording failures against the lockout policy
    /// 4. Reset failures, stamp `last_login`
    /// 5. Issue a token pair and persist the refresh token
    pub async fn login(&self, login: &str, password: &str) -> Result<LoginOutcome, AppError> {
        let now = Utc::now();

        let Some(mut account) = self.accounts.find_by_login(self.role, login.trim()).await? else {
            self.hasher.verify_unknown(password);
            debug!(role = %self.role, "Login rejected: unknown account");
            return Err(AppError::unauthenticated(INVALID_CREDENTIALS));
        };

        if let Some(policy) = &self.lockout {
            if policy.is_locked(&account.login_attempts(), now) {
                warn!(account_id = %account.id, role = %self.role, "Login rejected: account locked");
                return Err(AppError::locked(
                    "Account is temporarily locked. Try again later.",
                ));
            }
        }

        if !self.hasher.verify(password, &account.password_hash)? {
            self.record_failure(account.id, now).await?;
            return Err(AppError::unauthenticated(INVALID_CREDENTIALS));
        }

        self.accounts.record_successful_login(account.id, now).await?;
        account.last_login = Some(now);
        account.failed_login_attempts = 0;
        account.lock_until = None;

        let tokens = self.issuer.issue_pair(account.id, &account.login)?;
        self.tokens
            .add(account.id, &tokens.refresh_token, tokens.refresh_expires_at)
            .await?;

        info!(account_id = %account.id, role = %self.role, "Login successful");

        Ok(LoginOutcome { tokens, account })
    }

    /// Exchanges a refresh token for a new pair.
    ///
    /// The presented token is consumed atomically; a replay, an unknown
    /// token or an expired one fails with `Unauthenticated`.
    pub async fn refresh(&self, refresh_token: &str) -> Result<RefreshOutcome, AppError> {
        let now = Utc::now();

        let claims = self
            .issuer
            .verify_refresh_token(refresh_token)
            .map_err(|_| AppError::unauthenticated(INVALID_REFRESH_TOKEN))?;

        let account = self
            .tokens
            .take(self.role, refresh_token, now)
            .await?
            .ok_or_else(|| {
                debug!(role = %self.role, "Refresh rejected: token not on record");
                AppError::unauthenticated(INVALID_REFRESH_TOKEN)
            })?;

        if account.id != claims.sub {
            warn!(account_id = %account.id, subject = %claims.sub, "Refresh token subject mismatch");
            return Err(AppError::unauthenticated(INVALID_REFRESH_TOKEN));
        }

        let tokens = self.issuer.issue_pair(account.id, &account.login)?;
        self.tokens
            .add(account.id, &tokens.refresh_token, tokens.refresh_expires_at)
            .await?;

        info!(account_id = %account.id, role = %self.role, "Token refreshed");

        Ok(RefreshOutcome { tokens, account })
    }

    /// Removes the presented refresh token. Never fails.
    pub async fn logout(&self, refresh_token: &str) {
        match self.tokens.remove(self.role, refresh_token).await {
            Ok(true) => info!(role = %self.role, "Logout completed"),
            Ok(false) => debug!(role = %self.role, "Logout with unknown refresh token"),
            Err(e) => error!(role = %self.role, error = %e, "Failed to remove refresh token"),
        }
    }

    /// Removes every refresh token of the presented token's owner.
    ///
    /// Returns the number of sessions ended. Never fails.
    pub async fn logout_all(&self, refresh_token: &str) -> u64 {
        let owner = match self
            .tokens
            .find_owner(self.role, refresh_token, Utc::now())
            .await
        {
            Ok(Some(account)) => account,
            Ok(None) => {
                debug!(role = %self.role, "Logout-all with unknown refresh token");
                return 0;
            }
            Err(e) => {
                error!(role = %self.role, error = %e, "Failed to resolve refresh token owner");
                return 0;
            }
        };

        match self.tokens.remove_all(owner.id).await {
            Ok(count) => {
                info!(account_id = %owner.id, role = %self.role, sessions = count, "Logged out of all sessions");
                count
            }
            Err(e) => {
                error!(account_id = %owner.id, error = %e, "Failed to remove refresh tokens");
                0
            }
        }
    }

    /// Sanitized profile of an account of this role.
    pub async fn profile(&self, account_id: Uuid) -> Result<AccountProfile, AppError> {
        self.accounts
            .find_by_id(account_id)
            .await?
            .filter(|a| a.role == self.role)
            .map(|a| a.profile())
            .ok_or_else(|| AppError::not_found("Account not found"))
    }

    /// Self-registration, available to roles that allow it.
    pub async fn register(&self, data: RegisterAccount) -> Result<Account, AppError> {
        if !self.role.allows_self_registration() {
            return Err(AppError::forbidden(format!(
                "{} accounts cannot self-register",
                self.role
            )));
        }
        self.create_account(data).await
    }

    /// Creates an account of this role after validating its password.
    pub async fn create_account(&self, data: RegisterAccount) -> Result<Account, AppError> {
        let login = self.normalize_login(&data.login)?;
        self.validator.validate(&data.password)?;
        let password_hash = self.hasher.hash(&data.password)?;

        let account = self
            .accounts
            .create(&NewAccount {
                role: self.role,
                login,
                display_name: data
                    .display_name
                    .map(|n| n.trim().to_string())
                    .filter(|n| !n.is_empty()),
                password_hash,
            })
            .await?;

        info!(account_id = %account.id, role = %self.role, "Account created");
        Ok(account)
    }

    /// Clears the failed-login bookkeeping of an account.
    pub async fn unlock(&self, login: &str) -> Result<Account, AppError> {
        let login = login.trim();
        let account = self
            .accounts
            .find_by_login(self.role, login)
            .await?
            .ok_or_else(|| AppError::not_found(format!("No {} account '{login}'", self.role)))?;

        self.accounts
            .update_login_attempts(account.id, Default::default())
            .await?;

        info!(account_id = %account.id, role = %self.role, "Account unlocked");
        Ok(account)
    }

    /// Every account of this role.
    pub async fn list_accounts(&self) -> Result<Vec<Account>, AppError> {
        self.accounts.list_by_role(self.role).await
    }

    async fn record_failure(&self, account_id: Uuid, now: DateTime<Utc>) -> Result<(), AppError> {
        let Some(policy) = &self.lockout else {
            debug!(account_id = %account_id, role = %self.role, "Login rejected: wrong password");
            return Ok(());
        };

        let Some(next) = policy
            .register_failure(self.accounts.as_ref(), account_id, now)
            .await?
        else {
            debug!(account_id = %account_id, role = %self.role, "Login rejected: account removed");
            return Ok(());
        };

        if next.is_locked(now) {
            warn!(
                account_id = %account_id,
                role = %self.role,
                attempts = next.failed_attempts,
                "Account locked after repeated failed logins"
            );
        } else {
            debug!(
                account_id = %account_id,
                role = %self.role,
                attempts = next.failed_attempts,
                "Login rejected: wrong password"
            );
        }
        Ok(())
    }

    /// Trim the login; emails are compared and stored lowercase.
    fn normalize_login(&self, login: &str) -> Result<String, AppError> {
        let login = login.trim();
        if login.is_empty() {
            return Err(AppError::validation(format!(
                "'{}' is required",
                self.role.login_field()
            )));
        }

        match self.role {
            Role::Admin => Ok(login.to_string()),
            Role::Company | Role::Undergraduate => {
                let valid = login
                    .split_once('@')
                    .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
                if !valid {
                    return Err(AppError::validation(format!(
                        "'{}' must be a valid email address",
                        self.role.login_field()
                    )));
                }
                Ok(login.to_lowercase())
            }
        }
    }
}
