//! Failed-login counting and temporary account locks.
//!
//! `Unlocked -> (N consecutive failures) -> Locked(until = now + window) ->
//! (window elapses) -> Unlocked`. A successful verification resets the
//! counter and clears the lock.

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use careerly_core::config::LockoutConfig;
use careerly_core::error::AppError;
use careerly_database::AccountStore;
use careerly_entity::LoginAttemptState;

/// Lockout thresholds for one realm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockoutPolicy {
    max_failed_attempts: i32,
    lockout_duration: Duration,
}

impl LockoutPolicy {
    /// Creates a policy from explicit thresholds.
    ///
    /// A threshold of zero is treated as one; one above `i32::MAX` saturates.
    pub fn new(max_failed_attempts: u32, lockout_duration: Duration) -> Self {
        Self {
            max_failed_attempts: i32::try_from(max_failed_attempts.max(1)).unwrap_or(i32::MAX),
            lockout_duration,
        }
    }

    /// Creates a policy from a realm's lockout block.
    pub fn from_config(config: &LockoutConfig) -> Result<Self, AppError> {
        let window = i64::try_from(config.lockout_duration_minutes)
            .ok()
            .and_then(Duration::try_minutes)
            .ok_or_else(|| AppError::configuration("lockout_duration_minutes is out of range"))?;

        Ok(Self::new(config.max_failed_attempts, window))
    }

    /// Whether `state` is locked at `now`.
    pub fn is_locked(&self, state: &LoginAttemptState, now: DateTime<Utc>) -> bool {
        state.is_locked(now)
    }

    /// Records one failed verification for `account_id` in the store.
    ///
    /// The increment happens inside the store, so concurrent failures are
    /// all counted. Returns `None` if the account has disappeared.
    pub async fn register_failure(
        &self,
        accounts: &dyn AccountStore,
        account_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Option<LoginAttemptState>, AppError> {
        accounts
            .register_failed_login(
                account_id,
                now,
                self.max_failed_attempts,
                self.lockout_duration,
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use careerly_core::error::ErrorKind;
    use careerly_database::MemoryAccountStore;
    use careerly_entity::{NewAccount, Role};

    async fn store_with_admin() -> (MemoryAccountStore, Uuid) {
        let store = MemoryAccountStore::new();
        let account = store
            .create(&NewAccount {
                role: Role::Admin,
                login: "root".into(),
                display_name: None,
                password_hash: "hash".into(),
            })
            .await
            .unwrap();
        (store, account.id)
    }

    #[test]
    fn test_lock_ends_when_window_elapses() {
        let policy = LockoutPolicy::new(5, Duration::minutes(30));
        let now = Utc::now();
        let locked = LoginAttemptState {
            failed_attempts: 5,
            lock_until: Some(now + Duration::minutes(30)),
        };

        assert!(policy.is_locked(&locked, now + Duration::minutes(29)));
        assert!(!policy.is_locked(&locked, now + Duration::minutes(30)));
    }

    #[test]
    fn test_extreme_thresholds_are_clamped() {
        assert_eq!(
            LockoutPolicy::new(u32::MAX, Duration::minutes(1)).max_failed_attempts,
            i32::MAX
        );
        assert_eq!(LockoutPolicy::new(0, Duration::minutes(1)).max_failed_attempts, 1);

        let err = LockoutPolicy::from_config(&LockoutConfig {
            max_failed_attempts: 5,
            lockout_duration_minutes: u64::MAX,
        })
        .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Configuration);
    }

    #[tokio::test]
    async fn test_register_failure_locks_on_threshold() {
        let (store, id) = store_with_admin().await;
        let policy = LockoutPolicy::from_config(&LockoutConfig {
            max_failed_attempts: 3,
            lockout_duration_minutes: 10,
        })
        .unwrap();
        let now = Utc::now();

        for attempt in 1..3 {
            let state = policy.register_failure(&store, id, now).await.unwrap().unwrap();
            assert_eq!(state.failed_attempts, attempt);
            assert!(!policy.is_locked(&state, now));
        }

        let state = policy.register_failure(&store, id, now).await.unwrap().unwrap();
        assert_eq!(state.lock_until, Some(now + Duration::minutes(10)));

        let stored = store.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(stored.login_attempts(), state);
    }

    #[tokio::test]
    async fn test_register_failure_after_expired_lock_restarts_count() {
        let (store, id) = store_with_admin().await;
        let now = Utc::now();
        store
            .update_login_attempts(
                id,
                LoginAttemptState {
                    failed_attempts: 5,
                    lock_until: Some(now - Duration::seconds(1)),
                },
            )
            .await
            .unwrap();

        let policy = LockoutPolicy::new(5, Duration::minutes(30));
        let state = policy.register_failure(&store, id, now).await.unwrap().unwrap();
        assert_eq!(state.failed_attempts, 1);
        assert!(state.lock_until.is_none());
    }
}
