//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use careerly_auth::SessionManager;
use careerly_core::config::AppConfig;
use careerly_core::error::AppError;
use careerly_database::AccountStore;
use careerly_entity::Role;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Account persistence
    pub accounts: Arc<dyn AccountStore>,
    /// Admin session lifecycle
    pub admin: Arc<SessionManager>,
    /// Company session lifecycle
    pub company: Arc<SessionManager>,
    /// Undergraduate session lifecycle
    pub undergraduate: Arc<SessionManager>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("environment", &self.config.server.environment)
            .finish()
    }
}

impl AppState {
    /// Builds one session manager per role over a shared account store.
    pub fn new(config: AppConfig, accounts: Arc<dyn AccountStore>) -> Result<Self, AppError> {
        let manager = |role| {
            SessionManager::new(role, &config.auth, Arc::clone(&accounts)).map(Arc::new)
        };

        Ok(Self {
            admin: manager(Role::Admin)?,
            company: manager(Role::Company)?,
            undergraduate: manager(Role::Undergraduate)?,
            config: Arc::new(config),
            accounts,
        })
    }

    /// Session manager for `role`.
    pub fn sessions(&self, role: Role) -> &SessionManager {
        match role {
            Role::Admin => &self.admin,
            Role::Company => &self.company,
            Role::Undergraduate => &self.undergraduate,
        }
    }
}
