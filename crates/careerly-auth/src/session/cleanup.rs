//! Periodic removal of expired refresh tokens.

use std::time::Duration;

use chrono::Utc;
use tokio::sync::watch;
use tokio::time;
use tracing::{error, info};

use careerly_core::error::AppError;

use super::store::RefreshTokenStore;

/// Purges expired refresh-token records on a fixed interval.
///
/// Expired records never authenticate anyone, so this only bounds storage
/// growth for accounts that stop signing in.
#[derive(Debug, Clone)]
pub struct TokenCleanup {
    tokens: RefreshTokenStore,
    interval: Duration,
}

impl TokenCleanup {
    /// Creates a cleanup task running every `interval`.
    pub fn new(tokens: RefreshTokenStore, interval: Duration) -> Self {
        Self { tokens, interval }
    }

    /// Runs one purge, returning the number of records removed.
    pub async fn run_once(&self) -> Result<u64, AppError> {
        let purged = self.tokens.purge_expired(Utc::now()).await?;
        if purged > 0 {
            info!(purged = purged, "Expired refresh tokens purged");
        }
        Ok(purged)
    }

    /// Runs until `cancel` flips to `true`.
    pub async fn run(&self, mut cancel: watch::Receiver<bool>) {
        info!(
            interval_seconds = self.interval.as_secs(),
            "Refresh-token cleanup started"
        );

        let mut ticker = time::interval(self.interval);
        ticker.set_missed_tick_behavior(time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                changed = cancel.changed() => {
                    if changed.is_err() || *cancel.borrow() {
                        break;
                    }
                }
                _ = ticker.tick() => {
                    if let Err(e) = self.run_once().await {
                        error!(error = %e, "Refresh-token cleanup failed");
                    }
                }
            }
        }

        info!("Refresh-token cleanup stopped");
    }
}
