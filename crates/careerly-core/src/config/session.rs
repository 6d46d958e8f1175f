//! Session maintenance configuration.

use serde::{Deserialize, Serialize};

/// Refresh-token housekeeping configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Interval for expired refresh-token cleanup in minutes. `0` disables it.
    #[serde(default = "default_cleanup_interval")]
    pub cleanup_interval_minutes: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cleanup_interval_minutes: default_cleanup_interval(),
        }
    }
}

fn default_cleanup_interval() -> u64 {
    60
}
