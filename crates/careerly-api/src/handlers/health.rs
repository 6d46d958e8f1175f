//! Health check handler.

use axum::Json;
use axum::extract::State;
use tracing::warn;

use crate::dto::response::HealthResponse;
use crate::state::AppState;

/// GET /health
///
/// Always answers 200; a failing database only degrades the status.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let database_up = match state.accounts.health_check().await {
        Ok(up) => up,
        Err(e) => {
            warn!(error = %e, "Database health check failed");
            false
        }
    };

    Json(HealthResponse {
        status: if database_up { "ok" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: if database_up { "connected" } else { "unavailable" }.to_string(),
    })
}
