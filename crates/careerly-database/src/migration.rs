//! Schema migrations for the `accounts` and `refresh_tokens` tables.

use sqlx::PgPool;
use tracing::info;

use careerly_core::error::{AppError, ErrorKind};

/// Apply every pending migration under `migrations/`.
pub async fn run_migrations(pool: &PgPool) -> Result<(), AppError> {
    info!("Running database migrations");

    sqlx::migrate!("../../migrations")
        .run(pool)
        .await
        .map_err(|e| {
            AppError::with_source(
                ErrorKind::Database,
                format!("Failed to run migrations: {e}"),
                e,
            )
        })?;

    info!("Database schema is up to date");
    Ok(())
}
