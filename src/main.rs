//! Careerly authentication server.
//!
//! Main entry point that wires the crates together and starts the server.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing_subscriber::{EnvFilter, fmt};

use careerly_api::{AppState, build_router};
use careerly_auth::{RefreshTokenStore, TokenCleanup};
use careerly_core::config::AppConfig;
use careerly_core::error::AppError;
use careerly_database::{AccountStore, DatabasePool, PgAccountStore};

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!(error = %e, "Server error");
        std::process::exit(1);
    }
}

/// Load `config/default.toml`, the `CAREERLY_ENV` overlay and env overrides.
fn load_configuration() -> Result<AppConfig, AppError> {
    let env = std::env::var("CAREERLY_ENV").unwrap_or_else(|_| "development".to_string());
    AppConfig::load(&env)
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        environment = %config.server.environment,
        "Starting Careerly"
    );

    // ── Database connection + migrations ─────────────────────────
    tracing::info!("Connecting to database...");
    let db_pool = DatabasePool::connect(&config.database).await?;
    let accounts: Arc<dyn AccountStore> = Arc::new(PgAccountStore::new(db_pool.pool().clone()));

    // ── Per-role session managers ────────────────────────────────
    let state = AppState::new(config.clone(), Arc::clone(&accounts))?;

    // ── Shutdown channel ─────────────────────────────────────────
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    // ── Expired refresh-token cleanup ────────────────────────────
    let cleanup_handle = match config.session.cleanup_interval_minutes {
        0 => {
            tracing::info!("Refresh-token cleanup disabled");
            None
        }
        minutes => {
            let cleanup = TokenCleanup::new(
                RefreshTokenStore::new(Arc::clone(&accounts)),
                Duration::from_secs(minutes * 60),
            );
            Some(tokio::spawn(async move { cleanup.run(shutdown_rx).await }))
        }
    };

    let app = build_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!("Careerly server listening on {}", addr);

    // ── Graceful shutdown ────────────────────────────────────────
    let server = axum::serve(listener, app).with_graceful_shutdown(async move {
        shutdown_signal().await;
        tracing::info!("Shutdown signal received, starting graceful shutdown...");
        let _ = shutdown_tx.send(true);
    });

    server
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    // ── Wait for background tasks ────────────────────────────────
    if let Some(handle) = cleanup_handle {
        let grace = Duration::from_secs(config.server.shutdown_grace_seconds);
        if tokio::time::timeout(grace, handle).await.is_err() {
            tracing::warn!("Token cleanup did not stop within the grace period");
        }
    }

    db_pool.close().await;
    tracing::info!("Careerly server shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
