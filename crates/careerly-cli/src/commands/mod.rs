//! CLI command definitions and dispatch.

pub mod admin;
pub mod migrate;
pub mod tokens;

use std::sync::Arc;

use clap::{Parser, Subcommand};

use careerly_core::config::AppConfig;
use careerly_core::error::AppError;
use careerly_database::{AccountStore, DatabasePool, PgAccountStore};

use crate::output::OutputFormat;

/// Careerly account administration
#[derive(Debug, Parser)]
#[command(name = "careerly", version, about, long_about = None)]
pub struct Cli {
    /// Configuration environment overlay (`config/{env}.toml`)
    #[arg(short, long, env = "CAREERLY_ENV", default_value = "development")]
    pub env: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Database migration management
    Migrate(migrate::MigrateArgs),
    /// Admin account management
    Admin(admin::AdminArgs),
    /// Refresh-token maintenance
    Tokens(tokens::TokensArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        let config = AppConfig::load(&self.env)?;

        match &self.command {
            Commands::Migrate(args) => migrate::execute(args, &config).await,
            Commands::Admin(args) => admin::execute(args, &config, self.format).await,
            Commands::Tokens(args) => tokens::execute(args, &config).await,
        }
    }
}

/// Helper: connect to the database and wrap it in an account store.
///
/// Migrations are left to `migrate run`.
pub async fn connect_store(
    config: &AppConfig,
) -> Result<(DatabasePool, Arc<dyn AccountStore>), AppError> {
    let mut database = config.database.clone();
    database.run_migrations = false;

    let pool = DatabasePool::connect(&database).await?;
    let store: Arc<dyn AccountStore> = Arc::new(PgAccountStore::new(pool.pool().clone()));
    Ok((pool, store))
}

/// Helper: wrap a dialoguer failure.
pub fn input_error(e: dialoguer::Error) -> AppError {
    AppError::internal(format!("Input error: {e}"))
}
