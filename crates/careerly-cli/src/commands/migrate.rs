//! Database migration management commands.

use clap::{Args, Subcommand};

use careerly_core::config::AppConfig;
use careerly_core::error::AppError;
use careerly_database::DatabasePool;

use crate::output;

/// Arguments for the migrate command
#[derive(Debug, Args)]
pub struct MigrateArgs {
    /// Migration subcommand
    #[command(subcommand)]
    pub command: MigrateCommand,
}

/// Migration subcommands
#[derive(Debug, Subcommand)]
pub enum MigrateCommand {
    /// Run all pending migrations
    Run,
}

/// Execute migration commands
pub async fn execute(args: &MigrateArgs, config: &AppConfig) -> Result<(), AppError> {
    match &args.command {
        MigrateCommand::Run => {
            let mut database = config.database.clone();
            database.run_migrations = false;
            let pool = DatabasePool::connect(&database).await?;

            println!("Running database migrations...");
            careerly_database::migration::run_migrations(pool.pool()).await?;
            pool.close().await;

            output::print_success("All migrations applied successfully.");
        }
    }

    Ok(())
}
