//! Refresh-token maintenance commands.

use chrono::Utc;
use clap::{Args, Subcommand};

use careerly_auth::RefreshTokenStore;
use careerly_core::config::AppConfig;
use careerly_core::error::AppError;

use crate::output;

/// Arguments for token commands
#[derive(Debug, Args)]
pub struct TokensArgs {
    /// Token subcommand
    #[command(subcommand)]
    pub command: TokensCommand,
}

/// Token subcommands
#[derive(Debug, Subcommand)]
pub enum TokensCommand {
    /// Delete every expired refresh token now
    Purge,
}

/// Execute token commands
pub async fn execute(args: &TokensArgs, config: &AppConfig) -> Result<(), AppError> {
    let (pool, store) = super::connect_store(config).await?;

    match &args.command {
        TokensCommand::Purge => {
            let purged = RefreshTokenStore::new(store).purge_expired(Utc::now()).await?;
            output::print_success(&format!("Purged {purged} expired refresh token(s)"));
        }
    }

    pool.close().await;
    Ok(())
}
