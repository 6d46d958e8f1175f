//! Admin account management commands.
//!
//! Admins cannot self-register over HTTP; this is how they are created.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use careerly_auth::{RegisterAccount, SessionManager};
use careerly_core::config::AppConfig;
use careerly_core::error::AppError;
use careerly_entity::{Account, Role};

use crate::output;
use crate::output::OutputFormat;

/// Arguments for admin commands
#[derive(Debug, Args)]
pub struct AdminArgs {
    /// Admin subcommand
    #[command(subcommand)]
    pub command: AdminCommand,
}

/// Admin subcommands
#[derive(Debug, Subcommand)]
pub enum AdminCommand {
    /// Create a new admin account
    Create {
        /// Username
        #[arg(short, long)]
        username: Option<String>,
        /// Display name
        #[arg(short, long)]
        name: Option<String>,
        /// Password (will prompt if not provided)
        #[arg(short, long)]
        password: Option<String>,
    },
    /// Clear the failed-login lock of an admin account
    Unlock {
        /// Username of the admin
        #[arg(short, long)]
        username: String,
    },
    /// List admin accounts
    List,
}

/// One row of `admin list`.
#[derive(Debug, Serialize, Tabled)]
struct AdminRow {
    id: String,
    username: String,
    name: String,
    failed_attempts: i32,
    locked_until: String,
    last_login: String,
}

impl From<&Account> for AdminRow {
    fn from(account: &Account) -> Self {
        let or_dash = |v: Option<String>| v.unwrap_or_else(|| "-".to_string());
        Self {
            id: account.id.to_string(),
            username: account.login.clone(),
            name: or_dash(account.display_name.clone()),
            failed_attempts: account.failed_login_attempts,
            locked_until: or_dash(account.lock_until.map(|t| t.to_rfc3339())),
            last_login: or_dash(account.last_login.map(|t| t.to_rfc3339())),
        }
    }
}

/// Execute admin commands
pub async fn execute(
    args: &AdminArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let (pool, store) = super::connect_store(config).await?;
    let sessions = SessionManager::new(Role::Admin, &config.auth, store)?;

    match &args.command {
        AdminCommand::Create {
            username,
            name,
            password,
        } => {
            let username = match username {
                Some(u) => u.clone(),
                None => dialoguer::Input::new()
                    .with_prompt("Admin username")
                    .interact_text()
                    .map_err(super::input_error)?,
            };

            let password = match password {
                Some(p) => p.clone(),
                None => dialoguer::Password::new()
                    .with_prompt("Admin password")
                    .with_confirmation("Confirm password", "Passwords do not match")
                    .interact()
                    .map_err(super::input_error)?,
            };

            let account = sessions
                .create_account(RegisterAccount {
                    login: username,
                    password,
                    display_name: name.clone(),
                })
                .await?;

            output::print_success(&format!(
                "Admin '{}' created (id: {})",
                account.login, account.id
            ));
        }
        AdminCommand::Unlock { username } => {
            let account = sessions.unlock(username).await?;
            output::print_success(&format!("Admin '{}' unlocked", account.login));
        }
        AdminCommand::List => {
            let accounts = sessions.list_accounts().await?;
            let rows: Vec<AdminRow> = accounts.iter().map(AdminRow::from).collect();
            output::print_list(&rows, format);
        }
    }

    pool.close().await;
    Ok(())
}
