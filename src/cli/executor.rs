//! Command executor for dispatching CLI commands
//!
//! Runs after parsing and configuration loading.

use super::handlers::{MigrateCommandHandler, ServeCommandHandler, TokenCommandHandler};
use super::parser::{Cli, Commands};
use crate::config::settings::Settings;
use crate::error::{AppError, AppResult};

/// Execute a CLI command with the given settings
///
/// Running without a subcommand starts the server.
///
/// # Errors
/// Returns errors from command handlers or validation failures
pub async fn execute_command(cli: &Cli, settings: Settings) -> AppResult<()> {
    validate_command_args(cli)?;

    match &cli.command {
        Some(Commands::Serve { dry_run, .. }) => {
            ServeCommandHandler::new(settings).execute(*dry_run).await
        }
        None => ServeCommandHandler::new(settings).execute(false).await,
        Some(Commands::Migrate { dry_run, rollback }) => {
            MigrateCommandHandler::new(settings)
                .execute(*dry_run, *rollback)
                .await
        }
        Some(Commands::Token {
            username,
            admin,
            hours,
        }) => TokenCommandHandler::new(settings).execute(username, *admin, *hours),
    }
}

fn validate_command_args(cli: &Cli) -> AppResult<()> {
    cli.validate().map_err(|reason| AppError::Validation {
        field: "cli_arguments".to_string(),
        reason,
    })?;

    match &cli.command {
        Some(Commands::Serve { host, port, .. }) => warn_serve_args(host.as_deref(), *port),
        Some(Commands::Migrate { rollback, .. }) => warn_migrate_args(*rollback),
        Some(Commands::Token { .. }) | None => {}
    }

    Ok(())
}

fn warn_serve_args(host: Option<&str>, port: Option<u16>) {
    if let (Some(host), Some(port)) = (host, port)
        && port < 1024
        && host == "0.0.0.0"
    {
        eprintln!(
            "Warning: Binding to 0.0.0.0 on port {} requires root privileges",
            port
        );
    }
}

fn warn_migrate_args(rollback: Option<u32>) {
    if let Some(steps) = rollback
        && steps > 50
    {
        eprintln!(
            "Warning: Rolling back {} migrations is a large operation. Consider using smaller steps.",
            steps
        );
    }
}
