//! Command-line interface for jobly
//!
//! - Argument parsing with clap
//! - Configuration merging (CLI args over config files)
//! - Command handlers for `serve`, `migrate` and `token`

pub mod config_merger;
pub mod executor;
pub mod handlers;
pub mod parser;
pub mod validation;

pub use config_merger::ConfigurationMerger;
pub use executor::execute_command;
pub use parser::{Cli, Commands, Environment, LogLevel};

use anyhow::Context;

use crate::config::settings::Settings;
use crate::logger::{LoggerHandle, init_logger};

/// Load configuration files for the selected environment and apply CLI
/// overrides. The result is validated.
pub fn load_and_merge_config(cli: &Cli) -> anyhow::Result<Settings> {
    let merger = ConfigurationMerger::load(cli).context("Configuration error")?;
    merger
        .merge_cli_args(cli)
        .context("Configuration merge error")
}

/// Initialize logging from `settings.logger`.
///
/// The returned handle must be kept alive for file output to keep flushing.
pub fn init_logger_from_settings(settings: &Settings) -> anyhow::Result<LoggerHandle> {
    let logger_config = settings
        .logger
        .clone()
        .into_logger_config()
        .context("Logger configuration error")?;

    init_logger(logger_config).context("Logger initialization error")
}
