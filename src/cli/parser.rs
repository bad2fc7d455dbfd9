//! CLI argument parsing with clap
//!
//! This module defines the command-line interface structure using clap,
//! including all commands, arguments, and their documentation.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::build;

/// Jobs API server for the Jobly job board
#[derive(Parser, Debug)]
#[command(name = "jobly")]
#[command(about = "Jobs API server for the Jobly job board")]
#[command(long_about = "
Jobly serves a REST API over the job listings of a job board, backed by
PostgreSQL. Reading jobs is public; creating, updating and deleting them
requires an admin access token.

EXAMPLES:
    # Start the server with default configuration
    jobly serve

    # Start server on custom host and port
    jobly serve --host 0.0.0.0 --port 8080

    # Use custom configuration file
    jobly --config /path/to/config.toml serve

    # Check configuration without starting server
    jobly serve --dry-run

    # Apply pending migrations, or preview them
    jobly migrate
    jobly migrate --dry-run

    # Mint an admin access token
    jobly token --username alice --admin
")]
#[command(version = build::CLAP_LONG_VERSION)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Configuration file path
    ///
    /// Load this TOML file instead of the layered files under `config/`.
    /// Environment variables still override its values.
    ///
    /// Example: --config /etc/jobly/production.toml
    #[arg(short, long, value_name = "FILE", value_parser = super::validation::validate_config_file_path)]
    pub config: Option<PathBuf>,

    /// Override environment detection
    ///
    /// Selects `config/{environment}.toml` and, with `database.tls = "auto"`,
    /// whether the database connection is encrypted. Defaults to `JOBLY_APP_ENV`.
    #[arg(short, long, value_enum)]
    pub env: Option<Environment>,

    /// Enable verbose (debug) logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the web server (default)
    ///
    /// Examples:
    ///   jobly serve                           # Start with defaults
    ///   jobly serve --host 0.0.0.0 --port 80  # Bind to all interfaces on port 80
    ///   jobly serve --dry-run                 # Validate config without starting
    Serve {
        /// Host address to bind to
        #[arg(long, value_name = "ADDRESS", value_parser = super::validation::validate_host_address)]
        host: Option<String>,

        /// Port number to listen on
        #[arg(short, long, value_name = "PORT", value_parser = super::validation::validate_port)]
        port: Option<u16>,

        /// Log level override; wins over --verbose/--quiet and the config file
        #[arg(long, value_enum)]
        log_level: Option<LogLevel>,

        /// Validate configuration and exit
        #[arg(long)]
        dry_run: bool,
    },
    /// Database migration operations
    ///
    /// Examples:
    ///   jobly migrate                    # Apply all pending migrations
    ///   jobly migrate --dry-run          # Show pending migrations without applying
    ///   jobly migrate --rollback 1       # Revert the most recent migration
    Migrate {
        /// Show pending migrations without applying
        #[arg(long, conflicts_with = "rollback")]
        dry_run: bool,

        /// Number of migrations to roll back (1-100)
        #[arg(long, value_name = "STEPS", conflicts_with = "dry_run", value_parser = super::validation::validate_rollback_steps)]
        rollback: Option<u32>,
    },
    /// Mint an access token signed with the configured JWT secret
    ///
    /// Examples:
    ///   jobly token --username alice --admin
    ///   jobly token --username bob --hours 1
    Token {
        /// Subject of the token
        #[arg(short, long, value_parser = super::validation::validate_username)]
        username: String,

        /// Grant admin rights (create, update and delete jobs)
        #[arg(long)]
        admin: bool,

        /// Lifetime in hours; defaults to `jwt.access_token_expiration`
        #[arg(long, value_name = "HOURS", value_parser = clap::value_parser!(i64).range(1..=8760))]
        hours: Option<i64>,
    },
}

/// Environment options
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Environment {
    #[value(name = "development", alias = "dev")]
    Development,
    #[value(name = "test")]
    Test,
    #[value(name = "staging", alias = "stage")]
    Staging,
    #[value(name = "production", alias = "prod")]
    Production,
}

/// Log level options
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogLevel {
    #[value(name = "error")]
    Error,
    #[value(name = "warn", alias = "warning")]
    Warn,
    #[value(name = "info")]
    Info,
    #[value(name = "debug")]
    Debug,
    #[value(name = "trace")]
    Trace,
}

impl Cli {
    /// Checks argument combinations clap cannot express.
    pub fn validate(&self) -> Result<(), String> {
        if let Some(Commands::Migrate { dry_run, rollback }) = &self.command
            && *dry_run
            && rollback.is_some()
        {
            return Err("Cannot use --dry-run and --rollback together".to_string());
        }

        if self.verbose && self.quiet {
            return Err("Cannot use --verbose and --quiet together".to_string());
        }

        Ok(())
    }

    /// Get detailed help for validation errors
    pub fn get_validation_help() -> &'static str {
        r#"
Common validation errors and solutions:

Port validation:
  - Port must be between 1 and 65535
  - Example: --port 8080

Host validation:
  - Use 'localhost' or '127.0.0.1' for local access only
  - Use '0.0.0.0' to accept connections from any interface
  - Example: --host 0.0.0.0

Configuration file validation:
  - File must exist, be readable and end in .toml
  - Example: --config /path/to/config.toml

Migration rollback validation:
  - Steps must be between 1 and 100
  - Cannot be used with --dry-run

For more help, use: jobly help <subcommand>
"#
    }
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

impl From<Environment> for crate::config::Environment {
    fn from(env: Environment) -> Self {
        match env {
            Environment::Development => crate::config::Environment::Development,
            Environment::Test => crate::config::Environment::Test,
            Environment::Staging => crate::config::Environment::Staging,
            Environment::Production => crate::config::Environment::Production,
        }
    }
}
