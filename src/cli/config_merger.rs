//! Configuration merging for CLI arguments
//!
//! Loads the layered configuration (or the single `--config` file) and
//! applies command-line overrides on top of it.

use super::parser::{Cli, Commands};
use crate::config::ConfigLoader;
use crate::config::error::ConfigError;
use crate::config::settings::Settings;

/// Merges CLI arguments into loaded settings
pub struct ConfigurationMerger {
    base_config: Settings,
}

impl ConfigurationMerger {
    pub fn new(base_config: Settings) -> Self {
        Self { base_config }
    }

    /// Loads settings honouring `--config` and `--env`.
    ///
    /// # Errors
    /// Loader errors: missing `default.toml`, parse failures, failed validation.
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let mut loader = ConfigLoader::new()?;

        if let Some(env) = cli.env {
            loader = loader.with_environment(env.into());
        }

        if let Some(path) = &cli.config {
            loader = loader.with_config_file(path);
        }

        tracing::debug!(environment = %loader.environment(), "Loading configuration");
        Ok(Self::new(loader.load()?))
    }

    /// Returns a copy of the base settings with CLI overrides applied and
    /// validated. `serve --log-level` wins over `--verbose` / `--quiet`.
    pub fn merge_cli_args(&self, cli: &Cli) -> Result<Settings, ConfigError> {
        let mut config = self.base_config.clone();

        if cli.verbose {
            config.logger.level = "debug".to_string();
        } else if cli.quiet {
            config.logger.level = "error".to_string();
        }

        if let Some(Commands::Serve {
            host,
            port,
            log_level,
            ..
        }) = &cli.command
        {
            if let Some(host) = host {
                config.server.host = host.clone();
            }
            if let Some(port) = port {
                config.server.port = *port;
            }
            if let Some(level) = log_level {
                config.logger.level = level.as_str().to_string();
            }
        }

        config.validate()?;

        Ok(config)
    }

    pub fn config(&self) -> &Settings {
        &self.base_config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn valid_settings() -> Settings {
        let mut config = Settings::default();
        config.database.url = "postgres://localhost/jobly_test".to_string();
        config.jwt.secret = "s".repeat(32);
        config
    }

    fn merge(args: &[&str]) -> Settings {
        let cli = Cli::try_parse_from(args).unwrap();
        ConfigurationMerger::new(valid_settings())
            .merge_cli_args(&cli)
            .unwrap()
    }

    #[test]
    fn test_verbose_and_quiet_flags() {
        assert_eq!(merge(&["jobly", "--verbose"]).logger.level, "debug");
        assert_eq!(merge(&["jobly", "--quiet"]).logger.level, "error");
        assert_eq!(merge(&["jobly"]).logger.level, "info");
    }

    #[test]
    fn test_serve_overrides() {
        let merged = merge(&["jobly", "serve", "--host", "0.0.0.0", "--port", "8080"]);
        assert_eq!(merged.server.host, "0.0.0.0");
        assert_eq!(merged.server.port, 8080);
    }

    #[test]
    fn test_command_log_level_overrides_global() {
        let merged = merge(&["jobly", "--verbose", "serve", "--log-level", "warn"]);
        assert_eq!(merged.logger.level, "warn");
    }

    #[test]
    fn test_token_command_leaves_server_alone() {
        let merged = merge(&["jobly", "token", "--username", "alice"]);
        assert_eq!(merged.server, valid_settings().server);
    }

    #[test]
    fn test_invalid_base_is_rejected_after_merge() {
        let cli = Cli::try_parse_from(["jobly", "serve"]).unwrap();
        let merger = ConfigurationMerger::new(Settings::default());
        assert!(merger.merge_cli_args(&cli).is_err());
    }
}
