//! Migrate command handler
//!
//! Applies, previews or reverts the embedded schema migrations.

use crate::config::settings::Settings;
use crate::db::migrate::{pending_migrations, revert_migrations, run_pending_migrations};
use crate::db::migration_database_url;
use crate::error::{AppError, AppResult};

/// Handler for the migrate command
pub struct MigrateCommandHandler {
    config: Settings,
}

impl MigrateCommandHandler {
    pub fn new(config: Settings) -> Self {
        Self { config }
    }

    /// Execute the migrate command
    ///
    /// # Arguments
    /// * `dry_run` - List pending migrations without applying them
    /// * `rollback` - Number of most recent migrations to revert
    ///
    /// # Errors
    /// - `Validation` for zero rollback steps, checked before connecting
    /// - `Database` for connection or migration failures
    pub async fn execute(&self, dry_run: bool, rollback: Option<u32>) -> AppResult<()> {
        if rollback == Some(0) {
            return Err(AppError::Validation {
                field: "rollback_steps".to_string(),
                reason: "Number of rollback steps must be greater than 0".to_string(),
            });
        }

        self.config.database.validate()?;

        if dry_run {
            self.show_pending_migrations().await
        } else if let Some(steps) = rollback {
            self.rollback_migrations(steps).await
        } else {
            self.run_migrations().await
        }
    }

    fn database_url(&self) -> String {
        migration_database_url(&self.config.database, self.config.application.environment)
    }

    async fn show_pending_migrations(&self) -> AppResult<()> {
        println!("Checking for pending migrations...");

        let pending = pending_migrations(self.database_url()).await?;

        if pending.is_empty() {
            println!("✓ No pending migrations found - database is up to date");
        } else {
            println!("Found {} pending migration(s):", pending.len());
            for name in &pending {
                println!("  - {}", name);
            }
            println!("\nRun without --dry-run to apply these migrations");
        }

        Ok(())
    }

    async fn run_migrations(&self) -> AppResult<()> {
        println!("Running database migrations...");

        let applied = run_pending_migrations(self.database_url()).await?;
        tracing::info!(count = applied.len(), "Migrations applied");

        if applied.is_empty() {
            println!("✓ No migrations to apply - database is already up to date");
        } else {
            println!("✓ Applied {} migration(s):", applied.len());
            for version in &applied {
                println!("  - {}", version);
            }
        }

        Ok(())
    }

    async fn rollback_migrations(&self, steps: u32) -> AppResult<()> {
        println!("Rolling back {} migration(s)...", steps);

        let reverted = revert_migrations(self.database_url(), steps).await?;
        tracing::warn!(count = reverted.len(), "Migrations reverted");

        println!("✓ Rolled back {} migration(s):", reverted.len());
        for version in &reverted {
            println!("  - {}", version);
        }

        Ok(())
    }

    pub fn config(&self) -> &Settings {
        &self.config
    }
}
