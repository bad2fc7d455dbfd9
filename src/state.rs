//! Application state for Axum web framework.
//!
//! Contains shared services and resources that are accessible
//! across all request handlers.

use crate::config::{ApiConfig, JwtConfig};
use crate::db::AsyncDbPool;
use crate::repositories::Repositories;
use crate::services::Services;

/// Application state containing all shared services and resources.
///
/// Cloning is cheap since the services hold their stores behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// All business logic services
    pub services: Services,
    /// JWT configuration for token validation
    pub jwt_config: JwtConfig,
    /// HTTP API behaviour switches
    pub api_config: ApiConfig,
}

impl AppState {
    /// Creates a new AppState backed by PostgreSQL.
    ///
    /// # Example
    /// ```ignore
    /// let pool = establish_async_connection_pool(&settings.database, env).await?;
    /// let state = AppState::new(pool, settings.jwt.clone(), settings.api.clone());
    /// ```
    pub fn new(pool: AsyncDbPool, jwt_config: JwtConfig, api_config: ApiConfig) -> Self {
        Self::from_repositories(Repositories::new(pool), jwt_config, api_config)
    }

    pub fn from_repositories(
        repos: Repositories,
        jwt_config: JwtConfig,
        api_config: ApiConfig,
    ) -> Self {
        Self {
            services: Services::new(repos),
            jwt_config,
            api_config,
        }
    }
}
