//! Async database connection pool implementation.
//!
//! Uses bb8 connection pool manager with diesel_async for PostgreSQL connections.
//! When TLS is enabled the connection is wrapped in rustls without verifying
//! the server certificate, matching libpq's `sslmode=require`.

use std::sync::Arc;
use std::time::Duration;

use diesel::ConnectionError;
use diesel::ConnectionResult;
use diesel_async::AsyncPgConnection;
use diesel_async::pooled_connection::bb8::Pool;
use diesel_async::pooled_connection::{AsyncDieselConnectionManager, ManagerConfig};
use diesel_migrations::{EmbeddedMigrations, embed_migrations};
use futures::FutureExt;
use futures::future::BoxFuture;
use rustls::client::danger::{HandshakeSignatureValid, ServerCertVerified, ServerCertVerifier};
use rustls::crypto::{CryptoProvider, verify_tls12_signature, verify_tls13_signature};
use rustls::pki_types::{CertificateDer, ServerName, UnixTime};
use rustls::{ClientConfig, DigitallySignedStruct, SignatureScheme};

use crate::config::{DatabaseConfig, Environment};
use crate::error::{AppError, AppResult};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Async connection pool type alias.
///
/// bb8::Pool internally uses Arc, so Clone is cheap.
pub type AsyncDbPool = Pool<AsyncPgConnection>;

/// Creates an async database connection pool from configuration.
///
/// # Errors
///
/// - `AppError::ConnectionPool` - If the pool cannot open its initial connections
pub async fn establish_async_connection_pool(
    config: &DatabaseConfig,
    environment: Environment,
) -> AppResult<AsyncDbPool> {
    let use_tls = config.tls.use_tls(environment);

    let manager = if use_tls {
        let mut manager_config = ManagerConfig::<AsyncPgConnection>::default();
        manager_config.custom_setup = Box::new(establish_tls_connection);
        AsyncDieselConnectionManager::<AsyncPgConnection>::new_with_config(
            &config.url,
            manager_config,
        )
    } else {
        AsyncDieselConnectionManager::<AsyncPgConnection>::new(&config.url)
    };

    let pool = Pool::builder()
        .max_size(config.max_connections)
        .min_idle(Some(config.min_connections))
        .connection_timeout(Duration::from_secs(config.connection_timeout))
        .build(manager)
        .await
        .map_err(|e| AppError::ConnectionPool {
            source: anyhow::Error::from(e),
        })?;

    tracing::info!(
        max_connections = config.max_connections,
        min_connections = config.min_connections,
        tls = use_tls,
        "Database connection pool established"
    );

    Ok(pool)
}

/// Connection string for the blocking migration connection.
///
/// libpq negotiates TLS itself, so the TLS decision is expressed as
/// `sslmode=require` (encrypt, don't verify) or `sslmode=disable`.
pub fn migration_database_url(config: &DatabaseConfig, environment: Environment) -> String {
    if config.url.contains("sslmode=") {
        return config.url.clone();
    }

    let mode = if config.tls.use_tls(environment) {
        "require"
    } else {
        "disable"
    };
    let separator = if config.url.contains('?') { '&' } else { '?' };
    format!("{}{}sslmode={}", config.url, separator, mode)
}

fn establish_tls_connection(url: &str) -> BoxFuture<'_, ConnectionResult<AsyncPgConnection>> {
    async move {
        let tls_config =
            unverified_tls_config().map_err(|e| ConnectionError::BadConnection(e.to_string()))?;
        let tls = tokio_postgres_rustls::MakeRustlsConnect::new(tls_config);
        let (client, connection) = tokio_postgres::connect(url, tls)
            .await
            .map_err(|e| ConnectionError::BadConnection(e.to_string()))?;
        AsyncPgConnection::try_from_client_and_connection(client, connection).await
    }
    .boxed()
}

fn unverified_tls_config() -> Result<ClientConfig, rustls::Error> {
    let provider = Arc::new(rustls::crypto::aws_lc_rs::default_provider());
    let config = ClientConfig::builder_with_provider(provider.clone())
        .with_safe_default_protocol_versions()?
        .dangerous()
        .with_custom_certificate_verifier(Arc::new(NoCertificateVerification(provider)))
        .with_no_client_auth();
    Ok(config)
}

/// Accepts any server certificate but still checks handshake signatures.
#[derive(Debug)]
struct NoCertificateVerification(Arc<CryptoProvider>);

impl ServerCertVerifier for NoCertificateVerification {
    fn verify_server_cert(
        &self,
        _end_entity: &CertificateDer<'_>,
        _intermediates: &[CertificateDer<'_>],
        _server_name: &ServerName<'_>,
        _ocsp_response: &[u8],
        _now: UnixTime,
    ) -> Result<ServerCertVerified, rustls::Error> {
        Ok(ServerCertVerified::assertion())
    }

    fn verify_tls12_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        verify_tls12_signature(message, cert, dss, &self.0.signature_verification_algorithms)
    }

    fn verify_tls13_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        verify_tls13_signature(message, cert, dss, &self.0.signature_verification_algorithms)
    }

    fn supported_verify_schemes(&self) -> Vec<SignatureScheme> {
        self.0.signature_verification_algorithms.supported_schemes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TlsMode;

    fn config_with(url: &str, tls: TlsMode) -> DatabaseConfig {
        DatabaseConfig {
            url: url.to_string(),
            tls,
            ..DatabaseConfig::default()
        }
    }

    #[test]
    fn test_migration_url_requires_ssl_in_production() {
        let config = config_with("postgres://db.example.com/jobly", TlsMode::Auto);
        assert_eq!(
            migration_database_url(&config, Environment::Production),
            "postgres://db.example.com/jobly?sslmode=require"
        );
        assert_eq!(
            migration_database_url(&config, Environment::Development),
            "postgres://db.example.com/jobly?sslmode=disable"
        );
    }

    #[test]
    fn test_migration_url_appends_to_existing_query() {
        let config = config_with(
            "postgres://localhost/jobly?application_name=jobly",
            TlsMode::Unverified,
        );
        assert_eq!(
            migration_database_url(&config, Environment::Test),
            "postgres://localhost/jobly?application_name=jobly&sslmode=require"
        );
    }

    #[test]
    fn test_migration_url_keeps_explicit_sslmode() {
        let config = config_with("postgres://localhost/jobly?sslmode=verify-full", TlsMode::Disabled);
        assert_eq!(
            migration_database_url(&config, Environment::Production),
            "postgres://localhost/jobly?sslmode=verify-full"
        );
    }

    #[test]
    fn test_unverified_tls_config_builds() {
        let config = unverified_tls_config().unwrap();
        assert!(config.alpn_protocols.is_empty());
    }
}
