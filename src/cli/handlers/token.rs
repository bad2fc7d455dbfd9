//! Token command handler
//!
//! Mints access tokens with the configured JWT secret. There is no user
//! store, so this is how operators obtain admin tokens.

use crate::config::settings::Settings;
use crate::error::AppResult;
use crate::utils::jwt::generate_access_token;

/// Handler for the token command
pub struct TokenCommandHandler {
    config: Settings,
}

impl TokenCommandHandler {
    pub fn new(config: Settings) -> Self {
        Self { config }
    }

    /// Sign a token for `username`.
    ///
    /// `hours` defaults to `jwt.access_token_expiration`.
    pub fn issue(&self, username: &str, admin: bool, hours: Option<i64>) -> AppResult<String> {
        self.config.jwt.validate()?;

        let hours = hours.unwrap_or(self.config.jwt.access_token_expiration);
        let token = generate_access_token(username, admin, &self.config.jwt.secret, hours)?;

        tracing::info!(username = %username, is_admin = admin, expires_in_hours = hours, "Access token issued");
        Ok(token)
    }

    /// Print a freshly signed token to stdout.
    pub fn execute(&self, username: &str, admin: bool, hours: Option<i64>) -> AppResult<()> {
        let token = self.issue(username, admin, hours)?;
        println!("{}", token);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::utils::jwt::validate_access_token;

    fn valid_settings() -> Settings {
        let mut config = Settings::default();
        config.jwt.secret = "token-command-secret-with-32-chars!".to_string();
        config.jwt.access_token_expiration = 2;
        config
    }

    #[test]
    fn test_issue_admin_token() {
        let settings = valid_settings();
        let token = TokenCommandHandler::new(settings.clone())
            .issue("alice", true, None)
            .unwrap();

        let claims = validate_access_token(&token, &settings.jwt.secret).unwrap();
        assert_eq!(claims.sub, "alice");
        assert!(claims.is_admin);
        assert_eq!(claims.exp - claims.iat, 2 * 3600);
    }

    #[test]
    fn test_issue_with_explicit_lifetime() {
        let settings = valid_settings();
        let token = TokenCommandHandler::new(settings.clone())
            .issue("bob", false, Some(5))
            .unwrap();

        let claims = validate_access_token(&token, &settings.jwt.secret).unwrap();
        assert!(!claims.is_admin);
        assert_eq!(claims.exp - claims.iat, 5 * 3600);
    }

    #[test]
    fn test_issue_requires_valid_secret() {
        let result = TokenCommandHandler::new(Settings::default()).issue("alice", true, None);
        assert!(matches!(result, Err(AppError::Configuration { .. })));
    }
}
