use jiff::Timestamp;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// JWT claims carried by access tokens
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Subject (username)
    pub sub: String,
    /// Whether the holder may create, update and delete jobs
    pub is_admin: bool,
    /// Issued at (unix seconds)
    pub iat: i64,
    /// Expiration time (unix seconds)
    pub exp: i64,
}

impl Claims {
    pub fn new(username: impl Into<String>, is_admin: bool, expiration_hours: i64) -> Self {
        let now = Timestamp::now().as_second();

        Self {
            sub: username.into(),
            is_admin,
            iat: now,
            exp: now + expiration_hours * 3600,
        }
    }
}

/// Signs an HS256 access token.
///
/// # Example
/// ```ignore
/// let token = generate_access_token("admin", true, "secret", 24)?;
/// ```
pub fn generate_access_token(
    username: &str,
    is_admin: bool,
    secret: &str,
    expiration_hours: i64,
) -> AppResult<String> {
    let claims = Claims::new(username, is_admin, expiration_hours);

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal {
        source: anyhow::anyhow!("Failed to generate JWT token: {}", e),
    })
}

/// Verifies signature and expiry of an access token and returns its claims.
pub fn validate_access_token(token: &str, secret: &str) -> AppResult<Claims> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => AppError::Unauthorized {
            message: "Token has expired".to_string(),
        },
        jsonwebtoken::errors::ErrorKind::InvalidToken => AppError::Unauthorized {
            message: "Invalid token".to_string(),
        },
        jsonwebtoken::errors::ErrorKind::InvalidSignature => AppError::Unauthorized {
            message: "Invalid token signature".to_string(),
        },
        _ => AppError::Unauthorized {
            message: format!("Token validation failed: {}", e),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_SECRET: &str = "test-secret-key-that-is-at-least-32-chars";

    #[test]
    fn test_generate_and_validate_round_trip() {
        let token = generate_access_token("admin", true, TEST_SECRET, 1).unwrap();

        let claims = validate_access_token(&token, TEST_SECRET).unwrap();

        assert_eq!(claims.sub, "admin");
        assert!(claims.is_admin);
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_validate_token_invalid_secret() {
        let token = generate_access_token("user", false, TEST_SECRET, 1).unwrap();

        match validate_access_token(&token, "another-secret-key-that-is-long-enough") {
            Err(AppError::Unauthorized { message }) => assert!(message.contains("signature")),
            other => panic!("Expected Unauthorized, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_token_invalid_format() {
        assert!(matches!(
            validate_access_token("not-a-jwt", TEST_SECRET),
            Err(AppError::Unauthorized { .. })
        ));
    }

    #[test]
    fn test_expired_token() {
        let token = generate_access_token("user", false, TEST_SECRET, -1).unwrap();

        match validate_access_token(&token, TEST_SECRET) {
            Err(AppError::Unauthorized { message }) => assert!(message.contains("expired")),
            other => panic!("Expected Unauthorized for expired token, got {:?}", other),
        }
    }

    #[test]
    fn test_claims_default_to_non_admin_when_asked() {
        let claims = Claims::new("reader", false, 24);
        assert!(!claims.is_admin);
        assert!(claims.exp > claims.iat);
    }
}
