//! JWT authentication middleware.
//!
//! `auth_middleware` validates the bearer token and stores the caller as an
//! [`AuthUser`] extension; `admin_middleware` then refuses callers whose token
//! does not carry the admin flag.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::state::AppState;
use crate::utils::jwt::{Claims, validate_access_token};

/// Authenticated caller, available to handlers as `Extension<AuthUser>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub username: String,
    pub is_admin: bool,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            username: claims.sub,
            is_admin: claims.is_admin,
        }
    }
}

/// Validates `Authorization: Bearer <token>`.
///
/// # Errors
/// 401 when the header is missing, malformed, or the token is invalid or
/// expired.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized {
            message: "Missing authorization header".to_string(),
        })?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::Unauthorized {
            message: "Invalid authorization header format. Expected: Bearer <token>".to_string(),
        })?;

    let claims = validate_access_token(token, &state.jwt_config.secret)?;

    let auth_user = AuthUser::from(claims);
    tracing::debug!(username = %auth_user.username, is_admin = auth_user.is_admin, "Request authenticated");
    request.extensions_mut().insert(auth_user);

    Ok(next.run(request).await)
}

/// Requires an admin caller. Must run after [`auth_middleware`].
pub async fn admin_middleware(request: Request, next: Next) -> Result<Response, AppError> {
    match request.extensions().get::<AuthUser>() {
        Some(user) if user.is_admin => Ok(next.run(request).await),
        Some(user) => {
            tracing::warn!(username = %user.username, "Admin-only endpoint refused");
            Err(AppError::Forbidden {
                message: "Admin privileges required".to_string(),
            })
        }
        None => Err(AppError::Unauthorized {
            message: "Authentication required".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::jwt::generate_access_token;
    use axum::{Router, body::Body, http::StatusCode, middleware, routing::get};
    use tower::ServiceExt;

    #[test]
    fn test_auth_user_from_claims() {
        let claims = Claims {
            sub: "admin".to_string(),
            is_admin: true,
            iat: 0,
            exp: 9_999_999_999,
        };

        let auth_user = AuthUser::from(claims);
        assert_eq!(auth_user.username, "admin");
        assert!(auth_user.is_admin);
    }

    fn admin_only(user: Option<AuthUser>) -> Router {
        Router::new()
            .route("/", get(|| async { "ok" }))
            .layer(middleware::from_fn(admin_middleware))
            .layer(middleware::from_fn(
                move |mut request: Request, next: Next| {
                    let user = user.clone();
                    async move {
                        if let Some(user) = user {
                            request.extensions_mut().insert(user);
                        }
                        next.run(request).await
                    }
                },
            ))
    }

    async fn status_of(router: Router) -> StatusCode {
        router
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap()
            .status()
    }

    #[tokio::test]
    async fn test_admin_middleware_gates_on_flag() {
        let admin = AuthUser {
            username: "root".to_string(),
            is_admin: true,
        };
        let reader = AuthUser {
            username: "reader".to_string(),
            is_admin: false,
        };

        assert_eq!(status_of(admin_only(Some(admin))).await, StatusCode::OK);
        assert_eq!(status_of(admin_only(Some(reader))).await, StatusCode::FORBIDDEN);
        assert_eq!(status_of(admin_only(None)).await, StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_token_for_admin_round_trips_into_auth_user() {
        let secret = "test_secret_key_at_least_32_characters_long";
        let token = generate_access_token("root", true, secret, 1).unwrap();
        let user = AuthUser::from(validate_access_token(&token, secret).unwrap());
        assert_eq!(
            user,
            AuthUser {
                username: "root".to_string(),
                is_admin: true
            }
        );
    }
}
