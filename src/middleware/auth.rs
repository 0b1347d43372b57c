//! Authentication extractors
//!
//! Bearer token verification and admin-role enforcement for handlers.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::{get_user_id_from_claims, verify_token, AuthService};

/// Authenticated user extracted from a bearer token
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub email: Option<String>,
}

/// Error response for authentication failures
#[derive(Debug, Serialize)]
struct AuthError {
    error: AuthErrorDetails,
}

#[derive(Debug, Serialize)]
struct AuthErrorDetails {
    code: String,
    message: String,
}

impl AuthError {
    fn new(code: &str, message: &str) -> Self {
        Self {
            error: AuthErrorDetails {
                code: code.to_string(),
                message: message.to_string(),
            },
        }
    }

    fn into_response_with(self, status: StatusCode) -> Response {
        (status, Json(self)).into_response()
    }
}

/// Extractor for authenticated users
///
/// Verifies the bearer token from the Authorization header and resolves the
/// caller's user id.
#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    Arc<AuthService>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| {
                    AuthError::new(
                        "MISSING_TOKEN",
                        "Authorization header with Bearer token required",
                    )
                    .into_response_with(StatusCode::UNAUTHORIZED)
                })?;

        let auth_service = Arc::<AuthService>::from_ref(state);

        let claims = verify_token(bearer.token(), auth_service.jwt_secret()).map_err(|e| {
            let (code, message) = match e.to_string().as_str() {
                s if s.contains("expired") => ("TOKEN_EXPIRED", "Token has expired"),
                _ => ("INVALID_TOKEN", "Invalid token"),
            };
            AuthError::new(code, message).into_response_with(StatusCode::UNAUTHORIZED)
        })?;

        let user_id = get_user_id_from_claims(&claims).map_err(|_| {
            AuthError::new("INVALID_TOKEN", "Invalid user ID in token")
                .into_response_with(StatusCode::UNAUTHORIZED)
        })?;

        Ok(AuthenticatedUser {
            user_id,
            email: claims.email,
        })
    }
}

/// Optional authenticated user extractor
///
/// Attempts to authenticate but doesn't fail if no token is present. Used by
/// the click-tracking endpoints, which accept anonymous visitors.
#[derive(Debug, Clone)]
pub struct OptionalUser(pub Option<AuthenticatedUser>);

#[async_trait]
impl<S> FromRequestParts<S> for OptionalUser
where
    Arc<AuthService>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match AuthenticatedUser::from_request_parts(parts, state).await {
            Ok(user) => Ok(OptionalUser(Some(user))),
            Err(_) => Ok(OptionalUser(None)),
        }
    }
}

/// Extractor requiring an admin grant in the role-assignment store
pub struct AdminUser(pub AuthenticatedUser);

#[async_trait]
impl<S> FromRequestParts<S> for AdminUser
where
    Arc<AuthService>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user = AuthenticatedUser::from_request_parts(parts, state).await?;

        let auth_service = Arc::<AuthService>::from_ref(state);
        let is_admin = auth_service.is_admin(user.user_id).await.map_err(|e| {
            tracing::error!(error = %e, "Role lookup failed");
            AuthError::new("ROLE_LOOKUP_FAILED", "Could not verify role")
                .into_response_with(StatusCode::INTERNAL_SERVER_ERROR)
        })?;

        if !is_admin {
            return Err(AuthError::new("FORBIDDEN", "Admin access required")
                .into_response_with(StatusCode::FORBIDDEN));
        }

        Ok(AdminUser(user))
    }
}
