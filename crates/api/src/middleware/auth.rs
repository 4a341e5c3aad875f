//! Authentication middleware for protected routes.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::{error, warn};

use crate::{AppState, error::ApiError};
use estatedesk_core::auth::CallerContext;
use estatedesk_core::termination::TerminationError;
use estatedesk_db::{CallerRepository, repositories::public_user};
use estatedesk_shared::{AppError, Claims, JwtError, PublicUser};

/// Extracts the bearer token from the Authorization header.
fn extract_bearer_token(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .or_else(|| header.strip_prefix("bearer "))
}

/// Authentication middleware that validates JWT tokens.
///
/// This middleware:
/// 1. Extracts the Bearer token from the Authorization header
/// 2. Validates the token using the JWT service
/// 3. Stores the claims in request extensions for handlers to access
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let Some(token) = auth_header.and_then(extract_bearer_token) else {
        return ApiError::from(TerminationError::Unauthenticated).into_response();
    };

    match state.jwt_service.validate_token(token) {
        Ok(claims) => {
            request.extensions_mut().insert(claims);
            next.run(request).await
        }
        Err(e) => {
            let message = match e {
                JwtError::Expired => "Token has expired",
                _ => "Invalid or malformed token",
            };
            ApiError::from(AppError::Unauthenticated(message.to_string())).into_response()
        }
    }
}

/// Extractor for verified token claims.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    /// Returns the user ID from the claims.
    #[must_use]
    pub const fn user_id(&self) -> uuid::Uuid {
        self.0.user_id()
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Claims>()
            .cloned()
            .map(AuthUser)
            .ok_or(ApiError::Termination(TerminationError::Unauthenticated))
    }
}

/// The authenticated caller, loaded fresh from the database.
///
/// Role, property assignments and tenant link are read from the stored
/// user on every request. A token for a deleted or deactivated user is
/// rejected with 401.
#[derive(Debug, Clone)]
pub struct Caller {
    /// The user, without credentials.
    pub user: PublicUser,
    /// Role and scope used for access decisions.
    pub context: CallerContext,
}

impl FromRequestParts<AppState> for Caller {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let AuthUser(claims) = AuthUser::from_request_parts(parts, state).await?;

        let repo = CallerRepository::new((*state.db).clone());
        match repo.resolve(claims.user_id()).await {
            Ok(Some((user, context))) => Ok(Self {
                user: public_user(&user),
                context,
            }),
            Ok(None) => {
                warn!(user_id = %claims.user_id(), "Token for unknown or disabled user");
                Err(TerminationError::Unauthenticated.into())
            }
            Err(e) => {
                error!(error = %e, user_id = %claims.user_id(), "Failed to resolve caller");
                Err(AppError::Database(e.to_string()).into())
            }
        }
    }
}
