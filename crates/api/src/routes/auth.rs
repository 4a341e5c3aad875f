//! Authentication routes for login and the current caller.

use axum::{Json, Router, extract::State, routing::get, routing::post};
use tracing::{error, info};

use crate::{AppState, error::ApiError, extract::JsonBody, middleware::Caller};
use estatedesk_core::auth::verify_password;
use estatedesk_db::{UserRepository, repositories::public_user};
use estatedesk_shared::AppError;
use estatedesk_shared::auth::{LoginRequest, LoginResponse, MeResponse};

const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Public auth routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/auth/login", post(login))
}

/// Auth routes that need a verified token.
pub fn protected_routes() -> Router<AppState> {
    Router::new().route("/auth/me", get(me))
}

/// POST /auth/login - Authenticate user and return an access token.
async fn login(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let user_repo = UserRepository::new((*state.db).clone());

    let user = user_repo.find_by_email(&payload.email).await.map_err(|e| {
        error!(error = %e, "Database error during login");
        AppError::Database(e.to_string())
    })?;

    let Some(user) = user else {
        info!(email = %payload.email, "Login attempt for non-existent user");
        return Err(AppError::Unauthenticated(INVALID_CREDENTIALS.to_string()).into());
    };

    if !user.is_active {
        return Err(AppError::Unauthenticated("This account has been disabled".to_string()).into());
    }

    let valid = verify_password(&payload.password, &user.password_hash).map_err(|e| {
        error!(error = %e, "Password verification error");
        AppError::Internal(e.to_string())
    })?;
    if !valid {
        info!(user_id = %user.id, "Failed login attempt - invalid password");
        return Err(AppError::Unauthenticated(INVALID_CREDENTIALS.to_string()).into());
    }

    let user = public_user(&user);
    let access_token = state
        .jwt_service
        .generate_access_token(user.id, &user.role)
        .map_err(|e| {
            error!(error = %e, "Failed to generate access token");
            AppError::Internal(e.to_string())
        })?;

    info!(user_id = %user.id, role = %user.role, "User logged in successfully");

    Ok(Json(LoginResponse {
        user,
        access_token,
        expires_in: state.jwt_service.access_token_expires_in(),
    }))
}

/// GET /auth/me - The caller with their scope.
async fn me(caller: Caller) -> Json<MeResponse> {
    Json(MeResponse {
        assigned_properties: caller.context.assigned_properties(),
        tenant_id: caller.context.tenant_id(),
        user: caller.user,
    })
}
