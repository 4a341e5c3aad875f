//! Mapping of domain and application errors to HTTP responses.
//!
//! Every error body has the shape `{"error": "<code>", "message": "<text>"}`.
//! Server-side failures are logged with their detail and answered with a
//! generic message.

use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use estatedesk_core::termination::TerminationError;
use estatedesk_shared::AppError;

/// Error returned by handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Failure in the termination workflow.
    #[error(transparent)]
    Termination(#[from] TerminationError),

    /// Failure outside the workflow.
    #[error(transparent)]
    App(#[from] AppError),
}

impl ApiError {
    /// HTTP status for the error.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        let code = match self {
            Self::Termination(err) => err.status_code(),
            Self::App(err) => err.status_code(),
        };
        StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Machine-readable error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Termination(err) => err.error_code(),
            Self::App(err) => err.error_code(),
        }
    }

    fn public_message(&self) -> String {
        match self {
            Self::Termination(err) => err.public_message(),
            Self::App(err) => err.public_message(),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::App(AppError::Validation(rejection.body_text()))
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::App(AppError::Validation(rejection.body_text()))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::App(AppError::Validation(rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "Request failed");
        }

        let body = Json(json!({
            "error": self.code(),
            "message": self.public_message(),
        }));
        (status, body).into_response()
    }
}
