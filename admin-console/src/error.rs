use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::gateway::GatewayError;
use crate::listing::commands::UnknownCommand;
use crate::listing::ListingError;
use crate::services::AuthError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Authentication required")]
    Unauthorized,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Listing(#[from] ListingError),

    #[error(transparent)]
    Upstream(#[from] GatewayError),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => AppError::Unauthorized,
            AuthError::Misconfigured(msg) => AppError::Internal(anyhow::anyhow!(msg)),
        }
    }
}

impl From<UnknownCommand> for AppError {
    fn from(err: UnknownCommand) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

impl AppError {
    fn classify(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            AppError::Listing(ListingError::CommandUnavailable(_)) => {
                (StatusCode::CONFLICT, "COMMAND_UNAVAILABLE")
            }
            AppError::Listing(ListingError::NotConfirmed) => {
                (StatusCode::CONFLICT, "DELETE_NOT_CONFIRMED")
            }
            AppError::Upstream(e) if e.is_not_found() => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            AppError::Upstream(GatewayError::Http { status, .. }) if *status < 500 => {
                (StatusCode::BAD_GATEWAY, "UPSTREAM_REJECTED")
            }
            AppError::Upstream(_) => (StatusCode::BAD_GATEWAY, "UPSTREAM_UNAVAILABLE"),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_code) = self.classify();

        let message = match &self {
            AppError::NotFound(msg) | AppError::BadRequest(msg) => msg.clone(),
            AppError::Upstream(e) if e.is_not_found() => "Identity not found upstream".to_string(),
            AppError::Upstream(e) => {
                tracing::error!(error = %e, "identity service request failed");
                "Identity service request failed".to_string()
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {:?}", e);
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        let body = Json(json!({
            "error": {
                "code": error_code,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
