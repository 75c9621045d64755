//! Unified error handling for admin.
//!
//! Provides a unified `AppError` type that captures errors to Sentry
//! before responding to the client. All route handlers should return
//! `Result<T, AppError>`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::api::AdminApiError;

/// Application-level error type for the admin service.
#[derive(Debug, Error)]
pub enum AppError {
    /// Backend API operation failed.
    #[error("Backend error: {0}")]
    Api(#[from] AdminApiError),

    /// Session store operation failed.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// No token in the session (or the backend rejected it).
    #[error("Unauthorized")]
    Unauthorized,

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // A rejected token means the operator must log in again, not a
        // server fault.
        let unauthorized = matches!(&self, Self::Unauthorized)
            || matches!(&self, Self::Api(api) if api.is_unauthorized());

        if !unauthorized && matches!(self, Self::Api(_) | Self::Session(_) | Self::Internal(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = if unauthorized {
            StatusCode::UNAUTHORIZED
        } else {
            match &self {
                Self::Api(AdminApiError::Status { status, .. }) => {
                    // 404s from the backend are the resource's absence,
                    // not a gateway fault.
                    if *status == 404 {
                        StatusCode::NOT_FOUND
                    } else {
                        StatusCode::BAD_GATEWAY
                    }
                }
                Self::Api(_) => StatusCode::BAD_GATEWAY,
                Self::Session(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
                Self::NotFound(_) => StatusCode::NOT_FOUND,
                Self::BadRequest(_) => StatusCode::BAD_REQUEST,
                Self::Unauthorized => StatusCode::UNAUTHORIZED,
            }
        };

        let body = match &self {
            Self::Api(AdminApiError::Status { message, .. }) if !message.is_empty() => {
                json!({ "error": message })
            }
            Self::Api(_) => json!({ "error": "External service error" }),
            Self::Session(_) | Self::Internal(_) => json!({ "error": "Internal server error" }),
            _ => json!({ "error": self.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_unauthorized_statuses() {
        assert_eq!(status_of(AppError::Unauthorized), StatusCode::UNAUTHORIZED);
        assert_eq!(
            status_of(AppError::Api(AdminApiError::Status {
                status: 401,
                message: "Credenciales incorrectas".to_string(),
            })),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn test_backend_not_found_maps_to_404() {
        assert_eq!(
            status_of(AppError::Api(AdminApiError::Status {
                status: 404,
                message: "Pedido no encontrado".to_string(),
            })),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_backend_errors_are_bad_gateway() {
        assert_eq!(
            status_of(AppError::Api(AdminApiError::Contract("shape".to_string()))),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            status_of(AppError::Api(AdminApiError::Status {
                status: 500,
                message: String::new(),
            })),
            StatusCode::BAD_GATEWAY
        );
    }
}
