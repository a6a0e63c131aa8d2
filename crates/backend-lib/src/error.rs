// ============================
// crates/backend-lib/src/error.rs
// ============================
//! Central error type + Axum integration.
use crate::views::{self, ErrorPage};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Application error types with error codes and context
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Datastore unavailable: {0}")]
    StoreUnavailable(#[from] sqlx::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "VAL_001",
            AppError::Forbidden(_) => "AUTHZ_001",
            AppError::NotFound(_) => "NF_001",
            AppError::StoreUnavailable(_) => "STORE_001",
            AppError::Io(_) => "IO_001",
            AppError::Internal(_) => "INT_001",
        }
    }

    /// Get a sanitized message suitable for production use
    pub fn sanitized_message(&self) -> String {
        match self {
            // Validation and authorization messages are written by us, never echoed input.
            AppError::Validation(msg) | AppError::Forbidden(msg) | AppError::NotFound(msg) => {
                msg.clone()
            },
            AppError::StoreUnavailable(_) => {
                "The service is temporarily unavailable, please try again later".to_string()
            },
            AppError::Io(_) | AppError::Internal(_) => {
                "An internal server error occurred".to_string()
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_code = self.error_code();

        match &self {
            AppError::StoreUnavailable(err) => tracing::error!(%err, "datastore failure"),
            AppError::Io(err) => tracing::error!(%err, "io failure"),
            AppError::Internal(msg) => tracing::error!(%msg, "internal failure"),
            _ => tracing::debug!(code = error_code, %status, "request rejected"),
        }

        // Use detailed messages in development, sanitized in production
        let message = if cfg!(debug_assertions) {
            self.to_string()
        } else {
            self.sanitized_message()
        };

        let page = ErrorPage {
            status: status.as_u16(),
            code: error_code,
            message,
        };
        views::render_with_status(status, &page)
    }
}
