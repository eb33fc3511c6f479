//! Unified error handling for the HTTP layer.
//!
//! Provides a unified `AppError` type mapping data-layer failures to HTTP
//! status codes. All route handlers return `Result<T, AppError>`.
//!
//! Mapping: constraint violations → 409, missing entities → 404, an
//! unconnected store → 503, anything else → 500. Server errors are logged
//! and reported to clients with a generic message only.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use shoplite_chain::ChainError;

use crate::db::StoreError;

/// Application-level error type for the API.
#[derive(Debug, Error)]
pub enum AppError {
    /// Data store operation failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A multi-step chain failed; the error names the failed step.
    #[error(transparent)]
    Chain(#[from] ChainError<StoreError>),

    /// Resource not found.
    #[error("not found: {0}")]
    NotFound(String),
}

impl AppError {
    /// The HTTP status for this error.
    fn status(&self) -> StatusCode {
        match self {
            Self::Store(err) | Self::Chain(ChainError { source: err, .. }) => match err {
                StoreError::Constraint(_) => StatusCode::CONFLICT,
                StoreError::NotConnected => StatusCode::SERVICE_UNAVAILABLE,
                StoreError::Connection(_) | StoreError::Database(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        // Don't expose internal error details to clients
        let message = if status.is_server_error() {
            "internal server error".to_string()
        } else {
            self.to_string()
        };

        (status, message).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
