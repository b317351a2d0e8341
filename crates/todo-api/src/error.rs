//! Todo API — startup failures and the HTTP error envelope.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;
use todo_core::error::DomainError;

/// Reasons the backend fails to start or stops serving.
#[derive(Debug, Error)]
pub enum AppError {
    /// An environment variable such as `DATABASE_URL` or `PORT` is unusable.
    #[error("invalid backend configuration: {0}")]
    Config(String),

    /// The todo database stayed unreachable through every retry.
    #[error("todo database unavailable: {0}")]
    Database(#[from] sqlx::Error),

    /// The `todos` table could not be brought up to date.
    #[error("todo schema migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// The listener could not bind or the server loop failed.
    #[error("http listener failed: {0}")]
    Server(#[from] std::io::Error),
}

/// `{"error": code, "message": text}`, the body of every non-2xx todo
/// response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Stable code: `validation_error`, `not_found`, `infrastructure_error`
    /// or `not_ready`.
    pub error: &'static str,
    /// What went wrong, for the caller.
    pub message: String,
}

/// A failed todo command or query, rendered as a 400/404/500 response.
#[derive(Debug)]
pub struct ApiError(pub DomainError);

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code) = match &self.0 {
            DomainError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            DomainError::Validation(_) => (StatusCode::BAD_REQUEST, "validation_error"),
            DomainError::Infrastructure(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "infrastructure_error")
            }
        };

        let body = ErrorBody {
            error: error_code,
            message: self.0.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    fn status_of(err: DomainError) -> StatusCode {
        let response = ApiError(err).into_response();
        response.status()
    }

    #[test]
    fn test_not_found_maps_to_404() {
        assert_eq!(status_of(DomainError::NotFound(7)), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_validation_maps_to_400() {
        assert_eq!(
            status_of(DomainError::Validation("too long".into())),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_infrastructure_maps_to_500() {
        assert_eq!(
            status_of(DomainError::Infrastructure("db down".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
