//! Event Search — API error types.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use eventsearch_core::error::DomainError;
use serde::Serialize;
use thiserror::Error;

/// Startup and runtime errors for the API server.
#[derive(Debug, Error)]
pub enum AppError {
    /// A required environment variable is missing or invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// Database connection or pool error.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Network binding or I/O error.
    #[error("server error: {0}")]
    Server(#[from] std::io::Error),

    /// Index preparation failed.
    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// JSON body returned for error responses.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Machine-readable error code.
    pub error: &'static str,
    /// Human-readable error message.
    pub message: String,
}

/// HTTP-layer wrapper around `DomainError` that implements `IntoResponse`.
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
            DomainError::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
            DomainError::FormatMismatch { .. } => (StatusCode::BAD_REQUEST, "format_mismatch"),
            DomainError::IndexUnavailable(_) => {
                (StatusCode::SERVICE_UNAVAILABLE, "index_unavailable")
            }
            DomainError::StorageUnavailable(_) => {
                (StatusCode::SERVICE_UNAVAILABLE, "storage_unavailable")
            }
            DomainError::SyncInProgress => (StatusCode::CONFLICT, "sync_in_progress"),
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
    fn test_bad_request_maps_to_400() {
        assert_eq!(
            status_of(DomainError::BadRequest("no mapping for field".into())),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_index_unavailable_maps_to_503() {
        assert_eq!(
            status_of(DomainError::IndexUnavailable("connection refused".into())),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn test_storage_unavailable_maps_to_503() {
        assert_eq!(
            status_of(DomainError::StorageUnavailable("database is locked".into())),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn test_sync_in_progress_maps_to_409() {
        assert_eq!(status_of(DomainError::SyncInProgress), StatusCode::CONFLICT);
    }

    #[test]
    fn test_startup_failures_convert_into_app_error() {
        let domain: AppError = DomainError::IndexUnavailable("connection refused".into()).into();
        let server: AppError = std::io::Error::from(std::io::ErrorKind::AddrInUse).into();
        let database: AppError = sqlx::Error::PoolClosed.into();

        assert!(matches!(domain, AppError::Domain(DomainError::IndexUnavailable(_))));
        assert_eq!(domain.to_string(), "search engine unavailable: connection refused");
        assert!(matches!(server, AppError::Server(_)));
        assert!(matches!(database, AppError::Database(_)));
    }

    #[test]
    fn test_infrastructure_maps_to_500() {
        assert_eq!(
            status_of(DomainError::Infrastructure("bad gateway".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
