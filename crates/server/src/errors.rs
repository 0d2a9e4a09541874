use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use common::types::ErrorBody;
use service::errors::ServiceError;
use service::observability::STORAGE_ERRORS_TOTAL;
use thiserror::Error;
use tracing::error;

/// JSON error response rendered as `{"error": "..."}`.
#[derive(Debug)]
pub struct JsonApiError {
    pub status: StatusCode,
    pub message: String,
}

impl JsonApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self { status, message: message.into() }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, "employee not found")
    }

    /// Map a service failure. `context` prefixes storage faults, e.g.
    /// `error creating record: storage error: cannot write ...`.
    pub fn from_service(context: &str, e: ServiceError) -> Self {
        match e {
            ServiceError::Validation(msg) => Self::bad_request(msg),
            ServiceError::NotFound(_) => Self::not_found(),
            e @ (ServiceError::Storage(_) | ServiceError::Corrupt { .. }) => {
                STORAGE_ERRORS_TOTAL.inc();
                error!(err = %e, "{context} failed");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, format!("{context}: {e}"))
            }
        }
    }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorBody::new(self.message))).into_response()
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("storage unavailable: {0}")]
    Storage(#[from] ServiceError),
    #[error(transparent)]
    Any(#[from] anyhow::Error),
}
