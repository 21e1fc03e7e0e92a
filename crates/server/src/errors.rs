use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use service::errors::{ServiceError, StoreError};
use thiserror::Error;
use tracing::{error, warn};

use crate::observability::STORE_ERRORS_TOTAL;

/// Request-level failures, rendered as plain-text bodies.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Undecodable or invalid payload.
    #[error("{0}")]
    Validation(String),
    #[error("Status not found requestId:{request_id}")]
    NotFound { request_id: String },
    #[error("Unable to set requestId:{request_id}")]
    WriteRejected { request_id: String },
    #[error("{0}")]
    Store(#[from] StoreError),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound { .. } | ApiError::WriteRejected { .. } => StatusCode::BAD_REQUEST,
            ApiError::Validation(_) | ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::Validation(msg) => ApiError::Validation(msg),
            ServiceError::Store(e) => ApiError::Store(e),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let msg = self.to_string();
        match &self {
            ApiError::Store(_) => {
                STORE_ERRORS_TOTAL.inc();
                error!(status = status.as_u16(), error = %msg, "store failure");
            }
            ApiError::Validation(_) => error!(status = status.as_u16(), error = %msg, "invalid request"),
            _ => warn!(status = status.as_u16(), error = %msg, "request failed"),
        }
        (status, msg).into_response()
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("status store unavailable: {0}")]
    Store(#[from] StoreError),
}
