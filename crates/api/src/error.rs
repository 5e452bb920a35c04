//! API and Server Error Types

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use inference_engine::{ErrorKind, InferenceError};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

/// Message returned for every internal failure
pub const INTERNAL_ERROR_DETAIL: &str = "An internal error occurred during prediction.";

/// Error body, shaped like `{"detail": "..."}`
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub detail: String,
}

/// Per-request errors translated into HTTP responses
#[derive(Debug, Error)]
pub enum ApiError {
    /// Caller input failed validation
    #[error("{0}")]
    BadRequest(String),

    /// Body could not be decoded into the request type
    #[error("{detail}")]
    Rejected { status: StatusCode, detail: String },

    /// Anything else; details are logged, never returned
    #[error("{0}")]
    Internal(String),
}

impl From<InferenceError> for ApiError {
    fn from(err: InferenceError) -> Self {
        match err.kind() {
            ErrorKind::InvalidInput => ApiError::BadRequest(err.to_string()),
            ErrorKind::Configuration | ErrorKind::Internal => ApiError::Internal(err.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Rejected {
            status: rejection.status(),
            detail: rejection.body_text(),
        }
    }
}

impl ApiError {
    /// HTTP status for this error
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Rejected { status, .. } => *status,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = match self {
            ApiError::BadRequest(detail) | ApiError::Rejected { detail, .. } => {
                warn!("Rejected prediction request: {}", detail);
                detail
            }
            ApiError::Internal(cause) => {
                error!("An unexpected error occurred: {}", cause);
                INTERNAL_ERROR_DETAIL.to_string()
            }
        };
        (status, Json(ErrorBody { detail })).into_response()
    }
}

/// Fatal errors while starting or running the server
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Failed to load settings: {0}")]
    Settings(#[from] config::ConfigError),
    #[error("Failed to initialize predictor: {0}")]
    Startup(#[from] InferenceError),
    #[error("Failed to initialize logging: {0}")]
    Logging(String),
    #[error("Invalid rate limit: {0}")]
    RateLimit(String),
    #[error("Server I/O error: {0}")]
    Io(#[from] std::io::Error),
}
