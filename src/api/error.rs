//! API Error Types
//!
//! Defines error types for the API layer and implements conversion
//! to HTTP responses with appropriate status codes.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::actions::ActionError;
use crate::link::LinkError;
use crate::rsvp::ValidationError;
use crate::tracker::TrackerError;

/// API error types
#[derive(Error, Debug)]
pub enum ApiError {
    /// RSVP form failed validation; the message is shown to the guest as is
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// Guest link could not be built or read
    #[error("{0}")]
    Link(#[from] LinkError),

    #[error("{0}")]
    Tracker(#[from] TrackerError),

    /// Malformed request parameters
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ActionError> for ApiError {
    fn from(err: ActionError) -> Self {
        match err {
            ActionError::Link(e) => ApiError::Link(e),
            ActionError::Validation(e) => ApiError::Validation(e),
            ActionError::Tracker(e) => ApiError::Tracker(e),
        }
    }
}

/// Error response body
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
    pub request_id: String,
}

/// Error details
#[derive(Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

impl ApiError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            ApiError::Link(_) => (StatusCode::BAD_REQUEST, "INVALID_LINK"),
            ApiError::Tracker(TrackerError::NoData) => (StatusCode::NOT_FOUND, "NO_DATA"),
            ApiError::Tracker(_) => (StatusCode::INTERNAL_SERVER_ERROR, "TRACKER_ERROR"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
            ApiError::Io(_) => (StatusCode::INTERNAL_SERVER_ERROR, "IO_ERROR"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let request_id = uuid::Uuid::new_v4().to_string();

        if status.is_server_error() {
            tracing::error!(
                request_id = %request_id,
                error_code = %code,
                error_message = %self,
                "API error occurred"
            );
        } else {
            tracing::warn!(
                request_id = %request_id,
                error_code = %code,
                error_message = %self,
                "Request rejected"
            );
        }

        let body = ErrorResponse {
            error: ErrorBody {
                code: code.to_string(),
                message: self.to_string(),
            },
            request_id,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;
