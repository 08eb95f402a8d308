//! API error handling
//!
//! Consistent JSON error responses across all endpoints.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::error;

/// Structured JSON error response
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_after_secs: Option<u64>,
}

/// API error type that converts to JSON responses
#[derive(Debug)]
pub enum ApiError {
    /// Resource not found
    NotFound(String),
    /// Completion requested before the gate holds
    Gate(String),
    /// Benign repeat of an already-applied operation
    AlreadyCompleted(String),
    /// Transient store failure, worth retrying
    Unavailable(String),
    /// Request payload failed validation
    Validation(String),
    /// Internal server error
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, response) = match self {
            ApiError::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                ErrorResponse {
                    error: msg,
                    code: Some("not_found".to_string()),
                    retry_after_secs: None,
                },
            ),
            ApiError::Gate(msg) => (
                StatusCode::CONFLICT,
                ErrorResponse {
                    error: msg,
                    code: Some("gate_not_satisfied".to_string()),
                    retry_after_secs: None,
                },
            ),
            ApiError::AlreadyCompleted(msg) => (
                StatusCode::CONFLICT,
                ErrorResponse {
                    error: msg,
                    code: Some("already_completed".to_string()),
                    retry_after_secs: None,
                },
            ),
            ApiError::Unavailable(msg) => {
                error!("Store unavailable: {}", msg);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    ErrorResponse {
                        error: "Temporarily unavailable, try again".to_string(),
                        code: Some("store_unavailable".to_string()),
                        retry_after_secs: Some(5),
                    },
                )
            }
            ApiError::Validation(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorResponse {
                    error: msg,
                    code: Some("validation_error".to_string()),
                    retry_after_secs: None,
                },
            ),
            ApiError::Internal(msg) => {
                error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse {
                        error: "Internal server error".to_string(),
                        code: Some("internal_error".to_string()),
                        retry_after_secs: None,
                    },
                )
            }
        };

        (status, Json(response)).into_response()
    }
}

impl From<common::Error> for ApiError {
    fn from(err: common::Error) -> Self {
        match err {
            common::Error::NotFound(msg) => ApiError::NotFound(msg),
            common::Error::GateNotSatisfied(msg) => ApiError::Gate(msg),
            common::Error::AlreadyCompleted(id) => {
                ApiError::AlreadyCompleted(format!("Level {id} is already completed"))
            }
            common::Error::StoreUnavailable(msg) => ApiError::Unavailable(msg),
            common::Error::Conflict(msg) => ApiError::AlreadyCompleted(msg),
            common::Error::Catalog(msg) => ApiError::Validation(msg),
            common::Error::Config(msg) | common::Error::Internal(msg) => ApiError::Internal(msg),
        }
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

/// Extension trait to convert Option to NotFound
pub trait OptionExt<T> {
    fn not_found(self, resource: impl Into<String>) -> Result<T, ApiError>;
}

impl<T> OptionExt<T> for Option<T> {
    fn not_found(self, resource: impl Into<String>) -> Result<T, ApiError> {
        self.ok_or_else(|| ApiError::NotFound(resource.into()))
    }
}
