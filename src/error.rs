use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::store::StoreError;

/// Message sent for every data-access failure. The cause only reaches the logs.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// Duplicate identifier. The booking API reports this as a 400.
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::Conflict(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match self {
            ApiError::Validation(message) => {
                tracing::debug!("Rejected request: {}", message);
                message
            }
            ApiError::NotFound(message) => {
                tracing::debug!("Resource not found: {}", message);
                message
            }
            ApiError::Conflict(message) => {
                tracing::debug!("Conflicting request: {}", message);
                message
            }
            ApiError::Store(err) => {
                match err {
                    StoreError::Unavailable(ref cause) => {
                        tracing::error!("PostgreSQL unavailable: {}", cause)
                    }
                    StoreError::Constraint(ref cause) => {
                        tracing::error!("PostgreSQL constraint violation: {}", cause)
                    }
                    StoreError::Query(ref cause) => {
                        tracing::error!("PostgreSQL query failed: {}", cause)
                    }
                }
                INTERNAL_ERROR_MESSAGE.to_string()
            }
        };

        (status, Json(json!({ "message": message }))).into_response()
    }
}

/// Message for bodies that are not a JSON object. Parser detail stays in the logs.
pub const INVALID_BODY_MESSAGE: &str = "Invalid JSON body";

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!("Rejected request body: {}", rejection.body_text());
        ApiError::Validation(INVALID_BODY_MESSAGE.to_string())
    }
}

// Result type alias for convenience
pub type ApiResult<T> = Result<T, ApiError>;
