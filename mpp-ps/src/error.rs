//! Error types for mpp-ps
//!
//! Request-scoped failures only. Artifact loading happens before the
//! server starts listening, so a load failure never reaches this type; it
//! aborts startup instead.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Input could not be scaled (422)
    #[error("Transform error: {0}")]
    Transform(String),

    /// Model could not score the scaled input (422)
    #[error("Prediction error: {0}")]
    Prediction(String),

    /// Internal server error (500)
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<mpp_common::Error> for ApiError {
    fn from(err: mpp_common::Error) -> Self {
        match err {
            mpp_common::Error::Transform(msg) => ApiError::Transform(msg),
            mpp_common::Error::Prediction(msg) => ApiError::Prediction(msg),
            // Load and config failures are startup concerns; seeing one
            // here means something is badly wrong with the process state.
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match self {
            ApiError::Transform(msg) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "TRANSFORM_ERROR", msg)
            }
            ApiError::Prediction(msg) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "PREDICTION_ERROR", msg)
            }
            ApiError::Internal(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", msg)
            }
        };

        let body = Json(json!({
            "error": {
                "code": error_code,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
