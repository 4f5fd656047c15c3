//! Error handling for the codeshelf HTTP layer

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Error response format shared by every failing endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorBody {
    pub message: String,
    pub error: serde_json::Value,
}

/// Application error types that map to HTTP responses
#[derive(Error, Debug)]
pub enum AppError {
    /// The request body could not be read as the expected payload.
    #[error("{message}: {reason}")]
    Malformed { message: String, reason: String },

    #[error("not found: {message}")]
    NotFound { message: String, code: String },

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Create a malformed-input error carrying the parser's complaint
    pub fn malformed(message: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self::Malformed {
            message: message.into(),
            reason: reason.to_string(),
        }
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
            code: "not_found".to_string(),
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            AppError::Malformed { .. } | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let error_id = Uuid::now_v7();
        let status = self.status();

        let body = match self {
            AppError::Malformed { message, reason } => {
                tracing::warn!(error_id = %error_id, %reason, "{message}");
                ErrorBody {
                    message,
                    error: serde_json::Value::String(reason),
                }
            }
            AppError::NotFound { message, code } => ErrorBody {
                message,
                error: serde_json::Value::String(code),
            },
            AppError::Internal(e) => {
                tracing::error!(error_id = %error_id, error = ?e, "internal error");
                // Internal detail stays in the logs for release builds
                let detail = if cfg!(debug_assertions) {
                    e.to_string()
                } else {
                    format!("error id {error_id}")
                };
                ErrorBody {
                    message: "An internal server error occurred".to_string(),
                    error: serde_json::Value::String(detail),
                }
            }
        };

        tracing::error!(
            error_id = %error_id,
            status_code = %status.as_u16(),
            "Request error"
        );

        (status, Json(body)).into_response()
    }
}
