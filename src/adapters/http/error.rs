//! JSON error body shared by every endpoint.
//!
//! # HTTP Status Mapping
//!
//! | ErrorCode | HTTP Status |
//! |-----------|-------------|
//! | ValidationFailed | 400 |
//! | Unauthorized | 401 |
//! | InsufficientCredits | 402 |
//! | ProfileNotFound | 404 |
//! | Conflict | 409 |
//! | DatabaseError / InternalError | 500 |

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::application::RevealError;
use crate::domain::foundation::{DomainError, ErrorCode};

/// Error body: `{ "error_code": ..., "message": ..., "details": ... }`.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error_code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            error_code: code.to_string(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationFailed, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

pub fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::ValidationFailed => StatusCode::BAD_REQUEST,
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::InsufficientCredits => StatusCode::PAYMENT_REQUIRED,
        ErrorCode::ProfileNotFound => StatusCode::NOT_FOUND,
        ErrorCode::Conflict => StatusCode::CONFLICT,
        ErrorCode::DatabaseError | ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Converts a port-level error into a response.
///
/// Infrastructure messages are replaced with a generic retry hint; the cause
/// is already in the log.
pub fn domain_error_response(error: DomainError) -> Response {
    let status = status_for(error.code);
    let body = if error.is_infrastructure() {
        ErrorResponse::internal("Temporary failure, please retry")
    } else if error.details.is_empty() {
        ErrorResponse::new(error.code, error.message)
    } else {
        let details = serde_json::to_value(&error.details).unwrap_or_default();
        ErrorResponse::new(error.code, error.message).with_details(details)
    };
    (status, Json(body)).into_response()
}

impl IntoResponse for RevealError {
    fn into_response(self) -> Response {
        let status = status_for(self.code());
        let body = match &self {
            RevealError::InsufficientCredits {
                required,
                available,
            } => ErrorResponse::new(self.code(), self.message()).with_details(
                serde_json::json!({ "required": required, "available": available }),
            ),
            RevealError::TooManyListings { requested, max } => {
                ErrorResponse::new(self.code(), self.message())
                    .with_details(serde_json::json!({ "requested": requested, "max": max }))
            }
            RevealError::ValidationFailed { field, .. } => {
                ErrorResponse::new(self.code(), self.message())
                    .with_details(serde_json::json!({ "field": field }))
            }
            RevealError::ProfileNotFound => ErrorResponse::new(self.code(), self.message()),
            RevealError::Infrastructure(_) => {
                ErrorResponse::internal("Temporary failure, please retry")
            }
        };
        (status, Json(body)).into_response()
    }
}
