//! Signaling service error types.
//!
//! All errors map to appropriate HTTP status codes via the `IntoResponse`
//! impl. Error messages returned to clients are intentionally generic to
//! avoid leaking internal details. Actual errors are logged server-side.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Signaling service error type.
///
/// Maps to appropriate HTTP status codes:
/// - NotFound: 404 Not Found
/// - Forbidden: 403 Forbidden
/// - BadRequest: 400 Bad Request
/// - InvalidToken: 401 Unauthorized
/// - Internal: 500 Internal Server Error
#[derive(Debug, Error)]
pub enum SignalingError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Internal server error")]
    Internal,
}

impl SignalingError {
    /// Returns the HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            SignalingError::NotFound(_) => 404,
            SignalingError::Forbidden(_) => 403,
            SignalingError::BadRequest(_) => 400,
            SignalingError::InvalidToken(_) => 401,
            SignalingError::Internal => 500,
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

impl IntoResponse for SignalingError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            SignalingError::NotFound(resource) => {
                (StatusCode::NOT_FOUND, "NOT_FOUND", resource.clone())
            }
            SignalingError::Forbidden(reason) => {
                (StatusCode::FORBIDDEN, "FORBIDDEN", reason.clone())
            }
            SignalingError::BadRequest(reason) => {
                (StatusCode::BAD_REQUEST, "BAD_REQUEST", reason.clone())
            }
            SignalingError::InvalidToken(reason) => {
                (StatusCode::UNAUTHORIZED, "INVALID_TOKEN", reason.clone())
            }
            SignalingError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            ),
        };

        let error_response = ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message,
            },
        };

        let mut response = (status, Json(error_response)).into_response();

        // Add WWW-Authenticate header for 401 responses
        if status == StatusCode::UNAUTHORIZED {
            if let Ok(header_value) =
                "Bearer realm=\"classline-api\", error=\"invalid_token\"".parse()
            {
                response
                    .headers_mut()
                    .insert("WWW-Authenticate", header_value);
            }
        }

        response
    }
}

/// Convert directory errors to SignalingError.
impl From<crate::live_class::DirectoryError> for SignalingError {
    fn from(err: crate::live_class::DirectoryError) -> Self {
        match err {
            crate::live_class::DirectoryError::NotFound => {
                SignalingError::NotFound("Live class not found".to_string())
            }
            crate::live_class::DirectoryError::Unavailable(reason) => {
                // Log actual error server-side, return generic message to client
                tracing::error!(
                    target: "signaling.directory",
                    error = %reason,
                    "Live class directory unavailable"
                );
                SignalingError::Internal
            }
        }
    }
}
