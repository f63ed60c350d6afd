//! Maps domain `AppError` to HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use burnlink_core::error::{AppError, ErrorKind};

/// One message for every unavailable link, so callers cannot tell a
/// consumed link from an unknown one.
pub const LINK_GONE_MESSAGE: &str = "This link is no longer available";

/// Standard API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// Machine-readable error code.
    pub error: String,
    /// Human-readable message.
    pub message: String,
    /// Optional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Handler error. Wraps [`AppError`] so it can be turned into a response.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl ApiError {
    /// HTTP status and machine-readable code for this error.
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self.0.kind {
            ErrorKind::InvalidInput(reason) => (StatusCode::BAD_REQUEST, reason.code()),
            ErrorKind::NotFound | ErrorKind::AlreadyDestroyed => (StatusCode::GONE, "LINK_GONE"),
            ErrorKind::StoreUnavailable => (StatusCode::SERVICE_UNAVAILABLE, "STORE_UNAVAILABLE"),
            ErrorKind::Conflict => (StatusCode::CONFLICT, "CONFLICT"),
            ErrorKind::NotificationFailure
            | ErrorKind::Configuration
            | ErrorKind::Serialization
            | ErrorKind::Internal => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code) = self.status_and_code();

        let message = match self.0.kind {
            ErrorKind::NotFound | ErrorKind::AlreadyDestroyed => LINK_GONE_MESSAGE.to_string(),
            ErrorKind::InvalidInput(_) | ErrorKind::Conflict => self.0.message.clone(),
            ErrorKind::StoreUnavailable => {
                tracing::warn!(error = %self.0, "Link store unavailable");
                "The link store is temporarily unavailable".to_string()
            }
            _ => {
                tracing::error!(error = %self.0, "Internal server error");
                "Internal server error".to_string()
            }
        };

        let body = ApiErrorResponse {
            error: error_code.to_string(),
            message,
            details: None,
        };

        (status, Json(body)).into_response()
    }
}
