// HTTP API Error Types
use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};

use crate::guestbook::GuestbookError;

/// HTTP API error with appropriate status codes and client-friendly messages.
///
/// Client errors (4xx) answer with the bare message as `text/plain`; server
/// errors answer with a JSON `{"error": ...}` body that never carries
/// internal detail.
#[derive(Debug)]
pub enum ApiError {
    // 400 Bad Request
    BadRequest(String),

    // 403 Forbidden
    Forbidden(String),

    // 404 Not Found
    NotFound(String),

    // 500 Internal Server Error
    InternalServerError(String),
}

impl ApiError {
    /// Get HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get client-safe error message
    pub fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(msg) => msg,
            ApiError::Forbidden(msg) => msg,
            ApiError::NotFound(msg) => msg,
            ApiError::InternalServerError(msg) => msg,
        }
    }

    /// Convert to JSON response body
    pub fn to_json(&self) -> Value {
        json!({ "error": self.message() })
    }

    pub fn is_server_error(&self) -> bool {
        self.status_code().is_server_error()
    }

    /// Map a domain failure, using `failure` as the public message for
    /// anything that is not the caller's fault
    pub fn from_guestbook(err: GuestbookError, failure: &str) -> Self {
        match err {
            GuestbookError::Validation(msg) => ApiError::bad_request(msg),
            GuestbookError::Forbidden(msg) => ApiError::forbidden(msg),
            GuestbookError::NotFound => ApiError::not_found("Entry not found"),
            GuestbookError::Store(e) => {
                // Log the real error but return generic message
                tracing::error!("Store error: {}", e);
                ApiError::internal_server_error(failure)
            }
            GuestbookError::Serialization(e) => {
                tracing::error!("Entry serialization error: {}", e);
                ApiError::internal_server_error(failure)
            }
            GuestbookError::KeyExhausted => {
                tracing::error!("Entry key generation exhausted");
                ApiError::internal_server_error(failure)
            }
        }
    }
}

// Static constructor methods
impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        ApiError::Forbidden(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn internal_server_error(message: impl Into<String>) -> Self {
        ApiError::InternalServerError(message.into())
    }
}

impl From<GuestbookError> for ApiError {
    fn from(err: GuestbookError) -> Self {
        ApiError::from_guestbook(err, "An error occurred while processing your request")
    }
}

// Standard error trait implementations
impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if self.is_server_error() {
            (status, Json(self.to_json())).into_response()
        } else {
            (
                status,
                [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
                self.message().to_string(),
            )
                .into_response()
        }
    }
}
