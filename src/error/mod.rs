//! Error handling module.
//!
//! Unified error handling with HTTP status code mapping. Every failed request
//! answers with `{"error": <message>, "code": <int>}`.

pub mod codes;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

pub use codes::{ErrorCategory, ErrorCode};

/// Application-level error type.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Invalid request parameters.
    #[error("{0}")]
    BadRequest(String),

    /// URL rejected by the shortener.
    #[error("invalid url")]
    InvalidUrl,

    /// Unknown user id.
    #[error("User not found")]
    UserNotFound(String),

    /// Unknown short code.
    #[error("No short URL found")]
    ShortUrlNotFound(u64),

    /// Username already registered.
    #[error("Username already taken")]
    UsernameTaken(String),

    /// Short code collided with an existing record.
    #[error("Short code conflict: {0}")]
    ShortCodeConflict(u64),

    /// Storage backend error.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Get the error code for this error.
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::BadRequest(_) => ErrorCode::BAD_REQUEST,
            Self::InvalidUrl => ErrorCode::INVALID_URL,
            Self::UserNotFound(_) => ErrorCode::USER_NOT_FOUND,
            Self::ShortUrlNotFound(_) => ErrorCode::SHORT_URL_NOT_FOUND,
            Self::UsernameTaken(_) => ErrorCode::USERNAME_TAKEN,
            Self::ShortCodeConflict(_) => ErrorCode::SHORT_CODE_CONFLICT,
            Self::Storage(_) => ErrorCode::STORAGE_ERROR,
            Self::Internal(_) => ErrorCode::INTERNAL_ERROR,
        }
    }

    /// Get the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) | Self::InvalidUrl => StatusCode::BAD_REQUEST,
            Self::UserNotFound(_) | Self::ShortUrlNotFound(_) => StatusCode::NOT_FOUND,
            Self::UsernameTaken(_) | Self::ShortCodeConflict(_) => StatusCode::CONFLICT,
            Self::Storage(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to hand back to the client.
    ///
    /// Server-side failures keep their cause in the logs only.
    #[must_use]
    pub fn public_message(&self) -> String {
        if self.status_code().is_server_error() {
            "Internal server error".to_string()
        } else {
            self.to_string()
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_code = self.error_code();
        let code = error_code.as_i32();

        if status.is_server_error() {
            tracing::error!(
                error_code = code,
                category = %error_code.category(),
                status = %status,
                error = %self,
                "Request failed"
            );
        } else {
            tracing::debug!(
                error_code = code,
                category = %error_code.category(),
                status = %status,
                error = %self,
                "Request rejected"
            );
        }

        let body = Json(json!({
            "error": self.public_message(),
            "code": code,
        }));

        (status, body).into_response()
    }
}

/// Storage-specific error type.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Lock acquisition failed.
    #[error("Failed to acquire lock: {0}")]
    LockFailed(String),

    /// File I/O error.
    #[error("File I/O error: {0}")]
    FileIO(String),

    /// Data not found.
    #[error("Data not found: {0}")]
    NotFound(String),

    /// Sequence cannot advance any further.
    #[error("Sequence exhausted: {0}")]
    SequenceExhausted(String),

    /// Unique index violation.
    #[error("Duplicate {field}: {value}")]
    Duplicate {
        /// Indexed field that collided.
        field: &'static str,
        /// Value that was already present.
        value: String,
    },

    /// Backend not available.
    #[error("Storage backend unavailable")]
    Unavailable,
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        Self::FileIO(err.to_string())
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Result type alias using `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Result type alias using `StorageError`.
pub type StorageResult<T> = std::result::Result<T, StorageError>;
