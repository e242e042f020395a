//! Error types for the HTTP API.

use std::error::Error;
use std::fmt;

use serde_json::{json, Value};

use crate::data::ValidationError;
use crate::repository::RepositoryError;
use crate::store::StoreError;

/// Every failure the API can report, already sorted by HTTP status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Malformed body, failed validation, or purchase of an unavailable item.
    BadRequest(String),
    NotFound(String),
    MethodNotAllowed(String),
    UnsupportedMediaType(String),
    /// The store could not be reached in time.
    Unavailable(String),
    Internal(String),
}

impl ApiError {
    /// Map this error to an HTTP status code.
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::BadRequest(_) => 400,
            ApiError::NotFound(_) => 404,
            ApiError::MethodNotAllowed(_) => 405,
            ApiError::UnsupportedMediaType(_) => 415,
            ApiError::Unavailable(_) => 500,
            ApiError::Internal(_) => 500,
        }
    }

    /// Short reason phrase used in the `error` field of the body.
    pub fn reason(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "Bad Request",
            ApiError::NotFound(_) => "Not Found",
            ApiError::MethodNotAllowed(_) => "Method not Allowed",
            ApiError::UnsupportedMediaType(_) => "Unsupported media type",
            ApiError::Unavailable(_) | ApiError::Internal(_) => "Internal Server Error",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(msg)
            | ApiError::NotFound(msg)
            | ApiError::MethodNotAllowed(msg)
            | ApiError::UnsupportedMediaType(msg)
            | ApiError::Unavailable(msg)
            | ApiError::Internal(msg) => msg,
        }
    }

    /// Server faults, as opposed to outcomes the caller can fix.
    pub fn is_server_error(&self) -> bool {
        self.status_code() >= 500
    }

    /// The `{status, error, message}` body shared by every error response.
    pub fn body(&self) -> Value {
        json!({
            "status": self.status_code(),
            "error": self.reason(),
            "message": self.message(),
        })
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}: {}", self.status_code(), self.reason(), self.message())
    }
}

impl Error for ApiError {}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Validation(msg) => ApiError::BadRequest(msg),
            RepositoryError::NotFound(_) => ApiError::NotFound(err.to_string()),
            RepositoryError::Conflict(_) => ApiError::BadRequest(err.to_string()),
            RepositoryError::Store(store) => store.into(),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Unavailable(_) => ApiError::Unavailable(err.to_string()),
            StoreError::Corrupt(_) => ApiError::Internal(err.to_string()),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::BadRequest(err.message().to_string())
    }
}
