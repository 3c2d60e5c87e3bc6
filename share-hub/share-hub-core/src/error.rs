//! Error types shared by every manager in the core.
//!
//! Each operation surfaces exactly one [`Error`]; the HTTP layer maps the
//! variants onto status codes one to one.

use thiserror::Error;

/// Result type used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// Malformed or invalid caller input
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// No verified caller identity
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Caller is not the owner of the resource
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Referenced entity or required path segment is absent
    #[error("Not found: {0}")]
    NotFound(String),

    /// Entity already exists (duplicate email on registration)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Store failure or unexpected internal condition
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Failures reported by a [`crate::store::RecordStore`].
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("record not found: {0}")]
    NotFound(String),

    #[error("record already exists: {0}")]
    Conflict(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl From<StoreError> for Error {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(what) => Error::NotFound(what),
            StoreError::Conflict(what) => Error::Conflict(what),
            other => Error::Internal(other.to_string()),
        }
    }
}

impl Error {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound(resource.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Check if this is a client error (4xx equivalent)
    pub fn is_client_error(&self) -> bool {
        !matches!(self, Error::Internal(_))
    }
}
