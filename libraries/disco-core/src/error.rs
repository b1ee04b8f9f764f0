/// Core error types for Disco
use thiserror::Error;

use crate::types::AlbumId;

/// Result type alias using `DiscoError`
pub type Result<T> = std::result::Result<T, DiscoError>;

/// Core error type for Disco
///
/// Every operation that returns one of these leaves the album it was
/// called on exactly as it was before the call.
#[derive(Error, Debug)]
pub enum DiscoError {
    /// Rejected input: out-of-range rating, empty favorite name, malformed date
    #[error("Validation error: {0}")]
    Validation(String),

    /// Entity not found (or not owned by the caller)
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Album not found (or not owned by the caller)
    #[error("Album not found: {0}")]
    AlbumNotFound(AlbumId),

    /// Third-party catalog failure
    #[error("External service error: {0}")]
    ExternalService(String),

    /// Storage-related errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Database errors (for storage implementations)
    #[error("Database error: {0}")]
    Database(String),

    /// Serialization errors
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}

impl DiscoError {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a not found error
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Create a storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Create an external service error
    pub fn external(msg: impl Into<String>) -> Self {
        Self::ExternalService(msg.into())
    }

    /// Whether this error was caused by rejected input
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Whether this error means the entity does not exist for the caller
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::AlbumNotFound(_))
    }
}

#[cfg(feature = "sqlx-support")]
impl From<sqlx::Error> for DiscoError {
    fn from(err: sqlx::Error) -> Self {
        Self::Database(err.to_string())
    }
}
