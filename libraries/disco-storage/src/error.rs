/// Storage-specific errors
use thiserror::Error;

/// Result type alias using `StorageError`
pub type Result<T> = std::result::Result<T, StorageError>;

/// Storage error types
#[derive(Error, Debug)]
pub enum StorageError {
    /// Database connection error
    #[error("Database connection error: {0}")]
    Connection(String),

    /// Entity not found
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Unique constraint hit, e.g. a taken username
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Input rejected before reaching the database
    #[error("Invalid input: {0}")]
    Invalid(String),

    /// Migration error
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Database error from `SQLx`
    #[error(transparent)]
    Database(#[from] sqlx::Error),

    /// Error raised by the domain layer
    #[error(transparent)]
    Domain(#[from] disco_core::DiscoError),
}

impl StorageError {
    /// Create a not found error
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }
}

impl From<StorageError> for disco_core::DiscoError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound { entity, id } => Self::NotFound { entity, id },
            StorageError::Conflict(msg) | StorageError::Invalid(msg) => Self::Validation(msg),
            StorageError::Domain(inner) => inner,
            other => Self::storage(other.to_string()),
        }
    }
}
