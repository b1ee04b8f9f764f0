//! Error types for the catalog client.

use thiserror::Error;

/// Errors that can occur when talking to the catalog.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Catalog answered with a non-success status
    #[error("Catalog error ({status}): {message}")]
    BadStatus { status: u16, message: String },

    /// Catalog reported an error in the response body
    #[error("Catalog API error {code}: {message}")]
    Api { code: i64, message: String },

    /// Invalid base URL
    #[error("Invalid catalog URL: {0}")]
    InvalidUrl(String),

    /// Failed to parse the response
    #[error("Failed to parse response: {0}")]
    ParseError(String),
}

/// Result type for catalog operations.
pub type Result<T> = std::result::Result<T, CatalogError>;

impl From<CatalogError> for disco_core::DiscoError {
    fn from(err: CatalogError) -> Self {
        Self::external(err.to_string())
    }
}
