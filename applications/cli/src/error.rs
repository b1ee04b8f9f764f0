/// CLI error types
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error(transparent)]
    Domain(#[from] disco_core::DiscoError),

    #[error(transparent)]
    Storage(#[from] disco_storage::StorageError),

    #[error(transparent)]
    Catalog(#[from] disco_catalog::CatalogError),
}

impl From<config::ConfigError> for CliError {
    fn from(err: config::ConfigError) -> Self {
        CliError::Config(err.to_string())
    }
}
