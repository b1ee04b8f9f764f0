//! Disco Storage
//!
//! Multi-user `SQLite` persistence for Disco collections.
//!
//! # Architecture
//!
//! - **Vertical Slicing**: albums, history and users each own their queries
//! - **Snapshots**: albums are always read with their full listening history
//!   and written back in a single transaction
//! - **Legacy data**: databases that predate the history table are migrated
//!   once at startup
//!
//! # Example
//!
//! ```rust,no_run
//! use disco_storage::{LocalStorageContext, create_pool, run_migrations};
//! use disco_core::storage::StorageContext;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = create_pool("sqlite://disco.db").await?;
//! run_migrations(&pool).await?;
//! disco_storage::legacy::migrate_legacy_history(&pool).await?;
//!
//! // Collection of user 1
//! let storage = LocalStorageContext::new(pool, 1);
//! let albums = storage.list_albums().await?;
//! # Ok(())
//! # }
//! ```

mod context;
mod error;

// Vertical slices
pub mod albums;
pub mod history;
pub mod users;

// One-shot data migrations
pub mod legacy;

pub use context::LocalStorageContext;
pub use error::StorageError;

use sqlx::migrate::Migrator;
use sqlx::sqlite::SqlitePool;
use tracing::{debug, info};

// Embed migrations into binary
static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Run database migrations
///
/// This should be called once when the application starts to ensure
/// the database schema is up to date.
///
/// # Errors
///
/// Returns an error if migrations fail to run
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::migrate::MigrateError> {
    MIGRATOR.run(pool).await
}

/// Create a new `SQLite` pool
///
/// # Arguments
///
/// * `database_url` - `SQLite` connection string (e.g., `<sqlite://disco.db>`)
///
/// # Errors
///
/// Returns an error if the connection fails
pub async fn create_pool(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
    use std::str::FromStr;

    debug!("Creating pool with URL: {}", database_url);

    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .foreign_keys(true) // History and albums cascade on delete
        .busy_timeout(std::time::Duration::from_secs(30));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    info!("Database pool ready");
    Ok(pool)
}

/// Connect, apply the schema and migrate legacy listen dates
///
/// # Errors
///
/// Returns an error if the connection, a schema migration or the legacy
/// history migration fails
pub async fn open(database_url: &str) -> Result<SqlitePool, StorageError> {
    let pool = create_pool(database_url)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;
    run_migrations(&pool).await?;
    legacy::migrate_legacy_history(&pool).await?;
    Ok(pool)
}
