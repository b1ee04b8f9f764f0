//! Collection owners

use crate::error::{Result, StorageError};
use disco_core::types::{User, UserId};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use tracing::info;

fn from_row(row: &SqliteRow) -> User {
    User {
        id: row.get("id"),
        username: row.get("username"),
        created_at: row.get("created_at"),
    }
}

/// Create a user
///
/// # Errors
///
/// `Invalid` for a blank username, `Conflict` when it is already taken
pub async fn create(pool: &SqlitePool, username: &str) -> Result<User> {
    let username = username.trim();
    if username.is_empty() {
        return Err(StorageError::Invalid("username is required".to_string()));
    }

    let result = sqlx::query("INSERT INTO users (username) VALUES (?)")
        .bind(username)
        .execute(pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                StorageError::Conflict(format!("username {username:?} is taken"))
            }
            other => other.into(),
        })?;

    let id = result.last_insert_rowid();
    info!(user_id = id, "Created user {}", username);

    get_by_id(pool, id)
        .await?
        .ok_or_else(|| StorageError::not_found("User", id.to_string()))
}

/// Get all users
pub async fn get_all(pool: &SqlitePool) -> Result<Vec<User>> {
    let rows = sqlx::query("SELECT id, username, created_at FROM users ORDER BY username")
        .fetch_all(pool)
        .await?;

    Ok(rows.iter().map(from_row).collect())
}

pub async fn get_by_id(pool: &SqlitePool, id: UserId) -> Result<Option<User>> {
    let row = sqlx::query("SELECT id, username, created_at FROM users WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(row.as_ref().map(from_row))
}

pub async fn get_by_username(pool: &SqlitePool, username: &str) -> Result<Option<User>> {
    let row = sqlx::query("SELECT id, username, created_at FROM users WHERE username = ?")
        .bind(username.trim())
        .fetch_optional(pool)
        .await?;

    Ok(row.as_ref().map(from_row))
}

/// Delete a user together with their albums and listening history
pub async fn delete(pool: &SqlitePool, id: UserId) -> Result<()> {
    let result = sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(StorageError::not_found("User", id.to_string()));
    }

    info!(user_id = id, "Deleted user");
    Ok(())
}
