//! One-time copy of legacy listen dates into the history table
//!
//! Older databases recorded a single `listened_at` per album. On first start
//! against such a database every legacy date becomes a history row. The pass
//! is gated twice: it is skipped once the completion flag is set, and the
//! domain migration itself does nothing if any history already exists.

use crate::{albums, history};
use disco_core::error::Result;
use sqlx::{Row, SqliteConnection, SqlitePool};
use tracing::{debug, info};

const MIGRATED_FLAG: &str = "legacy_history_migrated";

/// Copy legacy dates into the history once; returns how many rows were added
pub async fn migrate_legacy_history(pool: &SqlitePool) -> Result<usize> {
    let mut tx = pool.begin().await?;

    if is_migrated(&mut tx).await? {
        debug!("Legacy listen dates already migrated");
        return Ok(0);
    }

    let mut albums = albums::get_every(&mut tx).await?;
    let entries = disco_core::history::migrate_legacy(&mut albums);
    if entries.is_empty() {
        info!("Legacy history migration skipped: nothing to copy");
    }

    let mut inserted = 0;
    for entry in &entries {
        if history::insert(&mut tx, entry.album_id, entry.owner, entry.date).await? {
            inserted += 1;
        }
    }

    sqlx::query(
        "INSERT INTO app_state (key, value) VALUES (?, 'true')
         ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = datetime('now')",
    )
    .bind(MIGRATED_FLAG)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    if inserted > 0 {
        info!("Migrated {} legacy listen dates into the history", inserted);
    }
    Ok(inserted)
}

async fn is_migrated(conn: &mut SqliteConnection) -> Result<bool> {
    let row = sqlx::query("SELECT value FROM app_state WHERE key = ?")
        .bind(MIGRATED_FLAG)
        .fetch_optional(conn)
        .await?;

    Ok(row.is_some_and(|row| row.get::<String, _>("value") == "true"))
}
