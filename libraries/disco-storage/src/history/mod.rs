//! Listening-history rows
//!
//! One row per (album, day). Dates are stored as `YYYY-MM-DD` text so they
//! sort and compare as calendar days.

use chrono::NaiveDate;
use disco_core::{
    error::Result,
    history::HistoryDiff,
    types::{AlbumId, UserId},
    DiscoError, ListeningHistory,
};
use sqlx::{Row, SqliteConnection, SqlitePool};
use std::collections::HashMap;

const DAY_FORMAT: &str = "%Y-%m-%d";

pub(crate) fn format_day(date: NaiveDate) -> String {
    date.format(DAY_FORMAT).to_string()
}

fn parse_day(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, DAY_FORMAT)
        .map_err(|e| DiscoError::Database(format!("bad listened_on value {raw:?}: {e}")))
}

/// History of one album
pub async fn get_for_album(conn: &mut SqliteConnection, album_id: AlbumId) -> Result<ListeningHistory> {
    let rows = sqlx::query("SELECT listened_on FROM listening_history WHERE album_id = ?")
        .bind(album_id)
        .fetch_all(conn)
        .await?;

    rows.iter()
        .map(|row| parse_day(&row.get::<String, _>("listened_on")))
        .collect()
}

/// Histories of every album of `owner`, keyed by album
pub async fn get_for_owner(
    conn: &mut SqliteConnection,
    owner: UserId,
) -> Result<HashMap<AlbumId, ListeningHistory>> {
    let rows = sqlx::query("SELECT album_id, listened_on FROM listening_history WHERE user_id = ?")
        .bind(owner)
        .fetch_all(conn)
        .await?;
    group(&rows)
}

/// Histories of every album in the database, keyed by album
pub async fn get_everything(conn: &mut SqliteConnection) -> Result<HashMap<AlbumId, ListeningHistory>> {
    let rows = sqlx::query("SELECT album_id, listened_on FROM listening_history")
        .fetch_all(conn)
        .await?;
    group(&rows)
}

fn group(rows: &[sqlx::sqlite::SqliteRow]) -> Result<HashMap<AlbumId, ListeningHistory>> {
    let mut histories: HashMap<AlbumId, ListeningHistory> = HashMap::new();
    for row in rows {
        let date = parse_day(&row.get::<String, _>("listened_on"))?;
        histories.entry(row.get("album_id")).or_default().add(date);
    }
    Ok(histories)
}

/// Record `date`; an already recorded day is left alone
pub async fn insert(
    conn: &mut SqliteConnection,
    album_id: AlbumId,
    owner: UserId,
    date: NaiveDate,
) -> Result<bool> {
    let result = sqlx::query(
        "INSERT OR IGNORE INTO listening_history (user_id, album_id, listened_on)
         VALUES (?, ?, ?)",
    )
    .bind(owner)
    .bind(album_id)
    .bind(format_day(date))
    .execute(conn)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn delete(conn: &mut SqliteConnection, album_id: AlbumId, date: NaiveDate) -> Result<()> {
    sqlx::query("DELETE FROM listening_history WHERE album_id = ? AND listened_on = ?")
        .bind(album_id)
        .bind(format_day(date))
        .execute(conn)
        .await?;
    Ok(())
}

/// Write the inserts and deletes of `diff`
pub async fn apply_diff(
    conn: &mut SqliteConnection,
    album_id: AlbumId,
    owner: UserId,
    diff: &HistoryDiff,
) -> Result<()> {
    for date in &diff.removed {
        delete(&mut *conn, album_id, *date).await?;
    }
    for date in &diff.added {
        insert(&mut *conn, album_id, owner, *date).await?;
    }
    Ok(())
}

/// Total number of history rows
pub async fn count(pool: &SqlitePool) -> Result<i64> {
    let row = sqlx::query("SELECT COUNT(*) AS count FROM listening_history")
        .fetch_one(pool)
        .await?;
    Ok(row.get("count"))
}
