//! Album rows
//!
//! Every read returns the album together with its listening history, so the
//! domain layer always works on a complete snapshot.

use crate::history;
use chrono::{NaiveDate, NaiveDateTime};
use disco_core::{
    error::Result,
    history::HistoryDiff,
    lifecycle,
    types::*,
    DiscoError, Favorites, ListeningHistory,
};
use sqlx::{sqlite::SqliteRow, Row, SqliteConnection, SqlitePool};
use std::collections::HashMap;
use tracing::{debug, warn};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// Legacy rows may hold numbers in the date columns, hence the casts
const ALBUM_COLUMNS: &str = "a.id, a.user_id, a.title, a.artist, a.cover, a.status, a.rating,
    a.review, a.favorites, CAST(a.date_added AS TEXT) AS date_added,
    CAST(a.listened_at AS TEXT) AS listened_at";

/// All albums of `owner`, newest first
pub async fn get_all(pool: &SqlitePool, owner: UserId) -> Result<Vec<Album>> {
    let mut conn = pool.acquire().await?;

    let rows = sqlx::query(&format!(
        "SELECT {ALBUM_COLUMNS} FROM albums a
         WHERE a.user_id = ?
         ORDER BY a.date_added DESC, a.id DESC"
    ))
    .bind(owner)
    .fetch_all(&mut *conn)
    .await?;

    let mut histories = history::get_for_owner(&mut conn, owner).await?;
    rows.iter()
        .map(|row| {
            let id: AlbumId = row.get("id");
            from_row(row, histories.remove(&id).unwrap_or_default())
        })
        .collect()
}

/// One album of `owner`; albums of other owners are `None`
pub async fn get_by_id(pool: &SqlitePool, id: AlbumId, owner: UserId) -> Result<Option<Album>> {
    let mut conn = pool.acquire().await?;
    fetch(&mut conn, id, owner).await
}

/// Same as [`get_by_id`] on an open connection or transaction
pub async fn fetch(conn: &mut SqliteConnection, id: AlbumId, owner: UserId) -> Result<Option<Album>> {
    let row = sqlx::query(&format!(
        "SELECT {ALBUM_COLUMNS} FROM albums a WHERE a.id = ? AND a.user_id = ?"
    ))
    .bind(id)
    .bind(owner)
    .fetch_optional(&mut *conn)
    .await?;

    match row {
        Some(row) => {
            let history = history::get_for_album(conn, id).await?;
            from_row(&row, history).map(Some)
        }
        None => Ok(None),
    }
}

/// Every album of every owner
pub async fn get_every(conn: &mut SqliteConnection) -> Result<Vec<Album>> {
    let rows = sqlx::query(&format!(
        "SELECT {ALBUM_COLUMNS} FROM albums a ORDER BY a.id"
    ))
    .fetch_all(&mut *conn)
    .await?;

    let mut histories = history::get_everything(conn).await?;
    rows.iter()
        .map(|row| {
            let id: AlbumId = row.get("id");
            from_row(row, histories.remove(&id).unwrap_or_default())
        })
        .collect()
}

/// Albums of every owner with the owner's username, most recently listened
/// first
pub async fn community(pool: &SqlitePool) -> Result<Vec<CommunityAlbum>> {
    let mut conn = pool.acquire().await?;

    let rows = sqlx::query(&format!(
        "SELECT {ALBUM_COLUMNS}, u.username FROM albums a
         JOIN users u ON u.id = a.user_id"
    ))
    .fetch_all(&mut *conn)
    .await?;

    let mut histories: HashMap<AlbumId, ListeningHistory> =
        history::get_everything(&mut conn).await?;
    let mut feed = rows
        .iter()
        .map(|row| {
            let id: AlbumId = row.get("id");
            Ok(CommunityAlbum {
                album: from_row(row, histories.remove(&id).unwrap_or_default())?,
                username: row.get("username"),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    disco_core::query::sort_community(&mut feed);
    Ok(feed)
}

/// Store a validated album and its initial history
pub async fn insert(conn: &mut SqliteConnection, album: &NewAlbum) -> Result<AlbumId> {
    let result = sqlx::query(
        "INSERT INTO albums
            (user_id, title, artist, cover, status, rating, review, favorites, date_added, listened_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(album.owner)
    .bind(&album.title)
    .bind(&album.artist)
    .bind(&album.cover)
    .bind(album.status.as_str())
    .bind(album.rating.value())
    .bind(&album.review)
    .bind(encode_favorites(&album.favorites))
    .bind(album.created_at.format(TIMESTAMP_FORMAT).to_string())
    .bind(album.listened_at.map(history::format_day))
    .execute(&mut *conn)
    .await?;

    let id = result.last_insert_rowid();
    for date in album.history.iter() {
        history::insert(&mut *conn, id, album.owner, date).await?;
    }

    debug!(album_id = id, owner = album.owner, "Album stored");
    Ok(id)
}

/// Persist `after` over `before`: the row plus the history difference
pub async fn save(conn: &mut SqliteConnection, before: &Album, after: &Album) -> Result<()> {
    let result = sqlx::query(
        "UPDATE albums
         SET title = ?, artist = ?, cover = ?, status = ?, rating = ?, review = ?,
             favorites = ?, listened_at = ?
         WHERE id = ? AND user_id = ?",
    )
    .bind(&after.title)
    .bind(&after.artist)
    .bind(&after.cover)
    .bind(after.status.as_str())
    .bind(after.rating.value())
    .bind(&after.review)
    .bind(encode_favorites(&after.favorites))
    .bind(after.listened_at.map(history::format_day))
    .bind(after.id)
    .bind(after.owner)
    .execute(&mut *conn)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DiscoError::AlbumNotFound(after.id));
    }

    let diff = HistoryDiff::between(&before.history, &after.history);
    if !diff.is_empty() {
        debug!(
            album_id = after.id,
            added = diff.added.len(),
            removed = diff.removed.len(),
            "Updating listening history"
        );
        history::apply_diff(conn, after.id, after.owner, &diff).await?;
    }
    Ok(())
}

/// Delete an album of `owner`; its history goes with it
pub async fn delete(pool: &SqlitePool, id: AlbumId, owner: UserId) -> Result<()> {
    let result = sqlx::query("DELETE FROM albums WHERE id = ? AND user_id = ?")
        .bind(id)
        .bind(owner)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(DiscoError::AlbumNotFound(id));
    }
    Ok(())
}

fn encode_favorites(favorites: &Favorites) -> Option<String> {
    (!favorites.is_empty()).then(|| favorites.encode())
}

fn from_row(row: &SqliteRow, history: ListeningHistory) -> Result<Album> {
    let id: AlbumId = row.get("id");
    let raw_status: Option<String> = row.try_get("status")?;
    let status = raw_status
        .as_deref()
        .and_then(AlbumStatus::from_str)
        .ok_or_else(|| {
            DiscoError::validation(format!("album {id} has unknown status {raw_status:?}"))
        })?;
    let rating: Option<f64> = row.try_get("rating")?;
    let favorites: Option<String> = row.get("favorites");
    let cover: Option<String> = row.get("cover");

    Ok(Album {
        id,
        owner: row.get("user_id"),
        title: row.get("title"),
        artist: row.get("artist"),
        cover: cover.unwrap_or_default(),
        status,
        rating: Rating::saturating(rating.unwrap_or_default()),
        review: row.get("review"),
        favorites: Favorites::decode(favorites.as_deref()),
        created_at: created_at(id, row.get("date_added")),
        listened_at: legacy_date(id, row.get("listened_at")),
        history,
    })
}

fn created_at(id: AlbumId, raw: Option<String>) -> NaiveDateTime {
    let Some(raw) = raw else {
        return NaiveDateTime::default();
    };
    lifecycle::parse_timestamp(&integral(&raw)).unwrap_or_else(|e| {
        warn!(album_id = id, "Unreadable date_added, using epoch: {}", e);
        NaiveDateTime::default()
    })
}

/// Legacy listen dates were written by several clients; anything that does
/// not parse is treated as absent
fn legacy_date(id: AlbumId, raw: Option<String>) -> Option<NaiveDate> {
    let raw = raw?;
    if raw.trim().is_empty() {
        return None;
    }
    match disco_core::history::parse_date(&integral(&raw)) {
        Ok(date) => Some(date),
        Err(e) => {
            warn!(album_id = id, "Ignoring legacy listened_at: {}", e);
            None
        }
    }
}

/// `1772712000000.0` (a REAL cast to text) -> `1772712000000`
fn integral(raw: &str) -> String {
    match raw.trim().strip_suffix(".0") {
        Some(digits) if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) => {
            digits.to_string()
        }
        _ => raw.trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::Connection;

    async fn row_with(status: &str, rating: &str) -> SqliteRow {
        let mut conn = SqliteConnection::connect("sqlite::memory:").await.unwrap();
        sqlx::query(&format!(
            "SELECT 1 AS id, 1 AS user_id, 'Kid A' AS title, 'Radiohead' AS artist,
                    NULL AS cover, {status} AS status, {rating} AS rating, NULL AS review,
                    NULL AS favorites, NULL AS date_added, NULL AS listened_at"
        ))
        .fetch_one(&mut conn)
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn null_status_is_a_validation_error() {
        let row = row_with("NULL", "4.5").await;
        let err = from_row(&row, ListeningHistory::new()).unwrap_err();
        assert!(err.is_validation());
    }

    #[tokio::test]
    async fn null_rating_reads_as_unrated() {
        let row = row_with("'Escuchado'", "NULL").await;
        let album = from_row(&row, ListeningHistory::new()).unwrap();
        assert_eq!(album.status, AlbumStatus::Listened);
        assert!(!album.rating.is_rated());
        assert_eq!(album.cover, "");
    }

    #[test]
    fn real_epochs_lose_their_fraction() {
        assert_eq!(integral("1772712000000.0"), "1772712000000");
        assert_eq!(integral(" 2026-03-05 "), "2026-03-05");
        assert_eq!(integral(".0"), ".0");
    }

    #[test]
    fn unreadable_legacy_dates_are_absent() {
        assert_eq!(legacy_date(1, None), None);
        assert_eq!(legacy_date(1, Some(String::new())), None);
        assert_eq!(legacy_date(1, Some("soon".into())), None);
        assert_eq!(
            legacy_date(1, Some("1772712000000.0".into())),
            NaiveDate::from_ymd_opt(2026, 3, 5)
        );
    }

    #[test]
    fn missing_creation_time_falls_back_to_epoch() {
        assert_eq!(created_at(1, None), NaiveDateTime::default());
        assert_eq!(
            created_at(1, Some("2026-03-05 20:15:00".into())),
            NaiveDate::from_ymd_opt(2026, 3, 5)
                .unwrap()
                .and_hms_opt(20, 15, 0)
                .unwrap()
        );
    }
}
