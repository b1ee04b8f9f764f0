//! Listening history
//!
//! The set of calendar days on which an album was listened to. Albums created
//! before the history existed carry a single legacy date on the album row
//! instead; [`migrate_legacy`] copies those into the history once.

use crate::error::{DiscoError, Result};
use crate::types::{Album, AlbumId, UserId};
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Distinct listen days for one album
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ListeningHistory(BTreeSet<NaiveDate>);

impl ListeningHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a listen day. Returns `false` if it was already recorded.
    pub fn add(&mut self, date: NaiveDate) -> bool {
        self.0.insert(date)
    }

    /// Forget a listen day. Returns `false` if it was not recorded.
    pub fn remove(&mut self, date: NaiveDate) -> bool {
        self.0.remove(&date)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.0.contains(&date)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Oldest first
    pub fn iter(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.0.iter().copied()
    }

    /// Most recent first, for display
    pub fn dates_desc(&self) -> Vec<NaiveDate> {
        self.0.iter().rev().copied().collect()
    }

    pub fn latest(&self) -> Option<NaiveDate> {
        self.0.last().copied()
    }

    /// Days falling in the given month, oldest first
    pub fn in_month(&self, year: i32, month: u32) -> impl Iterator<Item = NaiveDate> + '_ {
        self.iter()
            .filter(move |date| date.year() == year && date.month() == month)
    }
}

impl FromIterator<NaiveDate> for ListeningHistory {
    fn from_iter<I: IntoIterator<Item = NaiveDate>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Parse a listen date, keeping only the calendar day.
///
/// Accepts `YYYY-MM-DD`, RFC 3339 timestamps, SQLite `DATETIME` text
/// (`YYYY-MM-DD HH:MM:SS`) with or without a `T`, and epoch numbers (seconds,
/// or milliseconds when longer than ten digits).
pub fn parse_date(raw: &str) -> Result<NaiveDate> {
    let raw = raw.trim();

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return Ok(timestamp.date_naive());
    }
    for format in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(timestamp) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(timestamp.date());
        }
    }
    if !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit()) {
        let parsed = raw.parse::<i64>().ok().and_then(|n| {
            if raw.len() > 10 {
                DateTime::from_timestamp_millis(n)
            } else {
                DateTime::from_timestamp(n, 0)
            }
        });
        if let Some(timestamp) = parsed {
            return Ok(timestamp.date_naive());
        }
    }

    Err(DiscoError::validation(format!("malformed date: {raw:?}")))
}

/// Record `date` for `album`; returns the resulting history
pub fn add_date(album: &mut Album, date: NaiveDate) -> &ListeningHistory {
    album.history.add(date);
    &album.history
}

/// Remove `date` from `album`'s history; absent dates are a no-op
pub fn remove_date(album: &mut Album, date: NaiveDate) -> &ListeningHistory {
    album.history.remove(date);
    &album.history
}

/// All recorded dates, most recent first
pub fn list_dates(album: &Album) -> Vec<NaiveDate> {
    album.history.dates_desc()
}

/// A history entry created from an album's legacy date
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LegacyEntry {
    pub album_id: AlbumId,
    pub owner: UserId,
    pub date: NaiveDate,
}

/// Copy legacy single dates into the history sets.
///
/// Runs only when every history in `albums` is empty; once anything has been
/// recorded the whole pass is skipped, so repeated runs leave the data alone.
/// Returns the entries that were inserted.
pub fn migrate_legacy(albums: &mut [Album]) -> Vec<LegacyEntry> {
    if albums.iter().any(|album| !album.history.is_empty()) {
        return Vec::new();
    }

    albums
        .iter_mut()
        .filter_map(|album| {
            let date = album.listened_at?;
            album.history.add(date).then_some(LegacyEntry {
                album_id: album.id,
                owner: album.owner,
                date,
            })
        })
        .collect()
}

/// Dates to insert and delete to turn one history into another
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryDiff {
    pub added: Vec<NaiveDate>,
    pub removed: Vec<NaiveDate>,
}

impl HistoryDiff {
    pub fn between(before: &ListeningHistory, after: &ListeningHistory) -> Self {
        Self {
            added: after.0.difference(&before.0).copied().collect(),
            removed: before.0.difference(&after.0).copied().collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AlbumStatus;

    fn day(raw: &str) -> NaiveDate {
        NaiveDate::parse_from_str(raw, "%Y-%m-%d").unwrap()
    }

    fn album(id: AlbumId, legacy: Option<&str>) -> Album {
        let created = day("2025-12-01").and_hms_opt(10, 0, 0).unwrap();
        let mut album = Album::new(id, 1, "OK Computer", "Radiohead", created);
        album.listened_at = legacy.map(day);
        album
    }

    #[test]
    fn parse_accepts_known_shapes() {
        let expected = day("2026-03-05");
        for raw in [
            "2026-03-05",
            " 2026-03-05 ",
            "2026-03-05T21:14:00.000Z",
            "2026-03-05T23:59:59+02:00",
            "2026-03-05 08:00:00",
            "2026-03-05T08:00:00",
            "1772712000000",
            "1772712000",
        ] {
            assert_eq!(parse_date(raw).unwrap(), expected, "{raw}");
        }
    }

    #[test]
    fn parse_rejects_garbage() {
        for raw in ["", "yesterday", "2026-13-01", "05/03/2026"] {
            assert!(parse_date(raw).unwrap_err().is_validation(), "{raw}");
        }
    }

    #[test]
    fn add_is_idempotent_per_day() {
        let mut album = album(1, None);
        add_date(&mut album, day("2026-03-05"));
        let history = add_date(&mut album, day("2026-03-05"));
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn remove_absent_is_noop() {
        let mut album = album(1, None);
        add_date(&mut album, day("2026-03-04"));
        let before = album.history.clone();
        assert_eq!(remove_date(&mut album, day("2026-03-05")), &before);
    }

    #[test]
    fn list_is_most_recent_first() {
        let mut album = album(1, None);
        for raw in ["2026-01-02", "2026-03-01", "2025-12-31"] {
            add_date(&mut album, day(raw));
        }
        assert_eq!(
            list_dates(&album),
            vec![day("2026-03-01"), day("2026-01-02"), day("2025-12-31")]
        );
    }

    #[test]
    fn migrate_copies_legacy_dates_once() {
        let mut albums = vec![album(1, Some("2026-01-10")), album(2, None)];
        albums[0].status = AlbumStatus::Listened;

        let inserted = migrate_legacy(&mut albums);
        assert_eq!(inserted.len(), 1);
        assert_eq!(inserted[0].album_id, 1);
        assert_eq!(list_dates(&albums[0]), vec![day("2026-01-10")]);

        let snapshot = albums.clone();
        assert!(migrate_legacy(&mut albums).is_empty());
        assert_eq!(albums, snapshot);
    }

    #[test]
    fn migrate_skips_when_any_history_exists() {
        let mut albums = vec![album(1, Some("2026-01-10")), album(2, None)];
        albums[1].history.add(day("2026-02-01"));

        assert!(migrate_legacy(&mut albums).is_empty());
        assert!(albums[0].history.is_empty());
    }

    #[test]
    fn diff_reports_both_directions() {
        let before: ListeningHistory = [day("2026-01-01"), day("2026-01-02")].into_iter().collect();
        let after: ListeningHistory = [day("2026-01-02"), day("2026-01-03")].into_iter().collect();

        let diff = HistoryDiff::between(&before, &after);
        assert_eq!(diff.added, vec![day("2026-01-03")]);
        assert_eq!(diff.removed, vec![day("2026-01-01")]);
        assert!(HistoryDiff::between(&after, &after).is_empty());
    }
}
