//! Monthly listening calendar
//!
//! A read-only projection of a collection: for each day of a month, the
//! albums listened to that day.

use crate::types::{Album, AlbumId};
use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::collections::BTreeMap;

/// Albums listened to on each day of one month
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalendarMonth {
    pub year: i32,
    pub month: u32,
    /// Day of month (1-based) to albums, in collection order
    pub days: BTreeMap<u32, Vec<Album>>,
}

impl CalendarMonth {
    pub fn albums_on(&self, day: u32) -> &[Album] {
        self.days.get(&day).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn album_ids_on(&self, day: u32) -> Vec<AlbumId> {
        self.albums_on(day).iter().map(|album| album.id).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Number of days in this month, 0 for an invalid month
    pub fn days_in_month(&self) -> u32 {
        let Some(first) = NaiveDate::from_ymd_opt(self.year, self.month, 1) else {
            return 0;
        };
        let next = if self.month == 12 {
            NaiveDate::from_ymd_opt(self.year + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(self.year, self.month + 1, 1)
        };
        next.map_or(0, |next| {
            u32::try_from(next.signed_duration_since(first).num_days()).unwrap_or(0)
        })
    }
}

/// Bucket every album's listen days falling in `year`/`month`.
///
/// An album with an empty history contributes its legacy date instead, so
/// collections that were never migrated still show up. Each album appears at
/// most once per day. An invalid month yields an empty calendar.
pub fn aggregate(albums: &[Album], year: i32, month: u32) -> CalendarMonth {
    let mut days: BTreeMap<u32, Vec<Album>> = BTreeMap::new();

    for album in albums {
        for date in listen_days(album) {
            if date.year() != year || date.month() != month {
                continue;
            }
            let bucket = days.entry(date.day()).or_default();
            if !bucket.iter().any(|existing| existing.id == album.id) {
                bucket.push(album.clone());
            }
        }
    }

    CalendarMonth { year, month, days }
}

fn listen_days(album: &Album) -> Vec<NaiveDate> {
    if album.history.is_empty() {
        album.listened_at.into_iter().collect()
    } else {
        album.history.iter().collect()
    }
}
