//! Album lifecycle
//!
//! Status changes, rating, review, favorites and metadata edits on a single
//! album. Every operation validates before it writes, so a rejected call
//! leaves the album untouched.
//!
//! Completion seeding: when an album's status *becomes* `Escuchado`, no
//! listen date was supplied in the same call and its history is empty, the
//! current day is recorded. Creation and update share this rule.

use crate::error::{DiscoError, Result};
use crate::favorites;
use crate::history::{self, ListeningHistory};
use crate::types::{
    Album, AlbumStatus, CreateAlbum, MetadataPatch, NewAlbum, Patch, Rating, UpdateAlbum, UserId,
};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};

/// Whether a status change is permitted.
///
/// Any status may move to any other, including back from `Escuchado` to
/// `Pendiente`.
pub fn transition_allowed(_from: AlbumStatus, _to: AlbumStatus) -> bool {
    true
}

/// Change the status. History is not touched.
pub fn set_status(album: &mut Album, status: AlbumStatus) -> Result<()> {
    if !transition_allowed(album.status, status) {
        return Err(DiscoError::validation(format!(
            "cannot move album from {} to {status}",
            album.status
        )));
    }
    album.status = status;
    Ok(())
}

/// Rate the album; rejects values off the half-star scale
pub fn set_rating(album: &mut Album, value: f64) -> Result<()> {
    album.rating = Rating::new(value)?;
    Ok(())
}

pub fn set_review(album: &mut Album, review: Option<String>) {
    album.review = review;
}

/// Toggle a favorite track by exact name. Returns `true` if it is a
/// favorite afterwards.
pub fn toggle_favorite(album: &mut Album, track_name: &str) -> Result<bool> {
    favorites::check_storable(track_name)?;
    Ok(album.favorites.toggle(track_name))
}

/// Apply title, artist and cover changes; omitted fields stay as they are
pub fn update_metadata(album: &mut Album, patch: MetadataPatch) {
    patch.title.apply_to(&mut album.title);
    patch.artist.apply_to(&mut album.artist);
    patch.cover.apply_to(&mut album.cover);
}

/// Record `today` if the album just became `Escuchado` with an empty history
pub fn seed_first_listen(album: &mut Album, previous: Option<AlbumStatus>, today: NaiveDate) -> bool {
    seed(album.status, previous, &mut album.history, today)
}

/// Validate creation data into an album ready to be stored
pub fn create(owner: UserId, input: CreateAlbum, now: NaiveDateTime) -> Result<NewAlbum> {
    let title = required("title", input.title)?;
    let artist = required("artist", input.artist)?;
    let rating = input.rating.map(Rating::new).transpose()?.unwrap_or_default();
    let favorites = input
        .favorites
        .map(favorites::FavoritesInput::into_favorites)
        .transpose()?
        .unwrap_or_default();
    let created_at = match input.date_added.as_deref() {
        Some(raw) => parse_timestamp(raw)?,
        None => now,
    };
    let status = input.status.unwrap_or_default();

    let mut history = ListeningHistory::new();
    let mut listened_at = None;
    let explicit = match input.listened_at.as_deref() {
        Some(raw) => {
            record_listen(&mut listened_at, &mut history, Some(raw))?;
            true
        }
        None => false,
    };
    if !explicit {
        seed(status, None, &mut history, now.date());
    }

    Ok(NewAlbum {
        owner,
        title,
        artist,
        cover: input.cover.unwrap_or_default(),
        status,
        rating,
        review: input.review,
        favorites,
        created_at,
        listened_at,
        history,
    })
}

/// Apply a partial update. All fields are validated before any is written.
pub fn apply_update(album: &mut Album, update: UpdateAlbum, today: NaiveDate) -> Result<()> {
    let mut next = album.clone();
    let previous = next.status;

    if let Patch::Set(status) = update.status {
        set_status(&mut next, status)?;
    }
    if let Patch::Set(value) = update.rating {
        set_rating(&mut next, value)?;
    }
    if let Patch::Set(review) = update.review {
        set_review(&mut next, review);
    }
    if let Patch::Set(input) = update.favorites {
        next.favorites = input.into_favorites()?;
    }
    let explicit = match update.listened_at {
        Patch::Set(raw) => {
            let dated = raw.is_some();
            record_listen(&mut next.listened_at, &mut next.history, raw.as_deref())?;
            dated
        }
        Patch::Keep => false,
    };
    update_metadata(&mut next, update.metadata);

    if !explicit {
        seed_first_listen(&mut next, Some(previous), today);
    }

    *album = next;
    Ok(())
}

fn seed(
    status: AlbumStatus,
    previous: Option<AlbumStatus>,
    history: &mut ListeningHistory,
    today: NaiveDate,
) -> bool {
    let became_listened =
        status == AlbumStatus::Listened && previous != Some(AlbumStatus::Listened);
    became_listened && history.is_empty() && history.add(today)
}

/// Set or clear the legacy date; a date is also recorded in the history
fn record_listen(
    legacy: &mut Option<NaiveDate>,
    history: &mut ListeningHistory,
    raw: Option<&str>,
) -> Result<()> {
    match raw {
        Some(raw) => {
            let date = history::parse_date(raw)?;
            *legacy = Some(date);
            history.add(date);
        }
        None => *legacy = None,
    }
    Ok(())
}

fn required(field: &str, value: String) -> Result<String> {
    if value.trim().is_empty() {
        return Err(DiscoError::validation(format!("{field} is required")));
    }
    Ok(value)
}

/// Parse a creation timestamp; a bare date means midnight
pub fn parse_timestamp(raw: &str) -> Result<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return Ok(timestamp.naive_utc());
    }
    for format in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(timestamp) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(timestamp);
        }
    }
    Ok(history::parse_date(raw)?.and_time(NaiveTime::MIN))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::favorites::{Favorites, FavoritesInput};

    fn day(raw: &str) -> NaiveDate {
        NaiveDate::parse_from_str(raw, "%Y-%m-%d").unwrap()
    }

    fn now() -> NaiveDateTime {
        day("2026-03-05").and_hms_opt(18, 30, 0).unwrap()
    }

    fn album() -> Album {
        create(7, CreateAlbum::new("In Rainbows", "Radiohead"), now())
            .unwrap()
            .into_album(1)
    }

    #[test]
    fn new_album_is_queued_and_empty() {
        let album = album();
        assert_eq!(album.status, AlbumStatus::Pending);
        assert!(album.history.is_empty());
        assert!(album.favorites.is_empty());
        assert!(!album.rating.is_rated());
        assert_eq!(album.created_at, now());
    }

    #[test]
    fn any_status_can_follow_any_other() {
        let mut album = album();
        for from in AlbumStatus::ALL {
            for to in AlbumStatus::ALL {
                album.status = from;
                set_status(&mut album, to).unwrap();
                assert_eq!(album.status, to);
            }
        }
    }

    #[test]
    fn set_status_leaves_history_alone() {
        let mut album = album();
        set_status(&mut album, AlbumStatus::Listened).unwrap();
        assert!(album.history.is_empty());
    }

    #[test]
    fn invalid_rating_keeps_previous_value() {
        let mut album = album();
        set_rating(&mut album, 4.5).unwrap();
        assert!(set_rating(&mut album, 4.6).unwrap_err().is_validation());
        assert!(set_rating(&mut album, 6.0).unwrap_err().is_validation());
        assert_eq!(album.rating.value(), 4.5);
    }

    #[test]
    fn toggle_favorite_rejects_blank_names() {
        let mut album = album();
        assert!(toggle_favorite(&mut album, "   ").unwrap_err().is_validation());
        assert!(album.favorites.is_empty());
    }

    #[test]
    fn toggle_favorite_twice_restores_set() {
        let mut album = album();
        toggle_favorite(&mut album, "Nude").unwrap();
        let before = album.favorites.clone();
        assert!(toggle_favorite(&mut album, "Track X").unwrap());
        assert!(!toggle_favorite(&mut album, "Track X").unwrap());
        assert_eq!(album.favorites, before);
    }

    #[test]
    fn toggle_favorite_matches_stored_name_exactly() {
        let mut album = album();
        album.favorites = Favorites::from(vec![" Intro".to_string()]);

        assert!(!toggle_favorite(&mut album, " Intro").unwrap());
        assert!(album.favorites.is_empty());

        assert!(toggle_favorite(&mut album, "Intro ").unwrap());
        assert_eq!(album.favorites.as_slice(), ["Intro "]);
    }

    #[test]
    fn toggle_favorite_rejects_edge_semicolons() {
        let mut album = album();
        assert!(toggle_favorite(&mut album, "Intro;").unwrap_err().is_validation());
        assert!(album.favorites.is_empty());
    }

    #[test]
    fn metadata_patch_only_touches_provided_fields() {
        let mut album = album();
        album.cover = "http://img/cover.png".into();
        update_metadata(
            &mut album,
            MetadataPatch {
                title: Patch::Set("In Rainbows (Disk 2)".into()),
                cover: Patch::Set(String::new()),
                ..MetadataPatch::default()
            },
        );
        assert_eq!(album.title, "In Rainbows (Disk 2)");
        assert_eq!(album.artist, "Radiohead");
        assert_eq!(album.cover, "");
    }

    #[test]
    fn review_update_leaves_other_fields() {
        let mut album = album();
        album.status = AlbumStatus::Listening;
        set_rating(&mut album, 3.0).unwrap();
        toggle_favorite(&mut album, "Reckoner").unwrap();
        let before = album.clone();

        let update = UpdateAlbum {
            review: Patch::Set(Some("great".into())),
            ..UpdateAlbum::default()
        };
        apply_update(&mut album, update, day("2026-03-06")).unwrap();

        assert_eq!(album.review.as_deref(), Some("great"));
        assert_eq!(album.status, before.status);
        assert_eq!(album.rating, before.rating);
        assert_eq!(album.favorites, before.favorites);
        assert_eq!(album.history, before.history);
    }

    #[test]
    fn rejected_update_changes_nothing() {
        let mut album = album();
        let before = album.clone();
        let update = UpdateAlbum {
            review: Patch::Set(Some("great".into())),
            status: Patch::Set(AlbumStatus::Listened),
            rating: Patch::Set(7.0),
            ..UpdateAlbum::default()
        };

        assert!(apply_update(&mut album, update, day("2026-03-06")).is_err());
        assert_eq!(album, before);
    }

    #[test]
    fn completing_seeds_today_on_create_and_update() {
        let mut input = CreateAlbum::new("Blue", "Joni Mitchell");
        input.status = Some(AlbumStatus::Listened);
        let created = create(7, input, now()).unwrap();
        assert_eq!(created.history.dates_desc(), vec![day("2026-03-05")]);
        assert_eq!(created.listened_at, None);

        let mut album = album();
        let update = UpdateAlbum {
            status: Patch::Set(AlbumStatus::Listened),
            ..UpdateAlbum::default()
        };
        apply_update(&mut album, update, day("2026-03-06")).unwrap();
        assert_eq!(album.history.dates_desc(), vec![day("2026-03-06")]);
    }

    #[test]
    fn completing_again_does_not_seed() {
        let mut album = album();
        album.status = AlbumStatus::Listened;
        let update = UpdateAlbum {
            status: Patch::Set(AlbumStatus::Listened),
            ..UpdateAlbum::default()
        };
        apply_update(&mut album, update, day("2026-03-06")).unwrap();
        assert!(album.history.is_empty());
    }

    #[test]
    fn explicit_listen_date_wins_over_seed() {
        let mut input = CreateAlbum::new("Blue", "Joni Mitchell");
        input.status = Some(AlbumStatus::Listened);
        input.listened_at = Some("2026-01-10".into());
        let created = create(7, input, now()).unwrap();

        assert_eq!(created.listened_at, Some(day("2026-01-10")));
        assert_eq!(created.history.dates_desc(), vec![day("2026-01-10")]);
    }

    #[test]
    fn clearing_legacy_date_keeps_history() {
        let mut album = album();
        let update = UpdateAlbum {
            listened_at: Patch::Set(Some("2026-02-01T10:00:00.000Z".into())),
            ..UpdateAlbum::default()
        };
        apply_update(&mut album, update, day("2026-03-06")).unwrap();
        assert_eq!(album.listened_at, Some(day("2026-02-01")));

        let update = UpdateAlbum {
            listened_at: Patch::Set(None),
            ..UpdateAlbum::default()
        };
        apply_update(&mut album, update, day("2026-03-06")).unwrap();
        assert_eq!(album.listened_at, None);
        assert_eq!(album.history.dates_desc(), vec![day("2026-02-01")]);
    }

    #[test]
    fn create_validates_inputs() {
        assert!(create(7, CreateAlbum::new("  ", "Artist"), now()).is_err());

        let mut input = CreateAlbum::new("Title", "Artist");
        input.rating = Some(2.25);
        assert!(create(7, input, now()).unwrap_err().is_validation());

        let mut input = CreateAlbum::new("Title", "Artist");
        input.listened_at = Some("someday".into());
        assert!(create(7, input, now()).unwrap_err().is_validation());
    }

    #[test]
    fn create_normalizes_favorites_and_date_added() {
        let mut input = CreateAlbum::new("Title", "Artist");
        input.favorites = Some(FavoritesInput::Encoded("One, Two".into()));
        input.date_added = Some("2025-12-24".into());
        let created = create(7, input, now()).unwrap();

        assert_eq!(created.favorites.encode(), "One;;Two");
        assert_eq!(
            created.created_at,
            day("2025-12-24").and_hms_opt(0, 0, 0).unwrap()
        );
    }
}
