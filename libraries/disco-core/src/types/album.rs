//! Album types

use super::{AlbumStatus, Patch, Rating, UserId};
use crate::favorites::{Favorites, FavoritesInput};
use crate::history::ListeningHistory;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

pub type AlbumId = i64;

/// An album tracked in an owner's collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Album {
    pub id: AlbumId,
    pub owner: UserId,
    pub title: String,
    pub artist: String,
    /// Cover art URI, empty when unknown
    pub cover: String,
    pub status: AlbumStatus,
    pub rating: Rating,
    pub review: Option<String>,
    pub favorites: Favorites,
    pub created_at: NaiveDateTime,
    /// Single listen date predating the history set
    pub listened_at: Option<NaiveDate>,
    pub history: ListeningHistory,
}

impl Album {
    /// A freshly queued album with no history, favorites or rating
    pub fn new(
        id: AlbumId,
        owner: UserId,
        title: impl Into<String>,
        artist: impl Into<String>,
        created_at: NaiveDateTime,
    ) -> Self {
        Self {
            id,
            owner,
            title: title.into(),
            artist: artist.into(),
            cover: String::new(),
            status: AlbumStatus::Pending,
            rating: Rating::default(),
            review: None,
            favorites: Favorites::new(),
            created_at,
            listened_at: None,
            history: ListeningHistory::new(),
        }
    }

    /// Most recent listen day, falling back to the legacy date while the
    /// history is empty
    pub fn last_listened(&self) -> Option<NaiveDate> {
        self.history.latest().or(self.listened_at)
    }
}

/// A validated album that has not been stored yet
#[derive(Debug, Clone, PartialEq)]
pub struct NewAlbum {
    pub owner: UserId,
    pub title: String,
    pub artist: String,
    pub cover: String,
    pub status: AlbumStatus,
    pub rating: Rating,
    pub review: Option<String>,
    pub favorites: Favorites,
    pub created_at: NaiveDateTime,
    pub listened_at: Option<NaiveDate>,
    pub history: ListeningHistory,
}

impl NewAlbum {
    /// Attach the identity assigned by storage
    pub fn into_album(self, id: AlbumId) -> Album {
        Album {
            id,
            owner: self.owner,
            title: self.title,
            artist: self.artist,
            cover: self.cover,
            status: self.status,
            rating: self.rating,
            review: self.review,
            favorites: self.favorites,
            created_at: self.created_at,
            listened_at: self.listened_at,
            history: self.history,
        }
    }
}

/// Data for creating a new album
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAlbum {
    pub title: String,
    pub artist: String,
    #[serde(default)]
    pub cover: Option<String>,
    #[serde(default)]
    pub status: Option<AlbumStatus>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub review: Option<String>,
    #[serde(default)]
    pub favorites: Option<FavoritesInput>,
    /// Creation time override, any format `history::parse_date` accepts or
    /// a full timestamp
    #[serde(default)]
    pub date_added: Option<String>,
    #[serde(default)]
    pub listened_at: Option<String>,
}

impl CreateAlbum {
    pub fn new(title: impl Into<String>, artist: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            artist: artist.into(),
            ..Self::default()
        }
    }
}

/// Title, artist and cover changes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetadataPatch {
    #[serde(default, skip_serializing_if = "Patch::is_keep")]
    pub title: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_keep")]
    pub artist: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_keep")]
    pub cover: Patch<String>,
}

impl MetadataPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_keep() && self.artist.is_keep() && self.cover.is_keep()
    }
}

/// Partial album update; only `Set` attributes change
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAlbum {
    #[serde(default, skip_serializing_if = "Patch::is_keep")]
    pub status: Patch<AlbumStatus>,
    #[serde(default, skip_serializing_if = "Patch::is_keep")]
    pub rating: Patch<f64>,
    #[serde(default, skip_serializing_if = "Patch::is_keep")]
    pub review: Patch<Option<String>>,
    #[serde(default, skip_serializing_if = "Patch::is_keep")]
    pub favorites: Patch<FavoritesInput>,
    /// `null` clears the legacy date; a date also records a listen
    #[serde(default, skip_serializing_if = "Patch::is_keep")]
    pub listened_at: Patch<Option<String>>,
    #[serde(flatten)]
    pub metadata: MetadataPatch,
}

impl UpdateAlbum {
    pub fn is_empty(&self) -> bool {
        self.status.is_keep()
            && self.rating.is_keep()
            && self.review.is_keep()
            && self.favorites.is_keep()
            && self.listened_at.is_keep()
            && self.metadata.is_empty()
    }
}

/// An album in the shared feed, with its owner's name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommunityAlbum {
    #[serde(flatten)]
    pub album: Album,
    pub username: String,
}
