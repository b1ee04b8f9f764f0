//! Collection browsing: filtering, sorting and summary counts

use crate::types::{Album, AlbumStatus, CommunityAlbum};
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;

/// Sort order for a collection view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlbumSort {
    /// Newest first
    #[default]
    DateAdded,
    Title,
    Artist,
    Status,
}

impl AlbumSort {
    #[must_use]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "date_added" | "date" => Some(Self::DateAdded),
            "title" => Some(Self::Title),
            "artist" => Some(Self::Artist),
            "status" => Some(Self::Status),
            _ => None,
        }
    }
}

/// Search, status filter and sort over an owner's albums
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlbumQuery {
    /// Case-insensitive substring of title or artist
    pub search: Option<String>,
    /// `None` shows every status
    pub status: Option<AlbumStatus>,
    #[serde(default)]
    pub sort: AlbumSort,
}

impl AlbumQuery {
    pub fn matches(&self, album: &Album) -> bool {
        let matches_search = self.search.as_deref().map_or(true, |term| {
            let term = term.to_lowercase();
            album.title.to_lowercase().contains(&term) || album.artist.to_lowercase().contains(&term)
        });
        let matches_status = self.status.map_or(true, |status| album.status == status);
        matches_search && matches_status
    }

    pub fn apply<'a>(&self, albums: &'a [Album]) -> Vec<&'a Album> {
        let mut selected: Vec<&Album> = albums.iter().filter(|album| self.matches(album)).collect();
        match self.sort {
            AlbumSort::DateAdded => selected.sort_by_key(|album| Reverse((album.created_at, album.id))),
            AlbumSort::Title => selected.sort_by_cached_key(|album| album.title.to_lowercase()),
            AlbumSort::Artist => selected.sort_by_cached_key(|album| album.artist.to_lowercase()),
            AlbumSort::Status => selected.sort_by_key(|album| album.status.as_str()),
        }
        selected
    }
}

/// Order a shared feed: most recently listened first, then newest added
pub fn sort_community(albums: &mut [CommunityAlbum]) {
    albums.sort_by_key(|entry| {
        Reverse((entry.album.last_listened(), entry.album.created_at, entry.album.id))
    });
}

/// Summary counts for a collection
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CollectionStats {
    pub total: usize,
    pub pending: usize,
    pub listening: usize,
    pub listened: usize,
    /// Mean of the albums that have a rating, `None` if none do
    pub average_rating: Option<f64>,
}

impl CollectionStats {
    pub fn from_albums(albums: &[Album]) -> Self {
        let mut stats = Self {
            total: albums.len(),
            ..Self::default()
        };
        let mut rated = 0usize;
        let mut rating_sum = 0.0;

        for album in albums {
            match album.status {
                AlbumStatus::Pending => stats.pending += 1,
                AlbumStatus::Listening => stats.listening += 1,
                AlbumStatus::Listened => stats.listened += 1,
            }
            if album.rating.is_rated() {
                rated += 1;
                rating_sum += album.rating.value();
            }
        }

        stats.average_rating = (rated > 0).then(|| rating_sum / rated as f64);
        stats
    }
}
