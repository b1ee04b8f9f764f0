//! Third-party catalog types

use serde::{Deserialize, Serialize};

/// A search hit from the catalog, ready to prefill a new album
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogAlbum {
    pub title: String,
    pub artist: String,
    /// Large cover URI, empty if the catalog has none
    pub cover: String,
}

/// Enrichment shown next to an album; empty when the catalog is unavailable
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlbumInfo {
    pub tracks: Vec<String>,
    pub summary: String,
    pub published: String,
}

impl AlbumInfo {
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty() && self.summary.is_empty() && self.published.is_empty()
    }
}
