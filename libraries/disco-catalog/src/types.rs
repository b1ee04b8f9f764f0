//! Last.fm response shapes.
//!
//! Only the fields Disco reads are modelled; everything else is ignored.

use serde::{Deserialize, Serialize};

/// Index of the image size used as cover art (small, medium, large, ...)
pub(crate) const COVER_IMAGE_INDEX: usize = 2;

/// Connection settings for the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// API key; without one every lookup is empty
    pub api_key: Option<String>,
    /// Endpoint, e.g. `http://ws.audioscrobbler.com/2.0/`
    pub base_url: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl CatalogConfig {
    pub const DEFAULT_BASE_URL: &'static str = "http://ws.audioscrobbler.com/2.0/";
    pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

    /// Default endpoint with the given key
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key,
            base_url: Self::DEFAULT_BASE_URL.to_string(),
            timeout_secs: Self::DEFAULT_TIMEOUT_SECS,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self::new(None)
    }
}

/// `{"error": 6, "message": "Album not found"}`
#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorBody {
    pub error: i64,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SearchResponse {
    pub results: SearchResults,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SearchResults {
    pub albummatches: AlbumMatches,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AlbumMatches {
    #[serde(default)]
    pub album: OneOrMany<SearchAlbum>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SearchAlbum {
    pub name: String,
    pub artist: String,
    #[serde(default)]
    pub image: Vec<Image>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Image {
    #[serde(rename = "#text", default)]
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct InfoResponse {
    pub album: Option<InfoAlbum>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct InfoAlbum {
    #[serde(default)]
    pub tracks: Option<Tracks>,
    #[serde(default)]
    pub wiki: Option<Wiki>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Tracks {
    #[serde(default)]
    pub track: OneOrMany<Track>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Track {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Wiki {
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub published: String,
}

/// Last.fm collapses one-element lists into a bare object
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> Default for OneOrMany<T> {
    fn default() -> Self {
        Self::Many(Vec::new())
    }
}

impl<T> OneOrMany<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Self::Many(items) => items,
            Self::One(item) => vec![item],
        }
    }
}
