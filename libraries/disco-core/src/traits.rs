/// Core traits for Disco
use crate::error::Result;
use crate::types::{AlbumInfo, CatalogAlbum};
use async_trait::async_trait;

/// Third-party album catalog.
///
/// Enrichment is best effort: `album_info` never fails, an unavailable
/// catalog simply yields an empty `AlbumInfo`.
#[async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Search the catalog for albums matching `query`
    async fn search_albums(&self, query: &str) -> Result<Vec<CatalogAlbum>>;

    /// Track listing and biography for an album
    async fn album_info(&self, artist: &str, title: &str) -> AlbumInfo;
}
