//! Last.fm album catalog client.

use crate::error::{CatalogError, Result};
use crate::types::{
    ApiErrorBody, CatalogConfig, InfoResponse, SearchResponse, COVER_IMAGE_INDEX,
};
use async_trait::async_trait;
use disco_core::{AlbumInfo, CatalogAlbum, MetadataProvider};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Client for Last.fm's `album.search` and `album.getinfo` methods.
///
/// Without an API key the client never touches the network and every lookup
/// comes back empty.
///
/// # Example
///
/// ```ignore
/// use disco_catalog::{CatalogConfig, LastFmClient};
///
/// let client = LastFmClient::new(CatalogConfig::new(Some("key".into())))?;
/// let hits = client.search("Kid A").await?;
/// let info = client.fetch_album_info("Radiohead", "Kid A").await?;
/// println!("{} hits, {} tracks", hits.len(), info.tracks.len());
/// ```
pub struct LastFmClient {
    http: Client,
    base_url: Url,
    api_key: Option<String>,
}

impl LastFmClient {
    /// Create a new client with the given configuration.
    pub fn new(config: CatalogConfig) -> Result<Self> {
        if config.base_url.trim().is_empty() {
            return Err(CatalogError::InvalidUrl("URL cannot be empty".into()));
        }
        let base_url = Url::parse(config.base_url.trim())
            .map_err(|e| CatalogError::InvalidUrl(format!("{}: {}", config.base_url, e)))?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(CatalogError::InvalidUrl(
                "URL must start with http:// or https://".into(),
            ));
        }

        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.timeout_secs.min(10)))
            .user_agent(format!("Disco/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        let api_key = config.api_key.filter(|key| !key.trim().is_empty());

        Ok(Self {
            http,
            base_url,
            api_key,
        })
    }

    /// Whether lookups will reach the catalog.
    pub fn is_enabled(&self) -> bool {
        self.api_key.is_some()
    }

    /// Search albums by name.
    ///
    /// Each hit carries the third image size as its cover, or an empty
    /// string when the catalog has none.
    pub async fn search(&self, query: &str) -> Result<Vec<CatalogAlbum>> {
        let query = query.trim();
        let Some(api_key) = self.api_key.as_deref() else {
            debug!("No catalog API key, skipping search");
            return Ok(Vec::new());
        };
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let response: SearchResponse = self
            .call(api_key, "album.search", &[("album", query)])
            .await?;

        let albums: Vec<CatalogAlbum> = response
            .results
            .albummatches
            .album
            .into_vec()
            .into_iter()
            .map(|hit| CatalogAlbum {
                cover: hit
                    .image
                    .into_iter()
                    .nth(COVER_IMAGE_INDEX)
                    .map(|image| image.url)
                    .unwrap_or_default(),
                title: hit.name,
                artist: hit.artist,
            })
            .collect();

        debug!(query = %query, hits = albums.len(), "Catalog search");
        Ok(albums)
    }

    /// Track listing and wiki text for an album.
    ///
    /// An unknown album is an empty `AlbumInfo`, not an error.
    pub async fn fetch_album_info(&self, artist: &str, title: &str) -> Result<AlbumInfo> {
        let Some(api_key) = self.api_key.as_deref() else {
            debug!("No catalog API key, skipping album info");
            return Ok(AlbumInfo::default());
        };

        let response: InfoResponse = self
            .call(
                api_key,
                "album.getinfo",
                &[("artist", artist.trim()), ("album", title.trim())],
            )
            .await?;

        let Some(album) = response.album else {
            return Ok(AlbumInfo::default());
        };
        let tracks = album
            .tracks
            .map(|tracks| tracks.track.into_vec())
            .unwrap_or_default()
            .into_iter()
            .map(|track| track.name)
            .collect();
        let (summary, published) = album
            .wiki
            .map(|wiki| (wiki.summary, wiki.published))
            .unwrap_or_default();

        Ok(AlbumInfo {
            tracks,
            summary,
            published,
        })
    }

    fn method_url(&self, api_key: &str, method: &str, params: &[(&str, &str)]) -> Url {
        let mut url = self.base_url.clone();
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("method", method);
            for (key, value) in params {
                query.append_pair(key, value);
            }
            query.append_pair("api_key", api_key);
            query.append_pair("format", "json");
        }
        url
    }

    async fn call<T: DeserializeOwned>(
        &self,
        api_key: &str,
        method: &str,
        params: &[(&str, &str)],
    ) -> Result<T> {
        let url = self.method_url(api_key, method, params);
        debug!(method = %method, "Calling catalog");

        let response = self.http.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        // Last.fm reports failures as a JSON body, sometimes with a 200
        if let Ok(api_error) = serde_json::from_str::<ApiErrorBody>(&body) {
            return Err(CatalogError::Api {
                code: api_error.error,
                message: api_error.message,
            });
        }
        if !status.is_success() {
            return Err(CatalogError::BadStatus {
                status: status.as_u16(),
                message: body,
            });
        }

        serde_json::from_str(&body)
            .map_err(|e| CatalogError::ParseError(format!("{method} response: {e}")))
    }
}

#[async_trait]
impl MetadataProvider for LastFmClient {
    async fn search_albums(&self, query: &str) -> disco_core::Result<Vec<CatalogAlbum>> {
        self.search(query).await.map_err(|e| {
            warn!("Catalog search failed: {}", e);
            e.into()
        })
    }

    async fn album_info(&self, artist: &str, title: &str) -> AlbumInfo {
        match self.fetch_album_info(artist, title).await {
            Ok(info) => info,
            Err(e) => {
                warn!(artist = %artist, title = %title, "Album info unavailable: {}", e);
                AlbumInfo::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base_url: &str) -> Result<LastFmClient> {
        LastFmClient::new(CatalogConfig::new(Some("secret".into())).with_base_url(base_url))
    }

    #[test]
    fn rejects_bad_base_urls() {
        assert!(matches!(client(""), Err(CatalogError::InvalidUrl(_))));
        assert!(matches!(client("not a url"), Err(CatalogError::InvalidUrl(_))));
        assert!(matches!(
            client("ftp://ws.audioscrobbler.com/2.0/"),
            Err(CatalogError::InvalidUrl(_))
        ));
    }

    #[test]
    fn blank_key_disables_lookups() {
        let client = LastFmClient::new(CatalogConfig::new(Some("  ".into()))).unwrap();
        assert!(!client.is_enabled());
    }

    #[test]
    fn method_url_encodes_parameters() {
        let client = client("http://ws.audioscrobbler.com/2.0/").unwrap();
        let url = client.method_url("secret", "album.getinfo", &[("artist", "Simon & Garfunkel")]);
        assert_eq!(
            url.as_str(),
            "http://ws.audioscrobbler.com/2.0/?method=album.getinfo&artist=Simon+%26+Garfunkel&api_key=secret&format=json"
        );
    }
}
