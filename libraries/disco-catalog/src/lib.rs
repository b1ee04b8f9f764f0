//! Disco Catalog
//!
//! Last.fm lookups used to prefill new albums and enrich album views.
//!
//! # Features
//!
//! - **Search**: candidate albums (title, artist, cover) for a free-text query
//! - **Album info**: track listing, wiki summary and publication date
//!
//! Enrichment is best effort. Through [`MetadataProvider`] a failing or
//! unconfigured catalog yields empty album info instead of an error.
//!
//! # Example
//!
//! ```ignore
//! use disco_catalog::{CatalogConfig, LastFmClient};
//! use disco_core::MetadataProvider;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = LastFmClient::new(CatalogConfig::new(std::env::var("LASTFM_API_KEY").ok()))?;
//!
//!     for hit in client.search_albums("Blue").await? {
//!         println!("{} - {}", hit.artist, hit.title);
//!     }
//!
//!     let info = client.album_info("Joni Mitchell", "Blue").await;
//!     println!("{} tracks", info.tracks.len());
//!     Ok(())
//! }
//! ```
//!
//! [`MetadataProvider`]: disco_core::MetadataProvider

mod client;
mod error;
mod types;

pub use client::LastFmClient;
pub use error::{CatalogError, Result};
pub use types::CatalogConfig;
