//! Disco Core
//!
//! Album lifecycle and listening-history model for Disco, a personal
//! "listen pipeline" (queued, in progress, listened) with ratings, reviews,
//! favorite tracks and a record of the days each album was played.
//!
//! # Architecture
//!
//! The core crate is pure and synchronous; storage and the catalog live in
//! other crates and hand it fully loaded snapshots.
//! - **Favorites codec** (`favorites`): ordered set of track names, persisted
//!   as one delimited string, legacy shapes readable
//! - **Listening history** (`history`): set of listen days per album and the
//!   one-time legacy date migration
//! - **Album lifecycle** (`lifecycle`): status, rating, review, favorites and
//!   metadata edits with all-or-nothing validation
//! - **Calendar** (`calendar`): day-of-month projection over a collection
//! - **Traits**: `StorageContext`, `MetadataProvider`
//!
//! # Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use disco_core::{calendar, lifecycle, types::CreateAlbum};
//!
//! let now = NaiveDate::from_ymd_opt(2026, 3, 5)
//!     .unwrap()
//!     .and_hms_opt(20, 0, 0)
//!     .unwrap();
//! let mut album = lifecycle::create(1, CreateAlbum::new("Blue", "Joni Mitchell"), now)
//!     .unwrap()
//!     .into_album(1);
//!
//! lifecycle::toggle_favorite(&mut album, "A Case of You").unwrap();
//! disco_core::history::add_date(&mut album, now.date());
//!
//! let march = calendar::aggregate(&[album], 2026, 3);
//! assert_eq!(march.album_ids_on(5), vec![1]);
//! ```

#![forbid(unsafe_code)]

pub mod calendar;
pub mod error;
pub mod favorites;
pub mod history;
pub mod lifecycle;
pub mod query;
pub mod storage;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use calendar::CalendarMonth;
pub use error::{DiscoError, Result};
pub use favorites::{Favorites, FavoritesInput};
pub use history::ListeningHistory;
pub use query::{AlbumQuery, AlbumSort, CollectionStats};
pub use storage::StorageContext;
pub use traits::MetadataProvider;

pub use types::{
    Album, AlbumId, AlbumInfo, AlbumStatus, CatalogAlbum, CommunityAlbum, CreateAlbum,
    MetadataPatch, NewAlbum, Patch, Rating, UpdateAlbum, User, UserId,
};
