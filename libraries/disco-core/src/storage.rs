//! Storage trait for owner-scoped collections

use crate::calendar::CalendarMonth;
use crate::error::Result;
use crate::types::{Album, AlbumId, CommunityAlbum, CreateAlbum, UpdateAlbum, UserId};
use async_trait::async_trait;
use chrono::NaiveDate;

/// Storage context providing the collection operations for one owner.
///
/// Implementations fetch a full album snapshot, run the lifecycle and
/// history operations from this crate on it, and commit the result
/// atomically. Albums owned by someone else are reported as not found.
#[async_trait]
pub trait StorageContext: Send + Sync {
    /// Owner every operation is scoped to
    fn user_id(&self) -> UserId;

    // ========================================================================
    // Albums
    // ========================================================================

    /// All albums of the owner, newest first
    async fn list_albums(&self) -> Result<Vec<Album>>;

    /// One album with its history
    async fn get_album(&self, id: AlbumId) -> Result<Option<Album>>;

    /// Validate and store a new album
    async fn create_album(&self, album: CreateAlbum) -> Result<Album>;

    /// Apply a partial update
    async fn update_album(&self, id: AlbumId, update: UpdateAlbum) -> Result<Album>;

    /// Delete an album and its history
    async fn delete_album(&self, id: AlbumId) -> Result<()>;

    /// Toggle one favorite track
    async fn toggle_favorite(&self, id: AlbumId, track_name: &str) -> Result<Album>;

    // ========================================================================
    // Listening history
    // ========================================================================

    /// Record a listen day; returns the full history, most recent first
    async fn add_history_date(&self, id: AlbumId, date: NaiveDate) -> Result<Vec<NaiveDate>>;

    /// Forget a listen day; returns the full history, most recent first
    async fn remove_history_date(&self, id: AlbumId, date: NaiveDate) -> Result<Vec<NaiveDate>>;

    /// Albums listened to on each day of a month
    async fn get_calendar(&self, year: i32, month: u32) -> Result<CalendarMonth>;

    // ========================================================================
    // Shared feed
    // ========================================================================

    /// Every owner's albums, most recently listened first
    async fn community_albums(&self) -> Result<Vec<CommunityAlbum>>;
}
