use crate::albums;
use async_trait::async_trait;
use chrono::{Local, NaiveDate, NaiveDateTime};
use disco_core::{
    calendar::{self, CalendarMonth},
    error::Result,
    history, lifecycle,
    storage::StorageContext,
    types::*,
    DiscoError,
};
use sqlx::SqlitePool;
use tracing::debug;

/// Local storage context using `SQLite`
pub struct LocalStorageContext {
    pool: SqlitePool,
    user_id: UserId,
}

impl LocalStorageContext {
    pub fn new(pool: SqlitePool, user_id: UserId) -> Self {
        Self { pool, user_id }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    fn now() -> NaiveDateTime {
        Local::now().naive_local()
    }

    fn today() -> NaiveDate {
        Local::now().date_naive()
    }

    /// Load an album, change it and write it back in one transaction.
    /// Nothing is written when `change` fails.
    async fn modify<F>(&self, id: AlbumId, change: F) -> Result<Album>
    where
        F: FnOnce(&mut Album) -> Result<()> + Send,
    {
        let mut tx = self.pool.begin().await?;

        let before = albums::fetch(&mut tx, id, self.user_id)
            .await?
            .ok_or(DiscoError::AlbumNotFound(id))?;
        let mut after = before.clone();
        change(&mut after)?;

        albums::save(&mut tx, &before, &after).await?;
        tx.commit().await?;

        Ok(after)
    }
}

#[async_trait]
impl StorageContext for LocalStorageContext {
    fn user_id(&self) -> UserId {
        self.user_id
    }

    // Albums
    async fn list_albums(&self) -> Result<Vec<Album>> {
        albums::get_all(&self.pool, self.user_id).await
    }

    async fn get_album(&self, id: AlbumId) -> Result<Option<Album>> {
        albums::get_by_id(&self.pool, id, self.user_id).await
    }

    async fn create_album(&self, album: CreateAlbum) -> Result<Album> {
        let new_album = lifecycle::create(self.user_id, album, Self::now())?;

        let mut tx = self.pool.begin().await?;
        let id = albums::insert(&mut tx, &new_album).await?;
        tx.commit().await?;

        Ok(new_album.into_album(id))
    }

    async fn update_album(&self, id: AlbumId, update: UpdateAlbum) -> Result<Album> {
        let today = Self::today();
        self.modify(id, move |album| lifecycle::apply_update(album, update, today))
            .await
    }

    async fn delete_album(&self, id: AlbumId) -> Result<()> {
        albums::delete(&self.pool, id, self.user_id).await?;
        debug!(album_id = id, "Album deleted");
        Ok(())
    }

    async fn toggle_favorite(&self, id: AlbumId, track_name: &str) -> Result<Album> {
        let track_name = track_name.to_string();
        self.modify(id, move |album| {
            lifecycle::toggle_favorite(album, &track_name).map(|_| ())
        })
        .await
    }

    // Listening history
    async fn add_history_date(&self, id: AlbumId, date: NaiveDate) -> Result<Vec<NaiveDate>> {
        let album = self
            .modify(id, move |album| {
                history::add_date(album, date);
                Ok(())
            })
            .await?;
        Ok(history::list_dates(&album))
    }

    async fn remove_history_date(&self, id: AlbumId, date: NaiveDate) -> Result<Vec<NaiveDate>> {
        let album = self
            .modify(id, move |album| {
                history::remove_date(album, date);
                Ok(())
            })
            .await?;
        Ok(history::list_dates(&album))
    }

    async fn get_calendar(&self, year: i32, month: u32) -> Result<CalendarMonth> {
        let albums = self.list_albums().await?;
        Ok(calendar::aggregate(&albums, year, month))
    }

    // Shared feed
    async fn community_albums(&self) -> Result<Vec<CommunityAlbum>> {
        albums::community(&self.pool).await
    }
}
