//! Integration tests for listening history and the monthly calendar


use chrono::NaiveDate;
use disco_core::{storage::StorageContext, types::*};
use test_helpers::*;

fn day(raw: &str) -> NaiveDate {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").unwrap()
}

#[tokio::test]
async fn test_add_same_day_twice_keeps_one_row() {
    let test_db = TestDb::new().await;
    let user = create_test_user(test_db.pool(), "ana").await;
    let storage = test_db.context(user);
    let album = storage
        .create_album(CreateAlbum::new("Kid A", "Radiohead"))
        .await
        .unwrap();

    let first = storage
        .add_history_date(album.id, day("2026-03-05"))
        .await
        .expect("Failed to add date");
    let second = storage
        .add_history_date(album.id, day("2026-03-05"))
        .await
        .expect("Failed to add date");

    assert_eq!(first, vec![day("2026-03-05")]);
    assert_eq!(second, first);
    assert_eq!(history_rows(test_db.pool(), album.id).await, vec!["2026-03-05"]);
}

#[tokio::test]
async fn test_dates_come_back_most_recent_first() {
    let test_db = TestDb::new().await;
    let user = create_test_user(test_db.pool(), "ana").await;
    let storage = test_db.context(user);
    let album = storage
        .create_album(CreateAlbum::new("Kid A", "Radiohead"))
        .await
        .unwrap();

    for raw in ["2026-01-10", "2026-03-05", "2025-12-31"] {
        storage.add_history_date(album.id, day(raw)).await.unwrap();
    }

    let dates = storage
        .add_history_date(album.id, day("2026-02-14"))
        .await
        .unwrap();
    assert_eq!(
        dates,
        vec![
            day("2026-03-05"),
            day("2026-02-14"),
            day("2026-01-10"),
            day("2025-12-31"),
        ]
    );
}

#[tokio::test]
async fn test_remove_absent_date_is_a_no_op() {
    let test_db = TestDb::new().await;
    let user = create_test_user(test_db.pool(), "ana").await;
    let storage = test_db.context(user);
    let album = storage
        .create_album(CreateAlbum::new("Kid A", "Radiohead"))
        .await
        .unwrap();
    storage
        .add_history_date(album.id, day("2026-01-10"))
        .await
        .unwrap();

    let dates = storage
        .remove_history_date(album.id, day("2026-03-05"))
        .await
        .expect("Removing an absent date should succeed");
    assert_eq!(dates, vec![day("2026-01-10")]);

    let dates = storage
        .remove_history_date(album.id, day("2026-01-10"))
        .await
        .unwrap();
    assert!(dates.is_empty());
    assert!(history_rows(test_db.pool(), album.id).await.is_empty());
}

#[tokio::test]
async fn test_history_edits_leave_legacy_field_alone() {
    let test_db = TestDb::new().await;
    let user = create_test_user(test_db.pool(), "ana").await;
    let storage = test_db.context(user);
    let album = storage
        .create_album(CreateAlbum {
            listened_at: Some("2026-01-10".to_string()),
            ..CreateAlbum::new("Kid A", "Radiohead")
        })
        .await
        .unwrap();

    storage
        .remove_history_date(album.id, day("2026-01-10"))
        .await
        .unwrap();

    let reloaded = storage.get_album(album.id).await.unwrap().unwrap();
    assert!(reloaded.history.is_empty());
    assert_eq!(reloaded.listened_at, Some(day("2026-01-10")));
}

// ============================================================================
// Calendar
// ============================================================================

#[tokio::test]
async fn test_calendar_collapses_duplicates_and_skips_other_months() {
    let test_db = TestDb::new().await;
    let user = create_test_user(test_db.pool(), "ana").await;
    let storage = test_db.context(user);
    let album = storage
        .create_album(CreateAlbum::new("Kid A", "Radiohead"))
        .await
        .unwrap();

    for raw in ["2026-03-01", "2026-03-01", "2026-02-28"] {
        storage.add_history_date(album.id, day(raw)).await.unwrap();
    }

    let calendar = storage.get_calendar(2026, 3).await.unwrap();
    assert_eq!(calendar.days.len(), 1);
    assert_eq!(calendar.album_ids_on(1), vec![album.id]);
}

#[tokio::test]
async fn test_calendar_is_scoped_to_owner_and_uses_legacy_dates() {
    let test_db = TestDb::new().await;
    let ana = create_test_user(test_db.pool(), "ana").await;
    let bo = create_test_user(test_db.pool(), "bo").await;

    let unmigrated =
        insert_legacy_album(test_db.pool(), ana, "Blue", "Escuchado", Some("2026-03-04")).await;
    let tracked = test_db
        .context(ana)
        .create_album(CreateAlbum::new("Kid A", "Radiohead"))
        .await
        .unwrap();
    test_db
        .context(ana)
        .add_history_date(tracked.id, day("2026-03-04"))
        .await
        .unwrap();
    let foreign = test_db
        .context(bo)
        .create_album(CreateAlbum::new("Amnesiac", "Radiohead"))
        .await
        .unwrap();
    test_db
        .context(bo)
        .add_history_date(foreign.id, day("2026-03-04"))
        .await
        .unwrap();

    let calendar = test_db.context(ana).get_calendar(2026, 3).await.unwrap();
    let mut ids = calendar.album_ids_on(4);
    ids.sort_unstable();
    assert_eq!(ids, vec![unmigrated, tracked.id]);
}

#[tokio::test]
async fn test_calendar_for_empty_month() {
    let test_db = TestDb::new().await;
    let user = create_test_user(test_db.pool(), "ana").await;
    let storage = test_db.context(user);

    let calendar = storage.get_calendar(2026, 4).await.unwrap();
    assert!(calendar.is_empty());
    assert_eq!(calendar.days_in_month(), 30);
}
