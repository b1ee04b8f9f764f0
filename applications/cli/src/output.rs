//! Plain-text rendering of collection data

use chrono::NaiveDate;
use disco_core::{Album, AlbumInfo, CalendarMonth, CatalogAlbum, CollectionStats, CommunityAlbum, User};
use std::fmt::Write;

pub fn album_line(album: &Album) -> String {
    let mut line = format!(
        "{:>5}  {} - {}  [{}]",
        album.id, album.artist, album.title, album.status
    );
    if album.rating.is_rated() {
        let _ = write!(line, "  {}", album.rating);
    }
    if let Some(last) = album.last_listened() {
        let _ = write!(line, "  last listened {last}");
    }
    line
}

pub fn album_detail(album: &Album, info: &AlbumInfo) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} - {}", album.artist, album.title);
    let _ = writeln!(out, "Status:  {}", album.status);
    if album.rating.is_rated() {
        let _ = writeln!(out, "Rating:  {}", album.rating);
    }
    if !album.cover.is_empty() {
        let _ = writeln!(out, "Cover:   {}", album.cover);
    }
    let _ = writeln!(out, "Added:   {}", album.created_at.format("%Y-%m-%d %H:%M"));
    if let Some(review) = album.review.as_deref().filter(|review| !review.is_empty()) {
        let _ = writeln!(out, "Review:  {review}");
    }

    let listens = album.history.dates_desc();
    if listens.is_empty() {
        if let Some(legacy) = album.listened_at {
            let _ = writeln!(out, "Listened: {legacy}");
        }
    } else {
        let _ = writeln!(out, "Listened: {}", join_days(&listens));
    }

    if !info.tracks.is_empty() {
        let _ = writeln!(out, "\nTracks:");
        for (number, track) in info.tracks.iter().enumerate() {
            let marker = if album.favorites.contains(track) { "*" } else { " " };
            let _ = writeln!(out, " {marker}{:>3}. {track}", number + 1);
        }
    }

    // Favorites the catalog does not list would otherwise be invisible
    let extra: Vec<&str> = album
        .favorites
        .iter()
        .filter(|favorite| !info.tracks.iter().any(|track| track.as_str() == *favorite))
        .collect();
    if !extra.is_empty() {
        let _ = writeln!(out, "\nFavorites: {}", extra.join(", "));
    }

    if !info.summary.is_empty() {
        let _ = writeln!(out, "\n{}", info.summary);
    }
    if !info.published.is_empty() {
        let _ = writeln!(out, "Published: {}", info.published);
    }
    out
}

/// Catalog data on its own, for albums not in the collection
pub fn album_info(info: &AlbumInfo) -> String {
    if info.is_empty() {
        return "No catalog information".to_string();
    }
    let mut out = String::new();
    for (number, track) in info.tracks.iter().enumerate() {
        let _ = writeln!(out, "{:>3}. {track}", number + 1);
    }
    if !info.summary.is_empty() {
        let _ = writeln!(out, "\n{}", info.summary);
    }
    if !info.published.is_empty() {
        let _ = writeln!(out, "Published: {}", info.published);
    }
    out
}

pub fn history(dates: &[NaiveDate]) -> String {
    if dates.is_empty() {
        "No listens recorded".to_string()
    } else {
        dates.iter().map(ToString::to_string).collect::<Vec<_>>().join("\n")
    }
}

pub fn calendar(month: &CalendarMonth) -> String {
    let mut out = format!("{:04}-{:02}\n", month.year, month.month);
    if month.is_empty() {
        out.push_str("No listens this month\n");
        return out;
    }
    for (day, albums) in &month.days {
        let titles: Vec<String> = albums
            .iter()
            .map(|album| format!("{} - {}", album.artist, album.title))
            .collect();
        let _ = writeln!(out, "{day:>2}  {}", titles.join("; "));
    }
    out
}

pub fn community_line(entry: &CommunityAlbum) -> String {
    format!("{}  ({})", album_line(&entry.album), entry.username)
}

pub fn stats(stats: &CollectionStats) -> String {
    let mut out = format!(
        "Albums: {}\nPendiente: {}\nEscuchando: {}\nEscuchado: {}\n",
        stats.total, stats.pending, stats.listening, stats.listened
    );
    match stats.average_rating {
        Some(average) => {
            let _ = writeln!(out, "Average rating: {average:.2}");
        }
        None => out.push_str("Average rating: -\n"),
    }
    out
}

pub fn catalog_hit(hit: &CatalogAlbum) -> String {
    if hit.cover.is_empty() {
        format!("{} - {}", hit.artist, hit.title)
    } else {
        format!("{} - {}  <{}>", hit.artist, hit.title, hit.cover)
    }
}

pub fn user_line(user: &User) -> String {
    format!("{:>5}  {}  (since {})", user.id, user.username, user.created_at)
}

fn join_days(days: &[NaiveDate]) -> String {
    days.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
}
