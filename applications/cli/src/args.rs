//! Parsers for command-line values

use chrono::NaiveDate;
use disco_core::{history, AlbumSort, AlbumStatus};

/// Accepts the stored Spanish names and their English equivalents, any case
pub fn parse_status(raw: &str) -> Result<AlbumStatus, String> {
    let normalized = raw.trim().to_lowercase();
    match normalized.as_str() {
        "pendiente" | "pending" => Ok(AlbumStatus::Pending),
        "escuchando" | "listening" => Ok(AlbumStatus::Listening),
        "escuchado" | "listened" => Ok(AlbumStatus::Listened),
        _ => Err(format!(
            "unknown status {raw:?} (expected pendiente, escuchando or escuchado)"
        )),
    }
}

pub fn parse_sort(raw: &str) -> Result<AlbumSort, String> {
    AlbumSort::from_str(raw.trim())
        .ok_or_else(|| format!("unknown sort {raw:?} (expected date_added, title, artist or status)"))
}

pub fn parse_day(raw: &str) -> Result<NaiveDate, String> {
    history::parse_date(raw).map_err(|e| e.to_string())
}

/// `YYYY-MM`
pub fn parse_month(raw: &str) -> Result<(i32, u32), String> {
    let invalid = || format!("invalid month {raw:?} (expected YYYY-MM)");
    let (year, month) = raw.trim().split_once('-').ok_or_else(invalid)?;
    let year: i32 = year.parse().map_err(|_| invalid())?;
    let month: u32 = month.parse().map_err(|_| invalid())?;
    if !(1..=12).contains(&month) {
        return Err(invalid());
    }
    Ok((year, month))
}
