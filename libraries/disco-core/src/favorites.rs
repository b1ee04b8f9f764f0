//! Favorite-track codec
//!
//! Favorites are an ordered set of track names persisted as one string on the
//! album row. The current format joins entries with [`DELIMITER`]; rows
//! written by older versions of the collection used commas instead, and API
//! clients may send a plain JSON list. All three shapes are readable, only the
//! delimiter form is ever written.
//!
//! Decoding is an explicit chain of pure decoders tried in priority order
//! (structured list, delimiter, legacy separators, single entry), so each
//! accepted shape can be tested on its own.

use crate::error::{DiscoError, Result};
use serde::{Deserialize, Serialize};

/// Reserved separator between persisted favorites
pub const DELIMITER: &str = ";;";

/// Separators used by the legacy scheme
const LEGACY_SEPARATORS: [char; 2] = [',', ';'];

type Decoder = fn(&str) -> Option<Vec<String>>;

/// String decoders in priority order. The structured-list shape is handled
/// before any of these, at the type level, by [`FavoritesInput`].
const DECODERS: [(&str, Decoder); 3] = [
    ("delimited", decode_delimited),
    ("legacy", decode_legacy),
    ("single", decode_single),
];

/// Ordered set of favorite track names
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct Favorites(Vec<String>);

impl Favorites {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|entry| entry == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// Remove `name` if present, append it otherwise.
    ///
    /// Returns `true` when the name is a favorite afterwards. Toggling the
    /// same name twice restores the original set.
    pub fn toggle(&mut self, name: &str) -> bool {
        if let Some(pos) = self.0.iter().position(|entry| entry == name) {
            self.0.remove(pos);
            false
        } else {
            self.0.push(name.to_string());
            true
        }
    }

    /// Persisted form of this set
    pub fn encode(&self) -> String {
        encode(&self.0)
    }

    /// Read a persisted value; `None` and empty strings are an empty set
    pub fn decode(raw: Option<&str>) -> Self {
        raw.map(decode).unwrap_or_default()
    }
}

impl FromIterator<String> for Favorites {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        let mut entries: Vec<String> = Vec::new();
        for entry in iter {
            if !entries.contains(&entry) {
                entries.push(entry);
            }
        }
        Self(entries)
    }
}

impl From<Vec<String>> for Favorites {
    fn from(entries: Vec<String>) -> Self {
        entries.into_iter().collect()
    }
}

impl From<Favorites> for Vec<String> {
    fn from(favorites: Favorites) -> Self {
        favorites.0
    }
}

/// Favorites as received from a caller: either a structured list or an
/// already-encoded string in any readable shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FavoritesInput {
    List(Vec<String>),
    Encoded(String),
}

impl FavoritesInput {
    /// Normalize into an ordered set, rejecting names that cannot be stored
    pub fn into_favorites(self) -> Result<Favorites> {
        let favorites = match self {
            Self::List(entries) => entries
                .into_iter()
                .filter(|entry| !entry.trim().is_empty())
                .collect::<Favorites>(),
            Self::Encoded(raw) => decode(&raw),
        };
        for entry in favorites.iter() {
            check_storable(entry)?;
        }
        Ok(favorites)
    }
}

/// Join entries with [`DELIMITER`]; the empty list encodes to `""`.
///
/// A lone entry containing a legacy separator gets a trailing delimiter so
/// that reading it back does not split it on the legacy path.
pub fn encode(entries: &[String]) -> String {
    let joined = entries.join(DELIMITER);
    match entries {
        [only] if only.contains(LEGACY_SEPARATORS) => format!("{joined}{DELIMITER}"),
        _ => joined,
    }
}

/// Decode any readable persisted shape into an ordered set
pub fn decode(raw: &str) -> Favorites {
    DECODERS
        .iter()
        .find_map(|(_, decoder)| decoder(raw))
        .map(Favorites::from)
        .unwrap_or_default()
}

/// Name of the decoder that accepts `raw`, if any
pub fn detect_format(raw: &str) -> Option<&'static str> {
    DECODERS
        .iter()
        .find(|(_, decoder)| decoder(raw).is_some())
        .map(|(name, _)| *name)
}

/// Toggle `name` in a copy of `favorites`
pub fn toggle(favorites: &Favorites, name: &str) -> Favorites {
    let mut next = favorites.clone();
    next.toggle(name);
    next
}

/// A favorite must be non-blank and must not contain the reserved delimiter.
///
/// A `;` at either end would merge with a neighbouring delimiter once
/// encoded, so it is rejected as well.
pub fn check_storable(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(DiscoError::validation("favorite track name is empty"));
    }
    if name.contains(DELIMITER) {
        return Err(DiscoError::validation(format!(
            "favorite track name may not contain '{DELIMITER}': {name}"
        )));
    }
    if name.starts_with(';') || name.ends_with(';') {
        return Err(DiscoError::validation(format!(
            "favorite track name may not start or end with ';': {name}"
        )));
    }
    Ok(())
}

fn decode_delimited(raw: &str) -> Option<Vec<String>> {
    raw.contains(DELIMITER).then(|| {
        raw.split(DELIMITER)
            .filter(|entry| !entry.is_empty())
            .map(str::to_string)
            .collect()
    })
}

fn decode_legacy(raw: &str) -> Option<Vec<String>> {
    raw.contains(LEGACY_SEPARATORS).then(|| {
        raw.split(LEGACY_SEPARATORS)
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(str::to_string)
            .collect()
    })
}

fn decode_single(raw: &str) -> Option<Vec<String>> {
    (!raw.trim().is_empty()).then(|| vec![raw.to_string()])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(favorites: &Favorites) -> Vec<&str> {
        favorites.iter().collect()
    }

    #[test]
    fn encode_joins_with_delimiter() {
        let entries = vec!["Rock".to_string(), "Pop".to_string(), "Jazz".to_string()];
        assert_eq!(encode(&entries), "Rock;;Pop;;Jazz");
        assert_eq!(encode(&[]), "");
    }

    #[test]
    fn decode_delimiter_path() {
        assert_eq!(names(&decode("Rock;;Pop;;Jazz")), ["Rock", "Pop", "Jazz"]);
    }

    #[test]
    fn decode_legacy_paths() {
        assert_eq!(names(&decode("Rock;Pop;Jazz")), ["Rock", "Pop", "Jazz"]);
        assert_eq!(names(&decode(" Rock , Pop,,Jazz ")), ["Rock", "Pop", "Jazz"]);
    }

    #[test]
    fn decode_single_and_empty() {
        assert_eq!(names(&decode("Paranoid Android")), ["Paranoid Android"]);
        assert!(decode("").is_empty());
        assert!(decode("   ").is_empty());
        assert!(Favorites::decode(None).is_empty());
    }

    #[test]
    fn decoders_are_tried_in_priority_order() {
        assert_eq!(detect_format("A;;B,C"), Some("delimited"));
        assert_eq!(detect_format("A,B"), Some("legacy"));
        assert_eq!(detect_format("A"), Some("single"));
        assert_eq!(detect_format(""), None);
    }

    #[test]
    fn decode_drops_duplicates_keeping_first() {
        assert_eq!(names(&decode("A;;B;;A")), ["A", "B"]);
    }

    #[test]
    fn lone_entry_with_comma_survives_round_trip() {
        let entries = vec!["Hello, Goodbye".to_string()];
        let encoded = encode(&entries);
        assert_eq!(encoded, "Hello, Goodbye;;");
        assert_eq!(names(&decode(&encoded)), ["Hello, Goodbye"]);
    }

    #[test]
    fn toggle_twice_is_noop() {
        let original: Favorites = vec!["Intro".to_string(), "Outro".to_string()].into();
        let once = toggle(&original, "Track X");
        assert_eq!(names(&once), ["Intro", "Outro", "Track X"]);
        assert_eq!(toggle(&once, "Track X"), original);
    }

    #[test]
    fn toggle_removes_exact_match_only() {
        let mut favorites: Favorites = vec!["Intro".to_string()].into();
        assert!(favorites.toggle("intro"));
        assert!(!favorites.toggle("Intro"));
        assert_eq!(names(&favorites), ["intro"]);
    }

    #[test]
    fn structured_list_input_is_accepted() {
        let input: FavoritesInput = serde_json::from_str(r#"["A", "B", "A", " "]"#).unwrap();
        assert_eq!(names(&input.into_favorites().unwrap()), ["A", "B"]);

        let input: FavoritesInput = serde_json::from_str(r#""A,B""#).unwrap();
        assert_eq!(names(&input.into_favorites().unwrap()), ["A", "B"]);
    }

    #[test]
    fn list_input_rejects_reserved_delimiter() {
        let input = FavoritesInput::List(vec!["A;;B".to_string()]);
        assert!(input.into_favorites().unwrap_err().is_validation());
    }

    #[test]
    fn names_with_edge_semicolons_are_not_storable() {
        for name in ["a;", ";b", ";"] {
            assert!(check_storable(name).unwrap_err().is_validation(), "{name:?}");
        }
        let input = FavoritesInput::List(vec!["a;".to_string(), "b".to_string()]);
        assert!(input.into_favorites().unwrap_err().is_validation());
    }

    #[test]
    fn inner_semicolons_survive_round_trip() {
        let input = FavoritesInput::List(vec!["a;b".to_string(), "c; d".to_string()]);
        let favorites = input.into_favorites().unwrap();
        assert_eq!(decode(&favorites.encode()), favorites);

        let lone = FavoritesInput::List(vec!["x;y".to_string()]).into_favorites().unwrap();
        assert_eq!(lone.encode(), "x;y;;");
        assert_eq!(decode(&lone.encode()), lone);
    }
}
