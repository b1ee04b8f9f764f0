//! Partial-update field wrapper

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// One attribute of a partial update.
///
/// `Keep` leaves the attribute untouched; `Set` replaces it, even when the
/// new value is empty. A key missing from a JSON body deserializes to `Keep`
/// (use `#[serde(default)]` on the field); for nullable attributes wrap an
/// `Option` so an explicit `null` becomes `Set(None)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Patch<T> {
    Keep,
    Set(T),
}

impl<T> Patch<T> {
    /// `Some` sets, `None` keeps
    pub fn from_option(value: Option<T>) -> Self {
        value.map_or(Self::Keep, Self::Set)
    }

    pub fn is_keep(&self) -> bool {
        matches!(self, Self::Keep)
    }

    pub fn is_set(&self) -> bool {
        matches!(self, Self::Set(_))
    }

    pub fn as_set(&self) -> Option<&T> {
        match self {
            Self::Keep => None,
            Self::Set(value) => Some(value),
        }
    }

    pub fn into_set(self) -> Option<T> {
        match self {
            Self::Keep => None,
            Self::Set(value) => Some(value),
        }
    }

    /// Write the value into `target` if one was provided
    pub fn apply_to(self, target: &mut T) {
        if let Self::Set(value) = self {
            *target = value;
        }
    }
}

impl<T> Default for Patch<T> {
    fn default() -> Self {
        Self::Keep
    }
}

impl<T> From<T> for Patch<T> {
    fn from(value: T) -> Self {
        Self::Set(value)
    }
}

impl<T: Serialize> Serialize for Patch<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Keep => serializer.serialize_none(),
            Self::Set(value) => value.serialize(serializer),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Patch<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        T::deserialize(deserializer).map(Self::Set)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Body {
        #[serde(default)]
        title: Patch<String>,
        #[serde(default)]
        review: Patch<Option<String>>,
    }

    #[test]
    fn missing_key_is_keep() {
        let body: Body = serde_json::from_str("{}").unwrap();
        assert!(body.title.is_keep());
        assert!(body.review.is_keep());
    }

    #[test]
    fn empty_string_is_set() {
        let body: Body = serde_json::from_str(r#"{"title": ""}"#).unwrap();
        assert_eq!(body.title, Patch::Set(String::new()));
    }

    #[test]
    fn explicit_null_clears_nullable_field() {
        let body: Body = serde_json::from_str(r#"{"review": null}"#).unwrap();
        assert_eq!(body.review, Patch::Set(None));
    }

    #[test]
    fn apply_to_only_writes_set_values() {
        let mut target = "old".to_string();
        Patch::Keep.apply_to(&mut target);
        assert_eq!(target, "old");
        Patch::Set("new".to_string()).apply_to(&mut target);
        assert_eq!(target, "new");
    }

    #[test]
    fn from_option_keeps_on_none() {
        assert_eq!(Patch::<u8>::from_option(None), Patch::Keep);
        assert_eq!(Patch::from_option(Some(Some(3))), Patch::Set(Some(3)));
    }
}
