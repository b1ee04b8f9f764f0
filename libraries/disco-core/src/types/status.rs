/// Album listening status
use serde::{Deserialize, Serialize};

/// Where an album sits in the owner's listen pipeline.
///
/// Persisted and serialized with the names the collection has always used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AlbumStatus {
    /// Queued, the initial state
    #[default]
    #[serde(rename = "Pendiente")]
    Pending,
    /// Currently being listened to
    #[serde(rename = "Escuchando")]
    Listening,
    /// Listened through
    #[serde(rename = "Escuchado")]
    Listened,
}

impl AlbumStatus {
    /// Every status, in pipeline order
    pub const ALL: [AlbumStatus; 3] = [Self::Pending, Self::Listening, Self::Listened];

    /// Convert to string representation
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pendiente",
            Self::Listening => "Escuchando",
            Self::Listened => "Escuchado",
        }
    }

    /// Parse from string
    #[must_use]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "Pendiente" => Some(Self::Pending),
            "Escuchando" => Some(Self::Listening),
            "Escuchado" => Some(Self::Listened),
            _ => None,
        }
    }
}

impl std::fmt::Display for AlbumStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
