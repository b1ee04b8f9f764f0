/// User domain type
use serde::{Deserialize, Serialize};

pub type UserId = i64;

/// Collection owner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique user identifier
    pub id: UserId,

    /// Login name, unique across the deployment
    pub username: String,

    /// Account creation timestamp (SQLite `DATETIME` text)
    pub created_at: String,
}
