use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One distributable item in the shared library.
///
/// Booleans are stored as integers in SQLite; sqlx decodes them transparently.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FileRecord {
    pub id: i64,
    /// Opaque transport-level handle used to re-send the document.
    pub file_handle: String,
    pub title: String,
    /// Free-text, comma-separated, searched as substring.
    pub tags: String,
    pub special: bool,
    pub uploader: i64,
    pub approved: bool,
    /// RFC 3339 UTC timestamp.
    pub created_at: String,
}

/// One chat participant's access tier.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserRecord {
    pub user_id: i64,
    pub allowed_special: bool,
}
