use crate::models::{FileRecord, UserRecord};
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::error;

/// Storage adapter for the two library tables.
///
/// Every write is caught here: a failure is logged with the statement and the
/// offending values, and reported to the caller as a boolean success flag.
/// Reads propagate `sqlx::Error` so the handler wrapper can log and apologize.
#[derive(Clone)]
pub struct LibraryService {
    db: SqlitePool,
}

/// Draft produced by the upload wizard, inserted unapproved.
#[derive(Debug, Clone)]
pub struct NewFile {
    pub file_handle: String,
    pub title: String,
    pub tags: String,
    pub special: bool,
    pub uploader: i64,
}

impl LibraryService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Insert an unapproved file row, returning the new id, or `None` on a
    /// storage failure.
    pub async fn insert_file(&self, file: &NewFile) -> Option<i64> {
        let created_at = Utc::now().to_rfc3339();
        let res = sqlx::query(
            "INSERT INTO files (file_handle, title, tags, special, uploader, approved, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, 0, ?6)",
        )
        .bind(&file.file_handle)
        .bind(&file.title)
        .bind(&file.tags)
        .bind(file.special)
        .bind(file.uploader)
        .bind(&created_at)
        .execute(&self.db)
        .await;

        match res {
            Ok(done) => Some(done.last_insert_rowid()),
            Err(e) => {
                error!(
                    "[DB ERROR] insert file title={:?} uploader={}: {}",
                    file.title, file.uploader, e
                );
                None
            }
        }
    }

    /// Mark a pending file approved.
    pub async fn approve_file(&self, id: i64) -> bool {
        let res = sqlx::query("UPDATE files SET approved = 1 WHERE id = ?1")
            .bind(id)
            .execute(&self.db)
            .await;

        match res {
            Ok(_) => true,
            Err(e) => {
                error!("[DB ERROR] approve file id={}: {}", id, e);
                false
            }
        }
    }

    /// Delete a file row outright. Used for both rejection and removal.
    pub async fn delete_file(&self, id: i64) -> bool {
        let res = sqlx::query("DELETE FROM files WHERE id = ?1")
            .bind(id)
            .execute(&self.db)
            .await;

        match res {
            Ok(_) => true,
            Err(e) => {
                error!("[DB ERROR] delete file id={}: {}", id, e);
                false
            }
        }
    }

    pub async fn file_by_id(&self, id: i64) -> Result<Option<FileRecord>, sqlx::Error> {
        sqlx::query_as::<_, FileRecord>("SELECT * FROM files WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.db)
            .await
    }

    /// Approved files filtered by special flag, newest first.
    pub async fn approved_files(&self, special: bool) -> Result<Vec<FileRecord>, sqlx::Error> {
        sqlx::query_as::<_, FileRecord>(
            "SELECT * FROM files WHERE approved = 1 AND special = ?1 ORDER BY id DESC",
        )
        .bind(special)
        .fetch_all(&self.db)
        .await
    }

    /// All approved files regardless of special flag, newest first.
    /// Special-file access control is deferred to delivery time.
    pub async fn all_approved(&self) -> Result<Vec<FileRecord>, sqlx::Error> {
        sqlx::query_as::<_, FileRecord>(
            "SELECT * FROM files WHERE approved = 1 ORDER BY id DESC",
        )
        .fetch_all(&self.db)
        .await
    }

    pub async fn user(&self, user_id: i64) -> Result<Option<UserRecord>, sqlx::Error> {
        sqlx::query_as::<_, UserRecord>("SELECT * FROM users WHERE user_id = ?1")
            .bind(user_id)
            .fetch_optional(&self.db)
            .await
    }

    /// Register a user row on first contact. Idempotent.
    pub async fn ensure_user(&self, user_id: i64) -> bool {
        let res = sqlx::query(
            "INSERT INTO users (user_id, allowed_special) VALUES (?1, 0)
             ON CONFLICT (user_id) DO NOTHING",
        )
        .bind(user_id)
        .execute(&self.db)
        .await;

        match res {
            Ok(_) => true,
            Err(e) => {
                error!("[DB ERROR] ensure user user_id={}: {}", user_id, e);
                false
            }
        }
    }

    /// Grant special-file access after a correct PIN. Never reset here.
    pub async fn grant_special(&self, user_id: i64) -> bool {
        let res = sqlx::query(
            "INSERT INTO users (user_id, allowed_special) VALUES (?1, 1)
             ON CONFLICT (user_id) DO UPDATE SET allowed_special = 1",
        )
        .bind(user_id)
        .execute(&self.db)
        .await;

        match res {
            Ok(_) => true,
            Err(e) => {
                error!("[DB ERROR] grant special user_id={}: {}", user_id, e);
                false
            }
        }
    }

    /// Whether the user may open special files.
    pub async fn allowed_special(&self, user_id: i64) -> Result<bool, sqlx::Error> {
        Ok(self
            .user(user_id)
            .await?
            .map(|u| u.allowed_special)
            .unwrap_or(false))
    }
}
