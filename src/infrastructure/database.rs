use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use tracing::info;

/// Connect to the database and bring the schema up to date.
pub async fn setup_database(database_url: &str) -> anyhow::Result<SqlitePool> {
    info!("📂 Database: {}", database_url);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await?;

    info!("✅ Database connected successfully");

    ensure_schema(&pool).await?;

    Ok(pool)
}

/// Create both tables if absent. Idempotent, safe to call on every startup.
pub async fn ensure_schema(pool: &SqlitePool) -> anyhow::Result<()> {
    info!("🔄 Running auto-migrations...");

    let stmts = [
        (
            "files",
            "CREATE TABLE IF NOT EXISTS files (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                file_handle TEXT NOT NULL,
                title TEXT NOT NULL,
                tags TEXT NOT NULL DEFAULT '',
                special INTEGER NOT NULL DEFAULT 0,
                uploader BIGINT NOT NULL,
                approved INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL
            )",
        ),
        (
            "users",
            "CREATE TABLE IF NOT EXISTS users (
                user_id BIGINT PRIMARY KEY,
                allowed_special INTEGER NOT NULL DEFAULT 0
            )",
        ),
    ];

    for (name, stmt) in stmts {
        sqlx::query(stmt).execute(pool).await?;
        info!("   - Table '{}' checked/created", name);
    }

    Ok(())
}
