//! Database engine and connection management

use anyhow::{Context, Result};
use once_cell::sync::OnceCell;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use crate::config::Paths;

static DB_ENGINE: OnceCell<Arc<DbEngine>> = OnceCell::new();

/// Database engine wrapper
pub struct DbEngine {
    pool: SqlitePool,
}

impl DbEngine {
    /// Get the global database engine instance
    pub fn get() -> Result<Arc<DbEngine>> {
        DB_ENGINE
            .get()
            .map(Arc::clone)
            .context("Database not initialized")
    }

    /// Get a reference to the connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

/// Setup the SQLite database at the configured path
pub async fn setup_sqlite() -> Result<()> {
    let paths = Paths::get()?;
    let db_path = paths.app_db_path();
    setup_at(&db_path).await
}

async fn setup_at(db_path: &Path) -> Result<()> {
    // foreign_keys must stay ON: playlist deletion relies on cascading
    // playlist_song removal at the database level
    let options = SqliteConnectOptions::from_str(&format!("sqlite:{}", db_path.display()))?
        .create_if_missing(true)
        .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
        .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
        .busy_timeout(std::time::Duration::from_secs(30))
        .pragma("cache_size", "10000")
        .pragma("foreign_keys", "ON");

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .min_connections(1)
        .acquire_timeout(std::time::Duration::from_secs(30))
        .connect_with(options)
        .await
        .context("Failed to connect to database")?;

    let engine = DbEngine { pool };

    DB_ENGINE
        .set(Arc::new(engine))
        .map_err(|_| anyhow::anyhow!("Database already initialized"))?;

    create_tables().await?;

    Ok(())
}

/// Create all database tables
async fn create_tables() -> Result<()> {
    let engine = DbEngine::get()?;
    let pool = engine.pool();

    // User table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS user (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            email TEXT NOT NULL,
            username TEXT NOT NULL,
            password TEXT NOT NULL,
            profile_picture TEXT NOT NULL DEFAULT '',
            date_joined TEXT NOT NULL
        );
        CREATE UNIQUE INDEX IF NOT EXISTS idx_user_email ON user(email);
        "#,
    )
    .execute(pool)
    .await?;

    // Uploaded image table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS uploaded_image (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            userid INTEGER NOT NULL,
            path TEXT NOT NULL,
            created_at TEXT NOT NULL,
            FOREIGN KEY (userid) REFERENCES user(id) ON DELETE CASCADE
        );
        CREATE INDEX IF NOT EXISTS idx_uploaded_image_userid ON uploaded_image(userid);
        "#,
    )
    .execute(pool)
    .await?;

    // Recommendation table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS recommendation (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            userid INTEGER NOT NULL,
            imageid INTEGER NOT NULL,
            song_title TEXT NOT NULL,
            song_url TEXT NOT NULL,
            song_thumbnail TEXT NOT NULL,
            FOREIGN KEY (userid) REFERENCES user(id) ON DELETE CASCADE,
            FOREIGN KEY (imageid) REFERENCES uploaded_image(id) ON DELETE CASCADE
        );
        CREATE INDEX IF NOT EXISTS idx_recommendation_userid ON recommendation(userid);
        "#,
    )
    .execute(pool)
    .await?;

    // Playlist table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS playlist (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            userid INTEGER NOT NULL,
            name TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            FOREIGN KEY (userid) REFERENCES user(id) ON DELETE CASCADE
        );
        CREATE INDEX IF NOT EXISTS idx_playlist_userid ON playlist(userid);
        "#,
    )
    .execute(pool)
    .await?;

    // Feedback table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS feedback (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            userid INTEGER NOT NULL,
            message TEXT NOT NULL,
            published INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL,
            FOREIGN KEY (userid) REFERENCES user(id) ON DELETE CASCADE
        );
        CREATE INDEX IF NOT EXISTS idx_feedback_userid ON feedback(userid);
        "#,
    )
    .execute(pool)
    .await?;

    // Playlist song table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS playlist_song (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            playlistid INTEGER NOT NULL,
            title TEXT NOT NULL,
            url TEXT NOT NULL,
            thumbnail_url TEXT NOT NULL,
            added_at TEXT NOT NULL,
            FOREIGN KEY (playlistid) REFERENCES playlist(id) ON DELETE CASCADE
        );
        CREATE INDEX IF NOT EXISTS idx_playlist_song_playlistid ON playlist_song(playlistid);
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

#[cfg(test)]
pub(crate) async fn setup_test_db() -> Result<()> {
    if DB_ENGINE.get().is_some() {
        return Ok(());
    }

    let dir = tempfile::tempdir()?;
    let db_path = dir.path().join("test.db");
    // keep the temp directory alive for the whole test process
    std::mem::forget(dir);

    match setup_at(&db_path).await {
        Ok(()) => Ok(()),
        // another test won the initialization race
        Err(_) if DB_ENGINE.get().is_some() => Ok(()),
        Err(e) => Err(e),
    }
}
