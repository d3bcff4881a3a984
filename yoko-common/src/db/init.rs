//! Database initialization
//!
//! Startup sequence: open (creating the file if needed), create tables,
//! run versioned migrations, then seed topics.

use crate::reference::SEED_TOPICS;
use crate::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

/// Open the database file, creating it and its schema if needed
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // Per-connection pragmas go through the connect options so every pooled
    // connection gets them
    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_millis(5000));

    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .connect_with(options)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    init_schema(&pool).await?;

    Ok(pool)
}

/// Open a private in-memory database with the full schema.
///
/// Limited to a single connection: every SQLite `:memory:` connection is a
/// separate database.
pub async fn open_in_memory() -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await?;

    init_schema(&pool).await?;
    Ok(pool)
}

/// Create tables, migrate and seed (idempotent)
pub async fn init_schema(pool: &SqlitePool) -> Result<()> {
    create_schema_version_table(pool).await?;
    create_submissions_table(pool).await?;
    create_documents_table(pool).await?;
    create_topics_table(pool).await?;
    create_companies_table(pool).await?;

    crate::db::migrations::run_migrations(pool).await?;

    seed_topics(pool).await?;
    Ok(())
}

async fn create_schema_version_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Applicant records. `fields` and `countries_worked_in` hold JSON arrays.
pub async fn create_submissions_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS submissions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            full_name TEXT,
            email TEXT,
            phone_number TEXT,
            referral_source TEXT,
            experience_level TEXT,
            fields TEXT,
            position TEXT,
            company TEXT,
            countries_worked_in TEXT,
            achievements TEXT,
            status TEXT DEFAULT 'Unseen',
            is_archived INTEGER DEFAULT 0,
            created_at DATETIME DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn create_documents_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS documents (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            submission_id INTEGER,
            file_name TEXT,
            file_path TEXT,
            document_type TEXT,
            FOREIGN KEY (submission_id) REFERENCES submissions(id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn create_topics_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS topics (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Companies. `roles` holds a JSON array of `{name, experience}` objects.
///
/// `applicants_count` exists for databases written by earlier versions; the
/// count is recomputed on read.
pub async fn create_companies_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS companies (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            roles TEXT NOT NULL,
            applicants_count INTEGER DEFAULT 0,
            is_archived INTEGER DEFAULT 0,
            created_at DATETIME DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Insert the fixed topic list into an empty topics table
pub async fn seed_topics(pool: &SqlitePool) -> Result<()> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM topics")
        .fetch_one(pool)
        .await?;

    if count > 0 {
        return Ok(());
    }

    let mut tx = pool.begin().await?;
    for name in SEED_TOPICS {
        sqlx::query("INSERT OR IGNORE INTO topics (name) VALUES (?)")
            .bind(name)
            .execute(&mut *tx)
            .await?;
    }
    tx.commit().await?;

    info!("Topics seeded ({} entries)", SEED_TOPICS.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_schema_seeds_topics() {
        let pool = open_in_memory().await.unwrap();

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM topics")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count as usize, SEED_TOPICS.len());
    }

    #[tokio::test]
    async fn test_seed_skips_non_empty_table() {
        let pool = open_in_memory().await.unwrap();

        sqlx::query("DELETE FROM topics").execute(&pool).await.unwrap();
        sqlx::query("INSERT INTO topics (name) VALUES ('Custom')")
            .execute(&pool)
            .await
            .unwrap();

        seed_topics(&pool).await.unwrap();

        let names: Vec<String> = sqlx::query_scalar("SELECT name FROM topics")
            .fetch_all(&pool)
            .await
            .unwrap();
        assert_eq!(names, vec!["Custom".to_string()]);
    }

    #[tokio::test]
    async fn test_init_schema_idempotent() {
        let pool = open_in_memory().await.unwrap();
        init_schema(&pool).await.unwrap();
        init_schema(&pool).await.unwrap();

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM topics")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count as usize, SEED_TOPICS.len());
    }
}
