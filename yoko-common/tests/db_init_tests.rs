//! Integration tests for database initialization and migrations

use sqlx::SqlitePool;
use tempfile::TempDir;
use yoko_common::db::init::init_database;
use yoko_common::db::migrations::{get_schema_version, CURRENT_SCHEMA_VERSION};
use yoko_common::reference::SEED_TOPICS;

async fn column_exists(pool: &SqlitePool, table: &str, column: &str) -> bool {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM pragma_table_info(?) WHERE name = ?")
        .bind(table)
        .bind(column)
        .fetch_one(pool)
        .await
        .unwrap();
    count > 0
}

#[tokio::test]
async fn test_database_creation_when_missing() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("nested").join("yoko.db");

    let pool = init_database(&db_path).await;
    assert!(pool.is_ok(), "Database initialization failed: {:?}", pool.err());
    assert!(db_path.exists(), "Database file was not created");

    let pool = pool.unwrap();
    assert_eq!(get_schema_version(&pool).await.unwrap(), CURRENT_SCHEMA_VERSION);

    let topics: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM topics")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(topics as usize, SEED_TOPICS.len());
}

#[tokio::test]
async fn test_database_opens_existing_without_reseeding() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("yoko.db");

    let first = init_database(&db_path).await.unwrap();
    sqlx::query("INSERT INTO submissions (full_name, email) VALUES ('Keep Me', 'k@example.com')")
        .execute(&first)
        .await
        .unwrap();
    first.close().await;

    let second = init_database(&db_path).await.unwrap();
    let names: Vec<Option<String>> = sqlx::query_scalar("SELECT full_name FROM submissions")
        .fetch_all(&second)
        .await
        .unwrap();
    assert_eq!(names, vec![Some("Keep Me".to_string())]);

    let topics: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM topics")
        .fetch_one(&second)
        .await
        .unwrap();
    assert_eq!(topics as usize, SEED_TOPICS.len());
}

#[tokio::test]
async fn test_legacy_tables_gain_archive_flag() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("yoko.db");

    // Shape of tables written before archiving existed
    {
        let url = format!("sqlite://{}?mode=rwc", db_path.display());
        let legacy = SqlitePool::connect(&url).await.unwrap();
        sqlx::query(
            "CREATE TABLE submissions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                full_name TEXT, email TEXT, phone_number TEXT, referral_source TEXT,
                experience_level TEXT, fields TEXT, position TEXT, company TEXT,
                countries_worked_in TEXT, achievements TEXT,
                status TEXT DEFAULT 'Unseen',
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            )",
        )
        .execute(&legacy)
        .await
        .unwrap();
        sqlx::query(
            "CREATE TABLE companies (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                roles TEXT NOT NULL,
                applicants_count INTEGER DEFAULT 0,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            )",
        )
        .execute(&legacy)
        .await
        .unwrap();
        sqlx::query("INSERT INTO submissions (full_name) VALUES ('Old Applicant')")
            .execute(&legacy)
            .await
            .unwrap();
        legacy.close().await;
    }

    let pool = init_database(&db_path).await.unwrap();

    assert!(column_exists(&pool, "submissions", "is_archived").await);
    assert!(column_exists(&pool, "companies", "is_archived").await);

    let archived: Option<i64> =
        sqlx::query_scalar("SELECT is_archived FROM submissions WHERE full_name = 'Old Applicant'")
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(archived, Some(0));
}
