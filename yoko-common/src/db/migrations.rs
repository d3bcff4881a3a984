//! Database schema migrations
//!
//! Versioned, idempotent upgrades for database files written by earlier
//! versions of the backend. Progress is tracked in `schema_version`.
//!
//! # Migration Guidelines
//!
//! 1. **Never modify existing migrations** - databases in the field depend on them
//! 2. **Always add new migrations** - one function per schema change
//! 3. **Check before altering** - every step must be safe to re-run
//! 4. **Use ALTER TABLE** - prefer it over DROP/CREATE to preserve data

use crate::Result;
use sqlx::SqlitePool;
use tracing::{info, warn};

/// Current schema version
///
/// **IMPORTANT:** Increment this when adding new migrations
pub const CURRENT_SCHEMA_VERSION: i32 = 3;

/// Latest applied version; 0 when nothing has been recorded
pub async fn get_schema_version(pool: &SqlitePool) -> Result<i32> {
    let table_exists: bool = sqlx::query_scalar(
        r#"
        SELECT EXISTS(
            SELECT 1 FROM sqlite_master
            WHERE type='table' AND name='schema_version'
        )
        "#,
    )
    .fetch_one(pool)
    .await?;

    if !table_exists {
        return Ok(0);
    }

    let version: Option<i32> =
        sqlx::query_scalar("SELECT version FROM schema_version ORDER BY version DESC LIMIT 1")
            .fetch_optional(pool)
            .await?;

    Ok(version.unwrap_or(0))
}

async fn set_schema_version(pool: &SqlitePool, version: i32) -> Result<()> {
    sqlx::query("INSERT OR IGNORE INTO schema_version (version) VALUES (?)")
        .bind(version)
        .execute(pool)
        .await?;

    Ok(())
}

/// Run all pending migrations
pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    let current_version = get_schema_version(pool).await?;

    if current_version == CURRENT_SCHEMA_VERSION {
        info!("Database schema is up to date (v{})", current_version);
        return Ok(());
    }

    if current_version > CURRENT_SCHEMA_VERSION {
        warn!(
            "Database schema version ({}) is newer than code version ({})",
            current_version, CURRENT_SCHEMA_VERSION
        );
        return Ok(());
    }

    info!(
        "Running database migrations: v{} -> v{}",
        current_version, CURRENT_SCHEMA_VERSION
    );

    if current_version < 1 {
        migrate_v1(pool).await?;
        set_schema_version(pool, 1).await?;
        info!("✓ Migration v1 completed");
    }

    if current_version < 2 {
        migrate_v2(pool).await?;
        set_schema_version(pool, 2).await?;
        info!("✓ Migration v2 completed");
    }

    if current_version < 3 {
        migrate_v3(pool).await?;
        set_schema_version(pool, 3).await?;
        info!("✓ Migration v3 completed");
    }

    Ok(())
}

async fn table_has_column(pool: &SqlitePool, table: &str, column: &str) -> Result<bool> {
    let count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM pragma_table_info(?) WHERE name = ?")
            .bind(table)
            .bind(column)
            .fetch_one(pool)
            .await?;

    Ok(count > 0)
}

async fn add_archive_flag(pool: &SqlitePool, table: &str) -> Result<()> {
    if table_has_column(pool, table, "is_archived").await? {
        info!("  {}.is_archived already exists - skipping", table);
        return Ok(());
    }

    // Table names come from the fixed list below, never from input
    sqlx::query(&format!(
        "ALTER TABLE {} ADD COLUMN is_archived INTEGER DEFAULT 0",
        table
    ))
    .execute(pool)
    .await?;

    info!("  ✓ Added is_archived column to {}", table);
    Ok(())
}

/// Migration v1: archive flag on submissions
async fn migrate_v1(pool: &SqlitePool) -> Result<()> {
    info!("Running migration v1: Add is_archived to submissions");
    add_archive_flag(pool, "submissions").await
}

/// Migration v2: archive flag on companies
async fn migrate_v2(pool: &SqlitePool) -> Result<()> {
    info!("Running migration v2: Add is_archived to companies");
    add_archive_flag(pool, "companies").await
}

/// Migration v3: indexes for the archive filters every listing applies
async fn migrate_v3(pool: &SqlitePool) -> Result<()> {
    info!("Running migration v3: Archive flag indexes");

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_submissions_archived ON submissions(is_archived)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_companies_archived ON companies(is_archived)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_documents_submission ON documents(submission_id)")
        .execute(pool)
        .await?;

    Ok(())
}
