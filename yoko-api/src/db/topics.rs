//! Topic queries

use sqlx::SqlitePool;
use yoko_common::db::Topic;
use yoko_common::Result;

/// All topics in seed order
pub async fn list_topics(pool: &SqlitePool) -> Result<Vec<Topic>> {
    let topics = sqlx::query_as::<_, Topic>("SELECT id, name FROM topics ORDER BY id")
        .fetch_all(pool)
        .await?;

    Ok(topics)
}
