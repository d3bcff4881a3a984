//! Company persistence

use crate::matching::like_prefilter;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use yoko_common::db::{encode_list, Company, Role};
use yoko_common::Result;

const COMPANY_COLUMNS: &str = "id, name, roles, is_archived, created_at";

/// Validated company ready for insert
#[derive(Debug, Clone)]
pub struct NewCompany {
    pub name: String,
    pub roles: Vec<Role>,
}

pub async fn insert_company(pool: &SqlitePool, new: &NewCompany) -> Result<Company> {
    let roles = encode_list(&new.roles)?;

    let company = sqlx::query_as::<_, Company>(&format!(
        "INSERT INTO companies (name, roles) VALUES (?, ?) RETURNING {}",
        COMPANY_COLUMNS
    ))
    .bind(&new.name)
    .bind(&roles)
    .fetch_one(pool)
    .await?;

    Ok(company)
}

/// Companies in the given archive state, optionally limited to those with a
/// role named exactly `topic`. Ordered by id.
pub async fn list_companies(
    pool: &SqlitePool,
    archived: bool,
    topic: Option<&str>,
) -> Result<Vec<Company>> {
    let mut qb: QueryBuilder<Sqlite> =
        QueryBuilder::new(format!("SELECT {} FROM companies WHERE ", COMPANY_COLUMNS));

    if archived {
        qb.push("is_archived = 1");
    } else {
        qb.push("COALESCE(is_archived, 0) = 0");
    }
    if let Some(pattern) = topic.and_then(like_prefilter) {
        qb.push(" AND roles LIKE ").push_bind(pattern);
    }
    qb.push(" ORDER BY id");

    let rows = qb.build_query_as::<Company>().fetch_all(pool).await?;

    Ok(match topic {
        Some(t) => rows.into_iter().filter(|c| c.has_role(t)).collect(),
        None => rows,
    })
}

/// Lookup by exact name, archived companies included. With duplicate names
/// the oldest row wins.
pub async fn get_company_by_name(pool: &SqlitePool, name: &str) -> Result<Option<Company>> {
    let row = sqlx::query_as::<_, Company>(&format!(
        "SELECT {} FROM companies WHERE name = ? ORDER BY id LIMIT 1",
        COMPANY_COLUMNS
    ))
    .bind(name)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Returns false when no company has this id
pub async fn set_archived(pool: &SqlitePool, id: i64, archived: bool) -> Result<bool> {
    let result = sqlx::query("UPDATE companies SET is_archived = ? WHERE id = ?")
        .bind(i64::from(archived))
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
