//! Submission and document persistence

use crate::matching::{like_prefilter, name_matches};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::debug;
use yoko_common::db::{encode_list, Document, Submission, SubmissionStatus};
use yoko_common::Result;

const SUBMISSION_COLUMNS: &str = "id, full_name, email, phone_number, referral_source, \
     experience_level, fields, position, company, countries_worked_in, achievements, \
     status, is_archived, created_at";

/// Validated submission ready for insert
#[derive(Debug, Clone, Default)]
pub struct NewSubmission {
    pub full_name: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub referral_source: Option<String>,
    pub experience_level: Option<String>,
    pub fields: Vec<String>,
    pub position: Option<String>,
    pub company: Option<String>,
    pub countries_worked_in: Vec<String>,
    pub achievements: Option<String>,
    pub documents: Vec<NewDocument>,
}

#[derive(Debug, Clone, Default)]
pub struct NewDocument {
    pub file_name: Option<String>,
    pub file_path: Option<String>,
    pub document_type: Option<String>,
}

/// Which archive state a listing covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArchiveScope {
    #[default]
    Active,
    Archived,
    All,
}

impl ArchiveScope {
    fn condition(&self) -> Option<&'static str> {
        match self {
            ArchiveScope::Active => Some("COALESCE(is_archived, 0) = 0"),
            ArchiveScope::Archived => Some("is_archived = 1"),
            ArchiveScope::All => None,
        }
    }
}

/// Listing filters; all present filters must match
#[derive(Debug, Clone, Default)]
pub struct SubmissionFilter {
    pub scope: ArchiveScope,
    /// Exact match on the applicant's previous company
    pub company: Option<String>,
    /// Exact match against one of the topic tags
    pub topic: Option<String>,
    /// Case-insensitive substring of the applicant's name
    pub name_query: Option<String>,
}

/// Insert a submission and its documents atomically; returns the new id
pub async fn insert_submission(pool: &SqlitePool, new: &NewSubmission) -> Result<i64> {
    let fields = encode_list(&new.fields)?;
    let countries = encode_list(&new.countries_worked_in)?;

    let mut tx = pool.begin().await?;

    let result = sqlx::query(
        r#"
        INSERT INTO submissions (
            full_name, email, phone_number, referral_source, experience_level,
            fields, position, company, countries_worked_in, achievements
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&new.full_name)
    .bind(&new.email)
    .bind(&new.phone_number)
    .bind(&new.referral_source)
    .bind(&new.experience_level)
    .bind(&fields)
    .bind(&new.position)
    .bind(&new.company)
    .bind(&countries)
    .bind(&new.achievements)
    .execute(&mut *tx)
    .await?;

    let submission_id = result.last_insert_rowid();

    for doc in &new.documents {
        sqlx::query(
            "INSERT INTO documents (submission_id, file_name, file_path, document_type) VALUES (?, ?, ?, ?)",
        )
        .bind(submission_id)
        .bind(&doc.file_name)
        .bind(&doc.file_path)
        .bind(&doc.document_type)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    debug!(
        "Inserted submission {} with {} document(s)",
        submission_id,
        new.documents.len()
    );
    Ok(submission_id)
}

/// Submissions matching the filter, newest first
pub async fn list_submissions(pool: &SqlitePool, filter: &SubmissionFilter) -> Result<Vec<Submission>> {
    let mut qb: QueryBuilder<Sqlite> =
        QueryBuilder::new(format!("SELECT {} FROM submissions WHERE 1 = 1", SUBMISSION_COLUMNS));

    if let Some(condition) = filter.scope.condition() {
        qb.push(" AND ").push(condition);
    }
    if let Some(company) = &filter.company {
        qb.push(" AND company = ").push_bind(company.clone());
    }
    if let Some(pattern) = filter.topic.as_deref().and_then(like_prefilter) {
        qb.push(" AND fields LIKE ").push_bind(pattern);
    }
    qb.push(" ORDER BY created_at DESC, id DESC");

    let rows = qb.build_query_as::<Submission>().fetch_all(pool).await?;

    Ok(rows
        .into_iter()
        .filter(|s| filter.topic.as_deref().map_or(true, |t| s.has_field(t)))
        .filter(|s| filter.name_query.as_deref().map_or(true, |q| name_matches(s, q)))
        .collect())
}

pub async fn get_submission(pool: &SqlitePool, id: i64) -> Result<Option<Submission>> {
    let row = sqlx::query_as::<_, Submission>(&format!(
        "SELECT {} FROM submissions WHERE id = ?",
        SUBMISSION_COLUMNS
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

pub async fn list_documents(pool: &SqlitePool, submission_id: i64) -> Result<Vec<Document>> {
    let docs = sqlx::query_as::<_, Document>(
        "SELECT id, submission_id, file_name, file_path, document_type
         FROM documents WHERE submission_id = ? ORDER BY id",
    )
    .bind(submission_id)
    .fetch_all(pool)
    .await?;

    Ok(docs)
}

/// Returns false when no submission has this id
pub async fn update_status(pool: &SqlitePool, id: i64, status: SubmissionStatus) -> Result<bool> {
    let result = sqlx::query("UPDATE submissions SET status = ? WHERE id = ?")
        .bind(status.as_str())
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Returns false when no submission has this id
pub async fn set_archived(pool: &SqlitePool, id: i64, archived: bool) -> Result<bool> {
    let result = sqlx::query("UPDATE submissions SET is_archived = ? WHERE id = ?")
        .bind(i64::from(archived))
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Delete a submission and its documents in one transaction.
///
/// Rolls back and returns false when the submission does not exist.
pub async fn delete_submission(pool: &SqlitePool, id: i64) -> Result<bool> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM documents WHERE submission_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    let deleted = sqlx::query("DELETE FROM submissions WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    if deleted == 0 {
        tx.rollback().await?;
        return Ok(false);
    }

    tx.commit().await?;
    Ok(true)
}
