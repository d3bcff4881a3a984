//! Applicant submission endpoints

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, patch, post},
    Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info, warn};
use yoko_common::db::{Submission, SubmissionDetail, SubmissionStatus};

use crate::api::ArchiveRequest;
use crate::db::submissions::{
    self, ArchiveScope, NewDocument, NewSubmission, SubmissionFilter,
};
use crate::extract::{Json, Path, Query};
use crate::matching::normalize_names;
use crate::{ApiError, ApiResult, AppState};

/// One uploaded document as sent by the wizard
#[derive(Debug, Deserialize)]
pub struct DocumentUpload {
    pub name: Option<String>,
    pub path: Option<String>,
    #[serde(rename = "type")]
    pub document_type: Option<String>,
}

/// Body of POST /api/submit
#[derive(Debug, Default, Deserialize)]
pub struct SubmitRequest {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub referral_source: Option<String>,
    pub experience_level: Option<String>,
    pub fields: Option<Vec<String>>,
    pub position: Option<String>,
    pub company: Option<String>,
    pub countries_worked_in: Option<Vec<String>>,
    pub achievements: Option<String>,
    pub documents: Option<Vec<DocumentUpload>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SubmissionQuery {
    pub company: Option<String>,
    pub topic: Option<String>,
    pub q: Option<String>,
}

impl SubmissionQuery {
    /// Active-submission filter; blank parameters are ignored
    pub fn into_filter(self) -> SubmissionFilter {
        SubmissionFilter {
            scope: ArchiveScope::Active,
            company: non_blank(self.company),
            topic: non_blank(self.topic),
            name_query: non_blank(self.q),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    pub status: Option<String>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// `local@domain.tld` with no whitespace and a single `@`
pub(crate) fn looks_like_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
}

impl TryFrom<SubmitRequest> for NewSubmission {
    type Error = ApiError;

    fn try_from(req: SubmitRequest) -> Result<Self, Self::Error> {
        let full_name = non_blank(req.full_name)
            .ok_or_else(|| ApiError::BadRequest("Full name is required".to_string()))?;
        let email = non_blank(req.email)
            .filter(|e| looks_like_email(e))
            .ok_or_else(|| ApiError::BadRequest("A valid email address is required".to_string()))?;

        let documents = req
            .documents
            .unwrap_or_default()
            .into_iter()
            .map(|doc| NewDocument {
                file_name: doc.name,
                file_path: doc.path,
                document_type: doc.document_type,
            })
            .collect();

        Ok(NewSubmission {
            full_name,
            email,
            phone_number: non_blank(req.phone_number),
            referral_source: non_blank(req.referral_source),
            experience_level: non_blank(req.experience_level),
            fields: normalize_names(req.fields.unwrap_or_default()),
            position: non_blank(req.position),
            company: non_blank(req.company),
            countries_worked_in: normalize_names(req.countries_worked_in.unwrap_or_default()),
            achievements: non_blank(req.achievements),
            documents,
        })
    }
}

/// POST /api/submit
///
/// The confirmation email goes out on a background task; a mail failure is
/// logged and never fails the submission.
pub async fn submit(
    State(state): State<AppState>,
    Json(payload): Json<SubmitRequest>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let new = NewSubmission::try_from(payload)?;
    let id = submissions::insert_submission(&state.db, &new).await?;
    info!("Received submission {} ({} document(s))", id, new.documents.len());

    if state.mailer.is_enabled() {
        let mailer = state.mailer.clone();
        let (email, name) = (new.email, new.full_name);
        tokio::spawn(async move {
            match mailer.send_confirmation(&email, &name).await {
                Ok(()) => info!("Confirmation email sent for submission {}", id),
                Err(e) => warn!("Confirmation email for submission {} failed: {}", id, e),
            }
        });
    } else {
        debug!("Mail disabled; no confirmation for submission {}", id);
    }

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Submission successful",
            "id": id,
        })),
    ))
}

/// GET /api/submissions?company=C&topic=T&q=S
pub async fn list_submissions(
    State(state): State<AppState>,
    Query(query): Query<SubmissionQuery>,
) -> ApiResult<Json<Vec<Submission>>> {
    let rows = submissions::list_submissions(&state.db, &query.into_filter()).await?;
    Ok(Json(rows))
}

/// GET /api/submissions/:id
pub async fn get_submission(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<SubmissionDetail>> {
    let submission = submissions::get_submission(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Submission not found".to_string()))?;
    let documents = submissions::list_documents(&state.db, id).await?;

    Ok(Json(SubmissionDetail { submission, documents }))
}

/// PATCH /api/submissions/:id/status
pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<StatusRequest>,
) -> ApiResult<Json<Value>> {
    let status: SubmissionStatus = payload
        .status
        .as_deref()
        .ok_or_else(|| ApiError::BadRequest("Status is required".to_string()))?
        .parse()?;

    if !submissions::update_status(&state.db, id, status).await? {
        return Err(ApiError::NotFound("Submission not found".to_string()));
    }

    info!("Submission {} status set to {}", id, status);
    Ok(Json(json!({ "message": "Status updated successfully" })))
}

/// POST /api/submissions/:id/archive
pub async fn archive_submission(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<ArchiveRequest>,
) -> ApiResult<Json<Value>> {
    if !submissions::set_archived(&state.db, id, payload.archive).await? {
        return Err(ApiError::NotFound("Submission not found".to_string()));
    }

    let message = if payload.archive {
        "Applicant archived successfully"
    } else {
        "Applicant unarchived successfully"
    };
    info!("Submission {}: {}", id, message);

    Ok(Json(json!({ "message": message })))
}

/// DELETE /api/submissions/:id
pub async fn delete_submission(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Value>> {
    if !submissions::delete_submission(&state.db, id).await? {
        return Err(ApiError::NotFound("Submission not found".to_string()));
    }

    info!("Deleted submission {}", id);
    Ok(Json(json!({
        "message": "Submission and associated documents deleted successfully"
    })))
}

/// GET /api/applicants/:topic
///
/// Archived applicants are included.
pub async fn list_applicants_by_topic(
    State(state): State<AppState>,
    Path(topic): Path<String>,
) -> ApiResult<Json<Vec<Submission>>> {
    let filter = SubmissionFilter {
        scope: ArchiveScope::All,
        topic: Some(topic),
        ..Default::default()
    };
    Ok(Json(submissions::list_submissions(&state.db, &filter).await?))
}

/// GET /api/archived/submissions
pub async fn list_archived_submissions(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<Submission>>> {
    let filter = SubmissionFilter {
        scope: ArchiveScope::Archived,
        ..Default::default()
    };
    Ok(Json(submissions::list_submissions(&state.db, &filter).await?))
}

pub fn submission_routes() -> Router<AppState> {
    Router::new()
        .route("/api/submit", post(submit))
        .route("/api/submissions", get(list_submissions))
        .route(
            "/api/submissions/:id",
            get(get_submission).delete(delete_submission),
        )
        .route("/api/submissions/:id/status", patch(update_status))
        .route("/api/submissions/:id/archive", post(archive_submission))
        .route("/api/applicants/:topic", get(list_applicants_by_topic))
        .route("/api/archived/submissions", get(list_archived_submissions))
}
