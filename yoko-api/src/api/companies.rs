//! Company endpoints

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use sqlx::SqlitePool;
use tracing::info;
use yoko_common::db::{Company, Role, Submission};
use yoko_common::reference::is_experience_level;

use crate::api::ArchiveRequest;
use crate::db::companies::{self, NewCompany};
use crate::db::submissions::{list_submissions, SubmissionFilter};
use crate::extract::{Json, Path, Query};
use crate::matching::{company_applicant_count, dedupe_roles, with_applicant_counts};
use crate::{ApiError, ApiResult, AppState};

#[derive(Debug, Deserialize)]
pub struct TopicQuery {
    pub topic: Option<String>,
}

/// Body of POST /api/companies.
///
/// `roles` stays untyped so a non-array value is reported as a 400 with
/// the usual error body.
#[derive(Debug, Deserialize)]
pub struct CreateCompanyRequest {
    pub name: Option<String>,
    pub roles: Option<Value>,
}

async fn active_submissions(db: &SqlitePool) -> ApiResult<Vec<Submission>> {
    Ok(list_submissions(db, &SubmissionFilter::default()).await?)
}

async fn companies_for_topic(state: &AppState, topic: Option<&str>) -> ApiResult<Vec<Company>> {
    let topic = topic.map(str::trim).filter(|t| !t.is_empty());
    let companies = companies::list_companies(&state.db, false, topic).await?;
    let submissions = active_submissions(&state.db).await?;
    Ok(with_applicant_counts(companies, &submissions))
}

fn parse_roles(raw: Option<Value>) -> ApiResult<Vec<Role>> {
    let items = match raw {
        Some(Value::Array(items)) if !items.is_empty() => items,
        _ => return Err(ApiError::BadRequest("Roles must be a non-empty array".to_string())),
    };

    let mut roles = Vec::with_capacity(items.len());
    for item in items {
        let role: Role = serde_json::from_value(item)
            .map_err(|_| ApiError::BadRequest("Each role must have a name".to_string()))?;
        let name = role.name.trim();
        if name.is_empty() {
            return Err(ApiError::BadRequest("Each role must have a name".to_string()));
        }
        if !is_experience_level(&role.experience) {
            return Err(ApiError::BadRequest(format!(
                "Unknown experience level: {}",
                role.experience
            )));
        }
        roles.push(Role::new(name, role.experience));
    }

    Ok(dedupe_roles(roles))
}

/// GET /api/companies?topic=T
pub async fn list_companies(
    State(state): State<AppState>,
    Query(query): Query<TopicQuery>,
) -> ApiResult<Json<Vec<Company>>> {
    Ok(Json(companies_for_topic(&state, query.topic.as_deref()).await?))
}

/// GET /api/companies/topic/:topic
pub async fn list_companies_by_topic(
    State(state): State<AppState>,
    Path(topic): Path<String>,
) -> ApiResult<Json<Vec<Company>>> {
    Ok(Json(companies_for_topic(&state, Some(&topic)).await?))
}

/// POST /api/companies
pub async fn create_company(
    State(state): State<AppState>,
    Json(payload): Json<CreateCompanyRequest>,
) -> ApiResult<(StatusCode, Json<Company>)> {
    let name = payload
        .name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .ok_or_else(|| ApiError::BadRequest("Company name is required".to_string()))?
        .to_string();
    let roles = parse_roles(payload.roles)?;

    let mut company = companies::insert_company(&state.db, &NewCompany { name, roles }).await?;
    let submissions = active_submissions(&state.db).await?;
    company.applicants_count = company_applicant_count(&company, &submissions);

    info!("Created company {} ({})", company.id, company.name);
    Ok((StatusCode::CREATED, Json(company)))
}

/// GET /api/companies/:company
///
/// Exact name lookup; archived companies are still returned.
pub async fn get_company(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ApiResult<Json<Company>> {
    let mut company = companies::get_company_by_name(&state.db, &name)
        .await?
        .ok_or_else(|| ApiError::NotFound("Company not found".to_string()))?;

    let submissions = active_submissions(&state.db).await?;
    company.applicants_count = company_applicant_count(&company, &submissions);

    Ok(Json(company))
}

/// POST /api/companies/:company/archive
pub async fn archive_company(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<ArchiveRequest>,
) -> ApiResult<Json<Value>> {
    if !companies::set_archived(&state.db, id, payload.archive).await? {
        return Err(ApiError::NotFound("Company not found".to_string()));
    }

    let message = if payload.archive {
        "Company archived successfully"
    } else {
        "Company unarchived successfully"
    };
    info!("Company {}: {}", id, message);

    Ok(Json(json!({ "message": message })))
}

/// GET /api/archived/companies
pub async fn list_archived_companies(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<Company>>> {
    let companies = companies::list_companies(&state.db, true, None).await?;
    let submissions = active_submissions(&state.db).await?;
    Ok(Json(with_applicant_counts(companies, &submissions)))
}

pub fn company_routes() -> Router<AppState> {
    Router::new()
        .route("/api/companies", get(list_companies).post(create_company))
        .route("/api/companies/topic/:topic", get(list_companies_by_topic))
        .route("/api/companies/:company", get(get_company))
        .route("/api/companies/:company/archive", post(archive_company))
        .route("/api/archived/companies", get(list_archived_companies))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_roles_accepts_both_shapes_and_dedupes() {
        let roles = parse_roles(Some(json!([
            "Sales",
            {"name": " HR ", "experience": "10+"},
            {"name": "Sales", "experience": "5-10"}
        ])))
        .unwrap();
        assert_eq!(roles, vec![Role::new("Sales", "0-5"), Role::new("HR", "10+")]);
    }

    #[test]
    fn test_parse_roles_rejects_bad_input() {
        assert!(parse_roles(None).is_err());
        assert!(parse_roles(Some(json!("Sales"))).is_err());
        assert!(parse_roles(Some(json!([]))).is_err());
        assert!(parse_roles(Some(json!([{"name": "  "}]))).is_err());
        assert!(parse_roles(Some(json!([{"name": "HR", "experience": "3"}]))).is_err());
        assert!(parse_roles(Some(json!([42]))).is_err());
    }
}
