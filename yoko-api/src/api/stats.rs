//! Dashboard chart data

use axum::{extract::State, routing::get, Router};

use crate::analytics::{summarize, SubmissionSummary};
use crate::api::submissions::SubmissionQuery;
use crate::db::submissions::list_submissions;
use crate::extract::{Json, Query};
use crate::{ApiResult, AppState};

/// GET /api/stats?company=C&topic=T
///
/// Aggregates the same applicants GET /api/submissions would return.
pub async fn submission_stats(
    State(state): State<AppState>,
    Query(query): Query<SubmissionQuery>,
) -> ApiResult<Json<SubmissionSummary>> {
    let rows = list_submissions(&state.db, &query.into_filter()).await?;
    Ok(Json(summarize(&rows)))
}

pub fn stats_routes() -> Router<AppState> {
    Router::new().route("/api/stats", get(submission_stats))
}
