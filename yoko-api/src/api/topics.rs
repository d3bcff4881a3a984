//! Topic listing with live counts

use axum::{extract::State, routing::get, Json, Router};
use yoko_common::db::TopicStats;

use crate::db::{companies, submissions, topics};
use crate::matching::topic_stats;
use crate::{ApiResult, AppState};

/// GET /api/topics
///
/// Counts cover non-archived companies and applicants only, and are
/// recomputed on every request.
pub async fn list_topics(State(state): State<AppState>) -> ApiResult<Json<Vec<TopicStats>>> {
    let topics = topics::list_topics(&state.db).await?;
    let companies = companies::list_companies(&state.db, false, None).await?;
    let submissions =
        submissions::list_submissions(&state.db, &submissions::SubmissionFilter::default()).await?;

    Ok(Json(topic_stats(topics, &companies, &submissions)))
}

pub fn topic_routes() -> Router<AppState> {
    Router::new().route("/api/topics", get(list_topics))
}
