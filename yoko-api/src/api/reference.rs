//! Static lookup data used by the application wizard

use axum::{routing::get, Json, Router};
use serde::Serialize;
use yoko_common::db::SubmissionStatus;
use yoko_common::reference::{
    CountryCode, ExperienceLevel, COUNTRY_CODES, DOCUMENT_TYPES, EXPERIENCE_LEVELS,
};

use crate::AppState;

#[derive(Debug, Serialize)]
pub struct ReferenceData {
    pub experience_levels: &'static [ExperienceLevel],
    pub document_types: &'static [&'static str],
    pub country_codes: &'static [CountryCode],
    pub statuses: Vec<&'static str>,
}

/// GET /api/reference
pub async fn reference_data() -> Json<ReferenceData> {
    Json(ReferenceData {
        experience_levels: EXPERIENCE_LEVELS,
        document_types: DOCUMENT_TYPES,
        country_codes: COUNTRY_CODES,
        statuses: SubmissionStatus::ALL.iter().map(|s| s.as_str()).collect(),
    })
}

pub fn reference_routes() -> Router<AppState> {
    Router::new().route("/api/reference", get(reference_data))
}
