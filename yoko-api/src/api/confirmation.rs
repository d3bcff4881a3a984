//! Manual confirmation email trigger

use axum::{extract::State, routing::post, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{error, info};

use crate::extract::Json;
use crate::{ApiError, ApiResult, AppState};

#[derive(Debug, Deserialize)]
pub struct ConfirmationRequest {
    pub email: Option<String>,
    pub name: Option<String>,
}

/// POST /api/send-confirmation
///
/// Unlike the send that follows POST /api/submit, a failure here (mail
/// disabled included) is reported to the caller as a 500.
pub async fn send_confirmation(
    State(state): State<AppState>,
    Json(payload): Json<ConfirmationRequest>,
) -> ApiResult<Json<Value>> {
    let email = payload
        .email
        .as_deref()
        .map(str::trim)
        .filter(|e| !e.is_empty())
        .ok_or_else(|| ApiError::BadRequest("Email is required".to_string()))?;
    let name = payload
        .name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .unwrap_or("Applicant");

    if let Err(e) = state.mailer.send_confirmation(email, name).await {
        error!("Confirmation email to {} failed: {}", email, e);
        return Err(ApiError::Internal("Failed to send email".to_string()));
    }

    info!("Confirmation email sent to {}", email);
    Ok(Json(json!({ "message": "Confirmation email sent" })))
}

pub fn confirmation_routes() -> Router<AppState> {
    Router::new().route("/api/send-confirmation", post(send_confirmation))
}
