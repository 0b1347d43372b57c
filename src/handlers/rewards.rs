//! Admin review handler for the reward lifecycle

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::middleware::AdminUser;
use crate::models::{Click, ClickStatus};
use crate::state::AppState;

/// Review request: move one click to a new status
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewClickRequest {
    pub click_id: Uuid,
    pub status: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewClickResponse {
    pub message: String,
    pub click: Click,
    pub payout_id: Option<Uuid>,
}

/// Apply an admin review decision
///
/// `POST /api/admin/clicks/review`
///
/// Admin capability is enforced by the extractor before anything runs; the
/// open status string from the wire is parsed into the closed enum here, so
/// the service only ever sees valid transitions.
pub async fn review_click(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Json(request): Json<ReviewClickRequest>,
) -> ApiResult<Json<ReviewClickResponse>> {
    let status = ClickStatus::from_str(&request.status).map_err(ApiError::ValidationError)?;

    let outcome = state
        .reward_service
        .review_click(request.click_id, status)
        .await
        .map_err(|e| ApiError::DatabaseError(e.to_string()))?
        .ok_or_else(|| ApiError::NotFound(format!("Click {} not found", request.click_id)))?;

    tracing::info!(
        click_id = %request.click_id,
        status = %status.as_str(),
        reviewer = %admin.user_id,
        "Click reviewed"
    );

    Ok(Json(ReviewClickResponse {
        message: format!("Click status updated to {}", status.as_str()),
        click: outcome.click,
        payout_id: outcome.payout_id,
    }))
}
