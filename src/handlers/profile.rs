//! Profile and payout-destination handlers

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::middleware::AuthenticatedUser;
use crate::models::{EarningsSummary, Profile};
use crate::state::AppState;
use crate::upi::validate_upi_id;

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub profile: Profile,
    pub earnings: EarningsSummary,
}

/// The caller's profile with live earnings aggregation
///
/// `GET /api/profile`
pub async fn get_profile(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> ApiResult<Json<ProfileResponse>> {
    let profile = state
        .profile_service
        .get_profile(user.user_id)
        .await
        .map_err(|e| ApiError::DatabaseError(e.to_string()))?
        .ok_or_else(|| ApiError::NotFound("Profile not found".to_string()))?;

    let earnings = state
        .profile_service
        .earnings_summary(user.user_id)
        .await
        .map_err(|e| ApiError::DatabaseError(e.to_string()))?;

    Ok(Json(ProfileResponse { profile, earnings }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUpiRequest {
    pub upi_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUpiResponse {
    pub message: String,
    pub upi_id: String,
}

/// Validate and persist the caller's payout destination
///
/// `POST /api/profile/upi`
///
/// The per-user attempt limit is checked before any storage access. Storage
/// failures are masked behind a correlation id; the raw error is only
/// logged.
pub async fn update_upi(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(request): Json<UpdateUpiRequest>,
) -> ApiResult<Json<UpdateUpiResponse>> {
    if !state.upi_rate_limiter.check(user.user_id).await {
        tracing::warn!(user_id = %user.user_id, "UPI update rate limit exceeded");
        return Err(ApiError::TooManyRequests);
    }

    validate_upi_id(&request.upi_id).map_err(ApiError::ValidationError)?;

    let updated = state
        .profile_service
        .set_upi_id(user.user_id, &request.upi_id)
        .await
        .map_err(|e| {
            let reference = Uuid::new_v4();
            tracing::error!(
                reference = %reference,
                user_id = %user.user_id,
                error = %e,
                "Failed to persist payout destination"
            );
            ApiError::StorageFailure { reference }
        })?;

    if !updated {
        return Err(ApiError::NotFound("Profile not found".to_string()));
    }

    tracing::info!(user_id = %user.user_id, "Payout destination updated");

    Ok(Json(UpdateUpiResponse {
        message: "UPI ID updated successfully".to_string(),
        upi_id: request.upi_id,
    }))
}
