//! Referral submission handlers

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use validator::Validate;

use crate::error::{ApiError, ApiResult};
use crate::middleware::{AdminUser, AuthenticatedUser};
use crate::models::{ReferralSubmission, SubmissionStatus};
use crate::state::AppState;
use crate::submissions::SubmitReferralRequest;

/// Propose a referral app for the catalog
///
/// `POST /api/submissions`
pub async fn submit_referral(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(request): Json<SubmitReferralRequest>,
) -> ApiResult<(StatusCode, Json<ReferralSubmission>)> {
    request.validate()?;

    let submission = state
        .submission_service
        .create_submission(user.user_id, request)
        .await
        .map_err(|e| ApiError::DatabaseError(e.to_string()))?;

    Ok((StatusCode::CREATED, Json(submission)))
}

#[derive(Debug, Deserialize, Default)]
pub struct ListSubmissionsQuery {
    pub status: Option<SubmissionStatus>,
    pub limit: Option<i64>,
}

/// The admin review queue of proposed apps
///
/// `GET /api/admin/submissions`
pub async fn list_submissions(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Query(query): Query<ListSubmissionsQuery>,
) -> ApiResult<Json<Vec<ReferralSubmission>>> {
    let submissions = state
        .submission_service
        .list_recent(query.status, query.limit)
        .await
        .map_err(|e| ApiError::DatabaseError(e.to_string()))?;

    Ok(Json(submissions))
}
