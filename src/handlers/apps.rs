//! App catalog handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::apps::{CreateAppRequest, ListAppsQuery, UpdateAppRequest};
use crate::error::{ApiError, ApiResult};
use crate::middleware::AdminUser;
use crate::models::App;
use crate::state::AppState;

/// Public catalog listing
///
/// `GET /api/apps?category=...&featured=...&limit=...`
pub async fn list_apps(
    State(state): State<AppState>,
    Query(query): Query<ListAppsQuery>,
) -> ApiResult<Json<Vec<App>>> {
    let apps = state
        .app_service
        .list_apps(query)
        .await
        .map_err(|e| ApiError::DatabaseError(e.to_string()))?;

    Ok(Json(apps))
}

/// Add a catalog entry (admin)
///
/// `POST /api/apps`
pub async fn create_app(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Json(request): Json<CreateAppRequest>,
) -> ApiResult<(StatusCode, Json<App>)> {
    request.validate()?;

    let app = state
        .app_service
        .create_app(request)
        .await
        .map_err(|e| ApiError::DatabaseError(e.to_string()))?;

    Ok((StatusCode::CREATED, Json(app)))
}

/// Update a catalog entry (admin)
///
/// `PUT /api/apps/:id`
pub async fn update_app(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateAppRequest>,
) -> ApiResult<Json<App>> {
    request.validate()?;

    let app = state
        .app_service
        .update_app(id, request)
        .await
        .map_err(|e| ApiError::DatabaseError(e.to_string()))?
        .ok_or_else(|| ApiError::NotFound(format!("App {} not found", id)))?;

    Ok(Json(app))
}

/// Remove a catalog entry (admin)
///
/// `DELETE /api/apps/:id`
pub async fn delete_app(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let deleted = state
        .app_service
        .delete_app(id)
        .await
        .map_err(|e| ApiError::DatabaseError(e.to_string()))?;

    if !deleted {
        return Err(ApiError::NotFound(format!("App {} not found", id)));
    }

    Ok(StatusCode::NO_CONTENT)
}
