//! Click tracking handlers
//!
//! The redirect path is the user journey: a failed tracking insert is logged
//! and the navigation to the referral link proceeds regardless.

use axum::{
    extract::{Path, Query, State},
    http::header::SET_COOKIE,
    response::{AppendHeaders, IntoResponse, Redirect, Response},
    Json,
};
use axum_extra::extract::CookieJar;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::attribution::{self, UtmQuery, ANON_ID_COOKIE};
use crate::error::{ApiError, ApiResult};
use crate::middleware::{AdminUser, OptionalUser};
use crate::models::{Click, ClickWithApp};
use crate::state::AppState;

/// Set-Cookie value for a freshly minted anonymous id
fn anon_cookie(anonymous_id: &str, ttl_days: i64) -> String {
    format!(
        "{}={}; Max-Age={}; Path=/; SameSite=Lax",
        ANON_ID_COOKIE,
        anonymous_id,
        ttl_days * 24 * 60 * 60
    )
}

/// Track a click and redirect to the app's referral link
///
/// `GET /r/:app_id?utm_source=...&utm_medium=...&utm_campaign=...&my_referral=...`
pub async fn redirect_click(
    State(state): State<AppState>,
    Path(app_id): Path<Uuid>,
    Query(query): Query<UtmQuery>,
    OptionalUser(user): OptionalUser,
    jar: CookieJar,
) -> ApiResult<Response> {
    let app = state
        .app_service
        .get_app(app_id)
        .await
        .map_err(|e| ApiError::DatabaseError(e.to_string()))?
        .ok_or_else(|| ApiError::NotFound(format!("App {} not found", app_id)))?;

    let existing_anon = jar.get(ANON_ID_COOKIE).map(|c| c.value().to_string());
    let resolved = attribution::resolve(
        user.map(|u| u.user_id),
        &query,
        existing_anon.as_deref(),
    );

    // Tracking failure is not fatal to the user journey
    if let Err(e) = state
        .click_service
        .record_click(app_id, &resolved.attribution)
        .await
    {
        tracing::error!(app_id = %app_id, error = %e, "Failed to record click; redirect proceeds");
    }

    let redirect = Redirect::temporary(&app.referral_link);
    let response = match resolved.new_anonymous_id {
        Some(anon_id) => (
            AppendHeaders([(SET_COOKIE, anon_cookie(&anon_id, state.anon_cookie_ttl_days))]),
            redirect,
        )
            .into_response(),
        None => redirect.into_response(),
    };

    Ok(response)
}

/// Request body for JSON click tracking
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackClickRequest {
    pub app_id: Uuid,
    pub utm_source: Option<String>,
    pub utm_medium: Option<String>,
    pub utm_campaign: Option<String>,
    #[serde(default)]
    pub my_referral: Option<bool>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackClickResponse {
    pub click: Click,
}

/// Track a click without a redirect (used by the single-page frontend)
///
/// `POST /api/clicks`
pub async fn track_click(
    State(state): State<AppState>,
    OptionalUser(user): OptionalUser,
    jar: CookieJar,
    Json(request): Json<TrackClickRequest>,
) -> ApiResult<Response> {
    // The app must exist; a click against an unknown app is a client error
    state
        .app_service
        .get_app(request.app_id)
        .await
        .map_err(|e| ApiError::DatabaseError(e.to_string()))?
        .ok_or_else(|| ApiError::NotFound(format!("App {} not found", request.app_id)))?;

    let query = UtmQuery {
        utm_source: request.utm_source,
        utm_medium: request.utm_medium,
        utm_campaign: request.utm_campaign,
        my_referral: request.my_referral,
    };
    let existing_anon = jar.get(ANON_ID_COOKIE).map(|c| c.value().to_string());
    let resolved = attribution::resolve(
        user.map(|u| u.user_id),
        &query,
        existing_anon.as_deref(),
    );

    let click = state
        .click_service
        .record_click(request.app_id, &resolved.attribution)
        .await
        .map_err(|e| ApiError::DatabaseError(e.to_string()))?;

    let body = Json(TrackClickResponse { click });
    let response = match resolved.new_anonymous_id {
        Some(anon_id) => (
            AppendHeaders([(SET_COOKIE, anon_cookie(&anon_id, state.anon_cookie_ttl_days))]),
            body,
        )
            .into_response(),
        None => body.into_response(),
    };

    Ok(response)
}

#[derive(Debug, Deserialize, Default)]
pub struct ListClicksQuery {
    pub limit: Option<i64>,
}

/// The caller's recent clicks, newest first
///
/// `GET /api/clicks`
///
/// Anonymous visitors see the history tied to their cookie id; callers with
/// neither a token nor a cookie have nothing to list.
pub async fn list_my_clicks(
    State(state): State<AppState>,
    OptionalUser(user): OptionalUser,
    jar: CookieJar,
    Query(query): Query<ListClicksQuery>,
) -> ApiResult<Json<Vec<Click>>> {
    let clicks = match (user, jar.get(ANON_ID_COOKIE)) {
        (Some(user), _) => state
            .click_service
            .list_for_user(user.user_id, query.limit)
            .await
            .map_err(|e| ApiError::DatabaseError(e.to_string()))?,
        (None, Some(cookie)) => state
            .click_service
            .list_for_anonymous(cookie.value(), query.limit)
            .await
            .map_err(|e| ApiError::DatabaseError(e.to_string()))?,
        (None, None) => {
            return Err(ApiError::Unauthorized(
                "Sign in or track a click first".to_string(),
            ))
        }
    };

    Ok(Json(clicks))
}

/// Recent clicks across all actors, joined with app details, for review
///
/// `GET /api/admin/clicks`
pub async fn list_recent_clicks(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Query(query): Query<ListClicksQuery>,
) -> ApiResult<Json<Vec<ClickWithApp>>> {
    let clicks = state
        .click_service
        .list_recent(query.limit)
        .await
        .map_err(|e| ApiError::DatabaseError(e.to_string()))?;

    Ok(Json(clicks))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anon_cookie_format() {
        let cookie = anon_cookie("anon_abc", 30);
        assert!(cookie.starts_with("ref_anon_id=anon_abc;"));
        assert!(cookie.contains("Max-Age=2592000"));
        assert!(cookie.contains("Path=/"));
    }
}
