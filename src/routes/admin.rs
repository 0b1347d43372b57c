//! Admin route definitions

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::clicks::list_recent_clicks;
use crate::handlers::rewards::review_click;
use crate::handlers::submissions::list_submissions;
use crate::state::AppState;

pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/api/admin/clicks", get(list_recent_clicks))
        .route("/api/admin/clicks/review", post(review_click))
        .route("/api/admin/submissions", get(list_submissions))
}
