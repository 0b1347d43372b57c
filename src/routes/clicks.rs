//! Click tracking route definitions

use axum::{routing::get, Router};

use crate::handlers::clicks::{list_my_clicks, redirect_click, track_click};
use crate::state::AppState;

pub fn click_routes() -> Router<AppState> {
    Router::new()
        .route("/r/:app_id", get(redirect_click))
        .route("/api/clicks", get(list_my_clicks).post(track_click))
}
