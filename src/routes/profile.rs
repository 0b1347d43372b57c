//! Profile route definitions

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::profile::{get_profile, update_upi};
use crate::state::AppState;

pub fn profile_routes() -> Router<AppState> {
    Router::new()
        .route("/api/profile", get(get_profile))
        .route("/api/profile/upi", post(update_upi))
}
