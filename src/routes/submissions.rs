//! Referral submission route definitions

use axum::{routing::post, Router};

use crate::handlers::submissions::submit_referral;
use crate::state::AppState;

pub fn submission_routes() -> Router<AppState> {
    Router::new().route("/api/submissions", post(submit_referral))
}
