//! App catalog route definitions

use axum::{
    routing::{get, put},
    Router,
};

use crate::handlers::apps::{create_app, delete_app, list_apps, update_app};
use crate::state::AppState;

pub fn app_routes() -> Router<AppState> {
    Router::new()
        .route("/api/apps", get(list_apps).post(create_app))
        .route("/api/apps/:id", put(update_app).delete(delete_app))
}
