use crate::handlers;
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post, put},
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/state", get(handlers::get_state))
        .route("/api/register", post(handlers::register))
        .route("/api/login", post(handlers::login))
        .route("/api/logout", post(handlers::logout))
        .route("/api/profile", put(handlers::update_profile))
        .route("/api/activities", post(handlers::record_activity))
        .route("/api/analyze", post(handlers::analyze))
        .route("/api/options", get(handlers::get_options))
        .with_state(state)
}
