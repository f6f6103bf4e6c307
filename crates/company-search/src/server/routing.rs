//! Axum router configuration for all endpoints

use axum::{
  middleware::from_fn_with_state,
  routing::{get, post},
  Router,
};

use crate::server::handlers::{api, logs, pages, status};
use crate::server::middleware::{request_context_middleware, session_middleware};
use crate::server::state::AppState;

/// Create the main application router around shared state
pub fn create_router(state: AppState) -> Router {
  Router::new()
    // Pages
    .route("/", get(pages::index))
    .route("/login", post(pages::login))
    .route("/logout", post(pages::logout))
    .route("/search", post(pages::search))
    // JSON API
    .route("/api/login", post(api::api_login))
    .route("/api/logout", post(api::api_logout))
    .route("/api/search", post(api::api_search))
    // Status, version and logs
    .route("/status", get(status::status))
    .route("/version", get(status::version))
    .route("/logs", get(logs::get_logs))
    .layer(from_fn_with_state(state.clone(), session_middleware))
    .layer(from_fn_with_state(state.clone(), request_context_middleware))
    .with_state(state)
}
