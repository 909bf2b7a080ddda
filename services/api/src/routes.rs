//! API service routes

use axum::{Json, Router, response::IntoResponse, routing::get};
use serde_json::json;

use crate::state::AppState;

pub mod categories;
pub mod todos;
pub mod users;

/// Create the router for the API service
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/users", users::router())
        .nest("/api/categories", categories::router())
        .nest("/api/todos", todos::router())
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "todo-api"
    }))
}
