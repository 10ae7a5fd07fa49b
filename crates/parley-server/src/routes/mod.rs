//! Route handlers, grouped by path prefix.

mod auth;
mod chat;

use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde_json::json;

use crate::state::AppState;

/// Assembles the full application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/auth/login", post(auth::login))
        .route("/auth/me", get(auth::me))
        .route("/chat/personas", get(chat::personas))
        .route("/chat/start", post(chat::start))
        .route("/chat/message", post(chat::message))
        .route("/chat/messages/:session_id", get(chat::messages))
        .route("/chat/end", post(chat::end))
        .route("/chat/summary", post(chat::save_summary))
        .route("/chat/delete/:session_id", delete(chat::delete))
        .route("/chat/history", get(chat::history))
        .route("/chat/scenario", post(chat::scenario))
        .with_state(state)
}

async fn root() -> Json<serde_json::Value> {
    Json(json!({ "message": "Parley backend is running" }))
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "healthy" }))
}
