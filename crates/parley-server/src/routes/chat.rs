//! Conversation endpoints.

use axum::extract::{Path, State};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use parley_application::{
    HistoryEntry, SessionClosing, SessionOpening, StartSession, TurnOutcome,
};
use parley_core::memory::Feedback;
use parley_core::{PersonaCatalog, PersonaDefinition};

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;

pub async fn personas() -> Json<Vec<PersonaDefinition>> {
    Json(PersonaCatalog::all().to_vec())
}

pub async fn start(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(request): Json<StartSession>,
) -> Result<Json<SessionOpening>, ApiError> {
    let opening = state.orchestrator.start(user.id, request).await?;
    Ok(Json(opening))
}

#[derive(Debug, Deserialize)]
pub struct MessageRequest {
    pub session_id: i64,
    pub message: String,
}

pub async fn message(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(request): Json<MessageRequest>,
) -> Result<Json<TurnOutcome>, ApiError> {
    let outcome = state
        .orchestrator
        .message(user.id, request.session_id, &request.message)
        .await?;
    Ok(Json(outcome))
}

/// Wire view of one durable message.
#[derive(Debug, Serialize)]
pub struct MessageView {
    pub id: i64,
    pub kind: String,
    pub content: String,
    pub persona: Option<String>,
    pub feedback: Option<Feedback>,
    pub timestamp: DateTime<Utc>,
}

pub async fn messages(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(session_id): Path<i64>,
) -> Result<Json<Vec<MessageView>>, ApiError> {
    let records = state.orchestrator.messages(user.id, session_id).await?;
    Ok(Json(
        records
            .into_iter()
            .map(|m| MessageView {
                id: m.id,
                kind: m.kind,
                content: m.content,
                persona: m.persona,
                feedback: m.feedback.map(|f| f.0),
                timestamp: m.timestamp,
            })
            .collect(),
    ))
}

#[derive(Debug, Deserialize)]
pub struct EndRequest {
    pub session_id: i64,
}

pub async fn end(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(request): Json<EndRequest>,
) -> Result<Json<SessionClosing>, ApiError> {
    let closing = state.orchestrator.end(user.id, request.session_id).await?;
    Ok(Json(closing))
}

#[derive(Debug, Deserialize)]
pub struct SaveSummaryRequest {
    pub session_id: i64,
    pub summary: String,
    pub evaluation: String,
}

pub async fn save_summary(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(request): Json<SaveSummaryRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state
        .orchestrator
        .save_summary(
            user.id,
            request.session_id,
            &request.summary,
            &request.evaluation,
        )
        .await?;
    Ok(Json(json!({ "detail": "Summary saved" })))
}

pub async fn delete(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(session_id): Path<i64>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.orchestrator.delete(user.id, session_id).await?;
    Ok(Json(json!({ "detail": "Session deleted" })))
}

pub async fn history(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<Vec<HistoryEntry>>, ApiError> {
    Ok(Json(state.orchestrator.history(user.id).await?))
}

#[derive(Debug, Deserialize)]
pub struct ScenarioRequest {
    pub role: String,
    pub difficulty: String,
    #[serde(default)]
    pub user_role: Option<String>,
    #[serde(default)]
    pub partner_role: Option<String>,
}

pub async fn scenario(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
    Json(request): Json<ScenarioRequest>,
) -> Json<serde_json::Value> {
    let scenario = state
        .coach
        .scenario(
            &request.role,
            &request.difficulty,
            request.user_role.as_deref(),
            request.partner_role.as_deref(),
        )
        .await;
    Json(json!({ "scenario": scenario }))
}
