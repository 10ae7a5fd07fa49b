//! End-to-end HTTP tests against a bound listener.
//!
//! The full router runs over an in-memory store and a scripted provider
//! client, so the tests exercise everything except the real Gemini API.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use parley_core::{GenerativeClient, ProviderError};
use parley_infrastructure::{SqliteStore, TokenService};
use parley_server::AppState;

struct ScriptedClient;

#[async_trait]
impl GenerativeClient for ScriptedClient {
    async fn complete(
        &self,
        _instruction: &str,
        _context: Option<&str>,
        _message: &str,
    ) -> Result<String, ProviderError> {
        Ok("Show me the numbers first.".to_string())
    }

    async fn complete_structured(&self, _instruction: &str) -> Result<Value, ProviderError> {
        Ok(json!({ "score": 8, "feedback": "Clear ask, good framing" }))
    }
}

/// Boots the full router on an ephemeral port and returns its base URL.
async fn spawn_server() -> String {
    let store = Arc::new(SqliteStore::in_memory().await.unwrap());
    let tokens = TokenService::new("test-secret", 60);
    let state = AppState::new(store, tokens, Arc::new(ScriptedClient));
    let app = parley_server::router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

async fn login(client: &reqwest::Client, base: &str, username: &str, role: &str) -> Value {
    client
        .post(format!("{}/auth/login", base))
        .json(&json!({ "username": username, "role": role }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap()
}

#[tokio::test]
async fn test_full_conversation_flow() {
    let base = spawn_server().await;
    let client = reqwest::Client::new();

    let login_body = login(&client, &base, "alice", "pm").await;
    let token = login_body["token"].as_str().unwrap().to_string();

    let start: Value = client
        .post(format!("{}/chat/start", base))
        .bearer_auth(&token)
        .json(&json!({ "scenario": "Budget cut", "personas": ["CEO"] }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let session_id = start["session_id"].as_i64().unwrap();
    assert_eq!(start["persona"], "CEO");
    assert!(!start["message"].as_str().unwrap().is_empty());

    let turn: Value = client
        .post(format!("{}/chat/message", base))
        .bearer_auth(&token)
        .json(&json!({ "session_id": session_id, "message": "I need more budget" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(turn["persona"], "CEO");
    assert!(!turn["message"].as_str().unwrap().is_empty());
    let score = turn["feedback"]["score"].as_i64().unwrap();
    assert!((-1..=10).contains(&score));

    let closing: Value = client
        .post(format!("{}/chat/end", base))
        .bearer_auth(&token)
        .json(&json!({ "session_id": session_id }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(!closing["summary"].as_str().unwrap().is_empty());
    assert!(!closing["evaluation"].as_str().unwrap().is_empty());

    let history: Value = client
        .get(format!("{}/chat/history", base))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let entries = history.as_array().unwrap();
    assert_eq!(entries.len(), 1);
    // Opening line, user message, persona reply.
    assert_eq!(entries[0]["message_count"].as_i64().unwrap(), 3);
    assert_eq!(entries[0]["persona"], "CEO");
}

#[tokio::test]
async fn test_relogin_with_mismatched_role_is_rejected() {
    let base = spawn_server().await;
    let client = reqwest::Client::new();

    login(&client, &base, "alice", "pm").await;
    let response = client
        .post(format!("{}/auth/login", base))
        .json(&json!({ "username": "alice", "role": "owner" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);

    // The original account is untouched.
    let again = login(&client, &base, "alice", "pm").await;
    assert_eq!(again["role"], "pm");
}

#[tokio::test]
async fn test_requests_without_token_are_unauthorized() {
    let base = spawn_server().await;
    let client = reqwest::Client::new();

    let response = client
        .get(format!("{}/chat/history", base))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 401);

    let response = client
        .get(format!("{}/auth/me", base))
        .bearer_auth("tampered.token")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 401);
}

#[tokio::test]
async fn test_delete_missing_session_is_not_found() {
    let base = spawn_server().await;
    let client = reqwest::Client::new();

    let login_body = login(&client, &base, "alice", "pm").await;
    let token = login_body["token"].as_str().unwrap();

    let response = client
        .delete(format!("{}/chat/delete/999", base))
        .bearer_auth(token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn test_message_on_ended_session_conflicts() {
    let base = spawn_server().await;
    let client = reqwest::Client::new();

    let login_body = login(&client, &base, "alice", "pm").await;
    let token = login_body["token"].as_str().unwrap().to_string();

    let start: Value = client
        .post(format!("{}/chat/start", base))
        .bearer_auth(&token)
        .json(&json!({ "scenario": "Budget cut", "personas": ["CEO"] }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let session_id = start["session_id"].as_i64().unwrap();

    client
        .post(format!("{}/chat/end", base))
        .bearer_auth(&token)
        .json(&json!({ "session_id": session_id }))
        .send()
        .await
        .unwrap();

    let response = client
        .post(format!("{}/chat/message", base))
        .bearer_auth(&token)
        .json(&json!({ "session_id": session_id, "message": "one more" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 409);
}

#[tokio::test]
async fn test_personas_and_health_are_public() {
    let base = spawn_server().await;
    let client = reqwest::Client::new();

    let personas: Value = client
        .get(format!("{}/chat/personas", base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(personas.as_array().unwrap().len(), 17);

    let health: Value = client
        .get(format!("{}/health", base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(health["status"], "healthy");
}
