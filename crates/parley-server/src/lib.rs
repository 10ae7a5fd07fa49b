//! Parley HTTP surface.
//!
//! Assembles the axum router over the application services and serves it.
//! Wiring lives here so integration tests can run the full surface against
//! an in-memory store and a scripted provider client.

mod auth;
mod error;
mod routes;
mod state;

use std::sync::Arc;

use axum::Router;

use parley_core::{AppConfig, GenerativeClient, ParleyError, Result};
use parley_infrastructure::{GeminiClient, SqliteStore, TokenService};

pub use state::AppState;

/// Builds the application router over an already wired state.
pub fn router(state: AppState) -> Router {
    routes::router(state)
}

/// Builds the production state from configuration: SQLite store, HMAC
/// token service and the Gemini provider client.
pub async fn build_state(config: &AppConfig) -> Result<AppState> {
    let store = Arc::new(SqliteStore::connect(&config.database_url).await?);
    let tokens = TokenService::new(&config.token_secret, config.token_ttl_minutes);
    let client: Arc<dyn GenerativeClient> = Arc::new(GeminiClient::new(
        &config.provider_api_key,
        &config.provider_model,
        config.provider_timeout_secs,
    )?);
    Ok(AppState::new(store, tokens, client))
}

/// Binds the configured address and serves until the process exits.
pub async fn serve(config: AppConfig) -> Result<()> {
    let state = build_state(&config).await?;
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind)
        .await
        .map_err(|e| ParleyError::config(format!("cannot bind {}: {}", config.bind, e)))?;
    tracing::info!(bind = %config.bind, "parley backend listening");
    axum::serve(listener, app)
        .await
        .map_err(|e| ParleyError::internal(format!("server terminated: {}", e)))
}
