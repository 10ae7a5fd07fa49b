//! Login and identity endpoints.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use parley_application::LoginOutcome;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub role: String,
    #[serde(default)]
    pub age: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct Profile {
    pub id: i64,
    pub username: String,
    pub role: String,
    pub age: Option<i64>,
}

pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginOutcome>, ApiError> {
    let outcome = state
        .accounts
        .login(&request.username, &request.role, request.age)
        .await?;
    Ok(Json(outcome))
}

pub async fn me(AuthUser(user): AuthUser) -> Json<Profile> {
    Json(Profile {
        id: user.id,
        username: user.username,
        role: user.role,
        age: user.age,
    })
}
