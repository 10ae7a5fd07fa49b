//! Bearer-token request authentication.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use parley_core::ParleyError;
use parley_infrastructure::store::UserRecord;

use crate::error::ApiError;
use crate::state::AppState;

/// The authenticated caller, resolved from the `Authorization: Bearer`
/// header. Extraction fails with 401 for missing, malformed, expired or
/// orphaned tokens.
pub struct AuthUser(pub UserRecord);

#[axum::async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| ParleyError::auth("missing Authorization header"))?;
        let token = header
            .strip_prefix("Bearer ")
            .ok_or_else(|| ParleyError::auth("expected a bearer token"))?;
        let user = state.accounts.current_user(token).await?;
        Ok(AuthUser(user))
    }
}
