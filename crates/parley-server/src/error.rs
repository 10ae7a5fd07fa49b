//! HTTP error mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use parley_core::ParleyError;

/// Response-side wrapper over the core error taxonomy.
///
/// Handlers return `Result<_, ApiError>`; the `From` impl keeps `?` usable
/// directly on service calls.
#[derive(Debug)]
pub struct ApiError(pub ParleyError);

impl From<ParleyError> for ApiError {
    fn from(err: ParleyError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            ParleyError::Auth(_) => StatusCode::UNAUTHORIZED,
            ParleyError::Validation(_) | ParleyError::UnknownPersona(_) => StatusCode::BAD_REQUEST,
            ParleyError::NotFound { .. } => StatusCode::NOT_FOUND,
            ParleyError::InvariantViolation(_) => StatusCode::CONFLICT,
            ParleyError::Provider(_)
            | ParleyError::Database(_)
            | ParleyError::Serialization { .. }
            | ParleyError::Config(_)
            | ParleyError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self.0, "request failed");
        }
        (status, Json(json!({ "detail": self.0.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: ParleyError) -> StatusCode {
        ApiError(err).into_response().status()
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            status_of(ParleyError::auth("bad token")),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status_of(ParleyError::validation("empty roster")),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(ParleyError::not_found("session", 9)),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(ParleyError::invariant("session ended")),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(ParleyError::database("locked")),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
