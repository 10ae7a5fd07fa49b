//! Error types for the Parley backend.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::llm::ProviderError;

/// A shared error type for the entire Parley backend.
///
/// This provides typed, structured error variants with automatic conversion
/// from common error types via the `From` trait. Provider failures carry
/// their own variant so callers can convert them to fallback values at the
/// orchestration boundary instead of swallowing them deep inside
/// composition logic.
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum ParleyError {
    /// Authentication failure (missing/invalid/expired token, or a
    /// username re-login with mismatched role/age)
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// A persona key that is not present in the catalog
    #[error("Unknown persona: '{0}'")]
    UnknownPersona(String),

    /// The external generative provider failed
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Entity not found with type information
    #[error("Entity not found: {entity_type} '{id}'")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// An operation was attempted against a session in the wrong state
    /// (e.g. message/end on a non-active session)
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    /// Request validation failure (empty roster, blank scenario, etc.)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Database access error
    #[error("Database error: {0}")]
    Database(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization { format: String, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ParleyError {
    /// Creates an Auth error
    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth(message.into())
    }

    /// Creates a NotFound error
    pub fn not_found(entity_type: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity_type,
            id: id.to_string(),
        }
    }

    /// Creates an InvariantViolation error
    pub fn invariant(message: impl Into<String>) -> Self {
        Self::InvariantViolation(message.into())
    }

    /// Creates a Validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Creates a Database error
    pub fn database(message: impl Into<String>) -> Self {
        Self::Database(message.into())
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Check if this is a NotFound error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is an Auth error
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Auth(_))
    }

    /// Check if this is an InvariantViolation error
    pub fn is_invariant_violation(&self) -> bool {
        matches!(self, Self::InvariantViolation(_))
    }

    /// Check if this is a Provider error
    pub fn is_provider(&self) -> bool {
        matches!(self, Self::Provider(_))
    }
}

impl From<serde_json::Error> for ParleyError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<minijinja::Error> for ParleyError {
    fn from(err: minijinja::Error) -> Self {
        Self::Internal(format!("template render failed: {}", err))
    }
}

/// A type alias for `Result<T, ParleyError>`.
pub type Result<T> = std::result::Result<T, ParleyError>;
