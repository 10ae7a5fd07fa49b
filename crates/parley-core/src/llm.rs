//! Generative provider abstraction.
//!
//! The backend delegates all "intelligence" (persona dialogue, turn routing,
//! feedback scoring, summarization) to an external generative model. This
//! module defines the seam: every call is fallible and callers decide their
//! own fallback, so provider instability never hard-fails a conversation.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure modes of the external generative provider.
///
/// The taxonomy is deliberately coarse: callers treat every variant the
/// same way (fall back to a deterministic default), but the variant keeps
/// the cause observable in logs.
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum ProviderError {
    /// Transport-level failure reaching the provider
    #[error("network error: {0}")]
    Network(String),

    /// The call did not complete within the configured deadline
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// The provider rejected the request (quota, auth, bad status)
    #[error("provider rejected request: status {status}: {message}")]
    Status { status: u16, message: String },

    /// The provider answered, but the payload could not be interpreted
    #[error("malformed provider output: {0}")]
    MalformedOutput(String),
}

/// A single call-and-response capability against a generative model.
///
/// `complete` returns free text for an instruction plus optional
/// conversation context; `complete_structured` asks the model for a JSON
/// object. Neither applies retries; the caller owns the fallback policy.
#[async_trait]
pub trait GenerativeClient: Send + Sync {
    /// Generates free text for an instruction.
    ///
    /// # Arguments
    ///
    /// * `instruction` - The system-level instruction (persona prompt etc.)
    /// * `context` - Optional conversation tail prepended as prior context
    /// * `message` - The message the model should respond to
    async fn complete(
        &self,
        instruction: &str,
        context: Option<&str>,
        message: &str,
    ) -> Result<String, ProviderError>;

    /// Generates a JSON object for an instruction.
    ///
    /// The returned value is the parsed JSON; malformed model output is a
    /// `ProviderError::MalformedOutput`, never a panic.
    async fn complete_structured(
        &self,
        instruction: &str,
    ) -> Result<serde_json::Value, ProviderError>;
}
