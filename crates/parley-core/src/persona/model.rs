//! Persona domain model.
//!
//! Represents the stakeholder personas a user negotiates with inside a
//! scenario. Each persona has a stable catalog key, descriptive attributes
//! and a default frustration level that seeds its tone.

use serde::{Deserialize, Serialize};

/// A stakeholder persona definition from the catalog.
///
/// Definitions are immutable: they are loaded once at process start and
/// read-only thereafter. Per-session tuning (frustration, goals,
/// motivations) lives in [`crate::memory::PersonaTuning`], not here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonaDefinition {
    /// Stable catalog key (e.g. "CEO", "VP_Sales")
    pub key: String,
    /// Display name of the persona
    pub name: String,
    /// One-line description used in coordinator prompts
    pub description: String,
    /// Role label embedded in persona prompts
    pub role: String,
    /// Trait list shaping the persona's behavior
    pub traits: Vec<String>,
    /// Default frustration in [0.0, 1.0]; high reads short and blunt,
    /// low reads open and helpful
    pub default_frustration: f64,
}

impl PersonaDefinition {
    pub(crate) fn new(
        key: &str,
        name: &str,
        description: &str,
        role: &str,
        traits: &[&str],
        default_frustration: f64,
    ) -> Self {
        Self {
            key: key.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            role: role.to_string(),
            traits: traits.iter().map(|t| t.to_string()).collect(),
            default_frustration,
        }
    }

    /// Comma-joined trait list for prompt embedding.
    pub fn traits_line(&self) -> String {
        self.traits.join(", ")
    }
}
