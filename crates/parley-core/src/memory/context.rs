//! Per-session context blob.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Per-persona tuning supplied at session start.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonaTuning {
    /// Frustration in [0.0, 1.0]; defaults to the neutral midpoint when a
    /// persona has no explicit config.
    #[serde(default = "default_frustration")]
    pub frustration: f64,
    #[serde(default)]
    pub goals: String,
    #[serde(default)]
    pub motivations: String,
}

fn default_frustration() -> f64 {
    0.5
}

impl Default for PersonaTuning {
    fn default() -> Self {
        Self {
            frustration: default_frustration(),
            goals: String::new(),
            motivations: String::new(),
        }
    }
}

impl PersonaTuning {
    pub fn with_frustration(frustration: f64) -> Self {
        Self {
            frustration,
            ..Self::default()
        }
    }
}

/// Single-partner custom-mode fields.
///
/// Custom sessions replace the catalog roster with one free-text partner;
/// the roster becomes a single synthetic entry named after the partner
/// role.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomSetup {
    pub user_role: String,
    pub user_personality: String,
    pub partner_role: String,
    pub partner_personality: String,
}

/// Everything a turn needs to know about its session.
///
/// Created at session start, mutated only by configuration-setting calls,
/// read on every subsequent turn. The roster is fixed at creation time.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SessionContext {
    pub scenario: String,
    pub roster: Vec<String>,
    #[serde(default)]
    pub configs: HashMap<String, PersonaTuning>,
    #[serde(default)]
    pub custom: Option<CustomSetup>,
}

impl SessionContext {
    pub fn new(scenario: impl Into<String>, roster: Vec<String>) -> Self {
        Self {
            scenario: scenario.into(),
            roster,
            configs: HashMap::new(),
            custom: None,
        }
    }

    /// Tuning for a persona, falling back to defaults when the session
    /// carries no explicit config for it.
    pub fn tuning_for(&self, persona_key: &str) -> PersonaTuning {
        self.configs.get(persona_key).cloned().unwrap_or_default()
    }

    pub fn is_custom(&self) -> bool {
        self.custom.is_some()
    }
}
