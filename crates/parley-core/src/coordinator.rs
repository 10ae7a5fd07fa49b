//! Multi-persona turn coordination.
//!
//! Decides which persona on a session's roster speaks next. Singleton
//! rosters never leave this module; larger rosters delegate the choice to
//! the generative provider and fall back deterministically when that
//! delegation fails in any way. Selection never errors and never blocks
//! the conversation.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::llm::GenerativeClient;
use crate::persona::{PersonaCatalog, PersonaDefinition};
use crate::prompt::PromptComposer;

/// Rationale recorded when delegation fails or is skipped.
pub const FALLBACK_RATIONALE: &str = "Default selection";

/// Outcome of a coordination decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnDecision {
    pub persona_key: String,
    pub rationale: String,
}

impl TurnDecision {
    fn fallback(roster: &[String]) -> Self {
        Self {
            persona_key: roster[0].clone(),
            rationale: FALLBACK_RATIONALE.to_string(),
        }
    }
}

/// Shape the provider must answer with.
#[derive(Debug, Deserialize)]
struct CoordinatorReply {
    persona_key: String,
    reason: Option<String>,
}

/// Selects the next speaking persona for a session.
pub struct TurnCoordinator {
    client: Arc<dyn GenerativeClient>,
    composer: PromptComposer,
}

impl TurnCoordinator {
    pub fn new(client: Arc<dyn GenerativeClient>) -> Self {
        Self {
            client,
            composer: PromptComposer::new(),
        }
    }

    /// Picks the persona that should respond to `user_message`.
    ///
    /// Never errors and never panics, even for an empty roster: the
    /// orchestrator validates rosters at session start, but a degenerate
    /// roster still gets a deterministic answer here.
    pub async fn select(
        &self,
        roster: &[String],
        scenario: &str,
        user_message: &str,
    ) -> TurnDecision {
        if roster.is_empty() {
            tracing::error!("coordination requested for an empty roster");
            return TurnDecision {
                persona_key: "Unknown".to_string(),
                rationale: FALLBACK_RATIONALE.to_string(),
            };
        }

        // Singleton rosters (including custom-mode synthetic rosters) are
        // an O(1) deterministic pick.
        if roster.len() == 1 {
            return TurnDecision {
                persona_key: roster[0].clone(),
                rationale: "Only participant".to_string(),
            };
        }

        let candidates: Vec<&PersonaDefinition> = roster
            .iter()
            .filter_map(|key| PersonaCatalog::get(key))
            .collect();
        if candidates.len() < 2 {
            // Unresolvable roster entries would make the delegated choice
            // meaningless; select deterministically instead.
            return TurnDecision::fallback(roster);
        }

        match self.delegate(&candidates, roster, scenario, user_message).await {
            Some(decision) => decision,
            None => {
                tracing::warn!(roster = ?roster, "coordinator delegation failed, using first roster entry");
                TurnDecision::fallback(roster)
            }
        }
    }

    async fn delegate(
        &self,
        candidates: &[&PersonaDefinition],
        roster: &[String],
        scenario: &str,
        user_message: &str,
    ) -> Option<TurnDecision> {
        let prompt = self
            .composer
            .coordinator_prompt(candidates, scenario, user_message)
            .ok()?;
        let value = self.client.complete_structured(&prompt).await.ok()?;
        let reply: CoordinatorReply = serde_json::from_value(value).ok()?;

        // An off-roster key is treated the same as malformed output.
        if !roster.iter().any(|key| key == &reply.persona_key) {
            return None;
        }

        Some(TurnDecision {
            persona_key: reply.persona_key,
            rationale: reply
                .reason
                .unwrap_or_else(|| FALLBACK_RATIONALE.to_string()),
        })
    }
}
