//! Coaching feedback, evaluation and summarization.
//!
//! All methods degrade to deterministic placeholders on provider failure;
//! coaching is advisory and must never block or fail a conversation turn.

use std::sync::Arc;

use serde::Deserialize;

use parley_core::llm::GenerativeClient;
use parley_core::memory::{CustomSetup, Feedback};
use parley_core::prompt::PromptComposer;

/// Comment attached to messages exempt from scoring.
pub const ACK_COMMENT: &str = "Acknowledgment, not scored.";

/// Fallback evaluation when the provider cannot produce insights.
pub const EVALUATION_FALLBACK: &str = "Unable to generate insights for this session.";

/// Fallback summary when the provider cannot summarize.
pub const SUMMARY_FALLBACK: &str = "Summary unavailable.";

/// Fallback scenario when generation fails.
pub const SCENARIO_FALLBACK: &str =
    "A high-pressure negotiation is required due to shifting priorities and limited resources.";

/// Short professional acknowledgments exempt from scoring.
///
/// In a corporate setting brevity is often a virtue; penalizing "will do"
/// teaches the wrong lesson, so these bypass the provider entirely and get
/// the sentinel score.
const ACKNOWLEDGMENTS: &[&str] = &[
    "ok",
    "okay",
    "k",
    "sure",
    "yes",
    "yep",
    "fine",
    "done",
    "agreed",
    "understood",
    "noted",
    "alright",
    "will do",
    "got it",
    "sounds good",
    "makes sense",
    "thanks",
    "thank you",
];

/// Returns whether a message is a short acknowledgment exempt from scoring.
pub fn is_short_acknowledgment(text: &str) -> bool {
    let normalized: String = text
        .trim()
        .to_lowercase()
        .chars()
        .filter(|c| !c.is_ascii_punctuation())
        .collect();
    let normalized = normalized.split_whitespace().collect::<Vec<_>>().join(" ");
    ACKNOWLEDGMENTS.contains(&normalized.as_str())
}

#[derive(Debug, Deserialize)]
struct FeedbackReply {
    score: i32,
    feedback: String,
}

/// Generates per-message feedback, session evaluations and summaries.
pub struct Coach {
    client: Arc<dyn GenerativeClient>,
    composer: PromptComposer,
}

impl Coach {
    pub fn new(client: Arc<dyn GenerativeClient>) -> Self {
        Self {
            client,
            composer: PromptComposer::new(),
        }
    }

    /// Scores one user message against the scenario.
    ///
    /// Short acknowledgments get the sentinel score without a provider
    /// call. Provider failures degrade to the sentinel with an empty
    /// comment. Real scores are clamped to 1..=10.
    pub async fn instant_feedback(&self, user_message: &str, scenario: &str) -> Feedback {
        if is_short_acknowledgment(user_message) {
            return Feedback::unscored(ACK_COMMENT);
        }

        let prompt = match self.composer.feedback_prompt(user_message, scenario) {
            Ok(prompt) => prompt,
            Err(e) => {
                tracing::error!(error = %e, "feedback prompt composition failed");
                return Feedback::unscored("");
            }
        };

        match self.client.complete_structured(&prompt).await {
            Ok(value) => match serde_json::from_value::<FeedbackReply>(value) {
                Ok(reply) => Feedback::new(reply.score.clamp(1, 10), reply.feedback),
                Err(e) => {
                    tracing::warn!(error = %e, "feedback reply did not match expected shape");
                    Feedback::unscored("")
                }
            },
            Err(e) => {
                tracing::warn!(error = %e, "feedback generation failed");
                Feedback::unscored("")
            }
        }
    }

    /// 3-5 actionable insights over a transcript, one per line.
    pub async fn evaluation(
        &self,
        conversation: &str,
        scenario: &str,
        custom: Option<&CustomSetup>,
    ) -> String {
        let prompt = match self.composer.evaluation_prompt(conversation, scenario, custom) {
            Ok(prompt) => prompt,
            Err(_) => return EVALUATION_FALLBACK.to_string(),
        };
        match self.client.complete(&prompt, None, conversation).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(error = %e, "evaluation generation failed");
                EVALUATION_FALLBACK.to_string()
            }
        }
    }

    /// 2-3 sentence executive summary of a session transcript.
    pub async fn summary(&self, conversation: &str, scenario: &str) -> String {
        let prompt = match self.composer.summary_prompt(conversation, scenario) {
            Ok(prompt) => prompt,
            Err(_) => return SUMMARY_FALLBACK.to_string(),
        };
        match self.client.complete(&prompt, None, conversation).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(error = %e, "summary generation failed");
                SUMMARY_FALLBACK.to_string()
            }
        }
    }

    /// Generates a short negotiation scenario.
    pub async fn scenario(
        &self,
        role: &str,
        difficulty: &str,
        user_role: Option<&str>,
        partner_role: Option<&str>,
    ) -> String {
        let prompt = match self
            .composer
            .scenario_prompt(role, difficulty, user_role, partner_role)
        {
            Ok(prompt) => prompt,
            Err(_) => return SCENARIO_FALLBACK.to_string(),
        };
        match self.client.complete(&prompt, None, &prompt).await {
            Ok(text) => text.trim().to_string(),
            Err(e) => {
                tracing::warn!(error = %e, "scenario generation failed");
                SCENARIO_FALLBACK.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use parley_core::llm::ProviderError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct ScriptedClient {
        structured: Result<serde_json::Value, ProviderError>,
        structured_calls: AtomicUsize,
    }

    impl ScriptedClient {
        fn replying(value: serde_json::Value) -> Self {
            Self {
                structured: Ok(value),
                structured_calls: AtomicUsize::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                structured: Err(ProviderError::Network("down".to_string())),
                structured_calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl GenerativeClient for ScriptedClient {
        async fn complete(
            &self,
            _instruction: &str,
            _context: Option<&str>,
            _message: &str,
        ) -> Result<String, ProviderError> {
            Err(ProviderError::Network("down".to_string()))
        }

        async fn complete_structured(
            &self,
            _instruction: &str,
        ) -> Result<serde_json::Value, ProviderError> {
            self.structured_calls.fetch_add(1, Ordering::SeqCst);
            self.structured.clone()
        }
    }

    #[test]
    fn test_short_acknowledgments_detected() {
        assert!(is_short_acknowledgment("ok"));
        assert!(is_short_acknowledgment("  Sure!  "));
        assert!(is_short_acknowledgment("Will do."));
        assert!(is_short_acknowledgment("SOUNDS GOOD"));
        assert!(!is_short_acknowledgment("ok but I disagree with the plan"));
        assert!(!is_short_acknowledgment("I need more budget"));
    }

    #[tokio::test]
    async fn test_acknowledgment_skips_provider_call() {
        let client = Arc::new(ScriptedClient::failing());
        let coach = Coach::new(client.clone());

        let feedback = coach.instant_feedback("will do", "Budget cut").await;

        assert_eq!(feedback.score, Feedback::UNSCORED);
        assert_eq!(feedback.comment, ACK_COMMENT);
        assert_eq!(client.structured_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_score_clamped_to_valid_range() {
        let client = Arc::new(ScriptedClient::replying(serde_json::json!({
            "score": 42,
            "feedback": "too generous"
        })));
        let coach = Coach::new(client);

        let feedback = coach.instant_feedback("a long pitch", "Budget cut").await;
        assert_eq!(feedback.score, 10);
        assert_eq!(feedback.comment, "too generous");
    }

    #[tokio::test]
    async fn test_provider_failure_degrades_to_sentinel() {
        let coach = Coach::new(Arc::new(ScriptedClient::failing()));
        let feedback = coach.instant_feedback("a long pitch", "Budget cut").await;
        assert_eq!(feedback.score, Feedback::UNSCORED);
        assert!(feedback.comment.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_feedback_degrades_to_sentinel() {
        let client = Arc::new(ScriptedClient::replying(serde_json::json!({
            "rating": 5
        })));
        let coach = Coach::new(client);
        let feedback = coach.instant_feedback("a long pitch", "Budget cut").await;
        assert_eq!(feedback.score, Feedback::UNSCORED);
    }

    #[tokio::test]
    async fn test_evaluation_and_summary_fallbacks() {
        let coach = Coach::new(Arc::new(ScriptedClient::failing()));
        assert_eq!(
            coach.evaluation("User: hi", "Budget", None).await,
            EVALUATION_FALLBACK
        );
        assert_eq!(coach.summary("User: hi", "Budget").await, SUMMARY_FALLBACK);
        assert_eq!(
            coach.scenario("pm", "hard", None, None).await,
            SCENARIO_FALLBACK
        );
    }
}
