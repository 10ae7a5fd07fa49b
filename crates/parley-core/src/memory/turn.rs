//! Conversation turn types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who produced a turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Speaker {
    /// The human user being coached.
    User,
    /// A stakeholder persona, tagged with its display label.
    Persona { label: String },
}

impl Speaker {
    /// Display label for durable storage and transcripts.
    pub fn label(&self) -> &str {
        match self {
            Speaker::User => "User",
            Speaker::Persona { label } => label,
        }
    }

    pub fn is_user(&self) -> bool {
        matches!(self, Speaker::User)
    }
}

/// Per-message coaching feedback.
///
/// `score` is 1..=10 when the provider rated the message, or the sentinel
/// `-1` when the message was exempt (short acknowledgment) or scoring
/// degraded on a provider failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feedback {
    pub score: i32,
    pub comment: String,
}

impl Feedback {
    /// Sentinel score meaning "not scored".
    pub const UNSCORED: i32 = -1;

    pub fn new(score: i32, comment: impl Into<String>) -> Self {
        Self {
            score,
            comment: comment.into(),
        }
    }

    /// Sentinel feedback for messages exempt from scoring.
    pub fn unscored(comment: impl Into<String>) -> Self {
        Self::new(Self::UNSCORED, comment)
    }
}

/// A single entry in a session's append-only turn log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub speaker: Speaker,
    pub text: String,
    pub feedback: Option<Feedback>,
    pub timestamp: DateTime<Utc>,
}

impl ConversationTurn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::User,
            text: text.into(),
            feedback: None,
            timestamp: Utc::now(),
        }
    }

    pub fn persona(label: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::Persona {
                label: label.into(),
            },
            text: text.into(),
            feedback: None,
            timestamp: Utc::now(),
        }
    }

    /// One line of prompt context. Persona turns are addressed back to the
    /// model as "You", keeping the speaking persona visible via its label.
    pub fn context_line(&self) -> String {
        match &self.speaker {
            Speaker::User => format!("User: {}", self.text),
            Speaker::Persona { label } => format!("You: [{}]: {}", label, self.text),
        }
    }
}
