//! Session lifecycle orchestration.
//!
//! Drives the NotStarted -> Active -> Ended state machine: session start
//! with an opening persona line, the per-message turn loop, and session
//! close with evaluation and summary. Every turn is written to both the
//! in-process memory and the durable log; provider instability degrades to
//! placeholder text instead of failing the request.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use parley_core::error::{ParleyError, Result};
use parley_core::llm::{GenerativeClient, ProviderError};
use parley_core::memory::{
    ConversationMemory, CustomSetup, Feedback, PersonaTuning, SessionContext, HISTORY_WINDOW,
};
use parley_core::prompt::PromptComposer;
use parley_core::TurnCoordinator;
use parley_infrastructure::store::{MessageRecord, SessionRecord, SqliteStore, KIND_USER};

use crate::coach::Coach;

/// Coordinator cue used to pick the opening speaker.
const OPENING_CUE: &str = "Starting the conversation";

/// Synthetic user message that elicits the opening persona line.
const OPENING_REQUEST: &str = "Let's start this conversation about the situation";

/// Placeholder shown when a persona's instruction cannot be composed.
const INVALID_PERSONA_REPLY: &str = "Error: Invalid persona configuration";

/// Parameters for starting a session.
#[derive(Debug, Clone, Deserialize)]
pub struct StartSession {
    pub scenario: String,
    #[serde(default)]
    pub personas: Vec<String>,
    #[serde(default)]
    pub persona_configs: HashMap<String, PersonaTuning>,
    #[serde(default)]
    pub custom: Option<CustomSetup>,
}

/// The created session and its opening persona line.
#[derive(Debug, Clone, Serialize)]
pub struct SessionOpening {
    pub session_id: i64,
    pub persona: String,
    pub message: String,
}

/// One completed conversation turn.
#[derive(Debug, Clone, Serialize)]
pub struct TurnOutcome {
    pub persona: String,
    pub message: String,
    pub feedback: Feedback,
}

/// Evaluation and summary produced at session end.
#[derive(Debug, Clone, Serialize)]
pub struct SessionClosing {
    pub summary: String,
    pub evaluation: String,
}

/// One row of a user's session history.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryEntry {
    pub id: i64,
    pub scenario: String,
    pub persona: String,
    pub created_at: DateTime<Utc>,
    pub summary: Option<String>,
    pub evaluation: Option<String>,
    pub message_count: i64,
}

/// Use-case layer tying memory, store, coordinator, coach and provider
/// together.
pub struct SessionOrchestrator {
    store: Arc<SqliteStore>,
    memory: Arc<ConversationMemory>,
    coordinator: TurnCoordinator,
    coach: Coach,
    client: Arc<dyn GenerativeClient>,
    composer: PromptComposer,
}

impl SessionOrchestrator {
    pub fn new(
        store: Arc<SqliteStore>,
        memory: Arc<ConversationMemory>,
        client: Arc<dyn GenerativeClient>,
    ) -> Self {
        Self {
            store,
            memory,
            coordinator: TurnCoordinator::new(client.clone()),
            coach: Coach::new(client.clone()),
            client,
            composer: PromptComposer::new(),
        }
    }

    /// Starts a session and produces the opening persona line.
    ///
    /// Custom mode replaces the catalog roster with a single synthetic
    /// entry named after the partner role. The opening line is generated,
    /// stored, and returned; generation failure degrades to a visible
    /// placeholder inside the message.
    ///
    /// # Errors
    ///
    /// Returns a `Validation` error when neither a non-empty persona list
    /// nor a custom partner role is supplied.
    pub async fn start(&self, user_id: i64, request: StartSession) -> Result<SessionOpening> {
        let roster = match &request.custom {
            Some(setup) => {
                if setup.partner_role.trim().is_empty() {
                    return Err(ParleyError::validation(
                        "custom mode requires a partner role",
                    ));
                }
                vec![setup.partner_role.clone()]
            }
            None => {
                if request.personas.is_empty() {
                    return Err(ParleyError::validation(
                        "at least one persona is required",
                    ));
                }
                request.personas.clone()
            }
        };

        let session_id = self
            .store
            .create_session(user_id, &request.scenario, &roster)
            .await?;

        let mut context = SessionContext::new(request.scenario.clone(), roster.clone());
        context.configs = request.persona_configs;
        context.custom = request.custom;
        self.memory.ensure(session_id).await;
        self.memory.set_context(session_id, context.clone()).await?;

        let decision = self
            .coordinator
            .select(&roster, &request.scenario, OPENING_CUE)
            .await;
        let opening = self
            .persona_reply(session_id, &context, &decision.persona_key, OPENING_REQUEST)
            .await;

        self.memory
            .append_persona(session_id, &decision.persona_key, &opening)
            .await?;
        self.store
            .save_persona_message(session_id, &decision.persona_key, &opening)
            .await?;

        tracing::info!(session_id, persona = %decision.persona_key, "session started");
        Ok(SessionOpening {
            session_id,
            persona: decision.persona_key,
            message: opening,
        })
    }

    /// Runs one conversation turn.
    ///
    /// Appends the user message, picks the responding persona, scores the
    /// message, and generates the reply. Feedback and reply generation
    /// degrade on provider failure; the turn itself fails only for unknown
    /// or ended sessions.
    ///
    /// # Errors
    ///
    /// `NotFound` for unknown sessions or sessions owned by another user,
    /// `InvariantViolation` for ended sessions.
    pub async fn message(
        &self,
        user_id: i64,
        session_id: i64,
        text: &str,
    ) -> Result<TurnOutcome> {
        let record = self.active_session(user_id, session_id).await?;
        self.restore_memory(&record).await?;

        self.memory.append_user(session_id, text).await?;
        let context = self.memory.context(session_id).await?;

        let decision = self
            .coordinator
            .select(&context.roster, &context.scenario, text)
            .await;
        let feedback = self.coach.instant_feedback(text, &context.scenario).await;
        self.memory
            .record_feedback(session_id, feedback.clone())
            .await?;
        self.store
            .save_user_message(session_id, text, Some(&feedback))
            .await?;

        let reply = self
            .persona_reply(session_id, &context, &decision.persona_key, text)
            .await;
        self.memory
            .append_persona(session_id, &decision.persona_key, &reply)
            .await?;
        self.store
            .save_persona_message(session_id, &decision.persona_key, &reply)
            .await?;

        Ok(TurnOutcome {
            persona: decision.persona_key,
            message: reply,
            feedback,
        })
    }

    /// Ends a session, producing and persisting evaluation and summary.
    ///
    /// The transcript is built from the durable log so the outcome is the
    /// same after a process restart. Memory for the session is discarded
    /// once the durable record is closed.
    ///
    /// # Errors
    ///
    /// `NotFound` for unknown sessions, `InvariantViolation` when the
    /// session is already ended.
    pub async fn end(&self, user_id: i64, session_id: i64) -> Result<SessionClosing> {
        let record = self.active_session(user_id, session_id).await?;

        let messages = self.store.session_messages(session_id).await?;
        let transcript = transcript_of(&messages);
        let custom = match self.memory.context(session_id).await {
            Ok(context) => context.custom,
            Err(_) => None,
        };

        let evaluation = self
            .coach
            .evaluation(&transcript, &record.scenario, custom.as_ref())
            .await;
        let summary = self.coach.summary(&transcript, &record.scenario).await;

        self.store.end_session(session_id).await?;
        self.store
            .save_summary(session_id, &summary, &evaluation)
            .await?;
        self.memory.discard(session_id).await;

        tracing::info!(session_id, "session ended");
        Ok(SessionClosing {
            summary,
            evaluation,
        })
    }

    /// Ordered durable log for a session.
    pub async fn messages(&self, user_id: i64, session_id: i64) -> Result<Vec<MessageRecord>> {
        self.owned_session(user_id, session_id).await?;
        self.store.session_messages(session_id).await
    }

    /// Past sessions for a user, newest first. The listed persona is the
    /// roster's lead entry.
    pub async fn history(&self, user_id: i64) -> Result<Vec<HistoryEntry>> {
        let sessions = self.store.user_sessions(user_id).await?;
        Ok(sessions
            .into_iter()
            .map(|s| HistoryEntry {
                id: s.id,
                scenario: s.scenario,
                persona: s
                    .personas
                    .0
                    .first()
                    .cloned()
                    .unwrap_or_else(|| "Unknown".to_string()),
                created_at: s.created_at,
                summary: s.summary,
                evaluation: s.evaluation,
                message_count: s.message_count,
            })
            .collect())
    }

    /// Deletes a session and its messages.
    ///
    /// # Errors
    ///
    /// `NotFound` when the session does not exist or is owned by another
    /// user.
    pub async fn delete(&self, user_id: i64, session_id: i64) -> Result<()> {
        self.owned_session(user_id, session_id).await?;
        if !self.store.delete_session(session_id).await? {
            return Err(ParleyError::not_found("session", session_id));
        }
        self.memory.discard(session_id).await;
        Ok(())
    }

    /// Persists client-edited summary and evaluation text.
    pub async fn save_summary(
        &self,
        user_id: i64,
        session_id: i64,
        summary: &str,
        evaluation: &str,
    ) -> Result<()> {
        self.owned_session(user_id, session_id).await?;
        self.store.save_summary(session_id, summary, evaluation).await
    }

    async fn owned_session(&self, user_id: i64, session_id: i64) -> Result<SessionRecord> {
        let record = self
            .store
            .find_session(session_id)
            .await?
            .ok_or_else(|| ParleyError::not_found("session", session_id))?;
        // Another user's session is indistinguishable from a missing one.
        if record.user_id != user_id {
            return Err(ParleyError::not_found("session", session_id));
        }
        Ok(record)
    }

    async fn active_session(&self, user_id: i64, session_id: i64) -> Result<SessionRecord> {
        let record = self.owned_session(user_id, session_id).await?;
        if !record.is_active {
            return Err(ParleyError::invariant(format!(
                "session {} has already ended",
                session_id
            )));
        }
        Ok(record)
    }

    /// Rebuilds the memory slot from the durable log after a process
    /// restart. No-op when the slot already exists. Persona configs are
    /// lost with the process; rebuilt turns use default tuning.
    async fn restore_memory(&self, record: &SessionRecord) -> Result<()> {
        if self.memory.contains(record.id).await {
            return Ok(());
        }
        tracing::warn!(
            session_id = record.id,
            "memory slot missing for active session, rebuilding from durable log"
        );
        self.memory.ensure(record.id).await;
        self.memory
            .set_context(
                record.id,
                SessionContext::new(record.scenario.clone(), record.personas.0.clone()),
            )
            .await?;
        for message in self.store.session_messages(record.id).await? {
            if message.kind == KIND_USER {
                self.memory.append_user(record.id, message.content).await?;
                if let Some(feedback) = message.feedback {
                    self.memory.record_feedback(record.id, feedback.0).await?;
                }
            } else {
                let label = message.persona.unwrap_or_else(|| "Unknown".to_string());
                self.memory
                    .append_persona(record.id, label, message.content)
                    .await?;
            }
        }
        Ok(())
    }

    /// Composes the persona instruction and generates a reply, degrading
    /// to placeholder text so the conversation never stalls.
    async fn persona_reply(
        &self,
        session_id: i64,
        context: &SessionContext,
        persona_key: &str,
        user_message: &str,
    ) -> String {
        let tuning = context.tuning_for(persona_key);
        let instruction = match &context.custom {
            Some(setup) => self
                .composer
                .custom_prompt(setup, &context.scenario, tuning.frustration),
            None => self
                .composer
                .persona_prompt(persona_key, &context.scenario, &tuning),
        };
        let instruction = match instruction {
            Ok(instruction) => instruction,
            Err(ParleyError::UnknownPersona(key)) => {
                tracing::error!(persona = %key, "persona key not in catalog");
                return INVALID_PERSONA_REPLY.to_string();
            }
            Err(e) => return format!("[System error: {}]", e),
        };

        let history = match self.memory.context_window(session_id, HISTORY_WINDOW).await {
            Ok(window) if !window.is_empty() => Some(window),
            _ => None,
        };
        match self
            .client
            .complete(&instruction, history.as_deref(), user_message)
            .await
        {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(error = %e, persona = %persona_key, "persona reply generation failed");
                degraded_reply(&e)
            }
        }
    }
}

fn degraded_reply(error: &ProviderError) -> String {
    format!("[System error: {}]", error)
}

/// Renders the durable log as transcript lines for the closing prompts.
fn transcript_of(messages: &[MessageRecord]) -> String {
    messages
        .iter()
        .map(|m| {
            if m.kind == KIND_USER {
                format!("User: {}", m.content)
            } else {
                format!("Persona: {}", m.content)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
