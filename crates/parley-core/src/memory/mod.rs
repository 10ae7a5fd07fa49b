//! In-process conversational memory.
//!
//! Holds the ordered turn log and the session context for every active
//! session, keyed by session id. Lifecycle is explicit: `ensure` creates a
//! slot, `discard` drops it once the session is durably closed. Loss of the
//! process loses all in-memory state, which is acceptable because the
//! orchestrator writes the durable log in parallel on every turn.
//!
//! Operations on the same session id are serialized through one async
//! mutex per slot, so concurrent requests racing on the same conversation
//! cannot interleave their mutations.

mod context;
mod turn;

pub use context::{CustomSetup, PersonaTuning, SessionContext};
pub use turn::{ConversationTurn, Feedback, Speaker};

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};

use crate::error::{ParleyError, Result};

/// Number of trailing turns supplied as prompt context.
pub const HISTORY_WINDOW: usize = 10;

#[derive(Debug, Default)]
struct SessionSlot {
    turns: Vec<ConversationTurn>,
    context: SessionContext,
}

/// Process-local mapping from session id to turn log and context.
///
/// The outer map is only touched on `ensure`/`discard`; per-turn traffic
/// takes the slot's own mutex.
#[derive(Debug, Default)]
pub struct ConversationMemory {
    sessions: RwLock<HashMap<i64, Arc<Mutex<SessionSlot>>>>,
}

impl ConversationMemory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Idempotently creates an empty slot for a session id.
    pub async fn ensure(&self, session_id: i64) {
        let mut sessions = self.sessions.write().await;
        sessions
            .entry(session_id)
            .or_insert_with(|| Arc::new(Mutex::new(SessionSlot::default())));
    }

    async fn slot(&self, session_id: i64) -> Result<Arc<Mutex<SessionSlot>>> {
        let sessions = self.sessions.read().await;
        sessions
            .get(&session_id)
            .cloned()
            .ok_or_else(|| ParleyError::not_found("session", session_id))
    }

    /// Appends a user turn to the session log.
    pub async fn append_user(&self, session_id: i64, text: impl Into<String>) -> Result<()> {
        let slot = self.slot(session_id).await?;
        let mut slot = slot.lock().await;
        slot.turns.push(ConversationTurn::user(text));
        Ok(())
    }

    /// Appends a persona turn, tagged with the speaking persona's label so
    /// multiple personas stay distinguishable in a shared log.
    pub async fn append_persona(
        &self,
        session_id: i64,
        label: impl Into<String>,
        text: impl Into<String>,
    ) -> Result<()> {
        let slot = self.slot(session_id).await?;
        let mut slot = slot.lock().await;
        slot.turns.push(ConversationTurn::persona(label, text));
        Ok(())
    }

    /// Attaches coaching feedback to the most recent user turn.
    ///
    /// Scoring happens after the turn is appended, so the feedback arrives
    /// separately. A log without a user turn is left untouched.
    pub async fn record_feedback(&self, session_id: i64, feedback: Feedback) -> Result<()> {
        let slot = self.slot(session_id).await?;
        let mut slot = slot.lock().await;
        if let Some(turn) = slot
            .turns
            .iter_mut()
            .rev()
            .find(|turn| turn.speaker.is_user())
        {
            turn.feedback = Some(feedback);
        }
        Ok(())
    }

    /// Returns the last `n` turns in original append order.
    pub async fn tail(&self, session_id: i64, n: usize) -> Result<Vec<ConversationTurn>> {
        let slot = self.slot(session_id).await?;
        let slot = slot.lock().await;
        let skip = slot.turns.len().saturating_sub(n);
        Ok(slot.turns[skip..].to_vec())
    }

    /// Formats the trailing window as prompt context, one line per turn.
    pub async fn context_window(&self, session_id: i64, n: usize) -> Result<String> {
        let turns = self.tail(session_id, n).await?;
        Ok(turns
            .iter()
            .map(ConversationTurn::context_line)
            .collect::<Vec<_>>()
            .join("\n"))
    }

    /// Replaces the session context.
    pub async fn set_context(&self, session_id: i64, context: SessionContext) -> Result<()> {
        let slot = self.slot(session_id).await?;
        let mut slot = slot.lock().await;
        slot.context = context;
        Ok(())
    }

    /// Returns a copy of the session context.
    pub async fn context(&self, session_id: i64) -> Result<SessionContext> {
        let slot = self.slot(session_id).await?;
        let slot = slot.lock().await;
        Ok(slot.context.clone())
    }

    /// Removes all in-memory state for a session. Subsequent reads behave
    /// as "session not found", never return stale data.
    pub async fn discard(&self, session_id: i64) {
        let mut sessions = self.sessions.write().await;
        sessions.remove(&session_id);
    }

    /// Whether a slot exists for the session id.
    pub async fn contains(&self, session_id: i64) -> bool {
        let sessions = self.sessions.read().await;
        sessions.contains_key(&session_id)
    }
}
