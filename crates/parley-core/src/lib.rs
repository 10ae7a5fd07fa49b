//! Parley core domain.
//!
//! Domain models and the session/turn orchestration building blocks:
//! the persona catalog, conversational memory, prompt composition, turn
//! coordination and the generative provider seam. Nothing in this crate
//! performs network or database I/O; those live in the infrastructure
//! crate behind the traits defined here.

pub mod config;
pub mod coordinator;
pub mod error;
pub mod llm;
pub mod memory;
pub mod persona;
pub mod prompt;

pub use config::AppConfig;
pub use coordinator::{TurnCoordinator, TurnDecision, FALLBACK_RATIONALE};
pub use error::{ParleyError, Result};
pub use llm::{GenerativeClient, ProviderError};
pub use memory::{
    ConversationMemory, ConversationTurn, CustomSetup, Feedback, PersonaTuning, SessionContext,
    Speaker, HISTORY_WINDOW,
};
pub use persona::{PersonaCatalog, PersonaDefinition};
pub use prompt::PromptComposer;
