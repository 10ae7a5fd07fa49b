//! Parley application layer.
//!
//! Use-case services over the core domain and the infrastructure
//! adapters: account login and token resolution, the coaching/feedback
//! service, and the session orchestrator that drives the conversation
//! lifecycle.

pub mod accounts;
pub mod coach;
pub mod orchestrator;

pub use accounts::{AccountService, LoginOutcome};
pub use coach::{Coach, ACK_COMMENT, EVALUATION_FALLBACK, SCENARIO_FALLBACK, SUMMARY_FALLBACK};
pub use orchestrator::{
    HistoryEntry, SessionClosing, SessionOpening, SessionOrchestrator, StartSession, TurnOutcome,
};
