//! Parley infrastructure.
//!
//! Concrete adapters behind the core seams: the SQLite durable store, the
//! Gemini generative client and the HMAC bearer-token service.

pub mod gemini;
pub mod store;
pub mod token;

pub use gemini::GeminiClient;
pub use store::{
    MessageRecord, SessionOverview, SessionRecord, SqliteStore, UserRecord, KIND_PERSONA,
    KIND_USER,
};
pub use token::TokenService;
