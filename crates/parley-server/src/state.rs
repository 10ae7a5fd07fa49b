//! Shared handler state.

use std::sync::Arc;

use parley_application::{AccountService, Coach, SessionOrchestrator};
use parley_core::{ConversationMemory, GenerativeClient};
use parley_infrastructure::{SqliteStore, TokenService};

/// Everything the handlers need, cheap to clone per request.
#[derive(Clone)]
pub struct AppState {
    pub accounts: Arc<AccountService>,
    pub orchestrator: Arc<SessionOrchestrator>,
    pub coach: Arc<Coach>,
}

impl AppState {
    /// Wires the service graph over a store, a token service and a
    /// provider client.
    pub fn new(
        store: Arc<SqliteStore>,
        tokens: TokenService,
        client: Arc<dyn GenerativeClient>,
    ) -> Self {
        let memory = Arc::new(ConversationMemory::new());
        Self {
            accounts: Arc::new(AccountService::new(store.clone(), tokens)),
            orchestrator: Arc::new(SessionOrchestrator::new(store, memory, client.clone())),
            coach: Arc::new(Coach::new(client)),
        }
    }
}
