use std::sync::Arc;

use crate::sessions::SessionRegistry;
use crate::store::WordStore;

/// Shared application state: the explicitly constructed word store and
/// the in-memory registry of active sessions.
#[derive(Clone)]
pub struct AppState {
    store: Arc<WordStore>,
    sessions: SessionRegistry,
}

impl AppState {
    pub fn new(store: WordStore) -> Self {
        Self {
            store: Arc::new(store),
            sessions: SessionRegistry::default(),
        }
    }

    pub fn store(&self) -> &Arc<WordStore> {
        &self.store
    }

    pub fn sessions(&self) -> &SessionRegistry {
        &self.sessions
    }
}
