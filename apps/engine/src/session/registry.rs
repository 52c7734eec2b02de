//! Session registry: session id → handle, shared across the process.
//!
//! Sessions are fully independent and run in parallel; the registry is the
//! only shared structure, and it never touches game state.

use dashmap::DashMap;

use super::coordinator::{spawn_session, SessionConfig, SessionHandle, SessionId};

#[derive(Default)]
pub struct SessionRegistry {
    sessions: DashMap<SessionId, SessionHandle>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn a session worker and register its handle.
    pub fn create_session(&self, config: SessionConfig) -> SessionHandle {
        let handle = spawn_session(config);
        self.sessions.insert(handle.id(), handle.clone());
        handle
    }

    pub fn get(&self, id: SessionId) -> Option<SessionHandle> {
        self.sessions.get(&id).map(|entry| entry.clone())
    }

    /// Remove a session. Once every outstanding handle drops, the worker's
    /// queue closes and the task stops.
    pub fn remove(&self, id: SessionId) -> Option<SessionHandle> {
        self.sessions.remove(&id).map(|(_, handle)| handle)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
