//! A concurrent table of live sessions, keyed by `SessionId`. Mirrors the
//! shape of a connection pool: callers create a session, look it up by id
//! for the lifetime of a request, and remove it once it reaches a terminal
//! phase.

use crate::error::SessionError;
use crate::session::{Session, SessionConfig};
use crs_store::CrsStore;
use crs_types::SessionId;
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Handle to a registered session: cheap to clone, shared across whoever is
/// concurrently driving or inspecting the same session.
pub type SessionHandle = Arc<Mutex<Session>>;

#[derive(Default)]
pub struct SessionRegistry {
    sessions: DashMap<SessionId, SessionHandle>,
}

impl SessionRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self { sessions: DashMap::new() }
    }

    /// Create a new session over `store` and register it.
    pub fn create(&self, store: Arc<CrsStore>, config: SessionConfig) -> SessionHandle {
        let session = Session::new(store, config);
        let id = session.id();
        let handle: SessionHandle = Arc::new(Mutex::new(session));
        self.sessions.insert(id, Arc::clone(&handle));
        handle
    }

    /// Look up a registered session by id.
    pub fn get(&self, id: SessionId) -> Result<SessionHandle, SessionError> {
        self.sessions.get(&id).map(|entry| Arc::clone(entry.value())).ok_or(SessionError::NotFound(id))
    }

    /// Remove a session from the registry, returning its handle if present.
    /// Does not require the session to be in a terminal phase: a caller
    /// aborting a live session removes it explicitly.
    pub fn remove(&self, id: SessionId) -> Option<SessionHandle> {
        self.sessions.remove(&id).map(|(_, handle)| handle)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Drop every session whose phase is already terminal. Intended to be
    /// called periodically rather than after every request so a caller
    /// still has a window to poll a just-completed session's trace.
    pub async fn sweep_terminal(&self) {
        let mut terminal = Vec::new();
        for entry in &self.sessions {
            if entry.value().lock().await.phase().is_terminal() {
                terminal.push(*entry.key());
            }
        }
        for id in terminal {
            self.sessions.remove(&id);
        }
    }
}
