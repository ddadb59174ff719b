//! In-memory session store.

use crate::{Result, SessionStore, StoreError};
use async_trait::async_trait;
use coachd_core::{ChatMessage, OwnerId, Session, SessionId};
use std::collections::HashMap;
use tokio::sync::RwLock;

/// In-memory session store.
///
/// Each session holds an ordered `Vec<ChatMessage>`; appends push to the
/// back under a write lock, so `load_history` observes total insertion
/// order.
#[derive(Default)]
pub struct MemorySessionStore {
    sessions: RwLock<HashMap<SessionId, Session>>,
    messages: RwLock<HashMap<SessionId, Vec<ChatMessage>>>,
}

impl MemorySessionStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn create_session(&self, owner: &OwnerId, title: &str) -> Result<Session> {
        let session = Session::new(owner.clone(), title);
        let mut sessions = self.sessions.write().await;
        sessions.insert(session.id.clone(), session.clone());
        let mut messages = self.messages.write().await;
        messages.insert(session.id.clone(), Vec::new());
        Ok(session)
    }

    async fn append_message(&self, msg: ChatMessage) -> Result<()> {
        let mut messages = self.messages.write().await;
        let log = messages
            .get_mut(&msg.session_id)
            .ok_or_else(|| StoreError::SessionNotFound(msg.session_id.clone()))?;
        log.push(msg);
        Ok(())
    }

    async fn load_history(&self, id: &SessionId) -> Result<Vec<ChatMessage>> {
        let messages = self.messages.read().await;
        messages
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::SessionNotFound(id.clone()))
    }

    async fn get_session(&self, id: &SessionId) -> Result<Option<Session>> {
        let sessions = self.sessions.read().await;
        Ok(sessions.get(id).cloned())
    }
}
