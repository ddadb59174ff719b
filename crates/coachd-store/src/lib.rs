//! Session store backends for coachd.
//!
//! A [`SessionStore`] is an append-only log of chat messages grouped into
//! sessions. Messages are never mutated after insertion and `load_history`
//! returns them in insertion order.

mod error;
mod file;
mod memory;

pub use error::{Result, StoreError};
pub use file::FileSessionStore;
pub use memory::MemorySessionStore;

use async_trait::async_trait;
use coachd_core::{ChatMessage, OwnerId, Session, SessionId};

/// Durable conversation storage.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Create a new session for an owner.
    async fn create_session(&self, owner: &OwnerId, title: &str) -> Result<Session>;

    /// Append a message to its session's log. Append-only; messages are
    /// never updated or removed.
    async fn append_message(&self, msg: ChatMessage) -> Result<()>;

    /// Load the full message history of a session in insertion order.
    async fn load_history(&self, id: &SessionId) -> Result<Vec<ChatMessage>>;

    /// Fetch session metadata, or `None` when the session does not exist.
    async fn get_session(&self, id: &SessionId) -> Result<Option<Session>>;
}
