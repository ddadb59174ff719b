//! Session types for conversation management.

use super::{OwnerId, SessionId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A conversation session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Unique session ID.
    pub id: SessionId,

    /// User who owns this session.
    pub owner_id: OwnerId,

    /// Session title shown in conversation lists.
    pub title: String,

    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Session {
    /// Create a new session with a freshly generated ID.
    pub fn new(owner_id: OwnerId, title: impl Into<String>) -> Self {
        Self {
            id: SessionId::generate(),
            owner_id,
            title: title.into(),
            created_at: Utc::now(),
        }
    }
}
