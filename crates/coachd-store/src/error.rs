//! Store error types.

use coachd_core::SessionId;
use thiserror::Error;

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur in a session store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Session does not exist.
    #[error("Session not found: {0}")]
    SessionNotFound(SessionId),

    /// I/O error from the file backend.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Corrupt on-disk data.
    #[error("Corrupt store data: {0}")]
    Corrupt(String),
}
