//! File-backed session store.

use crate::{Result, SessionStore, StoreError};
use async_trait::async_trait;
use coachd_core::{ChatMessage, OwnerId, Session, SessionId};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File-backed session store.
///
/// Layout under the base directory, one subdirectory per session:
///
/// ```text
/// <base>/<session-id>/session.json    — metadata, written atomically
/// <base>/<session-id>/messages.jsonl  — append-only message log
/// ```
///
/// Appends use `OpenOptions::append` so the log preserves insertion order;
/// metadata writes go to a temporary file first, then rename, to avoid
/// partial writes on crash.
pub struct FileSessionStore {
    base: PathBuf,
}

impl FileSessionStore {
    /// Create a store rooted at `base`, creating the directory if needed.
    pub fn new(base: impl Into<PathBuf>) -> Result<Self> {
        let base = base.into();
        std::fs::create_dir_all(&base)?;
        Ok(Self { base })
    }

    fn session_dir(&self, id: &SessionId) -> PathBuf {
        self.base.join(id.as_str())
    }

    fn meta_path(&self, id: &SessionId) -> PathBuf {
        self.session_dir(id).join("session.json")
    }

    fn log_path(&self, id: &SessionId) -> PathBuf {
        self.session_dir(id).join("messages.jsonl")
    }

    fn write_meta_atomic(path: &Path, session: &Session) -> Result<()> {
        let tmp_path = path.with_extension("tmp");
        let data = serde_json::to_string_pretty(session)?;
        std::fs::write(&tmp_path, data)?;
        std::fs::rename(&tmp_path, path)?;
        Ok(())
    }
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn create_session(&self, owner: &OwnerId, title: &str) -> Result<Session> {
        let session = Session::new(owner.clone(), title);
        let dir = self.session_dir(&session.id);
        std::fs::create_dir_all(&dir)?;
        Self::write_meta_atomic(&self.meta_path(&session.id), &session)?;

        // Touch the log so an empty session still loads.
        std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.log_path(&session.id))?;

        debug!(session_id = %session.id, "Created session on disk");
        Ok(session)
    }

    async fn append_message(&self, msg: ChatMessage) -> Result<()> {
        let path = self.log_path(&msg.session_id);
        if !path.exists() {
            return Err(StoreError::SessionNotFound(msg.session_id));
        }

        let mut line = serde_json::to_string(&msg)?;
        line.push('\n');

        let mut file = std::fs::OpenOptions::new().append(true).open(&path)?;
        file.write_all(line.as_bytes())?;
        Ok(())
    }

    async fn load_history(&self, id: &SessionId) -> Result<Vec<ChatMessage>> {
        let path = self.log_path(id);
        if !path.exists() {
            return Err(StoreError::SessionNotFound(id.clone()));
        }

        let data = std::fs::read_to_string(&path)?;
        let mut messages = Vec::new();
        for (lineno, line) in data.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let msg: ChatMessage = serde_json::from_str(line).map_err(|e| {
                StoreError::Corrupt(format!("{}:{}: {}", path.display(), lineno + 1, e))
            })?;
            messages.push(msg);
        }
        Ok(messages)
    }

    async fn get_session(&self, id: &SessionId) -> Result<Option<Session>> {
        let path = self.meta_path(id);
        if !path.exists() {
            return Ok(None);
        }
        let data = std::fs::read_to_string(&path)?;
        let session: Session = serde_json::from_str(&data)
            .map_err(|e| StoreError::Corrupt(format!("{}: {}", path.display(), e)))?;
        Ok(Some(session))
    }
}
