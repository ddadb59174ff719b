//! Session inspection handlers.

use crate::server::AppState;
use crate::{GatewayError, Result};
use axum::extract::{Path, State};
use axum::Json;
use coachd_core::{ChatMessage, Session, SessionId};
use std::sync::Arc;

/// `GET /v1/sessions/:id` — session metadata.
pub async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Session>> {
    let id = SessionId::new(id);
    let session = state
        .store
        .get_session(&id)
        .await?
        .ok_or_else(|| GatewayError::NotFound(format!("session {}", id.as_str())))?;
    Ok(Json(session))
}

/// `GET /v1/sessions/:id/messages` — persisted history, oldest first.
pub async fn get_messages(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Vec<ChatMessage>>> {
    let id = SessionId::new(id);
    if state.store.get_session(&id).await?.is_none() {
        return Err(GatewayError::NotFound(format!(
            "session {}",
            id.as_str()
        )));
    }
    let messages = state.store.load_history(&id).await?;
    Ok(Json(messages))
}
