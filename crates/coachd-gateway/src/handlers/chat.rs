//! Chat turn handler.

use crate::server::AppState;
use crate::{GatewayError, Result};
use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::Json;
use coachd_agent::{LoopConfig, TurnRequest};
use coachd_core::{OwnerId, SessionId};
use futures::{Stream, StreamExt};
use serde::Deserialize;
use std::convert::Infallible;
use std::sync::Arc;
use tokio_stream::wrappers::ReceiverStream;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Which loop configuration a turn runs under.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatMode {
    /// Everyday coaching chat.
    #[default]
    Assistant,

    /// Guided intake of a new user's profile.
    Intake,
}

/// Body of `POST /v1/chat`.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    /// The user's message.
    pub message: String,

    /// Who is talking.
    pub owner_id: OwnerId,

    /// Existing session to continue; omitted to start a new one.
    #[serde(default)]
    pub session_id: Option<SessionId>,

    /// Title for a newly created session.
    #[serde(default)]
    pub title: Option<String>,

    /// Loop configuration to run under.
    #[serde(default)]
    pub mode: ChatMode,

    /// Synthetic messages steer the model without being persisted as
    /// user messages.
    #[serde(default)]
    pub synthetic: bool,
}

fn default_title(mode: ChatMode) -> &'static str {
    match mode {
        ChatMode::Assistant => "New chat",
        ChatMode::Intake => "Getting started",
    }
}

/// `POST /v1/chat` — run one turn and stream its events as SSE.
///
/// Dropping the connection cancels the turn at its next suspension point.
pub async fn chat(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ChatRequest>,
) -> Result<Sse<impl Stream<Item = std::result::Result<Event, Infallible>>>> {
    if body.message.trim().is_empty() {
        return Err(GatewayError::InvalidRequest(
            "message must not be empty".to_string(),
        ));
    }

    let session = match &body.session_id {
        Some(id) => {
            let session = state
                .store
                .get_session(id)
                .await?
                .ok_or_else(|| GatewayError::NotFound(format!("session {}", id.as_str())))?;
            if session.owner_id != body.owner_id {
                return Err(GatewayError::NotFound(format!(
                    "session {}",
                    id.as_str()
                )));
            }
            session
        }
        None => {
            let title = body
                .title
                .as_deref()
                .unwrap_or_else(|| default_title(body.mode));
            state.store.create_session(&body.owner_id, title).await?
        }
    };

    info!(
        session_id = %session.id,
        mode = ?body.mode,
        synthetic = body.synthetic,
        "Chat turn"
    );

    let config = match body.mode {
        ChatMode::Assistant => LoopConfig::assistant()
            .with_max_iterations(state.config.limits.assistant_max_iterations),
        ChatMode::Intake => LoopConfig::guided_intake()
            .with_max_iterations(state.config.limits.intake_max_iterations),
    };

    let cancel = CancellationToken::new();
    let rx = state.agent.run_turn(
        TurnRequest {
            session,
            message: body.message,
            synthetic: body.synthetic,
        },
        config,
        cancel.clone(),
    );

    // The guard lives inside the stream closure, so a dropped connection
    // cancels the running turn.
    let guard = cancel.drop_guard();
    let stream = ReceiverStream::new(rx).map(move |event| {
        let _guard = &guard;
        Ok(Event::default()
            .event(event.event_type())
            .data(serde_json::to_string(&event).unwrap_or_default()))
    });

    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}
