//! Turn events streamed to the client while the agent works.

use super::SessionId;
use serde::{Deserialize, Serialize};

/// An event emitted during one turn of the agent loop.
///
/// Every turn starts with [`TurnEvent::Session`] and ends with exactly one
/// terminal event: [`TurnEvent::Done`] or [`TurnEvent::Error`]. Tool events
/// come in `ToolStart`/`ToolEnd` pairs that never interleave. A
/// [`TurnEvent::Milestone`] may follow `Done` when a call-site policy tool
/// succeeded during the turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TurnEvent {
    /// Session announcement, always first.
    Session { session_id: SessionId },

    /// A tool call is about to run.
    ToolStart { id: String, label: String },

    /// The matching tool call finished.
    ToolEnd { id: String, is_error: bool },

    /// A chunk of the final assistant answer.
    Content { delta: String },

    /// The turn completed normally.
    Done,

    /// The turn failed; no further content follows.
    Error { message: String },

    /// Call-site policy event, emitted after `Done` only.
    Milestone { name: String },
}

impl TurnEvent {
    /// SSE event name for this variant.
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::Session { .. } => "session",
            Self::ToolStart { .. } => "tool_start",
            Self::ToolEnd { .. } => "tool_end",
            Self::Content { .. } => "content",
            Self::Done => "done",
            Self::Error { .. } => "error",
            Self::Milestone { .. } => "milestone",
        }
    }
}
