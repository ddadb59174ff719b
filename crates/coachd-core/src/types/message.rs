//! Chat message types.

use super::{SessionId, ToolCallRequest};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Role of a message sender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
    Tool,
}

/// A message in a conversation.
///
/// Messages with role `system` and `tool` exist only in the working history
/// of a turn; the store only ever sees `user` and `assistant` messages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Session this message belongs to.
    pub session_id: SessionId,

    /// Role of the message sender.
    pub role: Role,

    /// Text content.
    pub content: String,

    /// Tool calls requested by the assistant (assistant messages only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCallRequest>>,

    /// ID of the tool call this message answers (tool messages only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,

    /// Timestamp.
    pub created_at: DateTime<Utc>,
}

impl ChatMessage {
    /// Create a user message.
    pub fn user(session_id: SessionId, content: impl Into<String>) -> Self {
        Self {
            session_id,
            role: Role::User,
            content: content.into(),
            tool_calls: None,
            tool_call_id: None,
            created_at: Utc::now(),
        }
    }

    /// Create an assistant message.
    pub fn assistant(session_id: SessionId, content: impl Into<String>) -> Self {
        Self {
            session_id,
            role: Role::Assistant,
            content: content.into(),
            tool_calls: None,
            tool_call_id: None,
            created_at: Utc::now(),
        }
    }

    /// Create an assistant message carrying tool calls.
    pub fn assistant_with_tool_calls(
        session_id: SessionId,
        content: impl Into<String>,
        tool_calls: Vec<ToolCallRequest>,
    ) -> Self {
        Self {
            session_id,
            role: Role::Assistant,
            content: content.into(),
            tool_calls: Some(tool_calls),
            tool_call_id: None,
            created_at: Utc::now(),
        }
    }

    /// Create a system message (working history only, never persisted).
    pub fn system(session_id: SessionId, content: impl Into<String>) -> Self {
        Self {
            session_id,
            role: Role::System,
            content: content.into(),
            tool_calls: None,
            tool_call_id: None,
            created_at: Utc::now(),
        }
    }

    /// Create a tool-result message answering a tool call.
    pub fn tool_result(
        session_id: SessionId,
        tool_call_id: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            session_id,
            role: Role::Tool,
            content: content.into(),
            tool_calls: None,
            tool_call_id: Some(tool_call_id.into()),
            created_at: Utc::now(),
        }
    }

    /// Whether this message carries at least one tool call.
    pub fn has_tool_calls(&self) -> bool {
        self.tool_calls.as_ref().is_some_and(|c| !c.is_empty())
    }
}
