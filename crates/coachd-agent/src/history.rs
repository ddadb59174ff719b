//! Append-only working history for one turn.

use coachd_core::{ChatMessage, ToolCallRequest};

/// Working history of a turn.
///
/// Append-only by construction: the builder methods consume the log and
/// return it extended, so there is no way to rewrite earlier entries. The
/// log also tracks every tool call seen during the turn, flattened in
/// order, for persistence onto the final assistant message.
#[derive(Debug, Default)]
pub struct TurnLog {
    messages: Vec<ChatMessage>,
    tool_calls: Vec<ToolCallRequest>,
}

impl TurnLog {
    /// Start a log from prior session history.
    pub fn new(history: Vec<ChatMessage>) -> Self {
        Self {
            messages: history,
            tool_calls: Vec::new(),
        }
    }

    /// Append a message.
    pub fn with_message(mut self, msg: ChatMessage) -> Self {
        self.messages.push(msg);
        self
    }

    /// Append an assistant message that carries tool calls, recording the
    /// calls into the flattened list.
    pub fn with_tool_calls(mut self, msg: ChatMessage) -> Self {
        if let Some(calls) = &msg.tool_calls {
            self.tool_calls.extend(calls.iter().cloned());
        }
        self.messages.push(msg);
        self
    }

    /// Full message sequence so far.
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Every tool call seen this turn, in order.
    pub fn flattened_tool_calls(&self) -> &[ToolCallRequest] {
        &self.tool_calls
    }

    /// Consume the log, returning the flattened tool calls.
    pub fn into_tool_calls(self) -> Vec<ToolCallRequest> {
        self.tool_calls
    }
}
