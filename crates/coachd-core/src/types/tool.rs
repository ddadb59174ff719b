//! Tool-related types.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Kind of a tool call as reported by the completion API.
///
/// Only `function` calls are executable; anything else is decoded as
/// [`ToolCallKind::Other`] and turned into an error outcome by the
/// dispatcher rather than rejected at the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolCallKind {
    #[default]
    Function,

    #[serde(untagged)]
    Other(String),
}

/// A single tool call requested by the assistant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCallRequest {
    /// Call ID, echoed back on the matching result.
    pub id: String,

    /// Tool name.
    pub name: String,

    /// Parsed tool arguments.
    pub arguments: Value,

    /// Call kind.
    #[serde(default)]
    pub kind: ToolCallKind,
}

impl ToolCallRequest {
    /// Create a function call request.
    pub fn function(id: impl Into<String>, name: impl Into<String>, arguments: Value) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            arguments,
            kind: ToolCallKind::Function,
        }
    }
}

/// Result of executing one tool call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolOutcome {
    /// ID of the tool call this outcome answers.
    pub tool_call_id: String,

    /// Output payload.
    pub payload: Value,

    /// Whether the payload describes a failure.
    #[serde(default)]
    pub is_error: bool,
}

impl ToolOutcome {
    /// Create a successful outcome.
    pub fn success(tool_call_id: impl Into<String>, payload: Value) -> Self {
        Self {
            tool_call_id: tool_call_id.into(),
            payload,
            is_error: false,
        }
    }

    /// Create an error outcome with a human-readable message.
    pub fn error(tool_call_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            tool_call_id: tool_call_id.into(),
            payload: serde_json::json!({ "error": message.into() }),
            is_error: true,
        }
    }
}

/// Definition of a tool exposed to the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Tool name (unique identifier).
    pub name: String,

    /// Human-readable description.
    pub description: String,

    /// JSON Schema for the arguments.
    pub input_schema: Value,
}
