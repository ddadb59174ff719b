//! Coach note and feedback tools.

use crate::tools::records::RecordStore;
use crate::tools::{CallerIdentity, Tool, ToolError};
use async_trait::async_trait;
use coachd_core::ToolDefinition;
use serde_json::{json, Value};
use std::sync::Arc;

/// Tool for keeping a coaching note about the user.
pub struct SaveCoachNoteTool {
    store: Arc<RecordStore>,
}

impl SaveCoachNoteTool {
    pub fn new(store: Arc<RecordStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Tool for SaveCoachNoteTool {
    fn name(&self) -> &str {
        "save_coach_note"
    }

    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "save_coach_note".to_string(),
            description: "Save a note about the user worth remembering across sessions, \
                 e.g. a recurring knee issue or a preference for morning workouts"
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "text": {
                        "type": "string",
                        "description": "The note to keep"
                    }
                },
                "required": ["text"]
            }),
        }
    }

    async fn execute(
        &self,
        args: Value,
        caller: &CallerIdentity,
    ) -> std::result::Result<Value, ToolError> {
        let text = args
            .get("text")
            .and_then(|v| v.as_str())
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| ToolError::InvalidArguments("text is required".to_string()))?
            .to_string();

        let note = self.store.add_note(&caller.owner_id, text).await;
        serde_json::to_value(&note).map_err(|e| ToolError::ExecutionFailed(e.to_string()))
    }
}

/// Tool for recording user feedback about the coaching.
pub struct RecordFeedbackTool {
    store: Arc<RecordStore>,
}

impl RecordFeedbackTool {
    pub fn new(store: Arc<RecordStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Tool for RecordFeedbackTool {
    fn name(&self) -> &str {
        "record_feedback"
    }

    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "record_feedback".to_string(),
            description: "Record the user's feedback about their plan or coaching"
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "rating": {
                        "type": "integer",
                        "minimum": 1,
                        "maximum": 5,
                        "description": "Rating from 1 (poor) to 5 (great)"
                    },
                    "comment": {
                        "type": "string",
                        "description": "What the user said"
                    }
                }
            }),
        }
    }

    async fn execute(
        &self,
        args: Value,
        caller: &CallerIdentity,
    ) -> std::result::Result<Value, ToolError> {
        let rating = match args.get("rating").and_then(|v| v.as_u64()) {
            Some(r) if (1..=5).contains(&r) => Some(r as u8),
            Some(r) => {
                return Err(ToolError::InvalidArguments(format!(
                    "rating must be between 1 and 5, got {}",
                    r
                )))
            }
            None => None,
        };
        let comment = args
            .get("comment")
            .and_then(|v| v.as_str())
            .map(String::from);

        if rating.is_none() && comment.is_none() {
            return Err(ToolError::InvalidArguments(
                "rating or comment is required".to_string(),
            ));
        }

        let entry = self
            .store
            .add_feedback(&caller.owner_id, rating, comment)
            .await;
        serde_json::to_value(&entry).map_err(|e| ToolError::ExecutionFailed(e.to_string()))
    }
}
