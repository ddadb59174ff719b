//! Guided intake completion tool.

use crate::tools::records::RecordStore;
use crate::tools::{CallerIdentity, Tool, ToolError};
use async_trait::async_trait;
use coachd_core::ToolDefinition;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::info;

/// Tool the model calls once guided intake has gathered everything it
/// needs. A successful call is the completion signal the intake loop's
/// milestone policy watches for.
pub struct CompleteIntakeTool {
    store: Arc<RecordStore>,
}

impl CompleteIntakeTool {
    pub fn new(store: Arc<RecordStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Tool for CompleteIntakeTool {
    fn name(&self) -> &str {
        "complete_intake"
    }

    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "complete_intake".to_string(),
            description: "Mark the guided intake as complete. Call this only after the \
                 user's goals, experience level, and schedule have been saved to their \
                 profile"
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "summary": {
                        "type": "string",
                        "description": "One-paragraph summary of what was learned"
                    }
                },
                "required": ["summary"]
            }),
        }
    }

    async fn execute(
        &self,
        args: Value,
        caller: &CallerIdentity,
    ) -> std::result::Result<Value, ToolError> {
        let summary = args
            .get("summary")
            .and_then(|v| v.as_str())
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| ToolError::InvalidArguments("summary is required".to_string()))?
            .to_string();

        info!(owner = %caller.owner_id, "Intake complete");

        self.store.add_note(&caller.owner_id, summary).await;
        let profile = self.store.complete_intake(&caller.owner_id).await;

        Ok(json!({
            "status": "complete",
            "profile": profile,
        }))
    }
}
