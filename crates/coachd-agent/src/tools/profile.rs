//! Profile tools.

use crate::tools::records::{ProfileUpdate, RecordStore};
use crate::tools::{CallerIdentity, Tool, ToolError};
use async_trait::async_trait;
use coachd_core::ToolDefinition;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::debug;

/// Tool for reading the user's training profile.
pub struct GetProfileTool {
    store: Arc<RecordStore>,
}

impl GetProfileTool {
    pub fn new(store: Arc<RecordStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Tool for GetProfileTool {
    fn name(&self) -> &str {
        "get_profile"
    }

    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "get_profile".to_string(),
            description: "Get the user's training profile: goals, experience level, \
                 available days and equipment, and any limitations"
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {}
            }),
        }
    }

    async fn execute(
        &self,
        _args: Value,
        caller: &CallerIdentity,
    ) -> std::result::Result<Value, ToolError> {
        match self.store.get_profile(&caller.owner_id).await {
            Some(profile) => serde_json::to_value(&profile)
                .map_err(|e| ToolError::ExecutionFailed(e.to_string())),
            None => Err(ToolError::NotFound(
                "No profile yet; ask the user about their goals first".to_string(),
            )),
        }
    }
}

/// Tool for updating the user's training profile.
pub struct UpdateProfileTool {
    store: Arc<RecordStore>,
}

impl UpdateProfileTool {
    pub fn new(store: Arc<RecordStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Tool for UpdateProfileTool {
    fn name(&self) -> &str {
        "update_profile"
    }

    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "update_profile".to_string(),
            description: "Update the user's training profile. Only the fields provided \
                 are changed"
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "goals": {
                        "type": "array",
                        "items": {"type": "string"},
                        "description": "Training goals, e.g. ['lose weight', 'run a 10k']"
                    },
                    "experience_level": {
                        "type": "string",
                        "enum": ["beginner", "intermediate", "advanced"],
                        "description": "Self-reported experience level"
                    },
                    "days_per_week": {
                        "type": "integer",
                        "minimum": 1,
                        "maximum": 7,
                        "description": "Days per week the user can train"
                    },
                    "equipment": {
                        "type": "array",
                        "items": {"type": "string"},
                        "description": "Available equipment"
                    },
                    "limitations": {
                        "type": "string",
                        "description": "Injuries or other constraints"
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
        let update: ProfileUpdate = serde_json::from_value(args)
            .map_err(|e| ToolError::InvalidArguments(e.to_string()))?;

        if update.is_empty() {
            return Err(ToolError::InvalidArguments(
                "at least one profile field is required".to_string(),
            ));
        }

        if let Some(days) = update.days_per_week {
            if !(1..=7).contains(&days) {
                return Err(ToolError::InvalidArguments(
                    "days_per_week must be between 1 and 7".to_string(),
                ));
            }
        }

        debug!(owner = %caller.owner_id, "Updating profile");

        let profile = self.store.update_profile(&caller.owner_id, update).await;
        serde_json::to_value(&profile).map_err(|e| ToolError::ExecutionFailed(e.to_string()))
    }
}
