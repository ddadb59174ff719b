//! Workout plan tools.

use crate::tools::records::{PlanDay, RecordStore, WorkoutPlan};
use crate::tools::{CallerIdentity, Tool, ToolError};
use async_trait::async_trait;
use chrono::Utc;
use coachd_core::ToolDefinition;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::debug;

/// Tool for reading the user's current workout plan.
pub struct GetWorkoutPlanTool {
    store: Arc<RecordStore>,
}

impl GetWorkoutPlanTool {
    pub fn new(store: Arc<RecordStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Tool for GetWorkoutPlanTool {
    fn name(&self) -> &str {
        "get_workout_plan"
    }

    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "get_workout_plan".to_string(),
            description: "Get the user's current workout plan".to_string(),
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
        match self.store.get_plan(&caller.owner_id).await {
            Some(plan) => {
                serde_json::to_value(&plan).map_err(|e| ToolError::ExecutionFailed(e.to_string()))
            }
            None => Err(ToolError::NotFound(
                "No workout plan yet; build one with save_workout_plan".to_string(),
            )),
        }
    }
}

#[derive(Deserialize)]
struct PlanInput {
    title: String,
    days: Vec<PlanDay>,
}

/// Tool for saving a workout plan, replacing any existing one.
pub struct SaveWorkoutPlanTool {
    store: Arc<RecordStore>,
}

impl SaveWorkoutPlanTool {
    pub fn new(store: Arc<RecordStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Tool for SaveWorkoutPlanTool {
    fn name(&self) -> &str {
        "save_workout_plan"
    }

    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "save_workout_plan".to_string(),
            description: "Save a workout plan for the user, replacing the current one"
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "title": {
                        "type": "string",
                        "description": "Plan title, e.g. '4-day upper/lower split'"
                    },
                    "days": {
                        "type": "array",
                        "description": "Training days in order",
                        "items": {
                            "type": "object",
                            "properties": {
                                "day": {"type": "string", "description": "e.g. 'Monday'"},
                                "focus": {"type": "string", "description": "e.g. 'Upper body'"},
                                "exercises": {
                                    "type": "array",
                                    "items": {
                                        "type": "object",
                                        "properties": {
                                            "name": {"type": "string"},
                                            "sets": {"type": "integer"},
                                            "reps": {"type": "string"}
                                        },
                                        "required": ["name", "sets", "reps"]
                                    }
                                }
                            },
                            "required": ["day", "focus"]
                        }
                    }
                },
                "required": ["title", "days"]
            }),
        }
    }

    async fn execute(
        &self,
        args: Value,
        caller: &CallerIdentity,
    ) -> std::result::Result<Value, ToolError> {
        let input: PlanInput = serde_json::from_value(args)
            .map_err(|e| ToolError::InvalidArguments(e.to_string()))?;

        if input.days.is_empty() {
            return Err(ToolError::InvalidArguments(
                "a plan needs at least one day".to_string(),
            ));
        }

        let plan = WorkoutPlan {
            title: input.title,
            days: input.days,
            updated_at: Utc::now(),
        };

        debug!(owner = %caller.owner_id, title = %plan.title, "Saving workout plan");

        self.store.save_plan(&caller.owner_id, plan.clone()).await;
        serde_json::to_value(&plan).map_err(|e| ToolError::ExecutionFailed(e.to_string()))
    }
}
