//! Tool framework and the built-in coaching tools.
//!
//! This module provides:
//! - [`Tool`] trait for implementing tools
//! - [`ToolRegistry`] holding the tools exposed to the model
//! - Built-in tools over the shared training [`RecordStore`]

mod intake;
mod notes;
mod plan;
mod profile;
mod records;
mod web;

pub use intake::CompleteIntakeTool;
pub use notes::{RecordFeedbackTool, SaveCoachNoteTool};
pub use plan::{GetWorkoutPlanTool, SaveWorkoutPlanTool};
pub use profile::{GetProfileTool, UpdateProfileTool};
pub use records::{
    CoachNote, FeedbackEntry, GetStreakTool, GetWorkoutHistoryTool, LogWorkoutTool, Profile,
    RecordStore, WorkoutEntry, WorkoutPlan,
};
pub use web::{WebSearchConfig, WebSearchTool};

use async_trait::async_trait;
use coachd_core::{OwnerId, SessionId, ToolDefinition};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

/// Errors a tool can fail with. The dispatcher converts these into error
/// outcomes; they never cross the dispatcher boundary as `Err`.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Arguments failed validation.
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// A record the tool needs does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The tool ran but could not complete its work.
    #[error("Execution failed: {0}")]
    ExecutionFailed(String),
}

/// Who is calling the tool.
#[derive(Debug, Clone)]
pub struct CallerIdentity {
    /// User whose records the tools read and mutate.
    pub owner_id: OwnerId,

    /// Session the call originates from.
    pub session_id: SessionId,
}

/// A tool that can be executed by the agent.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Get the tool name.
    fn name(&self) -> &str;

    /// Get the tool definition for the model.
    fn definition(&self) -> ToolDefinition;

    /// Execute the tool with given arguments.
    async fn execute(
        &self,
        args: Value,
        caller: &CallerIdentity,
    ) -> std::result::Result<Value, ToolError>;
}

/// Registry of tools exposed to the model.
///
/// Built once at startup and shared read-only afterwards.
#[derive(Default)]
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the full coaching tool catalog.
    pub fn with_defaults(records: Arc<RecordStore>, web: WebSearchConfig) -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(GetProfileTool::new(records.clone())));
        registry.register(Arc::new(UpdateProfileTool::new(records.clone())));
        registry.register(Arc::new(GetWorkoutPlanTool::new(records.clone())));
        registry.register(Arc::new(SaveWorkoutPlanTool::new(records.clone())));
        registry.register(Arc::new(LogWorkoutTool::new(records.clone())));
        registry.register(Arc::new(GetWorkoutHistoryTool::new(records.clone())));
        registry.register(Arc::new(GetStreakTool::new(records.clone())));
        registry.register(Arc::new(SaveCoachNoteTool::new(records.clone())));
        registry.register(Arc::new(RecordFeedbackTool::new(records.clone())));
        registry.register(Arc::new(CompleteIntakeTool::new(records)));
        registry.register(Arc::new(WebSearchTool::new(web)));
        registry
    }

    /// Register a tool. Later registrations replace earlier ones.
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        self.tools.insert(tool.name().to_string(), tool);
    }

    /// Look up a tool by name.
    pub fn lookup(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    /// Definitions of every registered tool, sorted by name for stable
    /// prompt construction.
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        let mut defs: Vec<ToolDefinition> = self.tools.values().map(|t| t.definition()).collect();
        defs.sort_by(|a, b| a.name.cmp(&b.name));
        defs
    }

    /// Number of registered tools.
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

/// Human-readable label shown to the user while a tool runs.
///
/// Unknown names fall back to the raw name.
pub fn display_label(name: &str) -> String {
    match name {
        "get_profile" => "Reading your profile".to_string(),
        "update_profile" => "Updating your profile".to_string(),
        "get_workout_plan" => "Looking up your plan".to_string(),
        "save_workout_plan" => "Saving your plan".to_string(),
        "log_workout" => "Logging your workout".to_string(),
        "get_workout_history" => "Reviewing your history".to_string(),
        "get_streak" => "Checking your streak".to_string(),
        "save_coach_note" => "Taking a note".to_string(),
        "record_feedback" => "Recording your feedback".to_string(),
        "web_search" => "Searching the web".to_string(),
        "complete_intake" => "Finishing your intake".to_string(),
        other => other.to_string(),
    }
}
