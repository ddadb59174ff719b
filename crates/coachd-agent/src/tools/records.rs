//! Shared training record store and the workout tools built on it.

use crate::tools::{CallerIdentity, Tool, ToolError};
use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use coachd_core::id::short_id;
use coachd_core::{OwnerId, ToolDefinition};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// A user's training profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub goals: Vec<String>,
    pub experience_level: String,
    pub days_per_week: u8,
    pub equipment: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limitations: Option<String>,
    pub intake_complete: bool,
    pub updated_at: DateTime<Utc>,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            goals: Vec::new(),
            experience_level: "beginner".to_string(),
            days_per_week: 3,
            equipment: Vec::new(),
            limitations: None,
            intake_complete: false,
            updated_at: Utc::now(),
        }
    }
}

/// Partial profile update; `None` fields keep their current value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileUpdate {
    pub goals: Option<Vec<String>>,
    pub experience_level: Option<String>,
    pub days_per_week: Option<u8>,
    pub equipment: Option<Vec<String>>,
    pub limitations: Option<String>,
}

impl ProfileUpdate {
    pub(crate) fn is_empty(&self) -> bool {
        self.goals.is_none()
            && self.experience_level.is_none()
            && self.days_per_week.is_none()
            && self.equipment.is_none()
            && self.limitations.is_none()
    }
}

/// A structured workout plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutPlan {
    pub title: String,
    pub days: Vec<PlanDay>,
    pub updated_at: DateTime<Utc>,
}

/// One day in a workout plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanDay {
    pub day: String,
    pub focus: String,
    #[serde(default)]
    pub exercises: Vec<Exercise>,
}

/// One exercise within a plan day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Exercise {
    pub name: String,
    pub sets: u8,
    pub reps: String,
}

/// A logged workout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutEntry {
    pub id: String,
    pub date: NaiveDate,
    pub activity: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_min: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub logged_at: DateTime<Utc>,
}

/// A note the coach keeps about the user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoachNote {
    pub id: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// User feedback about the coaching.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackEntry {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// In-memory store of training records, keyed by owner.
#[derive(Default)]
pub struct RecordStore {
    profiles: RwLock<HashMap<OwnerId, Profile>>,
    plans: RwLock<HashMap<OwnerId, WorkoutPlan>>,
    workouts: RwLock<HashMap<OwnerId, Vec<WorkoutEntry>>>,
    notes: RwLock<HashMap<OwnerId, Vec<CoachNote>>>,
    feedback: RwLock<HashMap<OwnerId, Vec<FeedbackEntry>>>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get_profile(&self, owner: &OwnerId) -> Option<Profile> {
        let profiles = self.profiles.read().await;
        profiles.get(owner).cloned()
    }

    /// Upsert the profile, merging only the fields the update carries.
    pub async fn update_profile(&self, owner: &OwnerId, update: ProfileUpdate) -> Profile {
        let mut profiles = self.profiles.write().await;
        let profile = profiles.entry(owner.clone()).or_default();
        if let Some(goals) = update.goals {
            profile.goals = goals;
        }
        if let Some(level) = update.experience_level {
            profile.experience_level = level;
        }
        if let Some(days) = update.days_per_week {
            profile.days_per_week = days;
        }
        if let Some(equipment) = update.equipment {
            profile.equipment = equipment;
        }
        if let Some(limitations) = update.limitations {
            profile.limitations = Some(limitations);
        }
        profile.updated_at = Utc::now();
        profile.clone()
    }

    pub async fn get_plan(&self, owner: &OwnerId) -> Option<WorkoutPlan> {
        let plans = self.plans.read().await;
        plans.get(owner).cloned()
    }

    pub async fn save_plan(&self, owner: &OwnerId, plan: WorkoutPlan) {
        let mut plans = self.plans.write().await;
        plans.insert(owner.clone(), plan);
    }

    pub async fn log_workout(
        &self,
        owner: &OwnerId,
        date: NaiveDate,
        activity: String,
        duration_min: Option<u32>,
        notes: Option<String>,
    ) -> WorkoutEntry {
        let entry = WorkoutEntry {
            id: short_id(),
            date,
            activity,
            duration_min,
            notes,
            logged_at: Utc::now(),
        };
        let mut workouts = self.workouts.write().await;
        workouts
            .entry(owner.clone())
            .or_default()
            .push(entry.clone());
        entry
    }

    /// Most recent workouts first, at most `limit`.
    pub async fn workout_history(&self, owner: &OwnerId, limit: usize) -> Vec<WorkoutEntry> {
        let workouts = self.workouts.read().await;
        let mut entries = workouts.get(owner).cloned().unwrap_or_default();
        entries.sort_by(|a, b| b.date.cmp(&a.date));
        entries.truncate(limit);
        entries
    }

    /// Consecutive days with at least one workout, counted back from
    /// `today`. A streak survives if the last workout was yesterday.
    pub async fn streak(&self, owner: &OwnerId, today: NaiveDate) -> u32 {
        let workouts = self.workouts.read().await;
        let Some(entries) = workouts.get(owner) else {
            return 0;
        };

        let days: std::collections::HashSet<NaiveDate> =
            entries.iter().map(|e| e.date).collect();

        let mut cursor = if days.contains(&today) {
            today
        } else if days.contains(&(today - Duration::days(1))) {
            today - Duration::days(1)
        } else {
            return 0;
        };

        let mut streak = 0;
        while days.contains(&cursor) {
            streak += 1;
            cursor -= Duration::days(1);
        }
        streak
    }

    pub async fn add_note(&self, owner: &OwnerId, text: String) -> CoachNote {
        let note = CoachNote {
            id: short_id(),
            text,
            created_at: Utc::now(),
        };
        let mut notes = self.notes.write().await;
        notes.entry(owner.clone()).or_default().push(note.clone());
        note
    }

    pub async fn add_feedback(
        &self,
        owner: &OwnerId,
        rating: Option<u8>,
        comment: Option<String>,
    ) -> FeedbackEntry {
        let entry = FeedbackEntry {
            id: short_id(),
            rating,
            comment,
            created_at: Utc::now(),
        };
        let mut feedback = self.feedback.write().await;
        feedback
            .entry(owner.clone())
            .or_default()
            .push(entry.clone());
        entry
    }

    /// Mark intake as complete, creating a default profile if none exists.
    pub async fn complete_intake(&self, owner: &OwnerId) -> Profile {
        let mut profiles = self.profiles.write().await;
        let profile = profiles.entry(owner.clone()).or_default();
        profile.intake_complete = true;
        profile.updated_at = Utc::now();
        profile.clone()
    }
}

/// Tool for logging a workout.
pub struct LogWorkoutTool {
    store: Arc<RecordStore>,
}

impl LogWorkoutTool {
    pub fn new(store: Arc<RecordStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Tool for LogWorkoutTool {
    fn name(&self) -> &str {
        "log_workout"
    }

    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "log_workout".to_string(),
            description: "Record a completed workout for the user".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "activity": {
                        "type": "string",
                        "description": "What the user did, e.g. 'upper body strength' or '5k run'"
                    },
                    "date": {
                        "type": "string",
                        "description": "Workout date as YYYY-MM-DD; defaults to today"
                    },
                    "duration_min": {
                        "type": "integer",
                        "description": "Duration in minutes"
                    },
                    "notes": {
                        "type": "string",
                        "description": "Anything notable about the session"
                    }
                },
                "required": ["activity"]
            }),
        }
    }

    async fn execute(
        &self,
        args: Value,
        caller: &CallerIdentity,
    ) -> std::result::Result<Value, ToolError> {
        let activity = args
            .get("activity")
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| ToolError::InvalidArguments("activity is required".to_string()))?
            .to_string();

        let date = match args.get("date").and_then(|v| v.as_str()) {
            Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| {
                ToolError::InvalidArguments(format!("date must be YYYY-MM-DD, got {:?}", s))
            })?,
            None => Utc::now().date_naive(),
        };

        let duration_min = args
            .get("duration_min")
            .and_then(|v| v.as_u64())
            .map(|d| d as u32);
        let notes = args
            .get("notes")
            .and_then(|v| v.as_str())
            .map(String::from);

        debug!(owner = %caller.owner_id, %activity, "Logging workout");

        let entry = self
            .store
            .log_workout(&caller.owner_id, date, activity, duration_min, notes)
            .await;
        serde_json::to_value(&entry)
            .map_err(|e| ToolError::ExecutionFailed(e.to_string()))
    }
}

/// Tool for listing recent workouts.
pub struct GetWorkoutHistoryTool {
    store: Arc<RecordStore>,
}

impl GetWorkoutHistoryTool {
    pub fn new(store: Arc<RecordStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Tool for GetWorkoutHistoryTool {
    fn name(&self) -> &str {
        "get_workout_history"
    }

    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "get_workout_history".to_string(),
            description: "List the user's most recent workouts".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "limit": {
                        "type": "integer",
                        "description": "Maximum entries to return (default 10)"
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
        let limit = args
            .get("limit")
            .and_then(|v| v.as_u64())
            .map(|v| v as usize)
            .unwrap_or(10);

        let entries = self.store.workout_history(&caller.owner_id, limit).await;
        let count = entries.len();
        Ok(json!({
            "workouts": entries,
            "count": count,
        }))
    }
}

/// Tool for checking the current workout streak.
pub struct GetStreakTool {
    store: Arc<RecordStore>,
}

impl GetStreakTool {
    pub fn new(store: Arc<RecordStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Tool for GetStreakTool {
    fn name(&self) -> &str {
        "get_streak"
    }

    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "get_streak".to_string(),
            description: "Get the user's current consecutive-day workout streak".to_string(),
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
        let today = Utc::now().date_naive();
        let streak = self.store.streak(&caller.owner_id, today).await;
        Ok(json!({ "streak_days": streak }))
    }
}
