//! Habit management handlers.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use habit_core::{Habit, HabitDraft, HabitId, HabitLog, UserId};

use crate::error::ApiError;
use crate::extract::{ApiJson, ApiPath};
use crate::state::AppState;
use crate::tracker::HabitSummary;

/// Habit response.
#[derive(Debug, Serialize)]
pub struct HabitResponse {
    /// Habit ID.
    pub id: String,
    /// Owning user ID.
    pub user_id: u64,
    /// Display name.
    pub name: String,
    /// Description.
    pub description: Option<String>,
    /// Completions required per day.
    pub daily_goal: u32,
    /// Current streak in days.
    pub streak_count: u32,
    /// Today's progress in percent.
    pub progress_percent: f64,
    /// Whether today's goal is reached.
    pub completed_today: bool,
    /// Completions logged today.
    pub completed_count_today: u32,
    /// Created timestamp.
    pub created_at: String,
    /// Last write timestamp.
    pub updated_at: String,
}

impl HabitResponse {
    /// Build a response from a habit and its log for today.
    #[must_use]
    pub fn new(habit: &Habit, today: Option<&HabitLog>) -> Self {
        Self {
            id: habit.id.to_string(),
            user_id: habit.user_id.get(),
            name: habit.name.clone(),
            description: habit.description.clone(),
            daily_goal: habit.daily_goal,
            streak_count: habit.streak_count,
            progress_percent: habit.progress_percent,
            completed_today: today.is_some_and(|log| log.is_completed),
            completed_count_today: today.map_or(0, |log| log.completed_count),
            created_at: habit.created_at.to_rfc3339(),
            updated_at: habit.updated_at.to_rfc3339(),
        }
    }
}

impl From<&HabitSummary> for HabitResponse {
    fn from(summary: &HabitSummary) -> Self {
        Self::new(&summary.habit, summary.today.as_ref())
    }
}

/// Create habit request.
#[derive(Debug, Deserialize)]
pub struct CreateHabitRequest {
    /// Owning user.
    pub user_id: UserId,
    /// Display name.
    pub name: String,
    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
    /// Completions required per day.
    pub daily_goal: u32,
}

/// Create a habit.
pub async fn create_habit(
    State(state): State<Arc<AppState>>,
    ApiJson(body): ApiJson<CreateHabitRequest>,
) -> Result<Json<HabitResponse>, ApiError> {
    let draft = HabitDraft::new(body.name, body.description, body.daily_goal);
    let habit = state.tracker.create_habit(body.user_id, draft)?;

    Ok(Json(HabitResponse::new(&habit, None)))
}

/// Get a habit with refreshed streak and progress.
pub async fn get_habit(
    State(state): State<Arc<AppState>>,
    ApiPath(habit_id): ApiPath<HabitId>,
) -> Result<Json<HabitResponse>, ApiError> {
    let summary = state.tracker.get_habit(&habit_id)?;
    Ok(Json(HabitResponse::from(&summary)))
}

/// Replace a habit's editable fields.
pub async fn update_habit(
    State(state): State<Arc<AppState>>,
    ApiPath(habit_id): ApiPath<HabitId>,
    ApiJson(draft): ApiJson<HabitDraft>,
) -> Result<Json<HabitResponse>, ApiError> {
    let summary = state.tracker.update_habit(&habit_id, draft)?;
    Ok(Json(HabitResponse::from(&summary)))
}

/// Delete a habit and its logs.
pub async fn delete_habit(
    State(state): State<Arc<AppState>>,
    ApiPath(habit_id): ApiPath<HabitId>,
) -> Result<StatusCode, ApiError> {
    state.tracker.delete_habit(&habit_id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Progress response.
#[derive(Debug, Serialize)]
pub struct ProgressResponse {
    /// Habit ID.
    pub habit_id: String,
    /// Current streak in days.
    pub streak_count: u32,
    /// Today's progress in percent.
    pub progress_percent: f64,
}

/// Recompute and return a habit's streak and progress.
pub async fn get_progress(
    State(state): State<Arc<AppState>>,
    ApiPath(habit_id): ApiPath<HabitId>,
) -> Result<Json<ProgressResponse>, ApiError> {
    let habit = state
        .tracker
        .refresh_progress(&habit_id)?
        .ok_or_else(|| ApiError::NotFound(format!("habit not found: {habit_id}")))?;

    Ok(Json(ProgressResponse {
        habit_id: habit.id.to_string(),
        streak_count: habit.streak_count,
        progress_percent: habit.progress_percent,
    }))
}
