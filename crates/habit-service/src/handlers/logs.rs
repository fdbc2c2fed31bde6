//! Completion and log handlers.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use habit_core::{HabitId, HabitLog};

use crate::error::ApiError;
use crate::extract::{ApiPath, ApiQuery};
use crate::state::AppState;

/// Log response.
#[derive(Debug, Serialize)]
pub struct LogResponse {
    /// Log ID.
    pub id: String,
    /// Habit ID.
    pub habit_id: String,
    /// Calendar date (`YYYY-MM-DD`).
    pub date: NaiveDate,
    /// Completions logged for the day.
    pub completed_count: u32,
    /// Whether the daily goal was reached.
    pub is_completed: bool,
    /// Created timestamp.
    pub created_at: String,
    /// Last write timestamp.
    pub updated_at: String,
}

impl From<&HabitLog> for LogResponse {
    fn from(log: &HabitLog) -> Self {
        Self {
            id: log.id.to_string(),
            habit_id: log.habit_id.to_string(),
            date: log.date,
            completed_count: log.completed_count,
            is_completed: log.is_completed,
            created_at: log.created_at.to_rfc3339(),
            updated_at: log.updated_at.to_rfc3339(),
        }
    }
}

/// Completion query parameters.
#[derive(Debug, Deserialize)]
pub struct CompletionQuery {
    /// Date to log against (default: today).
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

/// Record one completion of a habit.
pub async fn record_completion(
    State(state): State<Arc<AppState>>,
    ApiPath(habit_id): ApiPath<HabitId>,
    ApiQuery(query): ApiQuery<CompletionQuery>,
) -> Result<Json<LogResponse>, ApiError> {
    let date = query.date.unwrap_or_else(|| state.tracker.today());
    let log = state.tracker.record_completion(&habit_id, date)?;
    Ok(Json(LogResponse::from(&log)))
}

/// Set today's completed count for a habit.
pub async fn record_partial(
    State(state): State<Arc<AppState>>,
    ApiPath((habit_id, count)): ApiPath<(HabitId, u32)>,
) -> Result<Json<LogResponse>, ApiError> {
    let log = state.tracker.record_partial(&habit_id, count)?;
    Ok(Json(LogResponse::from(&log)))
}

/// List a habit's logs, oldest first.
pub async fn list_logs(
    State(state): State<Arc<AppState>>,
    ApiPath(habit_id): ApiPath<HabitId>,
) -> Result<Json<Vec<LogResponse>>, ApiError> {
    let logs = state.tracker.logs(&habit_id)?;
    Ok(Json(logs.iter().map(LogResponse::from).collect()))
}

/// Today's log for a habit, or `null`.
pub async fn today_log(
    State(state): State<Arc<AppState>>,
    ApiPath(habit_id): ApiPath<HabitId>,
) -> Result<Json<Option<LogResponse>>, ApiError> {
    let log = state.tracker.today_log(&habit_id)?;
    Ok(Json(log.as_ref().map(LogResponse::from)))
}
