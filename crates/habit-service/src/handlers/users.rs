//! Per-user handlers: habit listing, daily reset and streak.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use habit_core::UserId;

use crate::error::ApiError;
use crate::extract::ApiPath;
use crate::handlers::habits::HabitResponse;
use crate::state::AppState;

/// List a user's habits, newest first, with today's status.
pub async fn list_habits(
    State(state): State<Arc<AppState>>,
    ApiPath(user_id): ApiPath<UserId>,
) -> Result<Json<Vec<HabitResponse>>, ApiError> {
    let summaries = state.tracker.list_habits(&user_id)?;
    Ok(Json(summaries.iter().map(HabitResponse::from).collect()))
}

/// Daily reset response.
#[derive(Debug, Serialize)]
pub struct DailyResetResponse {
    /// User ID.
    pub user_id: u64,
    /// The recreated habits.
    pub habits: Vec<HabitResponse>,
    /// User streak after the inactivity check.
    pub total_streak: u32,
}

/// Recreate all of a user's habits, then apply the inactivity check.
pub async fn daily_reset(
    State(state): State<Arc<AppState>>,
    ApiPath(user_id): ApiPath<UserId>,
) -> Result<Json<DailyResetResponse>, ApiError> {
    let habits = state.tracker.daily_reset(&user_id)?;
    let user = state.tracker.check_user_streak_after_reset(&user_id)?;

    Ok(Json(DailyResetResponse {
        user_id: user_id.get(),
        habits: habits.iter().map(|h| HabitResponse::new(h, None)).collect(),
        total_streak: user.total_streak,
    }))
}

/// User streak response.
#[derive(Debug, Serialize)]
pub struct StreakResponse {
    /// User ID.
    pub user_id: u64,
    /// Consecutive active days.
    pub total_streak: u32,
}

/// Get a user's cross-habit streak.
pub async fn get_streak(
    State(state): State<Arc<AppState>>,
    ApiPath(user_id): ApiPath<UserId>,
) -> Result<Json<StreakResponse>, ApiError> {
    let total_streak = state.tracker.user_streak(&user_id)?;
    Ok(Json(StreakResponse {
        user_id: user_id.get(),
        total_streak,
    }))
}
