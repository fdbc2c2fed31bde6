//! Habit types.
//!
//! A habit is a recurring goal with a daily target count. Its streak and
//! progress fields are caches of values derived from the log history; see
//! [`crate::streak`] and [`crate::progress`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{HabitError, Result};
use crate::ids::{HabitId, UserId};

/// Minimum accepted daily goal.
pub const MIN_DAILY_GOAL: u32 = 1;

/// The user-editable fields of a habit.
///
/// Used to create and update habits, and as the snapshot kept across a
/// daily reset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HabitDraft {
    /// Display name (must not be blank).
    pub name: String,

    /// Free-form description.
    #[serde(default)]
    pub description: Option<String>,

    /// Completions required for a day to count as done.
    pub daily_goal: u32,
}

impl HabitDraft {
    /// Create a draft.
    #[must_use]
    pub fn new(name: impl Into<String>, description: Option<String>, daily_goal: u32) -> Self {
        Self {
            name: name.into(),
            description,
            daily_goal,
        }
    }

    /// Check the draft before it touches any stored state.
    ///
    /// # Errors
    ///
    /// Returns `HabitError::Validation` if the name is blank or the daily
    /// goal is below [`MIN_DAILY_GOAL`].
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(HabitError::Validation("habit name is required".into()));
        }
        if self.daily_goal < MIN_DAILY_GOAL {
            return Err(HabitError::Validation(format!(
                "daily goal must be at least {MIN_DAILY_GOAL}"
            )));
        }
        Ok(())
    }
}

/// A tracked habit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Habit {
    /// Habit identifier.
    pub id: HabitId,

    /// Owning user.
    pub user_id: UserId,

    /// Display name.
    pub name: String,

    /// Free-form description.
    pub description: Option<String>,

    /// Completions required per day.
    pub daily_goal: u32,

    /// Cached current streak in days.
    pub streak_count: u32,

    /// Cached progress for today, in percent. Not clamped at 100.
    pub progress_percent: f64,

    /// When the habit was created.
    pub created_at: DateTime<Utc>,

    /// When the habit was last written.
    pub updated_at: DateTime<Utc>,
}

impl Habit {
    /// Create a fresh habit with zero streak and progress.
    ///
    /// # Errors
    ///
    /// Returns `HabitError::Validation` if the draft is invalid.
    pub fn create(user_id: UserId, draft: HabitDraft, now: DateTime<Utc>) -> Result<Self> {
        draft.validate()?;
        Ok(Self {
            id: HabitId::generate(),
            user_id,
            name: draft.name,
            description: draft.description,
            daily_goal: draft.daily_goal,
            streak_count: 0,
            progress_percent: 0.0,
            created_at: now,
            updated_at: now,
        })
    }

    /// A brand-new habit with the same editable fields and owner.
    ///
    /// The copy gets a new identity and timestamps and starts with zero
    /// streak and progress. Used by the daily reset.
    #[must_use]
    pub fn recreate(&self, now: DateTime<Utc>) -> Self {
        Self {
            id: HabitId::generate(),
            user_id: self.user_id,
            name: self.name.clone(),
            description: self.description.clone(),
            daily_goal: self.daily_goal,
            streak_count: 0,
            progress_percent: 0.0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Snapshot of the editable fields.
    #[must_use]
    pub fn draft(&self) -> HabitDraft {
        HabitDraft {
            name: self.name.clone(),
            description: self.description.clone(),
            daily_goal: self.daily_goal,
        }
    }

    /// Replace the editable fields.
    ///
    /// Derived fields are left alone; they are refreshed on the next read.
    ///
    /// # Errors
    ///
    /// Returns `HabitError::Validation` if the draft is invalid.
    pub fn apply(&mut self, draft: HabitDraft, now: DateTime<Utc>) -> Result<()> {
        draft.validate()?;
        self.name = draft.name;
        self.description = draft.description;
        self.daily_goal = draft.daily_goal;
        self.updated_at = now;
        Ok(())
    }

    /// Store freshly computed derived values.
    pub fn set_progress(&mut self, streak_count: u32, progress_percent: f64, now: DateTime<Utc>) {
        self.streak_count = streak_count;
        self.progress_percent = progress_percent;
        self.updated_at = now;
    }
}
