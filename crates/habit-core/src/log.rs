//! Daily completion logs.
//!
//! One [`HabitLog`] exists per (habit, calendar date). [`Completion`] holds
//! the rules for how a "mark done" or "mark partial" action changes that
//! day's log.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{HabitId, LogId};

/// One day's completion record for one habit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HabitLog {
    /// Log identifier.
    pub id: LogId,

    /// Owning habit.
    pub habit_id: HabitId,

    /// Calendar date this record covers.
    pub date: NaiveDate,

    /// Completions recorded for the day.
    pub completed_count: u32,

    /// Whether the daily goal was reached.
    pub is_completed: bool,

    /// When the log was created.
    pub created_at: DateTime<Utc>,

    /// When the log was last written.
    pub updated_at: DateTime<Utc>,
}

impl HabitLog {
    /// Create a log for `date` with the given count.
    #[must_use]
    pub fn new(
        habit_id: HabitId,
        date: NaiveDate,
        completed_count: u32,
        daily_goal: u32,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: LogId::generate(),
            habit_id,
            date,
            completed_count,
            is_completed: completed_count >= daily_goal,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A completion action against one day's log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// Add one completion. Once the goal is reached the day stays completed.
    Increment,

    /// Overwrite the count. The completed flag follows the new count and
    /// can go back to false.
    Set(u32),
}

impl Completion {
    /// Apply the action to the existing log for the day, or create one.
    #[must_use]
    pub fn apply(
        self,
        existing: Option<HabitLog>,
        habit_id: HabitId,
        date: NaiveDate,
        daily_goal: u32,
        now: DateTime<Utc>,
    ) -> HabitLog {
        match (self, existing) {
            (Self::Increment, None) => HabitLog::new(habit_id, date, 1, daily_goal, now),
            (Self::Set(count), None) => HabitLog::new(habit_id, date, count, daily_goal, now),
            (Self::Increment, Some(mut log)) => {
                log.completed_count = log.completed_count.saturating_add(1);
                if log.completed_count >= daily_goal {
                    log.is_completed = true;
                }
                log.updated_at = now;
                log
            }
            (Self::Set(count), Some(mut log)) => {
                log.completed_count = count;
                log.is_completed = count >= daily_goal;
                log.updated_at = now;
                log
            }
        }
    }
}
