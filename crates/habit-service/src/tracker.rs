//! Habit tracking operations.
//!
//! [`HabitTracker`] ties the store, the clock and the calculators together.
//! Handlers call it; it never sees HTTP types.

use std::sync::Arc;

use chrono::NaiveDate;

use habit_core::{
    daily_progress, streak_from_logs, Clock, Completion, Habit, HabitDraft, HabitError, HabitId,
    HabitLog, Result, User, UserId,
};
use habit_store::{Store, StoreError};

/// A habit together with its log for today, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct HabitSummary {
    /// The habit with refreshed streak and progress.
    pub habit: Habit,
    /// Today's log.
    pub today: Option<HabitLog>,
}

/// Habit tracking operations over a store and a clock.
#[derive(Clone)]
pub struct HabitTracker {
    store: Arc<dyn Store>,
    clock: Arc<dyn Clock>,
}

impl HabitTracker {
    /// Create a tracker.
    #[must_use]
    pub fn new(store: Arc<dyn Store>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// The date every computation is evaluated against.
    #[must_use]
    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    // =========================================================================
    // Habits
    // =========================================================================

    /// Create a habit for `user_id`. Counts as activity for the user.
    pub fn create_habit(&self, user_id: UserId, draft: HabitDraft) -> Result<Habit> {
        let habit = Habit::create(user_id, draft, self.clock.now())?;
        self.store.put_habit(&habit)?;
        self.record_user_activity(user_id)?;

        tracing::info!(
            habit_id = %habit.id,
            user_id = %user_id,
            name = %habit.name,
            "Habit created"
        );
        Ok(habit)
    }

    /// Replace a habit's name, description and daily goal.
    pub fn update_habit(&self, habit_id: &HabitId, draft: HabitDraft) -> Result<HabitSummary> {
        draft.validate()?;
        let now = self.clock.now();
        let mut outcome = Ok(());
        self.store
            .update_habit(habit_id, &mut |habit| {
                outcome = habit.apply(draft.clone(), now);
            })?
            .ok_or(HabitError::HabitNotFound {
                habit_id: *habit_id,
            })?;
        outcome?;

        tracing::info!(habit_id = %habit_id, "Habit updated");
        self.get_habit(habit_id)
    }

    /// Delete a habit and its logs.
    pub fn delete_habit(&self, habit_id: &HabitId) -> Result<()> {
        self.store.delete_habit(habit_id).map_err(|e| match e {
            StoreError::NotFound { .. } => HabitError::HabitNotFound {
                habit_id: *habit_id,
            },
            other => other.into(),
        })?;

        tracing::info!(habit_id = %habit_id, "Habit deleted");
        Ok(())
    }

    /// Fetch a habit with freshly computed streak and progress.
    pub fn get_habit(&self, habit_id: &HabitId) -> Result<HabitSummary> {
        self.refresh(habit_id)?
            .ok_or(HabitError::HabitNotFound {
                habit_id: *habit_id,
            })
    }

    /// List a user's habits, newest first, each refreshed before returning.
    pub fn list_habits(&self, user_id: &UserId) -> Result<Vec<HabitSummary>> {
        let habits = self.store.list_habits_by_user(user_id)?;
        let mut summaries = Vec::with_capacity(habits.len());
        for habit in habits {
            // A habit deleted between listing and refresh is skipped.
            if let Some(summary) = self.refresh(&habit.id)? {
                summaries.push(summary);
            }
        }
        Ok(summaries)
    }

    // =========================================================================
    // Progress
    // =========================================================================

    /// Recompute and store a habit's streak and progress.
    ///
    /// Returns `None` without error if the habit doesn't exist.
    pub fn refresh_progress(&self, habit_id: &HabitId) -> Result<Option<Habit>> {
        Ok(self.refresh(habit_id)?.map(|summary| summary.habit))
    }

    fn refresh(&self, habit_id: &HabitId) -> Result<Option<HabitSummary>> {
        let Some(habit) = self.store.get_habit(habit_id)? else {
            return Ok(None);
        };

        let today = self.clock.today();
        let streak = streak_from_logs(&self.store.list_logs(habit_id)?, today);
        let today_log = self.store.get_log(habit_id, today)?;
        let progress = daily_progress(today_log.as_ref(), habit.daily_goal);

        if habit.streak_count == streak && habit.progress_percent.to_bits() == progress.to_bits() {
            return Ok(Some(HabitSummary {
                habit,
                today: today_log,
            }));
        }

        let now = self.clock.now();
        let refreshed = self
            .store
            .update_habit(habit_id, &mut |habit| habit.set_progress(streak, progress, now))?;

        tracing::debug!(habit_id = %habit_id, streak, progress, "Habit progress refreshed");
        Ok(refreshed.map(|habit| HabitSummary {
            habit,
            today: today_log,
        }))
    }

    // =========================================================================
    // Completions
    // =========================================================================

    /// Add one completion to the habit's log for `date`.
    pub fn record_completion(&self, habit_id: &HabitId, date: NaiveDate) -> Result<HabitLog> {
        self.complete(habit_id, date, Completion::Increment)
    }

    /// Set today's completed count for the habit, replacing the old value.
    pub fn record_partial(&self, habit_id: &HabitId, completed_count: u32) -> Result<HabitLog> {
        self.complete(habit_id, self.clock.today(), Completion::Set(completed_count))
    }

    /// Apply a completion to the (habit, date) log.
    ///
    /// The log write is the last step that can fail the call. Activity is
    /// recorded before it (same-day repeats are no-ops) and the refresh
    /// after it only logs on failure, since every read recomputes anyway.
    fn complete(
        &self,
        habit_id: &HabitId,
        date: NaiveDate,
        action: Completion,
    ) -> Result<HabitLog> {
        let habit = self.require_habit(habit_id)?;
        self.record_user_activity(habit.user_id)?;

        let now = self.clock.now();
        let log = self.store.update_log(habit_id, date, &mut |existing| {
            action.apply(existing, habit.id, date, habit.daily_goal, now)
        })?;

        tracing::info!(
            habit_id = %habit_id,
            date = %date,
            completed_count = log.completed_count,
            is_completed = log.is_completed,
            "Completion recorded"
        );

        if let Err(e) = self.refresh(habit_id) {
            tracing::warn!(
                habit_id = %habit_id,
                error = %e,
                "Progress refresh after completion failed"
            );
        }
        Ok(log)
    }

    // =========================================================================
    // Logs
    // =========================================================================

    /// All logs for a habit, oldest first.
    pub fn logs(&self, habit_id: &HabitId) -> Result<Vec<HabitLog>> {
        self.require_habit(habit_id)?;
        Ok(self.store.list_logs(habit_id)?)
    }

    /// Today's log for a habit, if one exists.
    pub fn today_log(&self, habit_id: &HabitId) -> Result<Option<HabitLog>> {
        self.require_habit(habit_id)?;
        Ok(self.store.get_log(habit_id, self.clock.today())?)
    }

    fn require_habit(&self, habit_id: &HabitId) -> Result<Habit> {
        self.store
            .get_habit(habit_id)?
            .ok_or(HabitError::HabitNotFound {
                habit_id: *habit_id,
            })
    }

    // =========================================================================
    // Daily reset and user streak
    // =========================================================================

    /// Wipe and recreate all of a user's habits.
    ///
    /// Every habit is replaced by a fresh copy with the same name,
    /// description and goal; all log history is dropped. The swap is
    /// atomic: on failure the user keeps the old habits.
    pub fn daily_reset(&self, user_id: &UserId) -> Result<Vec<Habit>> {
        let now = self.clock.now();
        let fresh = self
            .store
            .reset_user_habits(user_id, &mut |habit| habit.recreate(now))?;

        tracing::info!(user_id = %user_id, habits = fresh.len(), "Daily reset completed");
        Ok(fresh)
    }

    /// Forfeit the user's streak if a full day passed without activity.
    pub fn check_user_streak_after_reset(&self, user_id: &UserId) -> Result<User> {
        let today = self.clock.today();
        let now = self.clock.now();
        let mut forfeited = false;
        let user = self.store.update_user(user_id, now, &mut |user| {
            forfeited = user.check_after_reset(today, now);
        })?;

        if forfeited {
            tracing::info!(user_id = %user_id, "User streak forfeited after inactivity");
        }
        Ok(user)
    }

    /// The user's current cross-habit streak.
    pub fn user_streak(&self, user_id: &UserId) -> Result<u32> {
        Ok(self
            .store
            .get_or_create_user(user_id, self.clock.now())?
            .total_streak)
    }

    fn record_user_activity(&self, user_id: UserId) -> Result<User> {
        let today = self.clock.today();
        let now = self.clock.now();
        let user = self.store.update_user(&user_id, now, &mut |user| {
            user.record_activity(today, now);
        })?;

        tracing::debug!(
            user_id = %user_id,
            total_streak = user.total_streak,
            "User activity recorded"
        );
        Ok(user)
    }
}
