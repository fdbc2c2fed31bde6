//! Streak calculation.
//!
//! A streak is the number of consecutive completed days ending at the
//! anchor date. The anchor is today when today is already completed and
//! yesterday otherwise, so a habit that has not been done yet today keeps
//! its streak until the day is over.

use std::collections::HashSet;

use chrono::{Days, NaiveDate};

use crate::log::HabitLog;

/// Compute the current streak from the dates of completed logs.
///
/// Input order does not matter and duplicate dates are ignored.
#[must_use]
pub fn current_streak<I>(completed_dates: I, today: NaiveDate) -> u32
where
    I: IntoIterator<Item = NaiveDate>,
{
    let completed: HashSet<NaiveDate> = completed_dates.into_iter().collect();
    if completed.is_empty() {
        return 0;
    }

    let anchor = if completed.contains(&today) {
        Some(today)
    } else {
        today.pred_opt()
    };

    let mut streak = 0;
    let mut day = anchor;
    while let Some(date) = day.filter(|d| completed.contains(d)) {
        streak += 1;
        day = date.checked_sub_days(Days::new(1));
    }
    streak
}

/// Compute the streak from a habit's logs, skipping incomplete days.
#[must_use]
pub fn streak_from_logs(logs: &[HabitLog], today: NaiveDate) -> u32 {
    current_streak(
        logs.iter().filter(|l| l.is_completed).map(|l| l.date),
        today,
    )
}
