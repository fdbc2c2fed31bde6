//! Users and the cross-habit activity streak.
//!
//! The user streak counts consecutive days on which the user did anything
//! (completed or created a habit). It is tracked independently from the
//! per-habit streaks and survives daily resets.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::UserId;

/// Days without activity after which a reset forfeits the user streak.
pub const STREAK_FORFEIT_GAP_DAYS: i64 = 2;

/// A user record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// User identifier.
    pub id: UserId,

    /// Last day with recorded activity.
    pub last_activity_date: Option<NaiveDate>,

    /// Consecutive active days.
    pub total_streak: u32,

    /// When the user record was created.
    pub created_at: DateTime<Utc>,

    /// When the user record was last written.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a user with no activity.
    #[must_use]
    pub fn new(id: UserId, now: DateTime<Utc>) -> Self {
        Self {
            id,
            last_activity_date: None,
            total_streak: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Days since the last activity, if any.
    #[must_use]
    pub fn days_since_activity(&self, today: NaiveDate) -> Option<i64> {
        self.last_activity_date
            .map(|last| today.signed_duration_since(last).num_days())
    }

    /// Record activity on `today`.
    ///
    /// Same-day activity is counted once, the next day extends the streak
    /// and a longer gap restarts it at 1. Returns whether anything changed.
    pub fn record_activity(&mut self, today: NaiveDate, now: DateTime<Utc>) -> bool {
        let streak = match self.days_since_activity(today) {
            None => 1,
            Some(1) => self.total_streak.saturating_add(1),
            Some(gap) if gap > 1 => 1,
            // Same day, or the clock went backwards.
            Some(_) => return false,
        };
        self.total_streak = streak;
        self.last_activity_date = Some(today);
        self.updated_at = now;
        true
    }

    /// Forfeit the streak if the user skipped a full day.
    ///
    /// Meant to run after a daily reset. Returns whether the streak was
    /// cleared.
    pub fn check_after_reset(&mut self, today: NaiveDate, now: DateTime<Utc>) -> bool {
        match self.days_since_activity(today) {
            Some(gap) if gap >= STREAK_FORFEIT_GAP_DAYS => {
                self.total_streak = 0;
                self.last_activity_date = None;
                self.updated_at = now;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Days;

    fn day(n: u64) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .checked_add_days(Days::new(n))
            .unwrap()
    }

    fn user() -> User {
        User::new(UserId::new(1), Utc::now())
    }

    #[test]
    fn first_activity_starts_streak() {
        let mut user = user();
        assert!(user.record_activity(day(1), Utc::now()));
        assert_eq!(user.total_streak, 1);
        assert_eq!(user.last_activity_date, Some(day(1)));
    }

    #[test]
    fn same_day_does_not_double_count() {
        let mut user = user();
        user.record_activity(day(1), Utc::now());
        assert!(!user.record_activity(day(1), Utc::now()));
        assert_eq!(user.total_streak, 1);
    }

    #[test]
    fn consecutive_days_then_gap_restarts_at_one() {
        let mut user = user();
        user.record_activity(day(1), Utc::now());
        user.record_activity(day(2), Utc::now());
        assert_eq!(user.total_streak, 2);

        user.record_activity(day(4), Utc::now());
        assert_eq!(user.total_streak, 1);
        assert_eq!(user.last_activity_date, Some(day(4)));
    }

    #[test]
    fn earlier_date_is_ignored() {
        let mut user = user();
        user.record_activity(day(5), Utc::now());
        assert!(!user.record_activity(day(3), Utc::now()));
        assert_eq!(user.last_activity_date, Some(day(5)));
    }

    #[test]
    fn reset_check_keeps_streak_within_grace_day() {
        let mut user = user();
        user.record_activity(day(1), Utc::now());
        user.record_activity(day(2), Utc::now());

        assert!(!user.check_after_reset(day(2), Utc::now()));
        assert!(!user.check_after_reset(day(3), Utc::now()));
        assert_eq!(user.total_streak, 2);
    }

    #[test]
    fn reset_check_forfeits_after_two_days() {
        let mut user = user();
        user.record_activity(day(1), Utc::now());

        assert!(user.check_after_reset(day(3), Utc::now()));
        assert_eq!(user.total_streak, 0);
        assert_eq!(user.last_activity_date, None);

        // Next activity starts over.
        user.record_activity(day(3), Utc::now());
        assert_eq!(user.total_streak, 1);
    }

    #[test]
    fn reset_check_without_activity_is_noop() {
        let mut user = user();
        assert!(!user.check_after_reset(day(10), Utc::now()));
        assert_eq!(user.total_streak, 0);
    }
}
