//! Daily progress calculation.

use crate::log::HabitLog;

/// Percentage of today's goal reached, rounded to two decimal places.
///
/// Returns 0.0 when there is no log for today. The value is not clamped:
/// completing more than the goal yields more than 100%.
#[must_use]
pub fn daily_progress(today_log: Option<&HabitLog>, daily_goal: u32) -> f64 {
    let Some(log) = today_log else {
        return 0.0;
    };
    if daily_goal == 0 {
        return 0.0;
    }
    round2(f64::from(log.completed_count) / f64::from(daily_goal) * 100.0)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::HabitId;
    use chrono::{NaiveDate, Utc};

    fn log(count: u32, goal: u32) -> HabitLog {
        HabitLog::new(
            HabitId::generate(),
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            count,
            goal,
            Utc::now(),
        )
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn no_log_is_zero() {
        assert_close(daily_progress(None, 3), 0.0);
    }

    #[test]
    fn one_of_three_rounds_to_two_places() {
        assert_close(daily_progress(Some(&log(1, 3)), 3), 33.33);
    }

    #[test]
    fn two_of_three_rounds_up() {
        assert_close(daily_progress(Some(&log(2, 3)), 3), 66.67);
    }

    #[test]
    fn goal_met_is_hundred() {
        assert_close(daily_progress(Some(&log(4, 4)), 4), 100.0);
    }

    #[test]
    fn overachievement_is_not_clamped() {
        assert_close(daily_progress(Some(&log(5, 2)), 2), 250.0);
    }

    #[test]
    fn empty_log_is_zero() {
        assert_close(daily_progress(Some(&log(0, 2)), 2), 0.0);
    }
}
