//! The reference clock.
//!
//! Streaks, progress and user activity are all evaluated against "today".
//! Every computation receives that date from a [`Clock`] handed in by the
//! caller instead of reading the system time directly.

use std::sync::Mutex;

use chrono::{DateTime, Days, NaiveDate, Utc};

/// Source of the current date and time.
pub trait Clock: Send + Sync {
    /// The current instant.
    fn now(&self) -> DateTime<Utc>;

    /// The current calendar date.
    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

/// Wall-clock time in UTC.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock whose date is set by hand.
///
/// `now()` returns midnight UTC of the current date, which keeps timestamps
/// deterministic in tests.
#[derive(Debug)]
pub struct ManualClock {
    today: Mutex<NaiveDate>,
}

impl ManualClock {
    /// Create a clock pinned to `today`.
    #[must_use]
    pub fn new(today: NaiveDate) -> Self {
        Self {
            today: Mutex::new(today),
        }
    }

    /// Move the clock to `date`.
    pub fn set(&self, date: NaiveDate) {
        *self.lock() = date;
    }

    /// Move the clock forward by `days`.
    pub fn advance_days(&self, days: u64) {
        let mut today = self.lock();
        if let Some(next) = today.checked_add_days(Days::new(days)) {
            *today = next;
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, NaiveDate> {
        // A poisoned date is still a valid date.
        self.today
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        self.lock().and_time(chrono::NaiveTime::MIN).and_utc()
    }

    fn today(&self) -> NaiveDate {
        *self.lock()
    }
}
