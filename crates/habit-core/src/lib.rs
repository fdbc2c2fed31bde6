//! Core types and calculators for the habit tracker.
//!
//! This crate provides the foundational types used throughout the tracker:
//!
//! - **Identifiers**: `UserId`, `HabitId`, `LogId`
//! - **Habits**: `Habit`, `HabitDraft`
//! - **Logs**: `HabitLog`, `Completion`
//! - **Users**: `User` and the cross-habit activity streak
//! - **Calculators**: `current_streak`, `daily_progress`
//! - **Clock**: `Clock`, `SystemClock`, `ManualClock`
//!
//! Everything that depends on "today" takes the date explicitly, so the
//! calculators are pure and the caller decides which clock to trust.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod clock;
pub mod error;
pub mod habit;
pub mod ids;
pub mod log;
pub mod progress;
pub mod streak;
pub mod user;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{HabitError, Result};
pub use habit::{Habit, HabitDraft, MIN_DAILY_GOAL};
pub use ids::{HabitId, IdError, LogId, UserId};
pub use log::{Completion, HabitLog};
pub use progress::daily_progress;
pub use streak::{current_streak, streak_from_logs};
pub use user::{User, STREAK_FORFEIT_GAP_DAYS};
