//! Storage layer for the habit tracker.
//!
//! This crate persists habits, daily logs and users behind the [`Store`]
//! trait. Two backends are provided:
//!
//! - [`MemoryStore`]: everything in one lock-guarded map set (default)
//! - `RocksStore`: `RocksDB` with column families, behind the
//!   `rocksdb-backend` feature
//!
//! # Invariants
//!
//! - Logs are keyed by (habit, date), so a second log for the same day is
//!   impossible; writes to an existing key replace it.
//! - Deleting a habit deletes its logs.
//! - Read-modify-write operations (`update_habit`, `update_log`,
//!   `update_user`) and the habit swap in `reset_user_habits` are atomic
//!   with respect to other store calls.
//!
//! # Example
//!
//! ```
//! use chrono::{NaiveDate, Utc};
//! use habit_core::{Completion, Habit, HabitDraft, UserId};
//! use habit_store::{MemoryStore, Store};
//!
//! let store = MemoryStore::new();
//! let draft = HabitDraft::new("Stretch", None, 1);
//! let habit = Habit::create(UserId::new(1), draft, Utc::now()).unwrap();
//! store.put_habit(&habit).unwrap();
//!
//! let today = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
//! let log = store
//!     .update_log(&habit.id, today, &mut |existing| {
//!         Completion::Increment.apply(existing, habit.id, today, habit.daily_goal, Utc::now())
//!     })
//!     .unwrap();
//! assert!(log.is_completed);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod memory;
#[cfg(feature = "rocksdb-backend")]
pub mod keys;
#[cfg(feature = "rocksdb-backend")]
pub mod rocks;
#[cfg(feature = "rocksdb-backend")]
pub mod schema;

pub use error::{Result, StoreError};
pub use memory::MemoryStore;
#[cfg(feature = "rocksdb-backend")]
pub use rocks::RocksStore;

use chrono::{DateTime, NaiveDate, Utc};
use habit_core::{Habit, HabitId, HabitLog, User, UserId};

/// The storage trait defining all database operations.
///
/// This trait abstracts the storage layer, allowing for different
/// implementations (`RocksDB`, in-memory for testing).
pub trait Store: Send + Sync {
    // =========================================================================
    // Habit Operations
    // =========================================================================

    /// Insert or update a habit record.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn put_habit(&self, habit: &Habit) -> Result<()>;

    /// Get a habit by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_habit(&self, habit_id: &HabitId) -> Result<Option<Habit>>;

    /// Delete a habit and all of its logs.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the habit doesn't exist.
    fn delete_habit(&self, habit_id: &HabitId) -> Result<()>;

    /// List a user's habits, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn list_habits_by_user(&self, user_id: &UserId) -> Result<Vec<Habit>>;

    /// Load a habit, let `apply` modify it, and save the result as one step.
    ///
    /// Returns `None` (and writes nothing) if the habit doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn update_habit(
        &self,
        habit_id: &HabitId,
        apply: &mut dyn FnMut(&mut Habit),
    ) -> Result<Option<Habit>>;

    /// Atomically replace every habit of `user_id`.
    ///
    /// The current habits are snapshotted oldest first, deleted together
    /// with their logs, and `rebuild` is called once per snapshot entry to
    /// produce its replacement. Returns the replacements in the order they
    /// were built.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails; in that case no
    /// change is visible.
    fn reset_user_habits(
        &self,
        user_id: &UserId,
        rebuild: &mut dyn FnMut(&Habit) -> Habit,
    ) -> Result<Vec<Habit>>;

    // =========================================================================
    // Log Operations
    // =========================================================================

    /// Get the log for a habit on a given date.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_log(&self, habit_id: &HabitId, date: NaiveDate) -> Result<Option<HabitLog>>;

    /// Read, modify and write the log for (habit, date) as one step.
    ///
    /// `apply` receives the current log, if any, and returns the log to
    /// store. Concurrent calls for the same key never lose an update.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn update_log(
        &self,
        habit_id: &HabitId,
        date: NaiveDate,
        apply: &mut dyn FnMut(Option<HabitLog>) -> HabitLog,
    ) -> Result<HabitLog>;

    /// List all logs for a habit, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn list_logs(&self, habit_id: &HabitId) -> Result<Vec<HabitLog>>;

    /// List the logs for a habit whose daily goal was reached.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn list_completed_logs(&self, habit_id: &HabitId) -> Result<Vec<HabitLog>> {
        let mut logs = self.list_logs(habit_id)?;
        logs.retain(|log| log.is_completed);
        Ok(logs)
    }

    // =========================================================================
    // User Operations
    // =========================================================================

    /// Get a user by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_user(&self, user_id: &UserId) -> Result<Option<User>>;

    /// Load the user (creating it if missing), let `apply` modify it, and
    /// save the result as one step.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn update_user(
        &self,
        user_id: &UserId,
        now: DateTime<Utc>,
        apply: &mut dyn FnMut(&mut User),
    ) -> Result<User>;

    /// Get the user, creating an empty record on first access.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_or_create_user(&self, user_id: &UserId, now: DateTime<Utc>) -> Result<User> {
        self.update_user(user_id, now, &mut |_| {})
    }
}
