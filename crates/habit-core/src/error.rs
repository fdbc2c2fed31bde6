//! Error types for the habit tracker.

use crate::ids::HabitId;

/// Result type for habit tracker operations.
pub type Result<T> = std::result::Result<T, HabitError>;

/// Errors that can occur in habit tracker operations.
#[derive(Debug, thiserror::Error)]
pub enum HabitError {
    /// Habit not found.
    #[error("habit not found: {habit_id}")]
    HabitNotFound {
        /// The habit ID that was not found.
        habit_id: HabitId,
    },

    /// Input rejected before any mutation took place.
    #[error("validation error: {0}")]
    Validation(String),

    /// Storage error.
    #[error("storage error: {0}")]
    Storage(String),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(String),
}
