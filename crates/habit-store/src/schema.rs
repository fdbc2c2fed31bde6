//! Database schema definitions and column families.
//!
//! This module defines the column families used in `RocksDB` storage.

/// Column family names for the `RocksDB` database.
pub mod cf {
    /// Primary habit records, keyed by `habit_id` (ULID).
    pub const HABITS: &str = "habits";

    /// Index: habits by user, keyed by `user_id || habit_id`.
    /// Value is empty (index only).
    pub const HABITS_BY_USER: &str = "habits_by_user";

    /// Daily logs, keyed by `habit_id || date`.
    pub const HABIT_LOGS: &str = "habit_logs";

    /// User records, keyed by `user_id`.
    pub const USERS: &str = "users";
}

/// Returns all column family names for database initialization.
#[must_use]
pub fn all_column_families() -> Vec<&'static str> {
    vec![cf::HABITS, cf::HABITS_BY_USER, cf::HABIT_LOGS, cf::USERS]
}
