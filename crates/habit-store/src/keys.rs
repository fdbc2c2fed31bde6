//! Key encoding utilities for `RocksDB`.
//!
//! All composite keys are fixed-width and big-endian so that byte order
//! matches logical order: a user's habits iterate in creation order and a
//! habit's logs iterate in date order.

use chrono::{Datelike, NaiveDate};
use habit_core::{HabitId, UserId};

/// Create a habit key from a habit ID.
#[must_use]
pub fn habit_key(habit_id: &HabitId) -> Vec<u8> {
    habit_id.to_bytes().to_vec()
}

/// Create a user key from a user ID.
#[must_use]
pub fn user_key(user_id: &UserId) -> Vec<u8> {
    user_id.to_bytes().to_vec()
}

/// Create a user-habit index key.
///
/// Format: `user_id (8 bytes) || habit_id (16 bytes)`
#[must_use]
pub fn user_habit_key(user_id: &UserId, habit_id: &HabitId) -> Vec<u8> {
    let mut key = Vec::with_capacity(24);
    key.extend_from_slice(&user_id.to_bytes());
    key.extend_from_slice(&habit_id.to_bytes());
    key
}

/// Create a prefix for iterating all habits of a user.
#[must_use]
pub fn user_habits_prefix(user_id: &UserId) -> Vec<u8> {
    user_key(user_id)
}

/// Extract the habit ID from a user-habit index key.
///
/// Returns `None` if the key is shorter than 24 bytes.
#[must_use]
pub fn extract_habit_id_from_user_key(key: &[u8]) -> Option<HabitId> {
    let bytes: [u8; 16] = key.get(8..24)?.try_into().ok()?;
    Some(HabitId::from_bytes(bytes))
}

/// Create a log key.
///
/// Format: `habit_id (16 bytes) || days since CE (4 bytes, sign-flipped)`
#[must_use]
pub fn log_key(habit_id: &HabitId, date: NaiveDate) -> Vec<u8> {
    let mut key = Vec::with_capacity(20);
    key.extend_from_slice(&habit_id.to_bytes());
    key.extend_from_slice(&encode_date(date));
    key
}

/// Create a prefix for iterating all logs of a habit.
#[must_use]
pub fn habit_logs_prefix(habit_id: &HabitId) -> Vec<u8> {
    habit_key(habit_id)
}

/// Flipping the sign bit makes negative day numbers sort before positive ones.
fn encode_date(date: NaiveDate) -> [u8; 4] {
    #[allow(clippy::cast_sign_loss)]
    let ordinal = (date.num_days_from_ce() as u32) ^ 0x8000_0000;
    ordinal.to_be_bytes()
}
