//! In-memory storage implementation.
//!
//! All state lives behind a single `RwLock`, so every trait method runs as
//! one atomic step.

use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, NaiveDate, Utc};
use habit_core::{Habit, HabitId, HabitLog, User, UserId};

use crate::error::{Result, StoreError};
use crate::Store;

#[derive(Debug, Default)]
struct Tables {
    habits: BTreeMap<HabitId, Habit>,
    /// Keyed by (habit, date) so a habit's logs are contiguous and date-ordered.
    logs: BTreeMap<(HabitId, NaiveDate), HabitLog>,
    users: BTreeMap<UserId, User>,
}

impl Tables {
    fn remove_habit(&mut self, habit_id: &HabitId) -> Option<Habit> {
        let habit = self.habits.remove(habit_id)?;
        let dates: Vec<NaiveDate> = self
            .logs
            .range((*habit_id, NaiveDate::MIN)..=(*habit_id, NaiveDate::MAX))
            .map(|((_, date), _)| *date)
            .collect();
        for date in dates {
            self.logs.remove(&(*habit_id, date));
        }
        Some(habit)
    }
}

/// Memory-backed storage, used by default and in tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>> {
        self.tables
            .read()
            .map_err(|_| StoreError::Database("store lock poisoned".into()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>> {
        self.tables
            .write()
            .map_err(|_| StoreError::Database("store lock poisoned".into()))
    }
}

impl Store for MemoryStore {
    fn put_habit(&self, habit: &Habit) -> Result<()> {
        self.write()?.habits.insert(habit.id, habit.clone());
        Ok(())
    }

    fn get_habit(&self, habit_id: &HabitId) -> Result<Option<Habit>> {
        Ok(self.read()?.habits.get(habit_id).cloned())
    }

    fn delete_habit(&self, habit_id: &HabitId) -> Result<()> {
        self.write()?
            .remove_habit(habit_id)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound {
                entity: "habit",
                id: habit_id.to_string(),
            })
    }

    fn list_habits_by_user(&self, user_id: &UserId) -> Result<Vec<Habit>> {
        // HabitIds are ULIDs, so reverse key order is newest first.
        Ok(self
            .read()?
            .habits
            .values()
            .rev()
            .filter(|h| h.user_id == *user_id)
            .cloned()
            .collect())
    }

    fn update_habit(
        &self,
        habit_id: &HabitId,
        apply: &mut dyn FnMut(&mut Habit),
    ) -> Result<Option<Habit>> {
        let mut tables = self.write()?;
        Ok(tables.habits.get_mut(habit_id).map(|habit| {
            apply(habit);
            habit.clone()
        }))
    }

    fn reset_user_habits(
        &self,
        user_id: &UserId,
        rebuild: &mut dyn FnMut(&Habit) -> Habit,
    ) -> Result<Vec<Habit>> {
        let mut tables = self.write()?;
        let old: Vec<Habit> = tables
            .habits
            .values()
            .filter(|h| h.user_id == *user_id)
            .cloned()
            .collect();

        let fresh: Vec<Habit> = old.iter().map(|h| rebuild(h)).collect();
        for habit in &old {
            tables.remove_habit(&habit.id);
        }
        for habit in &fresh {
            tables.habits.insert(habit.id, habit.clone());
        }
        tracing::debug!(
            user_id = %user_id,
            removed = old.len(),
            inserted = fresh.len(),
            "Reset user habits"
        );
        Ok(fresh)
    }

    fn get_log(&self, habit_id: &HabitId, date: NaiveDate) -> Result<Option<HabitLog>> {
        Ok(self.read()?.logs.get(&(*habit_id, date)).cloned())
    }

    fn update_log(
        &self,
        habit_id: &HabitId,
        date: NaiveDate,
        apply: &mut dyn FnMut(Option<HabitLog>) -> HabitLog,
    ) -> Result<HabitLog> {
        let mut tables = self.write()?;
        let key = (*habit_id, date);
        let log = apply(tables.logs.get(&key).cloned());
        tables.logs.insert(key, log.clone());
        Ok(log)
    }

    fn list_logs(&self, habit_id: &HabitId) -> Result<Vec<HabitLog>> {
        Ok(self
            .read()?
            .logs
            .range((*habit_id, NaiveDate::MIN)..=(*habit_id, NaiveDate::MAX))
            .map(|(_, log)| log.clone())
            .collect())
    }

    fn get_user(&self, user_id: &UserId) -> Result<Option<User>> {
        Ok(self.read()?.users.get(user_id).cloned())
    }

    fn update_user(
        &self,
        user_id: &UserId,
        now: DateTime<Utc>,
        apply: &mut dyn FnMut(&mut User),
    ) -> Result<User> {
        let mut tables = self.write()?;
        let user = tables
            .users
            .entry(*user_id)
            .or_insert_with(|| User::new(*user_id, now));
        apply(user);
        Ok(user.clone())
    }
}
