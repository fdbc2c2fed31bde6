//! `RocksDB` storage implementation.
//!
//! This module provides the `RocksStore` implementation of the `Store` trait.

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, NaiveDate, Utc};
use rocksdb::{
    BoundColumnFamily, ColumnFamilyDescriptor, DBWithThreadMode, Direction, IteratorMode,
    MultiThreaded, Options, WriteBatch,
};

use habit_core::{Habit, HabitId, HabitLog, User, UserId};

use crate::error::{Result, StoreError};
use crate::keys;
use crate::schema::{all_column_families, cf};
use crate::Store;

/// RocksDB-backed storage implementation.
pub struct RocksStore {
    db: Arc<DBWithThreadMode<MultiThreaded>>,
    /// Serializes read-modify-write operations.
    write_lock: Mutex<()>,
}

impl RocksStore {
    /// Open or create a `RocksDB` database at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or created.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_descriptors: Vec<_> = all_column_families()
            .into_iter()
            .map(|name| ColumnFamilyDescriptor::new(name, Options::default()))
            .collect();

        let db = DBWithThreadMode::open_cf_descriptors(&opts, path, cf_descriptors)
            .map_err(|e| StoreError::Database(e.to_string()))?;
        tracing::debug!(path = %path.display(), "Opened RocksDB store");

        Ok(Self {
            db: Arc::new(db),
            write_lock: Mutex::new(()),
        })
    }

    /// Get a column family handle.
    fn cf(&self, name: &str) -> Result<Arc<BoundColumnFamily<'_>>> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| StoreError::Database(format!("column family not found: {name}")))
    }

    fn lock(&self) -> Result<MutexGuard<'_, ()>> {
        self.write_lock
            .lock()
            .map_err(|_| StoreError::Database("write lock poisoned".into()))
    }

    /// Serialize a value using CBOR.
    fn serialize<T: serde::Serialize>(value: &T) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        ciborium::into_writer(value, &mut buf)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        Ok(buf)
    }

    /// Deserialize a value from CBOR.
    fn deserialize<T: serde::de::DeserializeOwned>(data: &[u8]) -> Result<T> {
        ciborium::from_reader(data).map_err(|e| StoreError::Serialization(e.to_string()))
    }

    fn get_value<T: serde::de::DeserializeOwned>(
        &self,
        cf_name: &str,
        key: &[u8],
    ) -> Result<Option<T>> {
        let cf = self.cf(cf_name)?;
        self.db
            .get_cf(&cf, key)
            .map_err(|e| StoreError::Database(e.to_string()))?
            .map(|data| Self::deserialize(&data))
            .transpose()
    }

    /// Collect every key in `cf_name` that starts with `prefix`, in key order.
    fn prefix_scan(&self, cf_name: &str, prefix: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>> {
        let cf = self.cf(cf_name)?;
        let iter = self
            .db
            .iterator_cf(&cf, IteratorMode::From(prefix, Direction::Forward));

        let mut entries = Vec::new();
        for item in iter {
            let (key, value) = item.map_err(|e| StoreError::Database(e.to_string()))?;
            if !key.starts_with(prefix) {
                break;
            }
            entries.push((key.to_vec(), value.to_vec()));
        }
        Ok(entries)
    }

    fn user_habit_ids(&self, user_id: &UserId) -> Result<Vec<HabitId>> {
        Ok(self
            .prefix_scan(cf::HABITS_BY_USER, &keys::user_habits_prefix(user_id))?
            .iter()
            .filter_map(|(key, _)| keys::extract_habit_id_from_user_key(key))
            .collect())
    }

    /// Add the deletes for a habit, its index entry and its logs to `batch`.
    fn batch_delete_habit(&self, batch: &mut WriteBatch, habit: &Habit) -> Result<()> {
        let cf_habits = self.cf(cf::HABITS)?;
        let cf_by_user = self.cf(cf::HABITS_BY_USER)?;
        let cf_logs = self.cf(cf::HABIT_LOGS)?;

        batch.delete_cf(&cf_habits, keys::habit_key(&habit.id));
        batch.delete_cf(&cf_by_user, keys::user_habit_key(&habit.user_id, &habit.id));
        for (key, _) in self.prefix_scan(cf::HABIT_LOGS, &keys::habit_logs_prefix(&habit.id))? {
            batch.delete_cf(&cf_logs, key);
        }
        Ok(())
    }

    fn batch_put_habit(&self, batch: &mut WriteBatch, habit: &Habit) -> Result<()> {
        let cf_habits = self.cf(cf::HABITS)?;
        let cf_by_user = self.cf(cf::HABITS_BY_USER)?;

        batch.put_cf(&cf_habits, keys::habit_key(&habit.id), Self::serialize(habit)?);
        batch.put_cf(&cf_by_user, keys::user_habit_key(&habit.user_id, &habit.id), []);
        Ok(())
    }

    /// Write `habit`, dropping the index entry of `previous` if the owner changed.
    fn save_habit(&self, previous: Option<&Habit>, habit: &Habit) -> Result<()> {
        let mut batch = WriteBatch::default();
        if let Some(previous) = previous.filter(|p| p.user_id != habit.user_id) {
            let cf_by_user = self.cf(cf::HABITS_BY_USER)?;
            batch.delete_cf(&cf_by_user, keys::user_habit_key(&previous.user_id, &habit.id));
        }
        self.batch_put_habit(&mut batch, habit)?;
        self.write(batch)
    }

    fn write(&self, batch: WriteBatch) -> Result<()> {
        self.db
            .write(batch)
            .map_err(|e| StoreError::Database(e.to_string()))
    }
}

impl Store for RocksStore {
    // =========================================================================
    // Habit Operations
    // =========================================================================

    fn put_habit(&self, habit: &Habit) -> Result<()> {
        let _guard = self.lock()?;
        let previous = self.get_habit(&habit.id)?;
        self.save_habit(previous.as_ref(), habit)
    }

    fn get_habit(&self, habit_id: &HabitId) -> Result<Option<Habit>> {
        self.get_value(cf::HABITS, &keys::habit_key(habit_id))
    }

    fn delete_habit(&self, habit_id: &HabitId) -> Result<()> {
        let _guard = self.lock()?;
        let habit = self.get_habit(habit_id)?.ok_or_else(|| StoreError::NotFound {
            entity: "habit",
            id: habit_id.to_string(),
        })?;

        let mut batch = WriteBatch::default();
        self.batch_delete_habit(&mut batch, &habit)?;
        self.write(batch)
    }

    fn list_habits_by_user(&self, user_id: &UserId) -> Result<Vec<Habit>> {
        let mut habits = Vec::new();
        // Index keys are in creation order; reverse for newest first.
        for habit_id in self.user_habit_ids(user_id)?.into_iter().rev() {
            if let Some(habit) = self.get_habit(&habit_id)? {
                habits.push(habit);
            }
        }
        Ok(habits)
    }

    fn update_habit(
        &self,
        habit_id: &HabitId,
        apply: &mut dyn FnMut(&mut Habit),
    ) -> Result<Option<Habit>> {
        let _guard = self.lock()?;
        let Some(previous) = self.get_habit(habit_id)? else {
            return Ok(None);
        };

        let mut habit = previous.clone();
        apply(&mut habit);
        self.save_habit(Some(&previous), &habit)?;
        Ok(Some(habit))
    }

    fn reset_user_habits(
        &self,
        user_id: &UserId,
        rebuild: &mut dyn FnMut(&Habit) -> Habit,
    ) -> Result<Vec<Habit>> {
        let _guard = self.lock()?;
        let mut batch = WriteBatch::default();

        let mut old = Vec::new();
        for habit_id in self.user_habit_ids(user_id)? {
            if let Some(habit) = self.get_habit(&habit_id)? {
                self.batch_delete_habit(&mut batch, &habit)?;
                old.push(habit);
            }
        }

        let mut fresh = Vec::with_capacity(old.len());
        for habit in &old {
            let replacement = rebuild(habit);
            self.batch_put_habit(&mut batch, &replacement)?;
            fresh.push(replacement);
        }

        // Deletes and inserts become visible together or not at all.
        self.write(batch)?;
        tracing::debug!(
            user_id = %user_id,
            removed = old.len(),
            inserted = fresh.len(),
            "Reset user habits"
        );
        Ok(fresh)
    }

    // =========================================================================
    // Log Operations
    // =========================================================================

    fn get_log(&self, habit_id: &HabitId, date: NaiveDate) -> Result<Option<HabitLog>> {
        self.get_value(cf::HABIT_LOGS, &keys::log_key(habit_id, date))
    }

    fn update_log(
        &self,
        habit_id: &HabitId,
        date: NaiveDate,
        apply: &mut dyn FnMut(Option<HabitLog>) -> HabitLog,
    ) -> Result<HabitLog> {
        let _guard = self.lock()?;
        let log = apply(self.get_log(habit_id, date)?);

        let cf = self.cf(cf::HABIT_LOGS)?;
        self.db
            .put_cf(&cf, keys::log_key(habit_id, date), Self::serialize(&log)?)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(log)
    }

    fn list_logs(&self, habit_id: &HabitId) -> Result<Vec<HabitLog>> {
        self.prefix_scan(cf::HABIT_LOGS, &keys::habit_logs_prefix(habit_id))?
            .iter()
            .map(|(_, value)| Self::deserialize(value))
            .collect()
    }

    // =========================================================================
    // User Operations
    // =========================================================================

    fn get_user(&self, user_id: &UserId) -> Result<Option<User>> {
        self.get_value(cf::USERS, &keys::user_key(user_id))
    }

    fn update_user(
        &self,
        user_id: &UserId,
        now: DateTime<Utc>,
        apply: &mut dyn FnMut(&mut User),
    ) -> Result<User> {
        let _guard = self.lock()?;
        let mut user = self
            .get_user(user_id)?
            .unwrap_or_else(|| User::new(*user_id, now));
        apply(&mut user);

        let cf = self.cf(cf::USERS)?;
        self.db
            .put_cf(&cf, keys::user_key(user_id), Self::serialize(&user)?)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Days;
    use habit_core::{Completion, HabitDraft};
    use tempfile::TempDir;

    fn create_test_store() -> (RocksStore, TempDir) {
        let dir = TempDir::new().unwrap();
        let store = RocksStore::open(dir.path()).unwrap();
        (store, dir)
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 4, 15).unwrap()
    }

    fn habit(store: &RocksStore, user: u64, name: &str, goal: u32) -> Habit {
        let habit = Habit::create(
            UserId::new(user),
            HabitDraft::new(name, Some(format!("{name} daily")), goal),
            Utc::now(),
        )
        .unwrap();
        store.put_habit(&habit).unwrap();
        habit
    }

    fn increment(store: &RocksStore, habit: &Habit, date: NaiveDate) -> HabitLog {
        store
            .update_log(&habit.id, date, &mut |existing| {
                Completion::Increment.apply(existing, habit.id, date, habit.daily_goal, Utc::now())
            })
            .unwrap()
    }

    #[test]
    fn habit_crud() {
        let (store, _dir) = create_test_store();
        let h = habit(&store, 1, "Read", 2);

        let retrieved = store.get_habit(&h.id).unwrap().unwrap();
        assert_eq!(retrieved, h);

        store.delete_habit(&h.id).unwrap();
        assert!(store.get_habit(&h.id).unwrap().is_none());
        assert!(store.list_habits_by_user(&UserId::new(1)).unwrap().is_empty());
        assert!(matches!(
            store.delete_habit(&h.id),
            Err(StoreError::NotFound { .. })
        ));
    }

    #[test]
    fn habits_listed_newest_first() {
        let (store, _dir) = create_test_store();
        let first = habit(&store, 1, "First", 1);
        let second = habit(&store, 1, "Second", 1);
        habit(&store, 2, "Other", 1);

        let ids: Vec<_> = store
            .list_habits_by_user(&UserId::new(1))
            .unwrap()
            .iter()
            .map(|h| h.id)
            .collect();
        assert_eq!(ids, vec![second.id, first.id]);
    }

    #[test]
    fn logs_are_unique_per_day_and_date_ordered() {
        let (store, _dir) = create_test_store();
        let h = habit(&store, 1, "Water", 2);
        let yesterday = today().checked_sub_days(Days::new(1)).unwrap();

        increment(&store, &h, today());
        increment(&store, &h, yesterday);
        let log = increment(&store, &h, today());
        assert_eq!(log.completed_count, 2);
        assert!(log.is_completed);

        let logs = store.list_logs(&h.id).unwrap();
        assert_eq!(logs.len(), 2);
        assert_eq!(logs[0].date, yesterday);
        assert_eq!(logs[1].date, today());

        let completed = store.list_completed_logs(&h.id).unwrap();
        assert_eq!(completed.len(), 1);
        assert_eq!(completed[0].date, today());
    }

    #[test]
    fn update_habit_rewrites_record() {
        let (store, _dir) = create_test_store();
        let h = habit(&store, 1, "Read", 2);

        let updated = store
            .update_habit(&h.id, &mut |habit| habit.name = "Read more".into())
            .unwrap()
            .unwrap();
        assert_eq!(updated.name, "Read more");
        assert_eq!(store.list_habits_by_user(&UserId::new(1)).unwrap(), vec![updated]);
        assert!(store
            .update_habit(&HabitId::generate(), &mut |_| {})
            .unwrap()
            .is_none());
    }

    #[test]
    fn reset_user_habits_drops_logs() {
        let (store, _dir) = create_test_store();
        let a = habit(&store, 1, "A", 1);
        let foreign = habit(&store, 2, "B", 1);
        increment(&store, &a, today());
        increment(&store, &foreign, today());

        let fresh = store
            .reset_user_habits(&UserId::new(1), &mut |old| old.recreate(Utc::now()))
            .unwrap();

        assert_eq!(fresh.len(), 1);
        assert_eq!(fresh[0].draft(), a.draft());
        assert!(store.get_habit(&a.id).unwrap().is_none());
        assert!(store.list_logs(&a.id).unwrap().is_empty());
        assert_eq!(store.list_habits_by_user(&UserId::new(1)).unwrap(), fresh);
        assert_eq!(store.list_logs(&foreign.id).unwrap().len(), 1);
    }

    #[test]
    fn users_persist_across_reopen() {
        let dir = TempDir::new().unwrap();
        {
            let store = RocksStore::open(dir.path()).unwrap();
            store
                .update_user(&UserId::new(5), Utc::now(), &mut |user| {
                    user.record_activity(today(), Utc::now());
                })
                .unwrap();
        }

        let store = RocksStore::open(dir.path()).unwrap();
        let user = store.get_user(&UserId::new(5)).unwrap().unwrap();
        assert_eq!(user.total_streak, 1);
        assert_eq!(user.last_activity_date, Some(today()));
    }
}
