//! Typed record collections over the key-value store.
//!
//! # Responsibility
//! - Serialize record collections to JSON arrays and back.
//! - Offer "replace by id" style mutations that return the new collection.
//!
//! # Invariants
//! - `load_records(key)` after `save_records(key, x)` yields `x` exactly.
//! - Absent or malformed payloads load as an empty collection.
//! - Collection order is preserved as given; sorting is the caller's job.

use crate::model::habit::Habit;
use crate::model::mood::MoodEntry;
use crate::model::notification::NotificationItem;
use crate::store::keys;
use crate::store::kv_store::{KeyValueStore, StoreResult};
use log::warn;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Records addressable by a stable string id.
pub trait Keyed {
    fn record_id(&self) -> &str;
}

impl Keyed for Habit {
    fn record_id(&self) -> &str {
        &self.id
    }
}

impl Keyed for MoodEntry {
    fn record_id(&self) -> &str {
        &self.id
    }
}

impl Keyed for NotificationItem {
    fn record_id(&self) -> &str {
        &self.id
    }
}

/// Returns `records` with `record` replacing the entry of the same id, or
/// appended when no entry matches.
pub fn upsert_by_id<T: Keyed + Clone>(records: &[T], record: &T) -> Vec<T> {
    let mut next = records.to_vec();
    match next
        .iter()
        .position(|existing| existing.record_id() == record.record_id())
    {
        Some(index) => next[index] = record.clone(),
        None => next.push(record.clone()),
    }
    next
}

/// Returns `records` without the entry whose id is `id`.
pub fn remove_by_id<T: Keyed + Clone>(records: &[T], id: &str) -> Vec<T> {
    records
        .iter()
        .filter(|record| record.record_id() != id)
        .cloned()
        .collect()
}

pub fn find_by_id<'a, T: Keyed>(records: &'a [T], id: &str) -> Option<&'a T> {
    records.iter().find(|record| record.record_id() == id)
}

/// Encodes a collection the way `save_records` stores it.
pub fn encode_records<T: Serialize>(records: &[T]) -> StoreResult<String> {
    Ok(serde_json::to_string(records)?)
}

/// Typed facade over an injected key-value store handle.
pub struct RecordStore<S: KeyValueStore> {
    kv: S,
}

impl<S: KeyValueStore> RecordStore<S> {
    pub fn new(kv: S) -> Self {
        Self { kv }
    }

    /// Returns the underlying key-value handle.
    pub fn kv(&self) -> &S {
        &self.kv
    }

    /// Loads a record collection.
    ///
    /// # Errors
    /// Only medium failures. Absent or malformed payloads yield `Ok(vec![])`.
    pub fn load_records<T: DeserializeOwned>(&self, key: &str) -> StoreResult<Vec<T>> {
        let Some(raw) = self.kv.get(key)? else {
            return Ok(Vec::new());
        };

        match serde_json::from_str::<Vec<T>>(&raw) {
            Ok(records) => Ok(records),
            Err(err) => {
                warn!(
                    "event=records_load module=store status=degraded key={} error_code=malformed_payload line={} column={}",
                    key,
                    err.line(),
                    err.column()
                );
                Ok(Vec::new())
            }
        }
    }

    pub fn save_records<T: Serialize>(&self, key: &str, records: &[T]) -> StoreResult<()> {
        let encoded = encode_records(records)?;
        self.kv.put(key, &encoded)
    }

    pub fn habits(&self) -> StoreResult<Vec<Habit>> {
        self.load_records(keys::HABITS)
    }

    pub fn save_habits(&self, habits: &[Habit]) -> StoreResult<()> {
        self.save_records(keys::HABITS, habits)
    }

    /// Replaces the habit with the same id (or appends it) and persists.
    pub fn upsert_habit(&self, habit: &Habit) -> StoreResult<Vec<Habit>> {
        let next = upsert_by_id(&self.habits()?, habit);
        self.save_habits(&next)?;
        Ok(next)
    }

    pub fn remove_habit(&self, id: &str) -> StoreResult<Vec<Habit>> {
        let next = remove_by_id(&self.habits()?, id);
        self.save_habits(&next)?;
        Ok(next)
    }

    pub fn mood_entries(&self) -> StoreResult<Vec<MoodEntry>> {
        self.load_records(keys::MOOD_ENTRIES)
    }

    pub fn save_mood_entries(&self, entries: &[MoodEntry]) -> StoreResult<()> {
        self.save_records(keys::MOOD_ENTRIES, entries)
    }

    /// Inserts `entry` at the front, keeping the most-recent-first convention.
    pub fn prepend_mood_entry(&self, entry: &MoodEntry) -> StoreResult<Vec<MoodEntry>> {
        let mut next = Vec::with_capacity(1);
        next.push(entry.clone());
        next.extend(self.mood_entries()?);
        self.save_mood_entries(&next)?;
        Ok(next)
    }

    pub fn remove_mood_entry(&self, id: &str) -> StoreResult<Vec<MoodEntry>> {
        let next = remove_by_id(&self.mood_entries()?, id);
        self.save_mood_entries(&next)?;
        Ok(next)
    }

    /// Loads a previously saved notification snapshot.
    ///
    /// The feed itself is regenerated on every open and is not saved by core.
    pub fn notifications(&self) -> StoreResult<Vec<NotificationItem>> {
        self.load_records(keys::NOTIFICATIONS)
    }

    pub fn save_notifications(&self, items: &[NotificationItem]) -> StoreResult<()> {
        self.save_records(keys::NOTIFICATIONS, items)
    }

    /// Persists reset habits and the reset date in one atomic write.
    pub fn save_daily_reset(&self, habits: &[Habit], reset_date: &str) -> StoreResult<()> {
        self.kv.put_many(&[
            (keys::HABITS, encode_records(habits)?),
            (keys::LAST_RESET_DATE, reset_date.to_string()),
        ])
    }
}
