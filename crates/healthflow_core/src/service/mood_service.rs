//! Mood journal use-case service.
//!
//! # Invariants
//! - New entries are stored first (most-recent-first convention).
//! - Listing sorts by timestamp descending; equal timestamps keep stored order.

use crate::clock::day_bounds;
use crate::model::mood::{MoodEntry, MoodKind, MoodValidationError};
use crate::policy::metrics::{
    daily_mood_summary, mood_share_report, seven_day_mood_trend, MOOD_TREND_DAYS,
};
use crate::store::kv_store::{KeyValueStore, PersistenceError};
use crate::store::record_store::{find_by_id, RecordStore};
use chrono::{DateTime, NaiveDate, TimeZone};
use log::info;
use std::cmp::Reverse;
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug)]
pub enum MoodServiceError {
    Validation(MoodValidationError),
    EntryNotFound(String),
    Persistence(PersistenceError),
}

impl Display for MoodServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::EntryNotFound(id) => write!(f, "mood entry not found: {id}"),
            Self::Persistence(err) => write!(f, "{err}"),
        }
    }
}

impl Error for MoodServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Persistence(err) => Some(err),
            Self::EntryNotFound(_) => None,
        }
    }
}

impl From<MoodValidationError> for MoodServiceError {
    fn from(value: MoodValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<PersistenceError> for MoodServiceError {
    fn from(value: PersistenceError) -> Self {
        Self::Persistence(value)
    }
}

pub type MoodResult<T> = Result<T, MoodServiceError>;

/// Today's latest mood and entry count, owned for handing to the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodayMood {
    pub latest: MoodEntry,
    pub count: usize,
}

pub struct MoodService<S: KeyValueStore> {
    store: RecordStore<S>,
}

impl<S: KeyValueStore> MoodService<S> {
    pub fn new(kv: S) -> Self {
        Self {
            store: RecordStore::new(kv),
        }
    }

    /// Logs a mood with an optional free-text note.
    pub fn log_mood<Tz: TimeZone>(
        &self,
        emoji: &str,
        mood_name: &str,
        note: &str,
        at: &DateTime<Tz>,
    ) -> MoodResult<MoodEntry>
    where
        Tz::Offset: Display,
    {
        let entry = MoodEntry::new(emoji, mood_name, note, at);
        entry.validate()?;

        let entries = self.store.prepend_mood_entry(&entry)?;
        info!(
            "event=mood_log module=service status=ok entry_count={} has_note={}",
            entries.len(),
            !entry.note.is_empty()
        );
        Ok(entry)
    }

    /// Logs a catalog mood without a note (shake shortcut).
    pub fn log_quick_mood<Tz: TimeZone>(
        &self,
        kind: &MoodKind,
        at: &DateTime<Tz>,
    ) -> MoodResult<MoodEntry>
    where
        Tz::Offset: Display,
    {
        let entry = MoodEntry::from_kind(kind, "", at);
        let entries = self.store.prepend_mood_entry(&entry)?;
        info!(
            "event=mood_quick_log module=service status=ok entry_count={}",
            entries.len()
        );
        Ok(entry)
    }

    /// Returns entries newest first.
    pub fn list_entries(&self) -> MoodResult<Vec<MoodEntry>> {
        let mut entries = self.store.mood_entries()?;
        entries.sort_by_key(|entry| Reverse(entry.timestamp));
        Ok(entries)
    }

    pub fn delete_entry(&self, id: &str) -> MoodResult<Vec<MoodEntry>> {
        if find_by_id(&self.store.mood_entries()?, id).is_none() {
            return Err(MoodServiceError::EntryNotFound(id.to_string()));
        }
        let remaining = self.store.remove_mood_entry(id)?;
        info!(
            "event=mood_delete module=service status=ok entry_count={}",
            remaining.len()
        );
        Ok(remaining)
    }

    /// Latest entry and count for the local day `today`.
    pub fn today_summary<Tz: TimeZone>(
        &self,
        today: NaiveDate,
        tz: &Tz,
    ) -> MoodResult<Option<TodayMood>> {
        let entries = self.store.mood_entries()?;
        let (start, end) = day_bounds(today, tz);
        Ok(
            daily_mood_summary(&entries, start, end).map(|summary| TodayMood {
                latest: summary.latest.clone(),
                count: summary.count,
            }),
        )
    }

    pub fn weekly_trend<Tz: TimeZone>(
        &self,
        today: NaiveDate,
        tz: &Tz,
    ) -> MoodResult<[f64; MOOD_TREND_DAYS]> {
        Ok(seven_day_mood_trend(&self.store.mood_entries()?, today, tz))
    }

    /// Plain-text share summary, or `None` when the journal is empty.
    pub fn share_text(&self, now_ms: i64) -> MoodResult<Option<String>> {
        let entries = self.list_entries()?;
        let Some(report) = mood_share_report(&entries, now_ms) else {
            return Ok(None);
        };

        let mut text = String::from("🌟 My Mood Summary - HealthFlow\n\n");
        text.push_str(&format!("Total Entries: {}\n", report.total_entries));
        text.push_str(&format!("Most Frequent Mood: {}\n\n", report.most_frequent));
        text.push_str("Last 7 Days:\n");
        for entry in &report.recent {
            text.push_str(&format!(
                "{} {} - {} {}\n",
                entry.emoji, entry.mood_name, entry.date, entry.time
            ));
        }
        text.push_str("\nTrack your wellness with HealthFlow!\n");
        Ok(Some(text))
    }
}
