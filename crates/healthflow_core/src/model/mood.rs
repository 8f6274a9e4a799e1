//! Mood journal model and the fixed mood catalog.

use crate::clock::{clock_time_label, entry_date_label};
use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Score used for mood names missing from the catalog.
pub const DEFAULT_MOOD_SCORE: u8 = 3;

/// One selectable mood: glyph, label and chart score (1 = worst, 5 = best).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoodKind {
    pub emoji: &'static str,
    pub name: &'static str,
    pub score: u8,
}

const fn mood_kind(emoji: &'static str, name: &'static str, score: u8) -> MoodKind {
    MoodKind { emoji, name, score }
}

/// Moods offered by the journal, in picker order.
pub const MOOD_CATALOG: [MoodKind; 10] = [
    mood_kind("😊", "Happy", 5),
    mood_kind("😢", "Sad", 1),
    mood_kind("😡", "Angry", 1),
    mood_kind("😰", "Anxious", 2),
    mood_kind("😌", "Calm", 3),
    mood_kind("😴", "Tired", 2),
    mood_kind("🤗", "Grateful", 4),
    mood_kind("😎", "Confident", 4),
    mood_kind("😔", "Depressed", 1),
    mood_kind("🥰", "Loved", 5),
];

/// Looks up a catalog mood by its exact label.
pub fn find_mood(name: &str) -> Option<&'static MoodKind> {
    MOOD_CATALOG.iter().find(|kind| kind.name == name)
}

/// Numeric chart value for a mood label.
pub fn mood_score(name: &str) -> u8 {
    find_mood(name).map_or(DEFAULT_MOOD_SCORE, |kind| kind.score)
}

/// Timestamped emotional-state log. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoodEntry {
    pub id: String,
    pub emoji: String,
    pub mood_name: String,
    #[serde(default)]
    pub note: String,
    /// Epoch milliseconds.
    pub timestamp: i64,
    /// Display date, e.g. `May 10, 2024`.
    pub date: String,
    /// Display time, e.g. `08:15 PM`.
    pub time: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoodValidationError {
    NoMoodSelected,
}

impl Display for MoodValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoMoodSelected => write!(f, "a mood must be selected"),
        }
    }
}

impl Error for MoodValidationError {}

impl MoodEntry {
    /// Creates an entry stamped at `at`, with display strings in `at`'s zone.
    pub fn new<Tz: TimeZone>(
        emoji: impl Into<String>,
        mood_name: impl Into<String>,
        note: impl Into<String>,
        at: &DateTime<Tz>,
    ) -> Self
    where
        Tz::Offset: Display,
    {
        Self {
            id: Uuid::new_v4().to_string(),
            emoji: emoji.into(),
            mood_name: mood_name.into(),
            note: note.into(),
            timestamp: at.timestamp_millis(),
            date: entry_date_label(at),
            time: clock_time_label(at),
        }
    }

    /// Creates an entry for a catalog mood.
    pub fn from_kind<Tz: TimeZone>(
        kind: &MoodKind,
        note: impl Into<String>,
        at: &DateTime<Tz>,
    ) -> Self
    where
        Tz::Offset: Display,
    {
        Self::new(kind.emoji, kind.name, note, at)
    }

    pub fn validate(&self) -> Result<(), MoodValidationError> {
        if self.mood_name.trim().is_empty() || self.emoji.trim().is_empty() {
            return Err(MoodValidationError::NoMoodSelected);
        }
        Ok(())
    }

    pub fn score(&self) -> u8 {
        mood_score(&self.mood_name)
    }
}
