//! Hydration reminder timing.
//!
//! Computes when the external alarm service should first fire and how often
//! it should repeat. Registering the alarm is the caller's side effect.

use chrono::{DateTime, LocalResult, NaiveTime, TimeZone};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Callback identity of the repeating hydration alarm.
pub const HYDRATION_REMINDER_ID: &str = "hydration_reminder";
pub const HYDRATION_NOTICE_TITLE: &str = "💧 Time to Hydrate!";
pub const HYDRATION_NOTICE_BODY: &str = "Don't forget to drink water and stay healthy!";

/// Interval used for any unknown selection index.
pub const DEFAULT_INTERVAL_MINUTES: u32 = 60;
/// Picker labels, index-aligned with `interval_minutes_for`.
pub const INTERVAL_LABELS: [&str; 5] = ["30 minutes", "1 hour", "2 hours", "3 hours", "4 hours"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReminderError {
    InvalidStartTime { hour: u32, minute: u32 },
    /// No representable trigger instant (calendar overflow).
    OutOfRange,
}

impl Display for ReminderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidStartTime { hour, minute } => {
                write!(f, "invalid reminder start time {hour:02}:{minute:02}")
            }
            Self::OutOfRange => write!(f, "reminder trigger time is out of range"),
        }
    }
}

impl Error for ReminderError {}

/// Persisted reminder preferences.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReminderSettings {
    pub enabled: bool,
    pub interval_index: i32,
    pub start_hour: u32,
    pub start_minute: u32,
}

/// Arguments for the external alarm service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderPlan {
    pub trigger_at_ms: i64,
    pub repeat_interval_ms: i64,
    pub callback_id: &'static str,
    /// Notification shown each time the alarm fires.
    pub notice_title: &'static str,
    pub notice_body: &'static str,
}

/// Maps the interval picker index to minutes.
pub fn interval_minutes_for(selection_index: i32) -> u32 {
    match selection_index {
        0 => 30,
        1 => 60,
        2 => 120,
        3 => 180,
        4 => 240,
        _ => DEFAULT_INTERVAL_MINUTES,
    }
}

/// Next occurrence of `start_hour:start_minute` strictly after `now`.
///
/// Seconds are zero. A wall-clock time skipped by a DST jump moves to the
/// next day that has it. A time repeated by a fall-back jump fires at the
/// first of its occurrences that is still ahead.
pub fn next_trigger_time<Tz: TimeZone>(
    start_hour: u32,
    start_minute: u32,
    now: &DateTime<Tz>,
) -> Result<DateTime<Tz>, ReminderError> {
    let start = NaiveTime::from_hms_opt(start_hour, start_minute, 0).ok_or(
        ReminderError::InvalidStartTime {
            hour: start_hour,
            minute: start_minute,
        },
    )?;

    let tz = now.timezone();
    let mut date = now.date_naive();
    for _ in 0..3 {
        let local = tz.from_local_datetime(&date.and_time(start));
        if let Some(candidate) = first_occurrence_after(local, now) {
            return Ok(candidate);
        }
        date = date.succ_opt().ok_or(ReminderError::OutOfRange)?;
    }
    Err(ReminderError::OutOfRange)
}

fn first_occurrence_after<Tz: TimeZone>(
    local: LocalResult<DateTime<Tz>>,
    now: &DateTime<Tz>,
) -> Option<DateTime<Tz>> {
    match local {
        LocalResult::Single(at) => (at > *now).then_some(at),
        LocalResult::Ambiguous(first, second) => [first, second].into_iter().find(|at| at > now),
        LocalResult::None => None,
    }
}

/// Builds the alarm arguments for the stored settings.
pub fn plan_reminder<Tz: TimeZone>(
    settings: &ReminderSettings,
    now: &DateTime<Tz>,
) -> Result<ReminderPlan, ReminderError> {
    let trigger = next_trigger_time(settings.start_hour, settings.start_minute, now)?;
    Ok(ReminderPlan {
        trigger_at_ms: trigger.timestamp_millis(),
        repeat_interval_ms: i64::from(interval_minutes_for(settings.interval_index)) * 60 * 1000,
        callback_id: HYDRATION_REMINDER_ID,
        notice_title: HYDRATION_NOTICE_TITLE,
        notice_body: HYDRATION_NOTICE_BODY,
    })
}
