//! Derived wellness metrics.
//!
//! # Invariants
//! - Percentages are integers in `0..=100`, computed with floor division.
//! - A mood trend value of `0.0` means "no entries that day"; real mood
//!   scores start at `1.0`.

use crate::clock::local_date_of;
use crate::model::habit::Habit;
use crate::model::mood::{mood_score, MoodEntry};
use chrono::{Duration, NaiveDate, TimeZone};

/// Daily step goal used by the dashboard and notification feed.
pub const DEFAULT_STEP_GOAL: i64 = 8_000;
/// Number of days in the mood trend window.
pub const MOOD_TREND_DAYS: usize = 7;
/// Maximum recent entries listed in a mood share report.
pub const SHARE_RECENT_LIMIT: usize = 5;
const WEEK_MS: i64 = 7 * 24 * 60 * 60 * 1000;

/// Share of completed habits, `0` for an empty list.
pub fn habit_completion_percentage(habits: &[Habit]) -> u8 {
    if habits.is_empty() {
        return 0;
    }
    let completed = habits.iter().filter(|habit| habit.completed).count();
    // completed <= total, so the quotient is at most 100.
    ((completed * 100) / habits.len()) as u8
}

/// Latest entry of one day plus how many entries that day holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyMoodSummary<'a> {
    pub latest: &'a MoodEntry,
    pub count: usize,
}

/// Summarizes entries with `day_start <= timestamp <= day_end`.
///
/// The latest entry is the one with the largest timestamp; on ties the one
/// appearing first in `entries` wins.
pub fn daily_mood_summary(
    entries: &[MoodEntry],
    day_start: i64,
    day_end: i64,
) -> Option<DailyMoodSummary<'_>> {
    let mut in_day = entries
        .iter()
        .filter(|entry| (day_start..=day_end).contains(&entry.timestamp));
    let first = in_day.next()?;

    let (latest, count) = in_day.fold((first, 1), |(latest, count), entry| {
        if entry.timestamp > latest.timestamp {
            (entry, count + 1)
        } else {
            (latest, count + 1)
        }
    });
    Some(DailyMoodSummary { latest, count })
}

/// Average mood score per local day for the 7 days ending at `today`,
/// oldest first. Days without entries are `0.0`.
pub fn seven_day_mood_trend<Tz: TimeZone>(
    entries: &[MoodEntry],
    today: NaiveDate,
    tz: &Tz,
) -> [f64; MOOD_TREND_DAYS] {
    let mut totals = [(0u32, 0u32); MOOD_TREND_DAYS];
    let oldest = today - Duration::days(MOOD_TREND_DAYS as i64 - 1);

    for entry in entries {
        let Some(day) = local_date_of(entry.timestamp, tz) else {
            continue;
        };
        let offset = (day - oldest).num_days();
        if (0..MOOD_TREND_DAYS as i64).contains(&offset) {
            let slot = &mut totals[offset as usize];
            slot.0 += u32::from(mood_score(&entry.mood_name));
            slot.1 += 1;
        }
    }

    totals.map(|(sum, count)| {
        if count == 0 {
            0.0
        } else {
            f64::from(sum) / f64::from(count)
        }
    })
}

/// Progress toward a step goal, clamped to `0..=100`.
///
/// A non-positive goal yields `0`.
pub fn step_goal_percentage(steps: i64, goal: i64) -> u8 {
    if goal <= 0 || steps <= 0 {
        return 0;
    }
    let percentage = steps.saturating_mul(100) / goal;
    percentage.min(100) as u8
}

/// Text-share overview of the mood journal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoodShareReport<'a> {
    pub total_entries: usize,
    pub most_frequent: String,
    /// Up to five entries from the last seven days, in journal order.
    pub recent: Vec<&'a MoodEntry>,
}

/// Builds the share overview, or `None` for an empty journal.
///
/// The most frequent mood is the first one encountered among equals.
pub fn mood_share_report(entries: &[MoodEntry], now_ms: i64) -> Option<MoodShareReport<'_>> {
    if entries.is_empty() {
        return None;
    }

    let mut counts: Vec<(&str, usize)> = Vec::new();
    for entry in entries {
        match counts
            .iter_mut()
            .find(|(name, _)| *name == entry.mood_name)
        {
            Some((_, count)) => *count += 1,
            None => counts.push((entry.mood_name.as_str(), 1)),
        }
    }
    let most_frequent = counts
        .iter()
        .fold(None::<(&str, usize)>, |best, &(name, count)| match best {
            Some((_, best_count)) if best_count >= count => best,
            _ => Some((name, count)),
        })
        .map(|(name, _)| name.to_string())
        .unwrap_or_default();

    let window_start = now_ms - WEEK_MS;
    let recent = entries
        .iter()
        .filter(|entry| entry.timestamp >= window_start)
        .take(SHARE_RECENT_LIMIT)
        .collect();

    Some(MoodShareReport {
        total_entries: entries.len(),
        most_frequent,
        recent,
    })
}

/// Lifetime counters shown on the profile screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProfileStats {
    pub habits_created: usize,
    pub mood_entries: usize,
    pub lifetime_steps: i64,
}

pub fn profile_stats(habits: &[Habit], moods: &[MoodEntry], lifetime_steps: i64) -> ProfileStats {
    ProfileStats {
        habits_created: habits.len(),
        mood_entries: moods.len(),
        lifetime_steps,
    }
}
