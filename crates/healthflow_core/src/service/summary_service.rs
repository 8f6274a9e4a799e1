//! Read-only aggregates for the home, profile and notification screens.

use crate::clock::day_bounds;
use crate::model::notification::NotificationItem;
use crate::policy::metrics::{
    daily_mood_summary, habit_completion_percentage, profile_stats, step_goal_percentage,
    ProfileStats, DEFAULT_STEP_GOAL,
};
use crate::policy::notifications::{generate_feed, FeedSnapshot};
use crate::service::mood_service::TodayMood;
use crate::store::kv_store::{KeyValueStore, StoreResult};
use crate::store::record_store::RecordStore;
use chrono::{DateTime, NaiveDate, TimeZone};
use std::fmt::Display;

/// Home screen numbers for one local day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardSummary {
    pub habits_completed: usize,
    pub habits_total: usize,
    pub habit_percentage: u8,
    pub today_mood: Option<TodayMood>,
    pub steps_today: i64,
    pub step_goal: i64,
    pub step_percentage: u8,
}

pub struct SummaryService<S: KeyValueStore> {
    store: RecordStore<S>,
}

impl<S: KeyValueStore> SummaryService<S> {
    pub fn new(kv: S) -> Self {
        Self {
            store: RecordStore::new(kv),
        }
    }

    pub fn dashboard<Tz: TimeZone>(
        &self,
        today: NaiveDate,
        tz: &Tz,
    ) -> StoreResult<DashboardSummary> {
        let habits = self.store.habits()?;
        let moods = self.store.mood_entries()?;
        let steps_today = self.store.step_count()?;
        let (start, end) = day_bounds(today, tz);

        Ok(DashboardSummary {
            habits_completed: habits.iter().filter(|habit| habit.completed).count(),
            habits_total: habits.len(),
            habit_percentage: habit_completion_percentage(&habits),
            today_mood: daily_mood_summary(&moods, start, end).map(|summary| TodayMood {
                latest: summary.latest.clone(),
                count: summary.count,
            }),
            steps_today,
            step_goal: DEFAULT_STEP_GOAL,
            step_percentage: step_goal_percentage(steps_today, DEFAULT_STEP_GOAL),
        })
    }

    pub fn profile_stats(&self) -> StoreResult<ProfileStats> {
        Ok(profile_stats(
            &self.store.habits()?,
            &self.store.mood_entries()?,
            self.store.lifetime_steps()?,
        ))
    }

    /// Derives the notification feed from current state. Nothing is written.
    pub fn notification_feed<Tz: TimeZone>(
        &self,
        now: &DateTime<Tz>,
    ) -> StoreResult<Vec<NotificationItem>>
    where
        Tz::Offset: Display,
    {
        let habits = self.store.habits()?;
        let moods = self.store.mood_entries()?;
        let snapshot = FeedSnapshot {
            hydration_enabled: self.store.hydration_enabled()?,
            habits: &habits,
            moods: &moods,
            steps_today: self.store.step_count()?,
        };
        Ok(generate_feed(&snapshot, now))
    }
}
