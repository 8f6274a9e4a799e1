//! In-app notification feed generation.
//!
//! The feed is derived from a snapshot each time it is opened. Nothing here
//! persists; read flags live only in the returned list.

use crate::clock::{clock_time_label, start_of_day_ms};
use crate::model::habit::Habit;
use crate::model::mood::MoodEntry;
use crate::model::notification::NotificationItem;
use crate::policy::metrics::DEFAULT_STEP_GOAL;
use chrono::{DateTime, Duration, TimeZone};
use std::fmt::Display;

/// Steps above which the "almost there" nudge appears.
pub const STEP_NUDGE_THRESHOLD: i64 = 5_000;

/// Inputs the feed is derived from.
#[derive(Debug, Clone, Copy)]
pub struct FeedSnapshot<'a> {
    pub hydration_enabled: bool,
    pub habits: &'a [Habit],
    pub moods: &'a [MoodEntry],
    pub steps_today: i64,
}

/// Builds the feed in display order.
pub fn generate_feed<Tz: TimeZone>(
    snapshot: &FeedSnapshot<'_>,
    now: &DateTime<Tz>,
) -> Vec<NotificationItem>
where
    Tz::Offset: Display,
{
    let mut feed = Vec::new();
    let at = |ago: Duration| now.clone() - ago;

    if snapshot.hydration_enabled {
        feed.push(item(
            "1",
            "💧",
            "Hydration Reminder",
            "Time to drink water! Stay healthy and hydrated.".to_string(),
            &at(Duration::zero()),
            false,
        ));
    }

    let incomplete = snapshot.habits.iter().filter(|habit| !habit.completed).count();
    if incomplete > 0 {
        feed.push(item(
            "2",
            "✅",
            "Complete Your Habits",
            format!("You have {incomplete} habits left to complete today!"),
            &at(Duration::hours(1)),
            false,
        ));
    }

    let today_start = start_of_day_ms(now.date_naive(), &now.timezone());
    if !snapshot.moods.iter().any(|entry| entry.timestamp >= today_start) {
        feed.push(item(
            "3",
            "😊",
            "Log Your Mood",
            "How are you feeling today? Take a moment to reflect.".to_string(),
            &at(Duration::hours(2)),
            false,
        ));
    }

    let mut encouragement = item(
        "4",
        "🌟",
        "You're Doing Great!",
        "Keep up the amazing work on your wellness journey!".to_string(),
        &at(Duration::days(1)),
        true,
    );
    encouragement.time = "Yesterday".to_string();
    feed.push(encouragement);

    let steps = snapshot.steps_today;
    if steps > STEP_NUDGE_THRESHOLD && steps < DEFAULT_STEP_GOAL {
        feed.push(item(
            "5",
            "👟",
            "Almost There!",
            format!(
                "You're {} steps away from your daily goal!",
                DEFAULT_STEP_GOAL - steps
            ),
            &at(Duration::minutes(30)),
            false,
        ));
    }

    feed
}

/// Returns the feed with item `id` marked read.
pub fn mark_read(items: &[NotificationItem], id: &str) -> Vec<NotificationItem> {
    items
        .iter()
        .map(|item| {
            if item.id == id {
                item.marked_read()
            } else {
                item.clone()
            }
        })
        .collect()
}

pub fn unread_count(items: &[NotificationItem]) -> usize {
    items.iter().filter(|item| !item.is_read).count()
}

fn item<Tz: TimeZone>(
    id: &str,
    icon: &str,
    title: &str,
    message: String,
    at: &DateTime<Tz>,
    is_read: bool,
) -> NotificationItem
where
    Tz::Offset: Display,
{
    NotificationItem {
        id: id.to_string(),
        icon: icon.to_string(),
        title: title.to_string(),
        message,
        time: clock_time_label(at),
        timestamp: at.timestamp_millis(),
        is_read,
    }
}

#[cfg(test)]
mod tests {
    use super::{generate_feed, mark_read, unread_count, FeedSnapshot};
    use crate::model::habit::Habit;
    use crate::model::mood::MoodEntry;
    use chrono::{FixedOffset, TimeZone};

    fn ids(snapshot: &FeedSnapshot<'_>) -> Vec<String> {
        let now = FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2024, 5, 10, 15, 0, 0)
            .unwrap();
        generate_feed(snapshot, &now)
            .into_iter()
            .map(|item| item.id)
            .collect()
    }

    #[test]
    fn quiet_day_only_shows_mood_prompt_and_encouragement() {
        let snapshot = FeedSnapshot {
            hydration_enabled: false,
            habits: &[],
            moods: &[],
            steps_today: 0,
        };
        assert_eq!(ids(&snapshot), vec!["3", "4"]);
    }

    #[test]
    fn busy_day_shows_every_nudge_in_order() {
        let tz = FixedOffset::east_opt(0).unwrap();
        let habits = [
            Habit::new("Walk", 1, "times", ""),
            Habit::new("Read", 1, "pages", ""),
        ];
        let yesterday = tz.with_ymd_and_hms(2024, 5, 9, 21, 0, 0).unwrap();
        let moods = [MoodEntry::new("😊", "Happy", "", &yesterday)];
        let snapshot = FeedSnapshot {
            hydration_enabled: true,
            habits: &habits,
            moods: &moods,
            steps_today: 6_500,
        };

        let now = tz.with_ymd_and_hms(2024, 5, 10, 15, 0, 0).unwrap();
        let feed = generate_feed(&snapshot, &now);
        let ids: Vec<&str> = feed.iter().map(|item| item.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3", "4", "5"]);
        assert_eq!(feed[1].message, "You have 2 habits left to complete today!");
        assert_eq!(feed[1].time, "02:00 PM");
        assert_eq!(feed[3].time, "Yesterday");
        assert_eq!(feed[4].message, "You're 1500 steps away from your daily goal!");
    }

    #[test]
    fn logged_mood_and_met_goal_suppress_nudges() {
        let tz = FixedOffset::east_opt(0).unwrap();
        let morning = tz.with_ymd_and_hms(2024, 5, 10, 8, 0, 0).unwrap();
        let moods = [MoodEntry::new("😌", "Calm", "", &morning)];
        let snapshot = FeedSnapshot {
            hydration_enabled: false,
            habits: &[],
            moods: &moods,
            steps_today: 8_000,
        };
        assert_eq!(ids(&snapshot), vec!["4"]);
    }

    #[test]
    fn mark_read_only_touches_the_target() {
        let snapshot = FeedSnapshot {
            hydration_enabled: true,
            habits: &[],
            moods: &[],
            steps_today: 0,
        };
        let now = FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2024, 5, 10, 15, 0, 0)
            .unwrap();
        let feed = generate_feed(&snapshot, &now);
        assert_eq!(unread_count(&feed), 2);

        let updated = mark_read(&feed, "1");
        assert_eq!(unread_count(&updated), 1);
        assert!(updated[0].is_read);
        assert!(!feed[0].is_read);
    }
}
