//! Once-per-calendar-day habit reset decision.
//!
//! # Invariants
//! - A reset happens only when `today` differs from the recorded reset date.
//! - Applying the decision twice for the same `today` changes state once.
//! - The caller persists the reset habits and `today` together.

use crate::model::habit::Habit;

/// Outcome of a daily reset check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyReset {
    pub habits: Vec<Habit>,
    pub did_reset: bool,
}

/// Clears completion and progress when `today` (`YYYY-MM-DD`) is a new day.
///
/// Otherwise returns the habits unchanged with `did_reset == false`.
pub fn maybe_reset(habits: &[Habit], last_reset_date: &str, today: &str) -> DailyReset {
    if today == last_reset_date {
        return DailyReset {
            habits: habits.to_vec(),
            did_reset: false,
        };
    }

    DailyReset {
        habits: habits.iter().map(Habit::cleared).collect(),
        did_reset: true,
    }
}
