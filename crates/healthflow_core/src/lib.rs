//! Core domain logic for HealthFlow.
//! This crate is the single source of truth for habit, mood, reminder,
//! step and session invariants.

pub mod clock;
pub mod db;
pub mod logging;
pub mod model;
pub mod policy;
pub mod sensor;
pub mod service;
pub mod store;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::habit::{Habit, HabitId, HabitValidationError, HABIT_UNITS};
pub use model::mood::{MoodEntry, MoodKind, MoodValidationError, MOOD_CATALOG};
pub use model::notification::NotificationItem;
pub use model::profile::{AuthMode, Profile};
pub use policy::reminder::{ReminderError, ReminderPlan, ReminderSettings};
pub use policy::session::{LaunchRoute, ValidationError};
pub use sensor::motion::{AccelSample, MotionDetector, ShakeDetector, StepBaseline};
pub use service::habit_service::{HabitService, HabitServiceError};
pub use service::mood_service::{MoodService, MoodServiceError, TodayMood};
pub use service::reminder_service::{
    AlarmError, AlarmService, ReminderService, ReminderServiceError,
};
pub use service::session_service::{SessionError, SessionService};
pub use service::step_service::{StepSensorState, StepService};
pub use service::summary_service::{DashboardSummary, SummaryService};
pub use store::kv_store::{KeyValueStore, PersistenceError, SqliteKeyValueStore, StoreResult};
pub use store::record_store::RecordStore;

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
