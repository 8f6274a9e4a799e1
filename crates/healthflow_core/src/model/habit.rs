//! Habit domain model.
//!
//! # Responsibility
//! - Define the daily habit record and its check/progress transitions.
//! - Validate user-entered habit fields.
//!
//! # Invariants
//! - `id` is stable for the habit lifetime and never reused.
//! - `current_progress` stays within `0..=target` for records produced here.
//! - `completed == true` exactly when `current_progress == target`.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Opaque habit identifier. Older device data may carry non-UUID ids.
pub type HabitId = String;

/// Unit labels offered when creating a habit.
pub const HABIT_UNITS: [&str; 5] = ["times", "minutes", "glasses", "steps", "pages"];

/// User-defined recurring goal with a numeric daily target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Habit {
    pub id: HabitId,
    pub name: String,
    pub target: i32,
    pub unit: String,
    #[serde(default)]
    pub current_progress: i32,
    #[serde(default)]
    pub completed: bool,
    /// `YYYY-MM-DD` of the last user edit; empty when never edited.
    #[serde(default)]
    pub last_updated: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HabitValidationError {
    EmptyName,
    NonPositiveTarget(i32),
}

impl Display for HabitValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "habit name cannot be empty"),
            Self::NonPositiveTarget(target) => {
                write!(f, "habit target must be at least 1, got {target}")
            }
        }
    }
}

impl Error for HabitValidationError {}

impl Habit {
    /// Creates a fresh, unchecked habit with a generated id.
    pub fn new(
        name: impl Into<String>,
        target: i32,
        unit: impl Into<String>,
        today: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            target,
            unit: unit.into(),
            current_progress: 0,
            completed: false,
            last_updated: today.into(),
        }
    }

    pub fn validate(&self) -> Result<(), HabitValidationError> {
        if self.name.trim().is_empty() {
            return Err(HabitValidationError::EmptyName);
        }
        if self.target < 1 {
            return Err(HabitValidationError::NonPositiveTarget(self.target));
        }
        Ok(())
    }

    /// Returns the record after the user ticks or unticks the habit.
    ///
    /// Checking jumps progress to the target; unchecking clears it.
    pub fn with_checked(&self, checked: bool, today: &str) -> Self {
        Self {
            completed: checked,
            current_progress: if checked { self.target } else { 0 },
            last_updated: today.to_string(),
            ..self.clone()
        }
    }

    /// Returns the record after recording partial progress.
    ///
    /// Progress is clamped to `0..=target`; reaching the target completes it.
    pub fn with_progress(&self, progress: i32, today: &str) -> Self {
        let clamped = progress.clamp(0, self.target.max(0));
        Self {
            completed: self.target > 0 && clamped >= self.target,
            current_progress: clamped,
            last_updated: today.to_string(),
            ..self.clone()
        }
    }

    /// Returns the record with edited name/target/unit.
    ///
    /// Progress is re-clamped against the new target and completion follows.
    pub fn with_details(&self, name: &str, target: i32, unit: &str, today: &str) -> Self {
        let edited = Self {
            name: name.trim().to_string(),
            target,
            unit: unit.to_string(),
            ..self.clone()
        };
        if self.completed {
            edited.with_checked(true, today)
        } else {
            edited.with_progress(self.current_progress, today)
        }
    }

    /// Returns the start-of-day state: unchecked with no progress.
    pub fn cleared(&self) -> Self {
        Self {
            completed: false,
            current_progress: 0,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Habit, HabitValidationError};

    fn water() -> Habit {
        Habit::new("Drink water", 8, "glasses", "2024-05-10")
    }

    #[test]
    fn new_habit_starts_unchecked_with_unique_id() {
        let first = water();
        let second = water();
        assert_ne!(first.id, second.id);
        assert_eq!(first.current_progress, 0);
        assert!(!first.completed);
    }

    #[test]
    fn validate_rejects_blank_name_and_zero_target() {
        let mut habit = water();
        habit.name = "   ".to_string();
        assert_eq!(habit.validate(), Err(HabitValidationError::EmptyName));

        let mut habit = water();
        habit.target = 0;
        assert_eq!(
            habit.validate(),
            Err(HabitValidationError::NonPositiveTarget(0))
        );
    }

    #[test]
    fn checking_sets_progress_to_target_and_unchecking_clears_it() {
        let checked = water().with_checked(true, "2024-05-11");
        assert!(checked.completed);
        assert_eq!(checked.current_progress, 8);
        assert_eq!(checked.last_updated, "2024-05-11");

        let unchecked = checked.with_checked(false, "2024-05-11");
        assert!(!unchecked.completed);
        assert_eq!(unchecked.current_progress, 0);
    }

    #[test]
    fn partial_progress_completes_only_at_target() {
        let partial = water().with_progress(5, "2024-05-10");
        assert!(!partial.completed);
        assert_eq!(partial.current_progress, 5);

        let over = water().with_progress(12, "2024-05-10");
        assert!(over.completed);
        assert_eq!(over.current_progress, 8);

        let negative = water().with_progress(-3, "2024-05-10");
        assert_eq!(negative.current_progress, 0);
    }

    #[test]
    fn editing_target_keeps_completion_consistent() {
        let checked = water().with_checked(true, "2024-05-10");
        let edited = checked.with_details(" Water ", 10, "glasses", "2024-05-10");
        assert_eq!(edited.name, "Water");
        assert!(edited.completed);
        assert_eq!(edited.current_progress, 10);

        let partial = water().with_progress(6, "2024-05-10");
        let shrunk = partial.with_details("Water", 4, "glasses", "2024-05-10");
        assert!(shrunk.completed);
        assert_eq!(shrunk.current_progress, 4);
    }

    #[test]
    fn serializes_with_camel_case_fields() {
        let json = serde_json::to_value(water()).unwrap();
        assert!(json.get("currentProgress").is_some());
        assert!(json.get("lastUpdated").is_some());
    }
}
