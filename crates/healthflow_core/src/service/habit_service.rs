//! Habit use-case service.
//!
//! # Responsibility
//! - Create, edit, check and delete habits by id.
//! - Run the once-per-day reset and persist it atomically.
//!
//! # Invariants
//! - Write paths call `Habit::validate()` before persistence.
//! - Reset habits and `last_reset_date` are written in one transaction.

use crate::clock::date_key;
use crate::model::habit::{Habit, HabitId, HabitValidationError};
use crate::policy::daily_reset::{maybe_reset, DailyReset};
use crate::policy::metrics::habit_completion_percentage;
use crate::store::kv_store::{KeyValueStore, PersistenceError};
use crate::store::record_store::{find_by_id, upsert_by_id, RecordStore};
use chrono::NaiveDate;
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug)]
pub enum HabitServiceError {
    Validation(HabitValidationError),
    HabitNotFound(HabitId),
    Persistence(PersistenceError),
}

impl Display for HabitServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::HabitNotFound(id) => write!(f, "habit not found: {id}"),
            Self::Persistence(err) => write!(f, "{err}"),
        }
    }
}

impl Error for HabitServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Persistence(err) => Some(err),
            Self::HabitNotFound(_) => None,
        }
    }
}

impl From<HabitValidationError> for HabitServiceError {
    fn from(value: HabitValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<PersistenceError> for HabitServiceError {
    fn from(value: PersistenceError) -> Self {
        Self::Persistence(value)
    }
}

pub type HabitResult<T> = Result<T, HabitServiceError>;

pub struct HabitService<S: KeyValueStore> {
    store: RecordStore<S>,
}

impl<S: KeyValueStore> HabitService<S> {
    pub fn new(kv: S) -> Self {
        Self {
            store: RecordStore::new(kv),
        }
    }

    pub fn list_habits(&self) -> HabitResult<Vec<Habit>> {
        Ok(self.store.habits()?)
    }

    /// Adds a new unchecked habit at the end of the list.
    pub fn add_habit(
        &self,
        name: &str,
        target: i32,
        unit: &str,
        today: NaiveDate,
    ) -> HabitResult<Habit> {
        let habit = Habit::new(name.trim(), target, unit, date_key(today));
        habit.validate()?;

        let habits = self.store.upsert_habit(&habit)?;
        info!(
            "event=habit_add module=service status=ok habit_count={}",
            habits.len()
        );
        Ok(habit)
    }

    /// Replaces name, target and unit of an existing habit.
    pub fn edit_habit(
        &self,
        id: &str,
        name: &str,
        target: i32,
        unit: &str,
        today: NaiveDate,
    ) -> HabitResult<Habit> {
        self.replace_habit(id, |habit| {
            habit.with_details(name, target, unit, &date_key(today))
        })
    }

    /// Ticks or unticks a habit for today.
    pub fn set_checked(&self, id: &str, checked: bool, today: NaiveDate) -> HabitResult<Habit> {
        self.replace_habit(id, |habit| habit.with_checked(checked, &date_key(today)))
    }

    /// Records partial progress toward the habit target.
    pub fn record_progress(
        &self,
        id: &str,
        progress: i32,
        today: NaiveDate,
    ) -> HabitResult<Habit> {
        self.replace_habit(id, |habit| habit.with_progress(progress, &date_key(today)))
    }

    /// Deletes a habit and returns the remaining list.
    pub fn delete_habit(&self, id: &str) -> HabitResult<Vec<Habit>> {
        let habits = self.store.habits()?;
        if find_by_id(&habits, id).is_none() {
            return Err(HabitServiceError::HabitNotFound(id.to_string()));
        }
        let remaining = self.store.remove_habit(id)?;
        info!(
            "event=habit_delete module=service status=ok habit_count={}",
            remaining.len()
        );
        Ok(remaining)
    }

    /// Clears habit progress when `today` is a new calendar day.
    ///
    /// Safe to call on every screen resume; repeated calls on the same day
    /// leave storage untouched.
    pub fn run_daily_reset(&self, today: NaiveDate) -> HabitResult<DailyReset> {
        let today_key = date_key(today);
        let last_reset = self.store.last_reset_date()?;
        let outcome = maybe_reset(&self.store.habits()?, &last_reset, &today_key);

        if outcome.did_reset {
            self.store.save_daily_reset(&outcome.habits, &today_key)?;
            info!(
                "event=daily_reset module=service status=ok habit_count={}",
                outcome.habits.len()
            );
        }
        Ok(outcome)
    }

    pub fn completion_percentage(&self) -> HabitResult<u8> {
        Ok(habit_completion_percentage(&self.store.habits()?))
    }

    fn replace_habit(&self, id: &str, edit: impl FnOnce(&Habit) -> Habit) -> HabitResult<Habit> {
        let habits = self.store.habits()?;
        let current = find_by_id(&habits, id)
            .ok_or_else(|| HabitServiceError::HabitNotFound(id.to_string()))?;

        let updated = edit(current);
        updated.validate()?;
        self.store.save_habits(&upsert_by_id(&habits, &updated))?;
        Ok(updated)
    }
}
