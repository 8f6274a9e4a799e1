//! Hydration reminder use-case service.
//!
//! # Responsibility
//! - Persist reminder preferences.
//! - Keep the platform alarm in sync with them.
//!
//! # Invariants
//! - Enabled reminders are (re)scheduled under `HYDRATION_REMINDER_ID`.
//! - Disabling cancels the alarm; nothing else is scheduled.
//! - An invalid start time is rejected before anything is stored.

use crate::policy::reminder::{
    next_trigger_time, plan_reminder, ReminderError, ReminderPlan, ReminderSettings,
    HYDRATION_REMINDER_ID,
};
use crate::store::kv_store::{KeyValueStore, PersistenceError};
use crate::store::record_store::RecordStore;
use chrono::{DateTime, TimeZone};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Failure reported by the platform alarm service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlarmError {
    Unavailable(String),
    Rejected(String),
}

impl Display for AlarmError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unavailable(message) => write!(f, "alarm service unavailable: {message}"),
            Self::Rejected(message) => write!(f, "alarm request rejected: {message}"),
        }
    }
}

impl Error for AlarmError {}

/// Platform alarm boundary (e.g. Android `AlarmManager`).
pub trait AlarmService {
    /// Schedules a repeating alarm, replacing any alarm with the same
    /// `plan.callback_id`.
    fn schedule_repeating(&self, plan: &ReminderPlan) -> Result<(), AlarmError>;

    fn cancel(&self, callback_id: &str) -> Result<(), AlarmError>;
}

impl<A: AlarmService + ?Sized> AlarmService for &A {
    fn schedule_repeating(&self, plan: &ReminderPlan) -> Result<(), AlarmError> {
        (**self).schedule_repeating(plan)
    }

    fn cancel(&self, callback_id: &str) -> Result<(), AlarmError> {
        (**self).cancel(callback_id)
    }
}

#[derive(Debug)]
pub enum ReminderServiceError {
    Reminder(ReminderError),
    Alarm(AlarmError),
    Persistence(PersistenceError),
}

impl Display for ReminderServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Reminder(err) => write!(f, "{err}"),
            Self::Alarm(err) => write!(f, "{err}"),
            Self::Persistence(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ReminderServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Reminder(err) => Some(err),
            Self::Alarm(err) => Some(err),
            Self::Persistence(err) => Some(err),
        }
    }
}

impl From<ReminderError> for ReminderServiceError {
    fn from(value: ReminderError) -> Self {
        Self::Reminder(value)
    }
}

impl From<AlarmError> for ReminderServiceError {
    fn from(value: AlarmError) -> Self {
        Self::Alarm(value)
    }
}

impl From<PersistenceError> for ReminderServiceError {
    fn from(value: PersistenceError) -> Self {
        Self::Persistence(value)
    }
}

pub type ReminderResult<T> = Result<T, ReminderServiceError>;

pub struct ReminderService<S: KeyValueStore, A: AlarmService> {
    store: RecordStore<S>,
    alarms: A,
}

impl<S: KeyValueStore, A: AlarmService> ReminderService<S, A> {
    pub fn new(kv: S, alarms: A) -> Self {
        Self {
            store: RecordStore::new(kv),
            alarms,
        }
    }

    pub fn settings(&self) -> ReminderResult<ReminderSettings> {
        Ok(self.store.reminder_settings()?)
    }

    /// Turns reminders on or off and syncs the alarm.
    pub fn set_enabled<Tz: TimeZone>(
        &self,
        enabled: bool,
        now: &DateTime<Tz>,
    ) -> ReminderResult<Option<ReminderPlan>> {
        self.store.set_hydration_enabled(enabled)?;
        self.sync(now)
    }

    /// Stores the interval picker index and reschedules when enabled.
    pub fn set_interval<Tz: TimeZone>(
        &self,
        interval_index: i32,
        now: &DateTime<Tz>,
    ) -> ReminderResult<Option<ReminderPlan>> {
        self.store.set_reminder_interval_index(interval_index)?;
        self.sync(now)
    }

    /// Stores the daily start time and reschedules when enabled.
    pub fn set_start_time<Tz: TimeZone>(
        &self,
        hour: u32,
        minute: u32,
        now: &DateTime<Tz>,
    ) -> ReminderResult<Option<ReminderPlan>> {
        next_trigger_time(hour, minute, now)?;
        self.store.set_reminder_start_time(hour, minute)?;
        self.sync(now)
    }

    /// Applies stored settings to the alarm service.
    ///
    /// Returns the scheduled plan, or `None` after cancelling.
    pub fn sync<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> ReminderResult<Option<ReminderPlan>> {
        let settings = self.store.reminder_settings()?;
        if !settings.enabled {
            self.alarms.cancel(HYDRATION_REMINDER_ID).map_err(|err| {
                warn!("event=reminder_cancel module=service status=error error_code=alarm_failed");
                err
            })?;
            info!("event=reminder_cancel module=service status=ok");
            return Ok(None);
        }

        let plan = plan_reminder(&settings, now)?;
        self.alarms
            .schedule_repeating(&plan)
            .map_err(|err| {
                warn!("event=reminder_schedule module=service status=error error_code=alarm_failed");
                err
            })?;
        info!(
            "event=reminder_schedule module=service status=ok interval_ms={}",
            plan.repeat_interval_ms
        );
        Ok(Some(plan))
    }
}
