//! Scalar settings and profile values.
//!
//! Booleans are stored as `true`/`false`, integers as decimal text. A value
//! that fails to parse reads back as the documented default.

use crate::clock::member_since_label;
use crate::model::profile::{DEFAULT_AVATAR, DEFAULT_USER_EMAIL, DEFAULT_USER_NAME};
use crate::policy::reminder::ReminderSettings;
use crate::store::keys;
use crate::store::kv_store::{KeyValueStore, StoreResult};
use crate::store::record_store::RecordStore;
use chrono::NaiveDate;
use log::warn;
use std::str::FromStr;

/// Default `reminder_interval` index (one hour).
pub const DEFAULT_REMINDER_INTERVAL_INDEX: i32 = 1;
pub const DEFAULT_REMINDER_START_HOUR: u32 = 8;
pub const DEFAULT_REMINDER_START_MINUTE: u32 = 0;

impl<S: KeyValueStore> RecordStore<S> {
    fn get_string_or(&self, key: &str, default: &str) -> StoreResult<String> {
        Ok(self
            .kv()
            .get(key)?
            .unwrap_or_else(|| default.to_string()))
    }

    fn get_parsed_or<T: FromStr>(&self, key: &str, default: T) -> StoreResult<T> {
        match self.kv().get(key)? {
            None => Ok(default),
            Some(raw) => match raw.trim().parse::<T>() {
                Ok(value) => Ok(value),
                Err(_) => {
                    warn!(
                        "event=setting_load module=store status=degraded key={} error_code=malformed_scalar",
                        key
                    );
                    Ok(default)
                }
            },
        }
    }

    fn put_display(&self, key: &str, value: impl ToString) -> StoreResult<()> {
        self.kv().put(key, &value.to_string())
    }

    pub fn last_reset_date(&self) -> StoreResult<String> {
        self.get_string_or(keys::LAST_RESET_DATE, "")
    }

    pub fn set_last_reset_date(&self, date: &str) -> StoreResult<()> {
        self.kv().put(keys::LAST_RESET_DATE, date)
    }

    pub fn hydration_enabled(&self) -> StoreResult<bool> {
        self.get_parsed_or(keys::HYDRATION_ENABLED, false)
    }

    pub fn set_hydration_enabled(&self, enabled: bool) -> StoreResult<()> {
        self.put_display(keys::HYDRATION_ENABLED, enabled)
    }

    pub fn reminder_interval_index(&self) -> StoreResult<i32> {
        self.get_parsed_or(keys::REMINDER_INTERVAL, DEFAULT_REMINDER_INTERVAL_INDEX)
    }

    pub fn set_reminder_interval_index(&self, index: i32) -> StoreResult<()> {
        self.put_display(keys::REMINDER_INTERVAL, index)
    }

    pub fn reminder_start_hour(&self) -> StoreResult<u32> {
        self.get_parsed_or(keys::REMINDER_START_HOUR, DEFAULT_REMINDER_START_HOUR)
    }

    pub fn reminder_start_minute(&self) -> StoreResult<u32> {
        self.get_parsed_or(keys::REMINDER_START_MINUTE, DEFAULT_REMINDER_START_MINUTE)
    }

    /// Stores hour and minute together.
    pub fn set_reminder_start_time(&self, hour: u32, minute: u32) -> StoreResult<()> {
        self.kv().put_many(&[
            (keys::REMINDER_START_HOUR, hour.to_string()),
            (keys::REMINDER_START_MINUTE, minute.to_string()),
        ])
    }

    pub fn reminder_settings(&self) -> StoreResult<ReminderSettings> {
        Ok(ReminderSettings {
            enabled: self.hydration_enabled()?,
            interval_index: self.reminder_interval_index()?,
            start_hour: self.reminder_start_hour()?,
            start_minute: self.reminder_start_minute()?,
        })
    }

    pub fn step_counter_enabled(&self) -> StoreResult<bool> {
        self.get_parsed_or(keys::STEP_COUNTER_ENABLED, false)
    }

    pub fn set_step_counter_enabled(&self, enabled: bool) -> StoreResult<()> {
        self.put_display(keys::STEP_COUNTER_ENABLED, enabled)
    }

    pub fn step_count(&self) -> StoreResult<i64> {
        self.get_parsed_or(keys::STEP_COUNT, 0)
    }

    pub fn set_step_count(&self, count: i64) -> StoreResult<()> {
        self.put_display(keys::STEP_COUNT, count)
    }

    pub fn lifetime_steps(&self) -> StoreResult<i64> {
        self.get_parsed_or(keys::TOTAL_LIFETIME_STEPS, 0)
    }

    /// Persists today's count and the lifetime total in one atomic write.
    pub fn save_step_totals(&self, step_count: i64, lifetime_steps: i64) -> StoreResult<()> {
        self.kv().put_many(&[
            (keys::STEP_COUNT, step_count.to_string()),
            (keys::TOTAL_LIFETIME_STEPS, lifetime_steps.to_string()),
        ])
    }

    pub fn shake_detection_enabled(&self) -> StoreResult<bool> {
        self.get_parsed_or(keys::SHAKE_DETECTION_ENABLED, false)
    }

    pub fn set_shake_detection_enabled(&self, enabled: bool) -> StoreResult<()> {
        self.put_display(keys::SHAKE_DETECTION_ENABLED, enabled)
    }

    pub fn user_name(&self) -> StoreResult<String> {
        self.get_string_or(keys::USER_NAME, DEFAULT_USER_NAME)
    }

    pub fn user_email(&self) -> StoreResult<String> {
        self.get_string_or(keys::USER_EMAIL, DEFAULT_USER_EMAIL)
    }

    /// Stored credential: an Argon2id PHC string, or plaintext from older app data.
    pub fn user_credential(&self) -> StoreResult<String> {
        self.get_string_or(keys::USER_PASSWORD, "")
    }

    pub fn set_user_credential(&self, credential: &str) -> StoreResult<()> {
        self.kv().put(keys::USER_PASSWORD, credential)
    }

    pub fn user_avatar(&self) -> StoreResult<String> {
        self.get_string_or(keys::USER_AVATAR, DEFAULT_AVATAR)
    }

    pub fn set_user_avatar(&self, emoji: &str) -> StoreResult<()> {
        self.kv().put(keys::USER_AVATAR, emoji)
    }

    /// Returns the member-since label, recording `today` on first access.
    pub fn member_since(&self, today: NaiveDate) -> StoreResult<String> {
        if let Some(saved) = self.kv().get(keys::MEMBER_SINCE)? {
            return Ok(saved);
        }
        let label = member_since_label(today);
        self.kv().put(keys::MEMBER_SINCE, &label)?;
        Ok(label)
    }

    pub fn is_logged_in(&self) -> StoreResult<bool> {
        self.get_parsed_or(keys::IS_LOGGED_IN, false)
    }

    pub fn active_user_email(&self) -> StoreResult<String> {
        self.get_string_or(keys::ACTIVE_USER_EMAIL, "")
    }

    pub fn remember_me(&self) -> StoreResult<bool> {
        self.get_parsed_or(keys::REMEMBER_ME, false)
    }

    pub fn onboarding_completed(&self) -> StoreResult<bool> {
        self.get_parsed_or(keys::ONBOARDING_COMPLETED, false)
    }

    pub fn set_onboarding_completed(&self, completed: bool) -> StoreResult<()> {
        self.put_display(keys::ONBOARDING_COMPLETED, completed)
    }

    /// Returns whether this is the first launch and clears the flag.
    pub fn take_first_launch(&self) -> StoreResult<bool> {
        let first = self.get_parsed_or(keys::FIRST_LAUNCH, true)?;
        if first {
            self.put_display(keys::FIRST_LAUNCH, false)?;
        }
        Ok(first)
    }

    /// Opens an authenticated session for `email`.
    pub fn start_session(&self, email: &str, remember_me: bool) -> StoreResult<()> {
        self.kv().put_many(&[
            (keys::IS_LOGGED_IN, true.to_string()),
            (keys::ACTIVE_USER_EMAIL, email.to_string()),
            (keys::REMEMBER_ME, remember_me.to_string()),
        ])
    }

    /// Clears session flags only; profile, habits and moods stay on disk.
    pub fn clear_session(&self) -> StoreResult<()> {
        self.kv().put_many(&[
            (keys::IS_LOGGED_IN, false.to_string()),
            (keys::ACTIVE_USER_EMAIL, String::new()),
            (keys::REMEMBER_ME, false.to_string()),
        ])
    }
}
