//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose stable, use-case-level functions to Dart via FRB.
//! - Flatten core records and errors into plain envelopes for the UI.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Every DB-backed call opens the store at one process-wide path.
//! - Platform alarms are executed by the host; Rust only returns the request.

use chrono::{Local, NaiveDate};
use healthflow_core::db::open_db;
use healthflow_core::model::mood::find_mood;
use healthflow_core::policy::notifications::{mark_read, unread_count};
use healthflow_core::policy::reminder::{interval_minutes_for, INTERVAL_LABELS};
use healthflow_core::service::reminder_service::ReminderResult;
use healthflow_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    AccelSample, AlarmError, AlarmService, Habit, HabitService, LaunchRoute, MoodEntry,
    MoodService, NotificationItem, RecordStore, ReminderPlan, ReminderService, SessionService,
    ShakeDetector, SqliteKeyValueStore, StepSensorState, StepService, StoreResult,
    SummaryService, HABIT_UNITS, MOOD_CATALOG,
};
use log::warn;
use std::cell::RefCell;
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock, PoisonError};

const DB_FILE_NAME: &str = "healthflow.sqlite3";
static DB_PATH: OnceLock<PathBuf> = OnceLock::new();
static STEP_SENSOR_STATE: Mutex<Option<StepSensorState>> = Mutex::new(None);
static SHAKE_DETECTOR: Mutex<Option<ShakeDetector>> = Mutex::new(None);

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Reconfiguration attempts with different level or directory return error.
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Generic action response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResponse {
    /// Whether operation succeeded.
    pub ok: bool,
    /// Optional id of the created or edited record.
    pub id: Option<String>,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

impl ActionResponse {
    fn success(message: impl Into<String>, id: Option<String>) -> Self {
        Self {
            ok: true,
            id,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            id: None,
            message: message.into(),
        }
    }

    fn from_result<T>(
        result: Result<T, String>,
        message: &str,
        id: impl FnOnce(&T) -> Option<String>,
    ) -> Self {
        match result {
            Ok(value) => Self::success(message, id(&value)),
            Err(err) => Self::failure(err),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HabitItem {
    pub id: String,
    pub name: String,
    pub target: i32,
    pub unit: String,
    pub current_progress: i32,
    pub completed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HabitListResponse {
    pub items: Vec<HabitItem>,
    /// Completed share in `0..=100`.
    pub completion_percentage: u8,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoodItem {
    pub id: String,
    pub emoji: String,
    pub mood_name: String,
    pub note: String,
    pub timestamp: i64,
    pub date: String,
    pub time: String,
}

/// One selectable mood from the fixed catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoodOption {
    pub emoji: String,
    pub name: String,
    pub score: u8,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub habits_completed: u32,
    pub habits_total: u32,
    pub habit_percentage: u8,
    pub today_mood_emoji: Option<String>,
    pub today_mood_name: Option<String>,
    pub today_mood_count: u32,
    pub steps_today: i64,
    pub step_goal: i64,
    pub step_percentage: u8,
    /// Average mood per day, oldest first, `0.0` for empty days.
    pub mood_trend: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileView {
    pub name: String,
    pub email: String,
    pub avatar: String,
    pub member_since: String,
    pub habits_created: u32,
    pub mood_entries: u32,
    pub lifetime_steps: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationView {
    pub id: String,
    pub icon: String,
    pub title: String,
    pub message: String,
    pub time: String,
    /// Epoch milliseconds; pass back unchanged to `notification_mark_read`.
    pub timestamp: i64,
    pub is_read: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationFeedResponse {
    pub items: Vec<NotificationView>,
    pub unread_count: u32,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderSettingsView {
    pub enabled: bool,
    pub interval_index: i32,
    pub interval_minutes: u32,
    pub interval_label: String,
    pub start_hour: u32,
    pub start_minute: u32,
}

/// Alarm work the host must perform after a reminder change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlarmRequest {
    Schedule {
        trigger_at_ms: i64,
        interval_ms: i64,
        callback_id: String,
        /// Notification the host posts each time the alarm fires.
        notice_title: String,
        notice_body: String,
    },
    Cancel {
        callback_id: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderResponse {
    pub ok: bool,
    pub alarm: Option<AlarmRequest>,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepResponse {
    pub ok: bool,
    pub steps_today: i64,
    pub lifetime_steps: i64,
    pub message: String,
}

/// Lists habits after applying the once-per-day reset.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics; an empty list plus message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn habit_list() -> HabitListResponse {
    let result = with_store(|kv| {
        apply_daily_reset(kv)?;
        let service = HabitService::new(kv);
        let habits = service.list_habits().map_err(|err| err.to_string())?;
        let percentage = service.completion_percentage().map_err(|err| err.to_string())?;
        Ok((habits, percentage))
    });

    match result {
        Ok((habits, completion_percentage)) => HabitListResponse {
            message: format!("{} habit(s).", habits.len()),
            items: habits.iter().map(to_habit_item).collect(),
            completion_percentage,
        },
        Err(err) => HabitListResponse {
            items: Vec::new(),
            completion_percentage: 0,
            message: format!("habit_list failed: {err}"),
        },
    }
}

/// Unit labels offered by the add-habit form.
#[flutter_rust_bridge::frb(sync)]
pub fn habit_units() -> Vec<String> {
    HABIT_UNITS.iter().map(|unit| unit.to_string()).collect()
}

#[flutter_rust_bridge::frb(sync)]
pub fn habit_add(name: String, target: i32, unit: String) -> ActionResponse {
    let result = with_store(|kv| {
        HabitService::new(kv)
            .add_habit(&name, target, &unit, today())
            .map_err(|err| err.to_string())
    });
    ActionResponse::from_result(result, "Habit added.", |habit| Some(habit.id.clone()))
}

#[flutter_rust_bridge::frb(sync)]
pub fn habit_edit(id: String, name: String, target: i32, unit: String) -> ActionResponse {
    let result = with_store(|kv| {
        HabitService::new(kv)
            .edit_habit(&id, &name, target, &unit, today())
            .map_err(|err| err.to_string())
    });
    ActionResponse::from_result(result, "Habit updated.", |habit| Some(habit.id.clone()))
}

#[flutter_rust_bridge::frb(sync)]
pub fn habit_set_checked(id: String, checked: bool) -> ActionResponse {
    let result = with_store(|kv| {
        HabitService::new(kv)
            .set_checked(&id, checked, today())
            .map_err(|err| err.to_string())
    });
    ActionResponse::from_result(result, "Habit updated.", |habit| Some(habit.id.clone()))
}

#[flutter_rust_bridge::frb(sync)]
pub fn habit_set_progress(id: String, progress: i32) -> ActionResponse {
    let result = with_store(|kv| {
        HabitService::new(kv)
            .record_progress(&id, progress, today())
            .map_err(|err| err.to_string())
    });
    ActionResponse::from_result(result, "Progress recorded.", |habit| {
        Some(habit.id.clone())
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn habit_delete(id: String) -> ActionResponse {
    let result = with_store(|kv| {
        HabitService::new(kv)
            .delete_habit(&id)
            .map_err(|err| err.to_string())
    });
    ActionResponse::from_result(result, "Habit deleted.", |_| None)
}

#[flutter_rust_bridge::frb(sync)]
pub fn mood_catalog() -> Vec<MoodOption> {
    MOOD_CATALOG
        .iter()
        .map(|kind| MoodOption {
            emoji: kind.emoji.to_string(),
            name: kind.name.to_string(),
            score: kind.score,
        })
        .collect()
}

/// Logs a mood at the current local time.
#[flutter_rust_bridge::frb(sync)]
pub fn mood_log(emoji: String, mood_name: String, note: String) -> ActionResponse {
    let result = with_store(|kv| {
        MoodService::new(kv)
            .log_mood(&emoji, &mood_name, note.trim(), &Local::now())
            .map_err(|err| err.to_string())
    });
    ActionResponse::from_result(result, "Mood logged.", |entry| Some(entry.id.clone()))
}

/// Logs a catalog mood by name without a note (shake shortcut).
#[flutter_rust_bridge::frb(sync)]
pub fn mood_quick_log(mood_name: String) -> ActionResponse {
    let Some(kind) = find_mood(mood_name.trim()) else {
        return ActionResponse::failure(format!("unknown mood: {}", mood_name.trim()));
    };
    let result = with_store(|kv| {
        MoodService::new(kv)
            .log_quick_mood(kind, &Local::now())
            .map_err(|err| err.to_string())
    });
    ActionResponse::from_result(result, "Mood logged.", |entry| Some(entry.id.clone()))
}

/// Returns the journal newest first; empty on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn mood_list() -> Vec<MoodItem> {
    let result = with_store(|kv| {
        MoodService::new(kv)
            .list_entries()
            .map_err(|err| err.to_string())
    });
    match result {
        Ok(entries) => entries.into_iter().map(to_mood_item).collect(),
        Err(err) => {
            warn!("event=ffi_call module=ffi status=error call=mood_list error={err}");
            Vec::new()
        }
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn mood_delete(id: String) -> ActionResponse {
    let result = with_store(|kv| {
        MoodService::new(kv)
            .delete_entry(&id)
            .map_err(|err| err.to_string())
    });
    ActionResponse::from_result(result, "Mood deleted.", |_| None)
}

/// Share text for the journal, `None` when it is empty or unreadable.
#[flutter_rust_bridge::frb(sync)]
pub fn mood_share_text() -> Option<String> {
    with_store(|kv| {
        MoodService::new(kv)
            .share_text(Local::now().timestamp_millis())
            .map_err(|err| err.to_string())
    })
    .unwrap_or_default()
}

/// Home screen numbers for the current local day, after the daily reset.
#[flutter_rust_bridge::frb(sync)]
pub fn dashboard_summary() -> Option<DashboardView> {
    let result = with_store(|kv| {
        apply_daily_reset(kv)?;
        let summary = SummaryService::new(kv)
            .dashboard(today(), &Local)
            .map_err(|err| err.to_string())?;
        let trend = MoodService::new(kv)
            .weekly_trend(today(), &Local)
            .map_err(|err| err.to_string())?;
        Ok((summary, trend))
    });

    match result {
        Ok((summary, trend)) => Some(DashboardView {
            habits_completed: to_u32(summary.habits_completed),
            habits_total: to_u32(summary.habits_total),
            habit_percentage: summary.habit_percentage,
            today_mood_emoji: summary.today_mood.as_ref().map(|mood| mood.latest.emoji.clone()),
            today_mood_name: summary
                .today_mood
                .as_ref()
                .map(|mood| mood.latest.mood_name.clone()),
            today_mood_count: summary.today_mood.as_ref().map_or(0, |mood| to_u32(mood.count)),
            steps_today: summary.steps_today,
            step_goal: summary.step_goal,
            step_percentage: summary.step_percentage,
            mood_trend: trend.to_vec(),
        }),
        Err(err) => {
            warn!("event=ffi_call module=ffi status=error call=dashboard_summary error={err}");
            None
        }
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn profile_view() -> Option<ProfileView> {
    let result = with_store(|kv| {
        let profile = SessionService::new(kv)
            .profile(today())
            .map_err(|err| err.to_string())?;
        let stats = SummaryService::new(kv)
            .profile_stats()
            .map_err(|err| err.to_string())?;
        Ok((profile, stats))
    });

    match result {
        Ok((profile, stats)) => Some(ProfileView {
            name: profile.name,
            email: profile.email,
            avatar: profile.avatar,
            member_since: profile.member_since,
            habits_created: to_u32(stats.habits_created),
            mood_entries: to_u32(stats.mood_entries),
            lifetime_steps: stats.lifetime_steps,
        }),
        Err(err) => {
            warn!("event=ffi_call module=ffi status=error call=profile_view error={err}");
            None
        }
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn profile_update(name: String, email: String) -> ActionResponse {
    let result = with_store(|kv| {
        SessionService::new(kv)
            .update_profile(&name, &email, today())
            .map_err(|err| err.to_string())
    });
    ActionResponse::from_result(result, "Profile updated.", |_| None)
}

#[flutter_rust_bridge::frb(sync)]
pub fn profile_set_avatar(emoji: String) -> ActionResponse {
    let result = with_store(|kv| {
        SessionService::new(kv)
            .set_avatar(&emoji)
            .map_err(|err| err.to_string())
    });
    ActionResponse::from_result(result, "Avatar updated.", |_| None)
}

/// Checks credentials and opens a session on success.
///
/// # FFI contract
/// - `ok == false` with message `Invalid email or password` on mismatch.
#[flutter_rust_bridge::frb(sync)]
pub fn auth_login(email: String, password: String, remember_me: bool) -> ActionResponse {
    let result = with_store(|kv| {
        SessionService::new(kv)
            .login(&email, &password, remember_me)
            .map_err(|err| err.to_string())
    });
    match result {
        Ok(true) => ActionResponse::success("Login successful!", None),
        Ok(false) => ActionResponse::failure("Invalid email or password"),
        Err(err) => ActionResponse::failure(format!("auth_login failed: {err}")),
    }
}

/// Registers the local profile; failure messages are user-facing.
#[flutter_rust_bridge::frb(sync)]
pub fn auth_register(
    name: String,
    email: String,
    password: String,
    remember_me: bool,
) -> ActionResponse {
    let result = with_store(|kv| {
        SessionService::new(kv)
            .register(&name, &email, &password, remember_me, today())
            .map_err(|err| err.to_string())
    });
    ActionResponse::from_result(result, "Account created successfully!", |_| None)
}

/// Stored remember-me choice, used to pre-fill the login form.
#[flutter_rust_bridge::frb(sync)]
pub fn auth_remember_me() -> bool {
    with_store(|kv| RecordStore::new(kv).remember_me().map_err(|err| err.to_string()))
        .unwrap_or(false)
}

#[flutter_rust_bridge::frb(sync)]
pub fn auth_logout() -> ActionResponse {
    let result = with_store(|kv| SessionService::new(kv).logout().map_err(|err| err.to_string()));
    ActionResponse::from_result(result, "Logged out.", |_| None)
}

/// First screen to show: `onboarding`, `login` or `home`.
#[flutter_rust_bridge::frb(sync)]
pub fn launch_route() -> String {
    let result = with_store(|kv| {
        SessionService::new(kv)
            .launch_route()
            .map_err(|err| err.to_string())
    });
    let route = match result {
        Ok(LaunchRoute::Onboarding) => "onboarding",
        Ok(LaunchRoute::Home) => "home",
        Ok(LaunchRoute::Login) => "login",
        Err(err) => {
            warn!("event=ffi_call module=ffi status=error call=launch_route error={err}");
            "login"
        }
    };
    route.to_string()
}

#[flutter_rust_bridge::frb(sync)]
pub fn onboarding_complete() -> ActionResponse {
    let result = with_store(|kv| {
        SessionService::new(kv)
            .complete_onboarding()
            .map_err(|err| err.to_string())
    });
    ActionResponse::from_result(result, "Onboarding completed.", |_| None)
}

/// Builds the transient notification feed; nothing is persisted.
///
/// Habit nudges reflect today's reset state.
#[flutter_rust_bridge::frb(sync)]
pub fn notification_feed() -> NotificationFeedResponse {
    let result = with_store(|kv| {
        apply_daily_reset(kv)?;
        SummaryService::new(kv)
            .notification_feed(&Local::now())
            .map_err(|err| err.to_string())
    });
    match result {
        Ok(items) => NotificationFeedResponse {
            unread_count: to_u32(unread_count(&items)),
            message: format!("{} notification(s).", items.len()),
            items: items.into_iter().map(to_notification_view).collect(),
        },
        Err(err) => NotificationFeedResponse {
            items: Vec::new(),
            unread_count: 0,
            message: format!("notification_feed failed: {err}"),
        },
    }
}

/// Marks one item of a feed the host already holds as read.
///
/// The feed is not stored, so the host passes its current items back in.
#[flutter_rust_bridge::frb(sync)]
pub fn notification_mark_read(
    items: Vec<NotificationView>,
    id: String,
) -> NotificationFeedResponse {
    let items: Vec<NotificationItem> = items.into_iter().map(from_notification_view).collect();
    let updated = mark_read(&items, &id);
    NotificationFeedResponse {
        unread_count: to_u32(unread_count(&updated)),
        message: format!("{} notification(s).", updated.len()),
        items: updated.into_iter().map(to_notification_view).collect(),
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn reminder_settings() -> Option<ReminderSettingsView> {
    let result = with_store(|kv| {
        RecordStore::new(kv)
            .reminder_settings()
            .map_err(|err| err.to_string())
    });
    match result {
        Ok(settings) => Some(ReminderSettingsView {
            enabled: settings.enabled,
            interval_index: settings.interval_index,
            interval_minutes: interval_minutes_for(settings.interval_index),
            interval_label: usize::try_from(settings.interval_index)
                .ok()
                .and_then(|index| INTERVAL_LABELS.get(index))
                .copied()
                .unwrap_or("1 hour")
                .to_string(),
            start_hour: settings.start_hour,
            start_minute: settings.start_minute,
        }),
        Err(err) => {
            warn!("event=ffi_call module=ffi status=error call=reminder_settings error={err}");
            None
        }
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn reminder_set_enabled(enabled: bool) -> ReminderResponse {
    with_reminder_service(|service| service.set_enabled(enabled, &Local::now()))
}

#[flutter_rust_bridge::frb(sync)]
pub fn reminder_set_interval(interval_index: i32) -> ReminderResponse {
    with_reminder_service(|service| service.set_interval(interval_index, &Local::now()))
}

#[flutter_rust_bridge::frb(sync)]
pub fn reminder_set_start_time(hour: u32, minute: u32) -> ReminderResponse {
    with_reminder_service(|service| service.set_start_time(hour, minute, &Local::now()))
}

/// Re-applies stored reminder settings, e.g. after device boot.
#[flutter_rust_bridge::frb(sync)]
pub fn reminder_sync() -> ReminderResponse {
    with_reminder_service(|service| service.sync(&Local::now()))
}

#[flutter_rust_bridge::frb(sync)]
pub fn steps_set_enabled(enabled: bool) -> ActionResponse {
    let result = with_store(|kv| {
        StepService::new(kv)
            .set_enabled(enabled)
            .map_err(|err| err.to_string())
    });
    ActionResponse::from_result(result, "Step counter updated.", |_| None)
}

/// Handles a cumulative hardware step-counter reading.
#[flutter_rust_bridge::frb(sync)]
pub fn steps_record_hardware_total(hardware_total: i64) -> StepResponse {
    with_step_service(|service| service.record_hardware_total(hardware_total).map(|_| ()))
}

/// Handles one accelerometer sample used as a step fallback.
#[flutter_rust_bridge::frb(sync)]
pub fn steps_record_motion(x: f32, y: f32, z: f32, at_ms: i64) -> StepResponse {
    with_step_service(|service| {
        service
            .record_motion(AccelSample { x, y, z, at_ms })
            .map(|_| ())
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn steps_reset() -> StepResponse {
    with_step_service(|service| service.reset_steps())
}

#[flutter_rust_bridge::frb(sync)]
pub fn shake_set_enabled(enabled: bool) -> ActionResponse {
    let result = with_store(|kv| {
        RecordStore::new(kv)
            .set_shake_detection_enabled(enabled)
            .map_err(|err| err.to_string())
    });
    ActionResponse::from_result(result, "Shake detection updated.", |_| None)
}

/// Feeds one accelerometer sample; `true` when a shake gesture fired and
/// shake detection is enabled.
#[flutter_rust_bridge::frb(sync)]
pub fn shake_observe(x: f32, y: f32, z: f32, at_ms: i64) -> bool {
    let enabled = with_store(|kv| {
        RecordStore::new(kv)
            .shake_detection_enabled()
            .map_err(|err| err.to_string())
    })
    .unwrap_or(false);
    if !enabled {
        return false;
    }

    let mut detector = SHAKE_DETECTOR
        .lock()
        .unwrap_or_else(PoisonError::into_inner);
    detector
        .get_or_insert_with(ShakeDetector::new)
        .observe(AccelSample { x, y, z, at_ms })
}

/// Records alarm requests so the host can execute them after the call.
#[derive(Default)]
struct HostAlarmQueue {
    last: RefCell<Option<AlarmRequest>>,
}

impl AlarmService for HostAlarmQueue {
    fn schedule_repeating(&self, plan: &ReminderPlan) -> Result<(), AlarmError> {
        self.last.replace(Some(AlarmRequest::Schedule {
            trigger_at_ms: plan.trigger_at_ms,
            interval_ms: plan.repeat_interval_ms,
            callback_id: plan.callback_id.to_string(),
            notice_title: plan.notice_title.to_string(),
            notice_body: plan.notice_body.to_string(),
        }));
        Ok(())
    }

    fn cancel(&self, callback_id: &str) -> Result<(), AlarmError> {
        self.last.replace(Some(AlarmRequest::Cancel {
            callback_id: callback_id.to_string(),
        }));
        Ok(())
    }
}

fn with_reminder_service<T>(
    f: impl FnOnce(
        &ReminderService<SqliteKeyValueStore<'_>, &HostAlarmQueue>,
    ) -> ReminderResult<T>,
) -> ReminderResponse {
    let queue = HostAlarmQueue::default();
    let result = with_store(|kv| {
        let service = ReminderService::new(kv, &queue);
        f(&service).map_err(|err| err.to_string())
    });
    match result {
        Ok(_) => ReminderResponse {
            ok: true,
            alarm: queue.last.take(),
            message: "Reminder settings saved.".to_string(),
        },
        Err(err) => ReminderResponse {
            ok: false,
            alarm: None,
            message: err,
        },
    }
}

fn with_step_service(
    f: impl FnOnce(
        &mut StepService<SqliteKeyValueStore<'_>>,
    ) -> StoreResult<()>,
) -> StepResponse {
    let mut state = STEP_SENSOR_STATE
        .lock()
        .unwrap_or_else(PoisonError::into_inner);

    let result = with_store(|kv| {
        let mut service = StepService::with_state(kv, state.take().unwrap_or_default());
        let outcome = f(&mut service)
            .and_then(|()| Ok((service.steps_today()?, service.lifetime_steps()?)));
        *state = Some(service.into_state());
        outcome.map_err(|err| err.to_string())
    });

    match result {
        Ok((steps_today, lifetime_steps)) => StepResponse {
            ok: true,
            steps_today,
            lifetime_steps,
            message: String::new(),
        },
        Err(err) => StepResponse {
            ok: false,
            steps_today: 0,
            lifetime_steps: 0,
            message: err,
        },
    }
}

/// Clears yesterday's habit progress before any habit-derived view is built.
fn apply_daily_reset(kv: SqliteKeyValueStore<'_>) -> Result<(), String> {
    HabitService::new(kv)
        .run_daily_reset(today())
        .map(|_| ())
        .map_err(|err| err.to_string())
}

fn resolve_db_path() -> PathBuf {
    DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var("HEALTHFLOW_DB_PATH") {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(DB_FILE_NAME)
        })
        .clone()
}

fn with_store<T>(
    f: impl FnOnce(SqliteKeyValueStore<'_>) -> Result<T, String>,
) -> Result<T, String> {
    let db_path = resolve_db_path();
    let conn = open_db(&db_path).map_err(|err| format!("DB open failed: {err}"))?;
    f(SqliteKeyValueStore::new(&conn))
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn to_u32(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

fn to_habit_item(habit: &Habit) -> HabitItem {
    HabitItem {
        id: habit.id.clone(),
        name: habit.name.clone(),
        target: habit.target,
        unit: habit.unit.clone(),
        current_progress: habit.current_progress,
        completed: habit.completed,
    }
}

fn to_mood_item(entry: MoodEntry) -> MoodItem {
    MoodItem {
        id: entry.id,
        emoji: entry.emoji,
        mood_name: entry.mood_name,
        note: entry.note,
        timestamp: entry.timestamp,
        date: entry.date,
        time: entry.time,
    }
}

fn to_notification_view(item: NotificationItem) -> NotificationView {
    NotificationView {
        id: item.id,
        icon: item.icon,
        title: item.title,
        message: item.message,
        time: item.time,
        timestamp: item.timestamp,
        is_read: item.is_read,
    }
}

fn from_notification_view(view: NotificationView) -> NotificationItem {
    NotificationItem {
        id: view.id,
        icon: view.icon,
        title: view.title,
        message: view.message,
        time: view.time,
        timestamp: view.timestamp,
        is_read: view.is_read,
    }
}

#[cfg(test)]
mod tests {
    use super::{
        auth_login, auth_logout, auth_register, auth_remember_me, core_version,
        dashboard_summary, habit_add, habit_delete, habit_list, habit_set_checked, habit_units,
        init_logging, mood_catalog, mood_delete, mood_list, mood_log, mood_quick_log,
        notification_feed, notification_mark_read, ping, reminder_set_enabled,
        reminder_set_start_time, steps_record_hardware_total, AlarmRequest,
    };
    use healthflow_core::db::open_db;
    use healthflow_core::{RecordStore, SqliteKeyValueStore};
    use std::sync::{Mutex, MutexGuard, PoisonError};
    use std::time::{SystemTime, UNIX_EPOCH};

    // Collections are rewritten whole, so DB-backed tests run one at a time.
    static DB_TEST_LOCK: Mutex<()> = Mutex::new(());

    fn db_guard() -> MutexGuard<'static, ()> {
        DB_TEST_LOCK.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_empty_log_dir() {
        let error = init_logging("info".to_string(), String::new());
        assert!(!error.is_empty());
    }

    #[test]
    fn init_logging_rejects_unsupported_level() {
        let error = init_logging("verbose".to_string(), "tmp/logs".to_string());
        assert!(!error.is_empty());
    }

    #[test]
    fn habit_add_then_list_and_delete() {
        let _guard = db_guard();
        // Apply today's reset first so it cannot clear the check below.
        habit_list();
        let name = unique_token("habit");
        let created = habit_add(name.clone(), 2, "times".to_string());
        assert!(created.ok, "{}", created.message);
        let id = created.id.expect("habit add should return id");

        let checked = habit_set_checked(id.clone(), true);
        assert!(checked.ok, "{}", checked.message);

        let listed = habit_list();
        let item = listed
            .items
            .iter()
            .find(|item| item.id == id)
            .expect("created habit should be listed");
        assert_eq!(item.name, name);
        assert!(item.completed);
        assert_eq!(item.current_progress, 2);

        assert!(habit_delete(id.clone()).ok);
        assert!(!habit_list().items.iter().any(|item| item.id == id));
    }

    #[test]
    fn habit_add_persists_json_payload() {
        let _guard = db_guard();
        let created = habit_add(unique_token("stored"), 3, "pages".to_string());
        let id = created.id.expect("habit add should return id");

        let conn = open_db(super::resolve_db_path()).expect("open db");
        let payload: String = conn
            .query_row(
                "SELECT value FROM preferences WHERE key = 'habits'",
                [],
                |row| row.get(0),
            )
            .expect("query habits payload");
        assert!(payload.contains(&format!("\"id\":\"{id}\"")));
        assert!(habit_delete(id).ok);
    }

    #[test]
    fn habit_add_reports_validation_message() {
        let response = habit_add("   ".to_string(), 1, "times".to_string());
        assert!(!response.ok);
        assert!(response.id.is_none());
        assert!(!response.message.is_empty());
    }

    #[test]
    fn mood_log_then_list_and_delete() {
        let _guard = db_guard();
        let note = unique_token("mood-note");
        let created = mood_log("😌".to_string(), "Calm".to_string(), note.clone());
        assert!(created.ok, "{}", created.message);
        let id = created.id.expect("mood log should return id");

        let entry = mood_list()
            .into_iter()
            .find(|entry| entry.id == id)
            .expect("logged mood should be listed");
        assert_eq!(entry.note, note);
        assert!(dashboard_summary().is_some());

        assert!(mood_delete(id.clone()).ok);
        assert!(!mood_list().iter().any(|entry| entry.id == id));
    }

    #[test]
    fn quick_log_rejects_unknown_mood() {
        assert_eq!(mood_catalog().len(), 10);
        assert!(!mood_quick_log("Bored".to_string()).ok);
    }

    #[test]
    fn register_then_login_uses_same_credentials() {
        let _guard = db_guard();
        let email = format!("{}@example.com", unique_token("user"));
        let registered = auth_register(
            "Tester".to_string(),
            email.clone(),
            "secret1".to_string(),
            false,
        );
        assert!(registered.ok, "{}", registered.message);

        assert!(!auth_login(email.clone(), "wrong-one".to_string(), false).ok);
        assert!(auth_login(email, "secret1".to_string(), true).ok);
        assert!(auth_remember_me());

        assert!(auth_logout().ok);
        assert!(!auth_remember_me());
    }

    #[test]
    fn register_reports_short_password() {
        let response = auth_register(
            "Tester".to_string(),
            "short@example.com".to_string(),
            "123".to_string(),
            false,
        );
        assert!(!response.ok);
        assert_eq!(response.message, "Password must be at least 6 characters");
    }

    #[test]
    fn invalid_reminder_time_returns_no_alarm() {
        let _guard = db_guard();
        let response = reminder_set_start_time(25, 0);
        assert!(!response.ok);
        assert!(response.alarm.is_none());
        assert!(response.message.contains("25:00"));
    }

    #[test]
    fn enabled_reminder_hands_notice_text_to_host() {
        let _guard = db_guard();
        let response = reminder_set_enabled(true);
        assert!(response.ok, "{}", response.message);
        match response.alarm {
            Some(AlarmRequest::Schedule {
                callback_id,
                notice_title,
                notice_body,
                ..
            }) => {
                assert_eq!(callback_id, "hydration_reminder");
                assert_eq!(notice_title, "💧 Time to Hydrate!");
                assert_eq!(notice_body, "Don't forget to drink water and stay healthy!");
            }
            other => panic!("expected a schedule request, got {other:?}"),
        }

        let response = reminder_set_enabled(false);
        assert_eq!(
            response.alarm,
            Some(AlarmRequest::Cancel {
                callback_id: "hydration_reminder".to_string()
            })
        );
    }

    #[test]
    fn dashboard_clears_progress_left_from_a_previous_day() {
        let _guard = db_guard();
        habit_list();
        let id = habit_add(unique_token("stale"), 1, "times".to_string())
            .id
            .expect("habit add should return id");
        assert!(habit_set_checked(id.clone(), true).ok);
        {
            let conn = open_db(super::resolve_db_path()).expect("open db");
            RecordStore::new(SqliteKeyValueStore::new(&conn))
                .set_last_reset_date("2000-01-01")
                .expect("backdate reset");
        }

        assert!(dashboard_summary().is_some());

        let conn = open_db(super::resolve_db_path()).expect("open db");
        let habits = RecordStore::new(SqliteKeyValueStore::new(&conn))
            .habits()
            .expect("load habits");
        let habit = habits
            .iter()
            .find(|habit| habit.id == id)
            .expect("habit still stored");
        assert!(!habit.completed);
        assert_eq!(habit.current_progress, 0);
        drop(conn);
        assert!(habit_delete(id).ok);
    }

    #[test]
    fn mark_read_updates_the_host_feed() {
        let _guard = db_guard();
        assert!(reminder_set_enabled(true).ok);
        let feed = notification_feed();
        assert!(feed.items.iter().any(|item| item.id == "1" && !item.is_read));

        let updated = notification_mark_read(feed.items.clone(), "1".to_string());
        assert_eq!(updated.unread_count, feed.unread_count - 1);
        assert!(updated.items.iter().any(|item| item.id == "1" && item.is_read));
        assert_eq!(updated.items.len(), feed.items.len());

        assert!(reminder_set_enabled(false).ok);
    }

    #[test]
    fn habit_units_offer_the_form_choices() {
        assert_eq!(
            habit_units(),
            vec!["times", "minutes", "glasses", "steps", "pages"]
        );
    }

    #[test]
    fn step_readings_report_totals() {
        let _guard = db_guard();
        let response = steps_record_hardware_total(1_000_000);
        assert!(response.ok, "{}", response.message);
        assert!(response.lifetime_steps >= response.steps_today);
    }

    #[test]
    fn notification_feed_always_contains_encouragement() {
        let _guard = db_guard();
        let feed = notification_feed();
        assert!(feed.items.iter().any(|item| item.id == "4" && item.is_read));
    }

    fn unique_token(prefix: &str) -> String {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time went backwards")
            .as_nanos();
        format!("{prefix}-{nanos}")
    }
}
