//! Preference keys. Values must stay stable: they address existing device data.

pub const HABITS: &str = "habits";
pub const MOOD_ENTRIES: &str = "mood_entries";
pub const NOTIFICATIONS: &str = "notifications";
pub const LAST_RESET_DATE: &str = "last_reset_date";

pub const HYDRATION_ENABLED: &str = "hydration_enabled";
pub const REMINDER_INTERVAL: &str = "reminder_interval";
pub const REMINDER_START_HOUR: &str = "reminder_start_hour";
pub const REMINDER_START_MINUTE: &str = "reminder_start_minute";

pub const STEP_COUNTER_ENABLED: &str = "step_counter_enabled";
pub const STEP_COUNT: &str = "step_count";
pub const TOTAL_LIFETIME_STEPS: &str = "total_lifetime_steps";
pub const SHAKE_DETECTION_ENABLED: &str = "shake_detection_enabled";

pub const USER_NAME: &str = "user_name";
pub const USER_EMAIL: &str = "user_email";
pub const USER_PASSWORD: &str = "user_password";
pub const USER_AVATAR: &str = "user_avatar";
pub const MEMBER_SINCE: &str = "member_since";
pub const IS_LOGGED_IN: &str = "is_logged_in";
pub const ACTIVE_USER_EMAIL: &str = "active_user_email";
pub const REMEMBER_ME: &str = "remember_me";
pub const ONBOARDING_COMPLETED: &str = "onboarding_completed";
pub const FIRST_LAUNCH: &str = "first_launch";
