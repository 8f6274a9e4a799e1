//! Calendar-day and display-format helpers shared by policies and services.
//!
//! All "day" notions are local calendar days in the supplied time zone.
//! Timestamps are Unix epoch milliseconds.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use std::fmt::Display;

/// Storage format of `last_reset_date` and `Habit::last_updated`.
pub const DATE_KEY_FORMAT: &str = "%Y-%m-%d";
/// Display format of `MoodEntry::date`.
pub const ENTRY_DATE_FORMAT: &str = "%b %d, %Y";
/// Display format of `MoodEntry::time` and notification time labels.
pub const CLOCK_TIME_FORMAT: &str = "%I:%M %p";
/// Display format of the stored member-since label.
pub const MEMBER_SINCE_FORMAT: &str = "%b %Y";

/// Formats a calendar date as `YYYY-MM-DD`.
pub fn date_key(date: NaiveDate) -> String {
    date.format(DATE_KEY_FORMAT).to_string()
}

/// Returns the first instant of `date` in `tz`, in epoch milliseconds.
///
/// Days whose local midnight is skipped by a DST transition start at the
/// first representable hour.
pub fn start_of_day_ms<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> i64 {
    let midnight = date.and_time(NaiveTime::default());
    (0..24)
        .filter_map(|hour| {
            tz.from_local_datetime(&(midnight + Duration::hours(hour)))
                .earliest()
        })
        .map(|instant| instant.timestamp_millis())
        .next()
        .unwrap_or_else(|| midnight.and_utc().timestamp_millis())
}

/// Returns inclusive `(start_ms, end_ms)` bounds of the local day `date`.
pub fn day_bounds<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> (i64, i64) {
    let start = start_of_day_ms(date, tz);
    let end = match date.succ_opt() {
        Some(next) => start_of_day_ms(next, tz) - 1,
        None => i64::MAX,
    };
    (start, end)
}

/// Maps an epoch-millisecond timestamp to its local calendar date.
pub fn local_date_of<Tz: TimeZone>(timestamp_ms: i64, tz: &Tz) -> Option<NaiveDate> {
    DateTime::<Utc>::from_timestamp_millis(timestamp_ms)
        .map(|utc| utc.with_timezone(tz).date_naive())
}

pub fn entry_date_label<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: Display,
{
    at.format(ENTRY_DATE_FORMAT).to_string()
}

pub fn clock_time_label<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: Display,
{
    at.format(CLOCK_TIME_FORMAT).to_string()
}

pub fn member_since_label(date: NaiveDate) -> String {
    date.format(MEMBER_SINCE_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::{date_key, day_bounds, local_date_of, member_since_label};
    use chrono::{FixedOffset, NaiveDate, TimeZone, Utc};

    #[test]
    fn date_key_is_zero_padded() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        assert_eq!(date_key(date), "2024-03-07");
        assert_eq!(member_since_label(date), "Mar 2024");
    }

    #[test]
    fn day_bounds_cover_the_whole_local_day() {
        let tz = FixedOffset::east_opt(2 * 3600).unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 5, 10).unwrap();
        let (start, end) = day_bounds(date, &tz);

        let expected_start = tz.with_ymd_and_hms(2024, 5, 10, 0, 0, 0).unwrap();
        assert_eq!(start, expected_start.timestamp_millis());
        assert_eq!(end - start, 24 * 3600 * 1000 - 1);
        assert_eq!(local_date_of(end, &tz), Some(date));
        assert_ne!(local_date_of(end + 1, &tz), Some(date));
    }

    #[test]
    fn local_date_respects_offset() {
        let instant = Utc.with_ymd_and_hms(2024, 5, 10, 23, 30, 0).unwrap();
        let tokyo = FixedOffset::east_opt(9 * 3600).unwrap();
        assert_eq!(
            local_date_of(instant.timestamp_millis(), &tokyo),
            NaiveDate::from_ymd_opt(2024, 5, 11)
        );
    }
}
