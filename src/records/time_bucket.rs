use crate::warehouse::TimeBucket;
use chrono::{DateTime, Datelike, Timelike, Utc};

/// Text form of an instant as stored in `time.start_time` and
/// `songplays.start_time`.
const START_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// Converts a millisecond epoch timestamp into a UTC instant.
pub fn instant_from_millis(ts_millis: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp_millis(ts_millis)
}

pub fn format_start_time(instant: &DateTime<Utc>) -> String {
    instant.format(START_TIME_FORMAT).to_string()
}

/// Gregorian decomposition of an instant. Week is the ISO-8601 week number
/// and weekday counts from Monday = 0.
pub fn time_bucket(instant: &DateTime<Utc>) -> TimeBucket {
    TimeBucket {
        start_time: format_start_time(instant),
        hour: instant.hour(),
        day: instant.day(),
        week: instant.iso_week().week(),
        month: instant.month(),
        year: instant.year(),
        weekday: instant.weekday().num_days_from_monday(),
    }
}
