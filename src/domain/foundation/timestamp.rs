//! Timestamp value object for immutable points in time.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Timelike, Utc};
use serde::{Deserialize, Serialize};

/// Immutable point in time, always UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Creates a timestamp for the current moment.
    ///
    /// Handlers take time from the `Clock` port instead.
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Creates a timestamp from a DateTime<Utc>.
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }

    /// Combines a wall-clock date and time, read as UTC.
    pub fn from_date_time(date: NaiveDate, time: NaiveTime) -> Self {
        Self(date.and_time(time).and_utc())
    }

    /// Returns the inner DateTime.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Returns the UTC calendar date.
    pub fn date(&self) -> NaiveDate {
        self.0.date_naive()
    }

    /// Returns the UTC wall-clock time, truncated to whole seconds.
    pub fn time_of_day(&self) -> NaiveTime {
        let time = self.0.time();
        time.with_nanosecond(0).unwrap_or(time)
    }

    /// Checks if this timestamp is before another.
    pub fn is_before(&self, other: &Timestamp) -> bool {
        self.0 < other.0
    }

    /// Checks if this timestamp is after another.
    pub fn is_after(&self, other: &Timestamp) -> bool {
        self.0 > other.0
    }

    /// Returns the duration from another timestamp to this one.
    ///
    /// Returns negative duration if other is after self.
    pub fn duration_since(&self, other: &Timestamp) -> Duration {
        self.0.signed_duration_since(other.0)
    }

    /// Creates a new timestamp by adding the specified number of seconds.
    pub fn plus_secs(&self, secs: i64) -> Self {
        Self(self.0 + Duration::seconds(secs))
    }

    /// Creates a new timestamp by subtracting the specified number of seconds.
    pub fn minus_secs(&self, secs: i64) -> Self {
        Self(self.0 - Duration::seconds(secs))
    }

    /// Creates a new timestamp by subtracting whole hours.
    pub fn minus_hours(&self, hours: i64) -> Self {
        Self(self.0 - Duration::hours(hours))
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Self::now()
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    fn at(rfc3339: &str) -> Timestamp {
        Timestamp::from_datetime(
            DateTime::parse_from_rfc3339(rfc3339)
                .unwrap()
                .with_timezone(&Utc),
        )
    }

    #[test]
    fn from_date_time_reads_wall_clock_as_utc() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        let time = NaiveTime::from_hms_opt(14, 30, 0).unwrap();
        assert_eq!(Timestamp::from_date_time(date, time), at("2024-03-09T14:30:00Z"));
    }

    #[test]
    fn time_of_day_drops_subseconds() {
        let ts = at("2024-03-09T14:30:05.750Z");
        let time = ts.time_of_day();
        assert_eq!((time.hour(), time.minute(), time.second()), (14, 30, 5));
        assert_eq!(time.nanosecond(), 0);
        assert_eq!(ts.date().day(), 9);
    }

    #[test]
    fn duration_since_is_signed() {
        let earlier = at("2024-01-15T10:00:00Z");
        let later = earlier.plus_secs(90);
        assert_eq!(later.duration_since(&earlier).num_seconds(), 90);
        assert_eq!(earlier.duration_since(&later).num_seconds(), -90);
    }

    #[test]
    fn ordering_helpers_agree_with_ord() {
        let a = at("2024-01-15T10:00:00Z");
        let b = a.plus_secs(1);
        assert!(a.is_before(&b));
        assert!(b.is_after(&a));
        assert!(a < b);
    }

    #[test]
    fn minus_hours_moves_backwards() {
        let ts = at("2024-01-15T10:00:00Z");
        assert_eq!(ts.minus_hours(25), at("2024-01-14T09:00:00Z"));
        assert_eq!(ts.minus_secs(60), at("2024-01-15T09:59:00Z"));
    }

    #[test]
    fn serializes_as_rfc3339_string() {
        let json = serde_json::to_string(&at("2024-01-15T10:30:00Z")).unwrap();
        assert!(json.contains("2024-01-15T10:30:00"));

        let back: Timestamp = serde_json::from_str(&json).unwrap();
        assert_eq!(back.as_datetime().year(), 2024);
    }
}
