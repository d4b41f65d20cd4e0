//! Wall-clock schedule of a session.
//!
//! Dates arrive from many client locales, so parsing is permissive:
//! ISO `YYYY-MM-DD` (anything after the first ten characters is ignored),
//! then `MM/DD/YYYY`, then `DD/MM/YYYY` when the month/day reading is
//! impossible, and finally a full RFC 3339 timestamp. All values are read
//! as UTC.

use chrono::{DateTime, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{Timestamp, ValidationError};

/// Scheduled date, start time and optional end time.
///
/// # Invariants
///
/// - `end_time`, when present, is strictly after `start_time`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    date: NaiveDate,
    start_time: NaiveTime,
    end_time: Option<NaiveTime>,
}

impl Schedule {
    /// Creates a schedule, validating the end/start ordering.
    pub fn new(
        date: NaiveDate,
        start_time: NaiveTime,
        end_time: Option<NaiveTime>,
    ) -> Result<Self, ValidationError> {
        if let Some(end) = end_time {
            if end <= start_time {
                return Err(ValidationError::invalid_format(
                    "end_time",
                    "end time must be later than start time",
                ));
            }
        }
        Ok(Self {
            date,
            start_time,
            end_time,
        })
    }

    /// Parses a schedule from client-supplied strings.
    pub fn parse(date: &str, start_time: &str, end_time: Option<&str>) -> Result<Self, ValidationError> {
        let date = parse_session_date(date)?;
        let start = parse_time_of_day("start_time", start_time)?;
        let end = match end_time.map(str::trim).filter(|s| !s.is_empty()) {
            Some(raw) => Some(parse_time_of_day("end_time", raw)?),
            None => None,
        };
        Self::new(date, start, end)
    }

    /// Schedule for a session started immediately: today, at the current time.
    pub fn starting_at(now: Timestamp, end_time: Option<NaiveTime>) -> Result<Self, ValidationError> {
        Self::new(now.date(), now.time_of_day(), end_time)
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn start_time(&self) -> NaiveTime {
        self.start_time
    }

    pub fn end_time(&self) -> Option<NaiveTime> {
        self.end_time
    }

    /// Point in time at which the session should start.
    pub fn starts_at(&self) -> Timestamp {
        Timestamp::from_date_time(self.date, self.start_time)
    }

    /// Point in time at which the session should end, if it has an end time.
    pub fn ends_at(&self) -> Option<Timestamp> {
        self.end_time
            .map(|end| Timestamp::from_date_time(self.date, end))
    }

    /// Returns a copy with any provided component replaced, revalidated.
    pub fn with_changes(
        &self,
        date: Option<NaiveDate>,
        start_time: Option<NaiveTime>,
        end_time: Option<NaiveTime>,
    ) -> Result<Self, ValidationError> {
        Self::new(
            date.unwrap_or(self.date),
            start_time.unwrap_or(self.start_time),
            end_time.or(self.end_time),
        )
    }
}

/// Parses a session date in any of the accepted formats.
pub fn parse_session_date(input: &str) -> Result<NaiveDate, ValidationError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(ValidationError::empty_field("session_date"));
    }

    if looks_like_iso_date(input) {
        return NaiveDate::parse_from_str(&input[..10], "%Y-%m-%d").map_err(|_| invalid_date(input));
    }

    if let Some((first, second, year)) = split_slashed(input) {
        return NaiveDate::from_ymd_opt(year, first, second)
            .or_else(|| NaiveDate::from_ymd_opt(year, second, first))
            .ok_or_else(|| invalid_date(input));
    }

    DateTime::parse_from_rfc3339(input)
        .map(|dt| dt.date_naive())
        .map_err(|_| invalid_date(input))
}

/// Parses `HH:MM` or `HH:MM:SS`.
pub fn parse_time_of_day(field: &str, input: &str) -> Result<NaiveTime, ValidationError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(ValidationError::empty_field(field));
    }
    NaiveTime::parse_from_str(input, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(input, "%H:%M"))
        .map_err(|_| {
            ValidationError::invalid_format(field, format!("'{}' is not a valid HH:MM time", input))
        })
}

fn invalid_date(input: &str) -> ValidationError {
    ValidationError::invalid_format(
        "session_date",
        format!("'{}' is not a valid date, use YYYY-MM-DD", input),
    )
}

fn looks_like_iso_date(input: &str) -> bool {
    let bytes = input.as_bytes();
    bytes.len() >= 10
        && bytes[..4].iter().all(u8::is_ascii_digit)
        && bytes[4] == b'-'
        && bytes[5..7].iter().all(u8::is_ascii_digit)
        && bytes[7] == b'-'
        && bytes[8..10].iter().all(u8::is_ascii_digit)
}

/// Splits `A/B/YYYY` where A and B are one or two digits.
fn split_slashed(input: &str) -> Option<(u32, u32, i32)> {
    let mut parts = input.split('/');
    let first = parts.next()?;
    let second = parts.next()?;
    let year = parts.next()?;
    if parts.next().is_some() {
        return None;
    }

    let short = |s: &str| (1..=2).contains(&s.len()) && s.bytes().all(|b| b.is_ascii_digit());
    if !short(first) || !short(second) || year.len() != 4 || !year.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    Some((first.parse().ok()?, second.parse().ok()?, year.parse().ok()?))
}
