//! Wall-clock arithmetic on minutes since midnight.
//!
//! Every time of day crossing the library boundary is a 24-hour `"HH:MM"`
//! string. Internally it is a [`MinuteOfDay`], and absolute instants are
//! `NaiveDateTime`s placed on a single reference calendar date, so no
//! timezone or implicit local clock is ever consulted.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

/// Minutes in one calendar day.
pub const MINUTES_PER_DAY: i64 = 24 * 60;

/// A time of day with minute resolution (00:00 ..= 23:59).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct MinuteOfDay(u16);

impl MinuteOfDay {
    pub const MIDNIGHT: Self = Self(0);

    /// Build from hour and minute, `None` if either is out of range.
    pub const fn new(hour: u32, minute: u32) -> Option<Self> {
        if hour < 24 && minute < 60 {
            Some(Self((hour * 60 + minute) as u16))
        } else {
            None
        }
    }

    /// Wrap any signed minute count into the day (`mod 1440`).
    ///
    /// Negative counts land on the previous day: `-60` is `23:00`.
    pub fn wrapping(minutes: i64) -> Self {
        Self(minutes.rem_euclid(MINUTES_PER_DAY) as u16)
    }

    /// Parse a 24-hour `"HH:MM"` string. A single-digit hour is accepted.
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        let invalid = || ValidationError::InvalidTimeOfDay {
            value: value.to_string(),
        };
        let (hour, minute) = value.trim().split_once(':').ok_or_else(invalid)?;
        let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
        if !all_digits(hour) || hour.len() > 2 || minute.len() != 2 || !all_digits(minute) {
            return Err(invalid());
        }
        let hour: u32 = hour.parse().map_err(|_| invalid())?;
        let minute: u32 = minute.parse().map_err(|_| invalid())?;
        Self::new(hour, minute).ok_or_else(invalid)
    }

    /// Time of day of an absolute timestamp, seconds discarded.
    pub fn of(timestamp: NaiveDateTime) -> Self {
        Self((timestamp.hour() * 60 + timestamp.minute()) as u16)
    }

    /// Minutes since midnight.
    pub fn minutes(self) -> i64 {
        i64::from(self.0)
    }

    pub fn hour(self) -> u32 {
        u32::from(self.0) / 60
    }

    pub fn minute(self) -> u32 {
        u32::from(self.0) % 60
    }

    /// Shift by a signed number of minutes, wrapping around midnight.
    pub fn add_minutes(self, delta: i64) -> Self {
        Self::wrapping(self.minutes() + delta)
    }

    /// Place this time of day on a calendar date.
    pub fn on(self, date: NaiveDate) -> NaiveDateTime {
        date.and_time(NaiveTime::MIN) + Duration::minutes(self.minutes())
    }
}

impl fmt::Display for MinuteOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl FromStr for MinuteOfDay {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for MinuteOfDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MinuteOfDay {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// Format a signed minute count as `"HH:MM"`, wrapped into the day.
pub fn format_hhmm(total_minutes: i64) -> String {
    MinuteOfDay::wrapping(total_minutes).to_string()
}

/// Compact signed offset such as `+2h`, `-10h`, `+1h30m` or `-45m`.
pub fn format_offset(minutes: i64) -> String {
    let sign = if minutes < 0 { '-' } else { '+' };
    let abs = minutes.unsigned_abs();
    let (hours, rest) = (abs / 60, abs % 60);
    match (hours, rest) {
        (0, m) => format!("{sign}{m}m"),
        (h, 0) => format!("{sign}{h}h"),
        (h, m) => format!("{sign}{h}h{m}m"),
    }
}
