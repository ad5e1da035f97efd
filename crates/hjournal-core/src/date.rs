//! Calendar dates as they appear in a cooked journal.
//!
//! Journal dates are written as `YYYY-MM-DD`, `YYYY/MM/DD` or `YYYY.MM.DD`,
//! and the year may be omitted entirely (`MM/DD`). Once the year has been
//! resolved a [`Date`] holds plain numbers and is guaranteed to name a real
//! calendar day.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The separator used between date components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateDelimiter {
    /// `-`
    Dash,
    /// `/`
    Slash,
    /// `.`
    Dot,
}

impl DateDelimiter {
    /// Parse a delimiter character.
    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            '-' => Some(Self::Dash),
            '/' => Some(Self::Slash),
            '.' => Some(Self::Dot),
            _ => None,
        }
    }

    /// The delimiter character.
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            Self::Dash => '-',
            Self::Slash => '/',
            Self::Dot => '.',
        }
    }
}

impl fmt::Display for DateDelimiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// A fully resolved calendar date.
///
/// # Examples
///
/// ```
/// use hjournal_core::Date;
///
/// let date = Date::new(2024, 2, 29).unwrap();
/// assert_eq!(date.to_string(), "2024-02-29");
///
/// // 2023 is not a leap year
/// assert!(Date::new(2023, 2, 29).is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Date {
    /// Year, four or five digits in source.
    pub year: i32,
    /// Month, 1-12.
    pub month: u32,
    /// Day of month, 1-31.
    pub day: u32,
}

impl Date {
    /// Create a date, returning `None` unless it names a real calendar day.
    #[must_use]
    pub fn new(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(|_| Self { year, month, day })
    }

    /// Convert to a chrono date.
    ///
    /// Always succeeds for values built with [`Date::new`]; returns `None`
    /// for a hand-assembled invalid value.
    #[must_use]
    pub fn to_naive_date(self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, self.day)
    }

    /// Check whether a month/day pair exists in at least one year.
    ///
    /// Used for dates written without a year, where `02/29` must be accepted
    /// even though the year is not known yet.
    #[must_use]
    pub fn is_valid_month_day(month: u32, day: u32) -> bool {
        // 2000 is a leap year, so it admits every month/day combination
        NaiveDate::from_ymd_opt(2000, month, day).is_some()
    }
}

impl From<NaiveDate> for Date {
    fn from(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
            day: date.day(),
        }
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}
