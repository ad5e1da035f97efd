//! Pipeline options.

use chrono::Datelike;
use serde::{Deserialize, Serialize};

/// What to do when a journal item fails to parse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorPolicy {
    /// Stop at the first parse error.
    #[default]
    Abort,
    /// Log the error, drop the item and continue at the next line.
    SkipItem,
}

/// Options for [`crate::parse_to_cooked_with`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Year for dates written without one, until a year directive appears.
    pub default_year: i32,
    /// Parse error handling.
    pub error_policy: ErrorPolicy,
}

impl Default for Options {
    /// Uses the current local calendar year and [`ErrorPolicy::Abort`].
    fn default() -> Self {
        Self {
            default_year: current_year(),
            error_policy: ErrorPolicy::default(),
        }
    }
}

impl Options {
    /// Create options with the current year and aborting on errors.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the fallback year.
    #[must_use]
    pub const fn with_default_year(mut self, year: i32) -> Self {
        self.default_year = year;
        self
    }

    /// Set the parse error policy.
    #[must_use]
    pub const fn with_error_policy(mut self, policy: ErrorPolicy) -> Self {
        self.error_policy = policy;
        self
    }
}

/// The current year in the local time zone.
pub(crate) fn current_year() -> i32 {
    chrono::Local::now().year()
}
