//! Week-anchored period keys.
//!
//! # Responsibility
//! - Identify one recurring week by its Monday start date.
//! - Provide the canonical `YYYY-MM-DD` text form used in storage.
//!
//! # Invariants
//! - A `PeriodKey` always wraps a Monday.

use chrono::{Datelike, Days, NaiveDate, Utc, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

const PERIOD_KEY_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PeriodKeyError {
    #[error("invalid period key `{0}`; expected YYYY-MM-DD")]
    Malformed(String),
    #[error("period key {0} is a {1}; weeks start on Monday")]
    NotWeekStart(NaiveDate, Weekday),
}

/// Identifier of one week, keyed by its Monday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PeriodKey(NaiveDate);

impl PeriodKey {
    /// Wraps a date that must already be a Monday.
    pub fn from_week_start(date: NaiveDate) -> Result<Self, PeriodKeyError> {
        let weekday = date.weekday();
        if weekday != Weekday::Mon {
            return Err(PeriodKeyError::NotWeekStart(date, weekday));
        }
        Ok(Self(date))
    }

    /// Returns the week containing `date`.
    pub fn containing(date: NaiveDate) -> Self {
        let offset = u64::from(date.weekday().num_days_from_monday());
        // Monday of the first representable week is the only underflow case.
        Self(date.checked_sub_days(Days::new(offset)).unwrap_or(date))
    }

    /// Returns the week containing today's UTC date.
    pub fn current() -> Self {
        Self::containing(Utc::now().date_naive())
    }

    pub fn week_start(&self) -> NaiveDate {
        self.0
    }

    /// The following week.
    pub fn next(&self) -> Self {
        Self(self.0.checked_add_days(Days::new(7)).unwrap_or(self.0))
    }
}

impl Display for PeriodKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format(PERIOD_KEY_FORMAT))
    }
}

impl FromStr for PeriodKey {
    type Err = PeriodKeyError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let date = NaiveDate::parse_from_str(value.trim(), PERIOD_KEY_FORMAT)
            .map_err(|_| PeriodKeyError::Malformed(value.to_string()))?;
        Self::from_week_start(date)
    }
}

impl TryFrom<String> for PeriodKey {
    type Error = PeriodKeyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PeriodKey> for String {
    fn from(value: PeriodKey) -> Self {
        value.to_string()
    }
}
