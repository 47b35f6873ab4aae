//! Keys that partition the record space: session mode and calendar date.
//!
//! # Invariants
//! - Practice and competition records never merge.
//! - `DateKey` text is zero-padded `YYYY-MM-DD` and names a real date, so
//!   string equality is date equality and string order is date order.
//! - Key years stay within `MIN_YEAR..=MAX_YEAR`, so every key survives a
//!   reload through `DateKey::parse`.

use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Earliest year a `DateKey` can carry.
pub const MIN_YEAR: i32 = 0;
/// Latest year a `DateKey` can carry.
pub const MAX_YEAR: i32 = 9999;

static DATE_KEY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([0-9]{4})-([0-9]{2})-([0-9]{2})$").expect("valid date key regex"));

/// Session category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    Practice,
    Competition,
}

impl Mode {
    pub const ALL: [Self; 2] = [Self::Practice, Self::Competition];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Practice => "practice",
            Self::Competition => "competition",
        }
    }
}

impl Default for Mode {
    fn default() -> Self {
        Self::Practice
    }
}

impl Display for Mode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateKeyError {
    /// Text is not shaped like `YYYY-MM-DD`.
    Malformed(String),
    /// Shape is fine but no such calendar date exists.
    InvalidDate(String),
    /// Year has no four-digit representation.
    YearOutOfRange(i32),
}

impl Display for DateKeyError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Malformed(value) => write!(f, "date key `{value}` is not YYYY-MM-DD"),
            Self::InvalidDate(value) => write!(f, "date key `{value}` is not a calendar date"),
            Self::YearOutOfRange(year) => write!(
                f,
                "year {year} is outside the supported range {MIN_YEAR}..={MAX_YEAR}"
            ),
        }
    }
}

impl Error for DateKeyError {}

/// Per-day record key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DateKey(String);

impl DateKey {
    /// Builds the key for a calendar date.
    ///
    /// # Errors
    /// - `YearOutOfRange` when the year is outside `MIN_YEAR..=MAX_YEAR`.
    pub fn from_date(date: NaiveDate) -> Result<Self, DateKeyError> {
        if !(MIN_YEAR..=MAX_YEAR).contains(&date.year()) {
            return Err(DateKeyError::YearOutOfRange(date.year()));
        }
        Ok(Self::format(date))
    }

    /// Builds the key for `date`, pinned to the first or last supported day
    /// when its year is out of range.
    pub fn from_date_clamped(date: NaiveDate) -> Self {
        let pinned = if date.year() < MIN_YEAR {
            NaiveDate::from_ymd_opt(MIN_YEAR, 1, 1)
        } else if date.year() > MAX_YEAR {
            NaiveDate::from_ymd_opt(MAX_YEAR, 12, 31)
        } else {
            None
        };
        Self::format(pinned.unwrap_or(date))
    }

    /// Builds a key from a year, a 0-based month and a 1-based day.
    pub fn from_ymd(year: i32, month0: u32, day: u32) -> Result<Self, DateKeyError> {
        let month = month0.saturating_add(1);
        let date = NaiveDate::from_ymd_opt(year, month, day)
            .ok_or_else(|| DateKeyError::InvalidDate(format!("{year:04}-{month:02}-{day:02}")))?;
        Self::from_date(date)
    }

    /// Parses strict zero-padded `YYYY-MM-DD` text.
    pub fn parse(value: &str) -> Result<Self, DateKeyError> {
        let captures = DATE_KEY_RE
            .captures(value)
            .ok_or_else(|| DateKeyError::Malformed(value.to_string()))?;
        let field = |index: usize| captures[index].parse::<u32>().unwrap_or(0);
        let year = captures[1].parse::<i32>().unwrap_or(0);

        NaiveDate::from_ymd_opt(year, field(2), field(3))
            .map(Self::format)
            .ok_or_else(|| DateKeyError::InvalidDate(value.to_string()))
    }

    fn format(date: NaiveDate) -> Self {
        Self(format!(
            "{:04}-{:02}-{:02}",
            date.year(),
            date.month(),
            date.day()
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Calendar date this key denotes.
    pub fn date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.0, "%Y-%m-%d").ok()
    }
}

impl Display for DateKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<NaiveDate> for DateKey {
    type Error = DateKeyError;

    fn try_from(value: NaiveDate) -> Result<Self, Self::Error> {
        Self::from_date(value)
    }
}

impl TryFrom<&str> for DateKey {
    type Error = DateKeyError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

#[cfg(test)]
mod tests {
    use super::{DateKey, DateKeyError, Mode};
    use chrono::NaiveDate;

    #[test]
    fn from_ymd_uses_zero_based_month_and_pads() {
        let key = DateKey::from_ymd(2024, 0, 5).unwrap();
        assert_eq!(key.as_str(), "2024-01-05");
        assert_eq!(key.date(), NaiveDate::from_ymd_opt(2024, 1, 5));
    }

    #[test]
    fn from_ymd_rejects_impossible_days() {
        assert!(matches!(
            DateKey::from_ymd(2023, 1, 29),
            Err(DateKeyError::InvalidDate(_))
        ));
    }

    #[test]
    fn parse_requires_padding_and_real_dates() {
        assert_eq!(DateKey::parse("2024-02-29").unwrap().as_str(), "2024-02-29");
        assert!(matches!(
            DateKey::parse("2024-2-9"),
            Err(DateKeyError::Malformed(_))
        ));
        assert!(matches!(
            DateKey::parse("2023-02-29"),
            Err(DateKeyError::InvalidDate(_))
        ));
        assert!(matches!(
            DateKey::parse(" 2024-02-01"),
            Err(DateKeyError::Malformed(_))
        ));
    }

    #[test]
    fn five_digit_and_negative_years_are_rejected() {
        let far_future = NaiveDate::from_ymd_opt(10000, 1, 1).unwrap();
        let before_epoch = NaiveDate::from_ymd_opt(-1, 12, 31).unwrap();
        assert_eq!(
            DateKey::from_date(far_future).unwrap_err(),
            DateKeyError::YearOutOfRange(10000)
        );
        assert_eq!(
            DateKey::from_ymd(-1, 11, 31).unwrap_err(),
            DateKeyError::YearOutOfRange(-1)
        );

        let last = DateKey::from_date_clamped(far_future);
        assert_eq!(last.as_str(), "9999-12-31");
        assert_eq!(DateKey::parse(last.as_str()).unwrap(), last);
        assert_eq!(
            DateKey::from_date_clamped(before_epoch).as_str(),
            "0000-01-01"
        );
    }

    #[test]
    fn keys_order_like_dates() {
        let earlier = DateKey::parse("2023-12-31").unwrap();
        let later = DateKey::parse("2024-01-01").unwrap();
        assert!(earlier < later);
    }

    #[test]
    fn mode_wire_names() {
        assert_eq!(
            serde_json::to_value(Mode::Competition).unwrap(),
            serde_json::json!("competition")
        );
        assert_eq!(Mode::default(), Mode::Practice);
    }
}
