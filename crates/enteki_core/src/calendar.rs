//! Month grid aggregation over per-day records.
//!
//! # Responsibility
//! - Lay out a month as a fixed 6x7 Sunday-first grid.
//! - Attach per-day presence, stand count and total score.
//! - Provide month navigation with year wraparound.
//!
//! # Invariants
//! - Every grid has exactly 6 rows of 7 cells, even when the last row is blank.
//! - Non-blank cells are exactly the days of the month, each once, in order.
//! - Aggregates are recomputed from records on every build; nothing is cached.
//! - Cursor years stay within the `DateKey` year range; navigation stops at
//!   `0000-01` and `9999-12`.

use crate::model::record_key::{DateKey, MAX_YEAR, MIN_YEAR};
use crate::repo::record_repo::DayRecords;
use chrono::{Datelike, NaiveDate};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub const GRID_ROWS: usize = 6;
pub const GRID_COLUMNS: usize = 7;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CalendarError {
    InvalidMonth { year: i32, month0: u32 },
}

impl Display for CalendarError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidMonth { year, month0 } => {
                write!(f, "invalid calendar month: year {year}, month index {month0}")
            }
        }
    }
}

impl Error for CalendarError {}

/// A `(year, month)` pair with 0-based month, always a representable month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthCursor {
    year: i32,
    month0: u32,
}

impl MonthCursor {
    /// # Errors
    /// - `InvalidMonth` when `month0 > 11` or the year is outside the
    ///   supported calendar range.
    pub fn new(year: i32, month0: u32) -> Result<Self, CalendarError> {
        if month0 > 11 || !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            return Err(CalendarError::InvalidMonth { year, month0 });
        }
        Ok(Self { year, month0 })
    }

    /// Month containing `date`, pinned to the first or last supported month
    /// when its year is out of range.
    pub fn containing(date: NaiveDate) -> Self {
        match date.year() {
            year if year < MIN_YEAR => Self::FIRST,
            year if year > MAX_YEAR => Self::LAST,
            year => Self {
                year,
                month0: date.month0(),
            },
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    /// 0-based month (January = 0).
    pub fn month0(&self) -> u32 {
        self.month0
    }

    const FIRST: Self = Self {
        year: MIN_YEAR,
        month0: 0,
    };
    const LAST: Self = Self {
        year: MAX_YEAR,
        month0: 11,
    };

    /// Previous month; January rolls back to December of the prior year.
    pub fn prev(self) -> Self {
        if self == Self::FIRST {
            self
        } else if self.month0 == 0 {
            Self {
                year: self.year - 1,
                month0: 11,
            }
        } else {
            Self {
                year: self.year,
                month0: self.month0 - 1,
            }
        }
    }

    /// Next month; December rolls over to January of the following year.
    pub fn next(self) -> Self {
        if self == Self::LAST {
            self
        } else if self.month0 == 11 {
            Self {
                year: self.year + 1,
                month0: 0,
            }
        } else {
            Self {
                year: self.year,
                month0: self.month0 + 1,
            }
        }
    }

    /// `YYYY-MM` heading text.
    pub fn label(&self) -> String {
        format!("{:04}-{:02}", self.year, self.month0 + 1)
    }

    fn first_day(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month0 + 1, 1)
    }

    /// Number of days in this month.
    pub fn days_in_month(&self) -> u32 {
        (28..=31)
            .rev()
            .find(|day| NaiveDate::from_ymd_opt(self.year, self.month0 + 1, *day).is_some())
            .unwrap_or(28)
    }

    /// Weekday of the 1st, 0 = Sunday .. 6 = Saturday.
    pub fn first_weekday(&self) -> u32 {
        self.first_day()
            .map_or(0, |date| date.weekday().num_days_from_sunday())
    }
}

/// One grid position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CalendarCell {
    /// `None` for blank leading/trailing cells.
    pub date: Option<DateKey>,
    /// Day of month for non-blank cells.
    pub day: Option<u32>,
    pub has_records: bool,
    pub stand_count: usize,
    /// Sum of all shot scores that day; `0` when there are no records.
    pub total_score: u32,
}

impl CalendarCell {
    pub fn is_blank(&self) -> bool {
        self.date.is_none()
    }
}

/// Fixed-height month grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarGrid {
    month: MonthCursor,
    rows: [[CalendarCell; GRID_COLUMNS]; GRID_ROWS],
}

impl CalendarGrid {
    pub fn month(&self) -> MonthCursor {
        self.month
    }

    pub fn rows(&self) -> &[[CalendarCell; GRID_COLUMNS]; GRID_ROWS] {
        &self.rows
    }

    /// Cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = &CalendarCell> + '_ {
        self.rows.iter().flatten()
    }

    /// Cell for `date`, if it falls in this month.
    pub fn cell_for(&self, date: &DateKey) -> Option<&CalendarCell> {
        self.cells().find(|cell| cell.date.as_ref() == Some(date))
    }

    /// Sum of day totals across the month.
    pub fn month_total(&self) -> u32 {
        self.cells().map(|cell| cell.total_score).sum()
    }
}

/// Builds the 6x7 grid for `month` from one mode's records.
pub fn build_grid(month: MonthCursor, records: &impl DayRecords) -> CalendarGrid {
    let first_weekday = i64::from(month.first_weekday());
    let days_in_month = i64::from(month.days_in_month());

    let rows = std::array::from_fn(|week| {
        std::array::from_fn(|weekday| {
            let day_number = 1 - first_weekday + (GRID_COLUMNS * week + weekday) as i64;
            if day_number < 1 || day_number > days_in_month {
                return CalendarCell::default();
            }

            let day = day_number as u32;
            let Ok(date) = DateKey::from_ymd(month.year, month.month0, day) else {
                return CalendarCell::default();
            };
            let stands = records.stands_on(&date);
            let has_records = !stands.is_empty();
            let total_score = if has_records {
                records.day_total(&date)
            } else {
                0
            };

            CalendarCell {
                date: Some(date),
                day: Some(day),
                has_records,
                stand_count: stands.len(),
                total_score,
            }
        })
    });

    CalendarGrid { month, rows }
}
