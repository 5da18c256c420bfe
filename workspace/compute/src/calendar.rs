//! Calendar arithmetic: month boundaries, elapsed/remaining days and the
//! recent-vs-prior comparison windows.
//!
//! Every function takes its reference date as an explicit parameter; nothing
//! in this module reads the process clock.

use chrono::{Datelike, Duration, NaiveDate};
use std::fmt;

/// A calendar month, the unit of trend analysis.
///
/// Ordering is chronological and `Display` renders the `YYYY-MM` period key
/// used in report mappings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Month {
    pub year: i32,
    pub month: u32,
}

impl Month {
    /// The month a date falls in.
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// The following month, rolling December over into January.
    pub fn next(self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    /// The preceding month, rolling January back into December.
    pub fn prev(self) -> Self {
        if self.month == 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    /// The first calendar day of this month.
    pub fn first_day(self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap()
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Returns the number of days in the given month using chrono.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    // First day of the next month, then one day back
    let first_day_next_month = Month { year, month }.next().first_day();
    let last_day_current_month = first_day_next_month.pred_opt().unwrap();

    last_day_current_month.day()
}

/// Returns the half-open bounds `[first_of_month, first_of_next_month)` of
/// the month the reference date falls in.
pub fn month_bounds(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let month = Month::from_date(today);
    (month.first_day(), month.next().first_day())
}

/// Returns `(days_passed, days_remaining)` relative to the reference date.
///
/// `days_passed` is the reference date's day-of-month; `days_remaining` never
/// goes negative.
pub fn elapsed_and_remaining_days(today: NaiveDate) -> (u32, u32) {
    let days_passed = today.day();
    let days_remaining = days_in_month(today.year(), today.month()).saturating_sub(days_passed);
    (days_passed, days_remaining)
}

/// The two disjoint 30-day windows used for category growth comparison,
/// anchored at the latest date present in the data rather than the real-world
/// clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComparisonWindows {
    latest: NaiveDate,
    /// Boundary between the windows: start of the recent one, exclusive end
    /// of the prior one.
    split: NaiveDate,
    prior_start: NaiveDate,
}

impl ComparisonWindows {
    /// Builds the windows around the latest observed date: a recent window
    /// `[latest - 30d, latest]` and a prior window `[latest - 60d, latest - 30d)`.
    pub fn around(latest: NaiveDate) -> Self {
        Self {
            latest,
            split: latest - Duration::days(30),
            prior_start: latest - Duration::days(60),
        }
    }

    /// Whether a date falls in the recent window.
    pub fn contains_recent(&self, date: NaiveDate) -> bool {
        date >= self.split && date <= self.latest
    }

    /// Whether a date falls in the prior window.
    pub fn contains_prior(&self, date: NaiveDate) -> bool {
        date >= self.prior_start && date < self.split
    }
}
