//! Month identity and navigation.
//!
//! Months are plain integers, never locale-formatted names.

use std::fmt;

use chrono::{Datelike, Local, NaiveDate};

use crate::error::{DaybookError, DaybookResult};

/// A calendar month of a given year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    /// Build a month, rejecting months outside 1..=12 and years chrono can't represent.
    pub fn new(year: i32, month: u32) -> DaybookResult<Self> {
        if NaiveDate::from_ymd_opt(year, month, 1).is_none() {
            return Err(DaybookError::Validation(format!(
                "Invalid month {}-{:02}",
                year, month
            )));
        }
        Ok(YearMonth { year, month })
    }

    /// The month containing `date`.
    pub fn of(date: NaiveDate) -> Self {
        YearMonth {
            year: date.year(),
            month: date.month(),
        }
    }

    /// The current month on the local clock.
    pub fn today() -> Self {
        Self::of(today())
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// The month before this one. January rolls back to December of the previous year.
    pub fn previous(&self) -> DaybookResult<Self> {
        self.offset(-1)
    }

    /// The month after this one. December rolls forward to January of the next year.
    pub fn next(&self) -> DaybookResult<Self> {
        self.offset(1)
    }

    /// Step `delta` months forwards (positive) or backwards (negative).
    ///
    /// Fails with a validation error when the result falls outside the years
    /// chrono can represent.
    pub fn offset(&self, delta: i32) -> DaybookResult<Self> {
        let total = i64::from(self.year) * 12 + i64::from(self.month - 1) + i64::from(delta);
        let out_of_range = || {
            DaybookError::Validation(format!(
                "Moving {} months from {} leaves the supported calendar range",
                delta, self
            ))
        };

        let year = i32::try_from(total.div_euclid(12)).map_err(|_| out_of_range())?;
        let month = (total.rem_euclid(12) + 1) as u32;
        Self::new(year, month).map_err(|_| out_of_range())
    }

    pub fn first_day(&self) -> NaiveDate {
        // Validated in `new`/`of`; years at chrono's edges fall back to its minimum.
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    pub fn days_in_month(&self) -> u32 {
        match self.next() {
            Ok(next) => next.first_day().signed_duration_since(self.first_day()).num_days() as u32,
            // only the last representable month has no successor, and it is a December
            Err(_) => 31,
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    /// English month name, e.g. "February".
    pub fn month_name(&self) -> &'static str {
        const NAMES: [&str; 12] = [
            "January", "February", "March", "April", "May", "June", "July", "August",
            "September", "October", "November", "December",
        ];
        NAMES[(self.month - 1) as usize]
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.month_name(), self.year)
    }
}

/// Today's date on the local clock.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}
