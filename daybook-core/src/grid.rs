//! Text rendering of a month.
//!
//! The grid records where each day number lands while the text is built, so
//! callers can highlight a day without searching the rendered text (which
//! would confuse "1" with the "1" inside "11").

use std::collections::{BTreeMap, BTreeSet};
use std::ops::Range;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate, Weekday};

use crate::constants::GRID_WIDTH;
use crate::error::{DaybookError, DaybookResult};
use crate::month::YearMonth;
use crate::store::EventStore;

/// Lines before the first week row: the title and the weekday header.
const HEADER_LINES: usize = 2;

/// Where a day number sits inside a rendered grid.
///
/// Offsets are byte offsets, so they slice `MonthGrid::text` directly. The
/// grid is ASCII, which makes them equal to character offsets as well.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DaySpan {
    /// Zero-based line index in the grid text
    pub line: usize,
    /// Byte offset of the first digit within that line
    pub column: usize,
    /// Byte offset of the first digit in the grid text
    pub start: usize,
    /// Byte offset one past the last digit in the grid text
    pub end: usize,
}

impl DaySpan {
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    pub fn overlaps(&self, other: &DaySpan) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// A rendered month: text plus the span of every day in it.
#[derive(Debug, Clone)]
pub struct MonthGrid {
    month: YearMonth,
    first_weekday: Weekday,
    text: String,
    spans: BTreeMap<u32, DaySpan>,
    weeks: usize,
}

impl MonthGrid {
    pub fn month(&self) -> YearMonth {
        self.month
    }

    pub fn first_weekday(&self) -> Weekday {
        self.first_weekday
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn lines(&self) -> std::str::Lines<'_> {
        self.text.lines()
    }

    /// Number of week rows.
    pub fn weeks(&self) -> usize {
        self.weeks
    }

    pub fn day_span(&self, day: u32) -> Option<&DaySpan> {
        self.spans.get(&day)
    }

    /// Every day of the month with its span, in day order.
    pub fn days(&self) -> impl Iterator<Item = (u32, &DaySpan)> {
        self.spans.iter().map(|(day, span)| (*day, span))
    }
}

/// Render `month` with weeks starting on `first_weekday`.
///
/// Layout follows `cal`: a centred title, two-letter weekday names, then one
/// row per week with day numbers right-aligned in two columns and separated by
/// a single space. Trailing blanks are trimmed from every line.
pub fn render_month(month: YearMonth, first_weekday: Weekday) -> MonthGrid {
    let mut text = String::new();

    let title = month.to_string();
    let pad = GRID_WIDTH.saturating_sub(title.len()) / 2;
    text.push_str(format!("{}{}", " ".repeat(pad), title).trim_end());
    text.push('\n');

    text.push_str(&weekday_header(first_weekday));
    text.push('\n');

    let lead = days_between(first_weekday, month.first_day().weekday());
    let days = month.days_in_month();
    let weeks = (lead + days as usize).div_ceil(7);

    let mut spans = BTreeMap::new();
    let mut day = 1u32;

    for week in 0..weeks {
        let line_start = text.len();
        let mut line = String::new();

        for col in 0..7 {
            if col > 0 {
                line.push(' ');
            }

            let cell = week * 7 + col;
            if cell < lead || day > days {
                line.push_str("  ");
                continue;
            }

            let digits = day.to_string();
            let column = line.len() + (2 - digits.len());
            line.push_str(&format!("{:>2}", digits));

            spans.insert(
                day,
                DaySpan {
                    line: HEADER_LINES + week,
                    column,
                    start: line_start + column,
                    end: line_start + column + digits.len(),
                },
            );
            day += 1;
        }

        text.push_str(line.trim_end());
        text.push('\n');
    }

    MonthGrid {
        month,
        first_weekday,
        text,
        spans,
        weeks,
    }
}

/// Days of `month` (1-based) that appear in `dates`.
pub fn marked_days<I>(month: YearMonth, dates: I) -> BTreeSet<u32>
where
    I: IntoIterator<Item = NaiveDate>,
{
    dates
        .into_iter()
        .filter(|date| month.contains(*date))
        .map(|date| date.day())
        .collect()
}

/// Two-letter weekday names starting at `first_weekday`.
pub fn weekday_header(first_weekday: Weekday) -> String {
    let mut names = Vec::with_capacity(7);
    let mut day = first_weekday;
    for _ in 0..7 {
        names.push(short_name(day));
        day = day.succ();
    }
    names.join(" ")
}

/// Parse a weekday name such as "sunday", "Sun" or "mon".
pub fn parse_weekday(input: &str) -> DaybookResult<Weekday> {
    Weekday::from_str(input.trim())
        .map_err(|_| DaybookError::Validation(format!("Unknown weekday '{}'", input)))
}

fn short_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Mo",
        Weekday::Tue => "Tu",
        Weekday::Wed => "We",
        Weekday::Thu => "Th",
        Weekday::Fri => "Fr",
        Weekday::Sat => "Sa",
        Weekday::Sun => "Su",
    }
}

/// How many days after `from` the weekday `to` falls (0..7).
fn days_between(from: Weekday, to: Weekday) -> usize {
    ((7 + to.num_days_from_monday() - from.num_days_from_monday()) % 7) as usize
}

/// Renders months with a fixed first weekday.
#[derive(Debug, Clone, Copy)]
pub struct CalendarRenderer {
    first_weekday: Weekday,
}

impl Default for CalendarRenderer {
    fn default() -> Self {
        CalendarRenderer {
            first_weekday: Weekday::Mon,
        }
    }
}

impl CalendarRenderer {
    pub fn new(first_weekday: Weekday) -> Self {
        CalendarRenderer { first_weekday }
    }

    pub fn first_weekday(&self) -> Weekday {
        self.first_weekday
    }

    pub fn render(&self, month: YearMonth) -> MonthGrid {
        render_month(month, self.first_weekday)
    }

    /// Days of `month` that have at least one event in `store`.
    pub fn marked_days(&self, month: YearMonth, store: &EventStore) -> BTreeSet<u32> {
        marked_days(month, store.all_dates())
    }
}
