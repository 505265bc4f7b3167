//! Terminal rendering for daybook types.
//!
//! Colours come from owo_colors; the core crate never deals with them.

use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate};
use daybook_core::{Event, MonthGrid};
use owo_colors::OwoColorize;

/// Extension trait for TUI rendering with colors.
pub trait Render {
    fn render(&self) -> String;
}

impl Render for Event {
    fn render(&self) -> String {
        format!("{} {}", format_time(self).dimmed(), self.description)
    }
}

/// The grid text with marked days highlighted and today inverted.
///
/// Styling is spliced in at the spans recorded by the grid, so the plain
/// characters between highlighted days are copied through untouched.
pub fn highlight_grid(grid: &MonthGrid, marked: &BTreeSet<u32>, today: Option<u32>) -> String {
    let text = grid.text();
    let mut out = String::with_capacity(text.len() * 2);
    let mut cursor = 0;

    for (day, span) in grid.days() {
        let is_marked = marked.contains(&day);
        let is_today = today == Some(day);
        if !is_marked && !is_today {
            continue;
        }

        out.push_str(&text[cursor..span.start]);
        let digits = &text[span.range()];
        let styled = match (is_marked, is_today) {
            (true, true) => digits.bold().yellow().reversed().to_string(),
            (true, false) => digits.bold().yellow().to_string(),
            _ => digits.reversed().to_string(),
        };
        out.push_str(&styled);
        cursor = span.end;
    }

    out.push_str(&text[cursor..]);
    out
}

/// Group `events` under one heading per date and render them.
pub fn render_grouped(events: &[(NaiveDate, &Event)], today: NaiveDate) -> String {
    let mut lines = Vec::new();
    let mut current: Option<NaiveDate> = None;

    for (date, event) in events {
        if current != Some(*date) {
            if current.is_some() {
                lines.push(String::new());
            }
            lines.push(date_label(*date, today).bold().to_string());
            current = Some(*date);
        }
        lines.push(format!("  {}", event.render()));
    }

    lines.join("\n")
}

/// Human-readable label for a date (e.g. "Today", "Tomorrow", "Wed Feb 25").
///
/// Dates outside the current year get the year appended.
pub fn date_label(date: NaiveDate, today: NaiveDate) -> String {
    match (date - today).num_days() {
        0 => "Today".to_string(),
        1 => "Tomorrow".to_string(),
        -1 => "Yesterday".to_string(),
        _ if date.year() == today.year() => date.format("%a %b %-d").to_string(),
        _ => date.format("%a %b %-d %Y").to_string(),
    }
}

/// The time column of an event (e.g. "  15:00" or "all-day").
pub fn format_time(event: &Event) -> String {
    if event.time.is_some() {
        format!("{:>7}", event.time_label())
    } else {
        "all-day".to_string()
    }
}

/// Simple pluralization helper
pub fn pluralize(word: &str, count: usize) -> String {
    if count == 1 {
        word.to_string()
    } else if word.ends_with("ch") || word.ends_with('s') {
        format!("{}es", word)
    } else {
        format!("{}s", word)
    }
}
