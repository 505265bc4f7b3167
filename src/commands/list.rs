use anyhow::Result;
use daybook_core::Event;
use daybook_core::event::parse_date;
use daybook_core::month::today;
use owo_colors::OwoColorize;

use crate::app::App;
use crate::render::{Render, date_label};

pub fn run(app: &App, date: &str) -> Result<()> {
    let day = parse_date(date)?;
    let events = app.store.list_events(day);

    if events.is_empty() {
        println!("{}", format!("No events on {}", day).dimmed());
        return Ok(());
    }

    println!("{} {}", date_label(day, today()).bold(), day.to_string().dimmed());
    println!("{}", render_day(events));

    Ok(())
}

/// One line per event, prefixed with the index `delete` expects.
pub fn render_day(events: &[Event]) -> String {
    events
        .iter()
        .enumerate()
        .map(|(index, event)| format!("  {} {}", format!("[{}]", index).dimmed(), event.render()))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indexes_start_at_zero() {
        let events = vec![Event::new(None, "First"), Event::new(None, "Second")];
        let out = render_day(&events);
        let lines: Vec<_> = out.lines().collect();

        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("[0]"));
        assert!(lines[0].ends_with("First"));
        assert!(lines[1].contains("[1]"));
    }
}
