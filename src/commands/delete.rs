use anyhow::Result;
use daybook_core::event::parse_date;
use dialoguer::Confirm;
use owo_colors::OwoColorize;

use crate::app::App;

pub fn run(app: &mut App, date: &str, index: usize, yes: bool) -> Result<()> {
    let day = parse_date(date)?;

    // Out-of-range lookups fall through so the store reports them.
    if !yes {
        if let Some(event) = app.store.list_events(day).get(index) {
            let confirmed = Confirm::new()
                .with_prompt(format!("  Delete \"{}\" on {}?", event, day))
                .default(false)
                .interact()?;
            if !confirmed {
                println!("{}", "  Cancelled".dimmed());
                return Ok(());
            }
        }
    }

    let removed = app.store.delete_event(day, index)?;
    println!("{}", format!("  Deleted: {}", removed).red());

    let remaining = app.store.list_events(day).len();
    if remaining == 0 {
        println!("{}", format!("  No events left on {}", day).dimmed());
    }

    Ok(())
}
