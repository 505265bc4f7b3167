use anyhow::Result;
use daybook_core::month::today;
use owo_colors::OwoColorize;

use crate::app::App;
use crate::render::render_grouped;

pub fn run(app: &App, days: u32) -> Result<()> {
    let today = today();
    let events = app.store.upcoming(today, days);

    if events.is_empty() {
        println!("{}", "No events found".dimmed());
        return Ok(());
    }

    println!("{}", render_grouped(&events, today));

    Ok(())
}
