use anyhow::Result;
use chrono::Datelike;
use daybook_core::YearMonth;
use daybook_core::month::today;
use owo_colors::OwoColorize;

use crate::app::App;
use crate::render::{highlight_grid, render_grouped};

pub fn run(app: &App, month: YearMonth) -> Result<()> {
    let today = today();

    let grid = app.renderer.render(month);
    let marked = app.renderer.marked_days(month, &app.store);
    let today_day = month.contains(today).then(|| today.day());

    print!("{}", highlight_grid(&grid, &marked, today_day));

    let events = app.store.events_in_month(month);
    println!();
    if events.is_empty() {
        println!("{}", "No events this month".dimmed());
    } else {
        println!("{}", render_grouped(&events, today));
    }

    Ok(())
}
