use anyhow::Result;
use owo_colors::OwoColorize;

use crate::app::App;
use crate::render::pluralize;

pub fn run(app: &App) -> Result<()> {
    let dates = app.store.all_dates();

    if dates.is_empty() {
        println!("{}", "No events yet".dimmed());
        return Ok(());
    }

    for date in dates {
        let count = app.store.list_events(date).len();
        let label = format!("({} {})", count, pluralize("event", count));
        println!("{}  {}", date, label.dimmed());
    }

    Ok(())
}
