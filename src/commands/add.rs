use anyhow::Result;
use daybook_core::event::{parse_date, parse_description, parse_time};
use owo_colors::OwoColorize;

use crate::app::App;
use crate::commands::list::render_day;
use crate::utils::prompt::prompt_with_retry;

pub fn run(
    app: &mut App,
    date: &str,
    time: Option<String>,
    description: Option<String>,
) -> Result<()> {
    // Reject a bad date before asking anything else.
    let day = parse_date(date)?;
    let interactive = description.is_none();

    // --- Time ---
    let time = match time {
        Some(t) => t,
        None if interactive => prompt_with_retry("  Time? (HH:MM, skip)", true, |input| {
            parse_time(input).map(|_| input.trim().to_string())
        })?,
        None => String::new(),
    };

    // --- Description ---
    let description = match description {
        Some(d) => d,
        None => prompt_with_retry("  What?", false, parse_description)?,
    };

    let added = app.store.add_event(date, &time, &description)?;
    let summary = added.last().map(|e| e.to_string()).unwrap_or_default();

    if interactive {
        println!();
    }
    println!("{}", format!("  Added on {}: {}", day, summary).green());
    println!("{}", render_day(app.store.list_events(day)));

    Ok(())
}
