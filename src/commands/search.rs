use anyhow::Result;
use daybook_core::month::today;
use owo_colors::OwoColorize;

use crate::app::App;
use crate::render::{pluralize, render_grouped};

pub fn run(app: &App, query: &str) -> Result<()> {
    let hits = app.store.search(query);

    if hits.is_empty() {
        println!("{}", format!("No events matching \"{}\"", query).dimmed());
        return Ok(());
    }

    println!("{}", render_grouped(&hits, today()));
    println!();
    println!(
        "{}",
        format!("{} {} found", hits.len(), pluralize("match", hits.len())).dimmed()
    );

    Ok(())
}
