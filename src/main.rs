mod app;
mod commands;
mod render;
mod utils;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use chrono::Weekday;
use clap::{Parser, Subcommand};
use daybook_core::config::DaybookConfig;
use daybook_core::grid::parse_weekday;
use daybook_core::{DaybookError, YearMonth};
use owo_colors::OwoColorize;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::app::App;

/// Environment variable holding a tracing filter, e.g. `DAYBOOK_LOG=debug`.
const LOG_ENV: &str = "DAYBOOK_LOG";

#[derive(Parser)]
#[command(name = "daybook")]
#[command(about = "Keep dated events in a local file and browse them on a month calendar")]
#[command(version)]
struct Cli {
    /// Events file to use instead of the configured one
    #[arg(long, global = true)]
    file: Option<PathBuf>,

    /// First day of the week in month views (e.g. "sunday")
    #[arg(long, global = true, value_parser = weekday_arg)]
    first_weekday: Option<Weekday>,

    /// Log what daybook is doing to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show a month with its events (defaults to the current month)
    Show {
        /// Month number (1-12)
        #[arg(value_parser = clap::value_parser!(u32).range(1..=12))]
        month: Option<u32>,

        /// Year (defaults to the current year)
        year: Option<i32>,

        /// Go back this many months
        #[arg(long, num_args = 0..=1, default_value_t = 0, default_missing_value = "1", conflicts_with = "next")]
        prev: u32,

        /// Go forward this many months
        #[arg(long, num_args = 0..=1, default_value_t = 0, default_missing_value = "1")]
        next: u32,
    },
    /// Add an event to a date
    Add {
        /// Date (YYYY-MM-DD)
        date: String,

        /// What's happening. Prompted for when omitted
        description: Option<String>,

        /// Time of day (HH:MM)
        #[arg(short, long)]
        time: Option<String>,
    },
    /// List the events on a date
    List {
        /// Date (YYYY-MM-DD)
        date: String,
    },
    /// Delete an event by its position in `list`
    Delete {
        /// Date (YYYY-MM-DD)
        date: String,

        /// Index shown by `daybook list`
        index: usize,

        /// Don't ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },
    /// Find events whose description contains the query (case-insensitive)
    Search { query: String },
    /// List every date that has events
    Dates,
    /// Show events coming up from today
    Upcoming {
        /// How many days ahead to look
        #[arg(short, long, default_value_t = 7)]
        days: u32,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // Bad input is the user's to fix; anything else gets the full chain.
            let recoverable = e
                .downcast_ref::<DaybookError>()
                .is_some_and(DaybookError::is_recoverable);
            if recoverable {
                eprintln!("{}", e.to_string().red());
                ExitCode::from(2)
            } else {
                eprintln!("{} {:#}", "Error:".red().bold(), e);
                ExitCode::FAILURE
            }
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = DaybookConfig::load().context("Failed to load configuration")?;
    let mut app = App::from_config(&config, cli.file, cli.first_weekday)?;

    match cli.command.unwrap_or(Commands::Show {
        month: None,
        year: None,
        prev: 0,
        next: 0,
    }) {
        Commands::Show {
            month,
            year,
            prev,
            next,
        } => {
            let month = resolve_month(YearMonth::today(), month, year, prev, next)?;
            commands::show::run(&app, month)
        }
        Commands::Add {
            date,
            description,
            time,
        } => commands::add::run(&mut app, &date, time, description),
        Commands::List { date } => commands::list::run(&app, &date),
        Commands::Delete { date, index, yes } => commands::delete::run(&mut app, &date, index, yes),
        Commands::Search { query } => commands::search::run(&app, &query),
        Commands::Dates => commands::dates::run(&app),
        Commands::Upcoming { days } => commands::upcoming::run(&app, days),
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "daybook=debug,daybook_core=debug"
    } else {
        "warn"
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| default_filter.into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();
}

fn weekday_arg(input: &str) -> Result<Weekday, String> {
    parse_weekday(input).map_err(|e| e.to_string())
}

/// Pick the month to show: explicit month/year fall back to `current`, then
/// `prev`/`next` step from there.
fn resolve_month(
    current: YearMonth,
    month: Option<u32>,
    year: Option<i32>,
    prev: u32,
    next: u32,
) -> Result<YearMonth> {
    let base = YearMonth::new(
        year.unwrap_or(current.year()),
        month.unwrap_or(current.month()),
    )?;

    let delta = i64::from(next) - i64::from(prev);
    let delta = i32::try_from(delta).context("Month offset too large")?;
    Ok(base.offset(delta)?)
}
