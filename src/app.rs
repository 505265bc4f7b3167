//! The state every command works against.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Weekday;
use daybook_core::config::DaybookConfig;
use daybook_core::{CalendarRenderer, EventStore};
use tracing::debug;

/// Store and renderer, built once in `main` and handed to commands.
pub struct App {
    pub store: EventStore,
    pub renderer: CalendarRenderer,
}

impl App {
    pub fn new(store: EventStore, renderer: CalendarRenderer) -> Self {
        App { store, renderer }
    }

    /// Build from config, with command-line overrides taking precedence.
    pub fn from_config(
        config: &DaybookConfig,
        file: Option<PathBuf>,
        first_weekday: Option<Weekday>,
    ) -> Result<Self> {
        let overridden = file.is_some();
        let path = file.unwrap_or_else(|| config.events_path());
        debug!(path = %path.display(), overridden, "resolved events file");

        let store = EventStore::load(&path)
            .with_context(|| format!("Failed to load events from {}", path.display()))?;
        let renderer = CalendarRenderer::new(first_weekday.unwrap_or(config.first_weekday));

        Ok(App::new(store, renderer))
    }
}
