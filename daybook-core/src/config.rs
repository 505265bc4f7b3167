//! Global daybook configuration.

use std::path::{Path, PathBuf};

use chrono::Weekday;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_EVENTS_FILE;
use crate::error::{DaybookError, DaybookResult};

/// Prefix for environment overrides, e.g. `DAYBOOK_EVENTS_FILE`.
const ENV_PREFIX: &str = "DAYBOOK";

fn default_events_file() -> PathBuf {
    PathBuf::from(DEFAULT_EVENTS_FILE)
}

fn default_first_weekday() -> Weekday {
    Weekday::Mon
}

/// Configuration at ~/.config/daybook/config.toml
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct DaybookConfig {
    /// Where events are stored. `~` is expanded.
    #[serde(default = "default_events_file")]
    pub events_file: PathBuf,

    /// First column of the month grid.
    #[serde(default = "default_first_weekday")]
    pub first_weekday: Weekday,
}

impl Default for DaybookConfig {
    fn default() -> Self {
        DaybookConfig {
            events_file: default_events_file(),
            first_weekday: default_first_weekday(),
        }
    }
}

impl DaybookConfig {
    pub fn config_path() -> DaybookResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| DaybookError::Config("Could not determine config directory".into()))?
            .join("daybook");

        Ok(config_dir.join("config.toml"))
    }

    /// Load from the default location, writing a commented template first if
    /// the file doesn't exist yet.
    pub fn load() -> DaybookResult<Self> {
        let path = Self::config_path()?;

        if !path.exists() {
            // A read-only config dir shouldn't stop the calendar from working.
            if let Err(e) = Self::create_default_config(&path) {
                tracing::debug!(error = %e, "could not write default config");
            }
        }

        Self::load_from(&path)
    }

    /// Load from `path` (optional) with `DAYBOOK_*` environment overrides on top.
    pub fn load_from(path: &Path) -> DaybookResult<Self> {
        Config::builder()
            .add_source(File::from(path.to_path_buf()).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX))
            .build()
            .map_err(|e| DaybookError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| DaybookError::Config(e.to_string()))
    }

    /// The events file with `~` expanded.
    pub fn events_path(&self) -> PathBuf {
        let expanded = shellexpand::tilde(&self.events_file.to_string_lossy()).into_owned();
        PathBuf::from(expanded)
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> DaybookResult<()> {
        let contents = format!(
            "\
# daybook configuration

# Where events are stored:
# events_file = \"{}\"

# First day of the week in month views (monday, sunday, ...):
# first_weekday = \"monday\"
",
            DEFAULT_EVENTS_FILE
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                DaybookError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| DaybookError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = DaybookConfig::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config.first_weekday, Weekday::Mon);
        assert_eq!(config.events_file, PathBuf::from(DEFAULT_EVENTS_FILE));
    }

    #[test]
    fn template_parses_to_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        DaybookConfig::create_default_config(&path).unwrap();

        let config = DaybookConfig::load_from(&path).unwrap();
        assert_eq!(config.first_weekday, Weekday::Mon);
        assert_eq!(config.events_file, PathBuf::from(DEFAULT_EVENTS_FILE));
    }

    #[test]
    fn reads_values_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "events_file = \"/tmp/events.json\"\nfirst_weekday = \"sunday\"\n",
        )
        .unwrap();

        let config = DaybookConfig::load_from(&path).unwrap();
        assert_eq!(config.first_weekday, Weekday::Sun);
        assert_eq!(config.events_path(), PathBuf::from("/tmp/events.json"));
    }

    #[test]
    fn bad_weekday_is_config_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "first_weekday = \"someday\"\n").unwrap();

        assert!(matches!(
            DaybookConfig::load_from(&path),
            Err(DaybookError::Config(_))
        ));
    }

    #[test]
    fn tilde_is_expanded() {
        let config = DaybookConfig::default();
        let path = config.events_path();
        assert!(!path.to_string_lossy().starts_with('~'));
        assert!(path.ends_with("calendar_events.json"));
    }
}
