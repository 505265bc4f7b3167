//! Event records and the parsing of user-supplied dates and times.
//!
//! An event lives under a date key in the store and carries only an optional
//! time of day, a description and the moment it was created.

use std::fmt;

use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::constants::{DATE_FORMAT, TIME_FORMAT};
use crate::error::{DaybookError, DaybookResult};

/// A single user-entered occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Time of day, written as `""` when absent
    #[serde(default, with = "optional_time")]
    pub time: Option<NaiveTime>,
    pub description: String,
    /// When the event was added (informational only)
    #[serde(with = "timestamp")]
    pub created_at: NaiveDateTime,
}

impl Event {
    /// Create an event stamped with the current local time.
    ///
    /// The timestamp is truncated to whole seconds so that it survives a
    /// save/load cycle unchanged.
    pub fn new(time: Option<NaiveTime>, description: impl Into<String>) -> Self {
        let now = Local::now().naive_local();
        Event {
            time,
            description: description.into(),
            created_at: now.with_nanosecond(0).unwrap_or(now),
        }
    }

    /// Whether the description contains `needle` (already lowercased).
    pub(crate) fn matches(&self, needle: &str) -> bool {
        self.description.to_lowercase().contains(needle)
    }

    /// The time as `HH:MM`, or an empty string.
    pub fn time_label(&self) -> String {
        self.time
            .map(|t| t.format(TIME_FORMAT).to_string())
            .unwrap_or_default()
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.time {
            Some(t) => write!(f, "{} {}", t.format(TIME_FORMAT), self.description),
            None => write!(f, "{}", self.description),
        }
    }
}

/// Parse a `YYYY-MM-DD` date.
pub fn parse_date(input: &str) -> DaybookResult<NaiveDate> {
    let input = input.trim();
    NaiveDate::parse_from_str(input, DATE_FORMAT).map_err(|_| {
        DaybookError::Validation(format!("Invalid date '{}'. Expected YYYY-MM-DD", input))
    })
}

/// Parse an optional `HH:MM` time. Blank input means no time.
pub fn parse_time(input: &str) -> DaybookResult<Option<NaiveTime>> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(None);
    }

    NaiveTime::parse_from_str(input, TIME_FORMAT)
        .map(Some)
        .map_err(|_| DaybookError::Validation(format!("Invalid time '{}'. Expected HH:MM", input)))
}

/// Trim a description and reject it when nothing is left.
pub fn parse_description(input: &str) -> DaybookResult<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(DaybookError::Validation(
            "Description cannot be empty".to_string(),
        ));
    }
    Ok(trimmed.to_string())
}

mod optional_time {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::constants::TIME_FORMAT;

    pub fn serialize<S: Serializer>(time: &Option<NaiveTime>, s: S) -> Result<S::Ok, S::Error> {
        match time {
            Some(t) => s.serialize_str(&t.format(TIME_FORMAT).to_string()),
            None => s.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveTime>, D::Error> {
        let raw = String::deserialize(d)?;
        if raw.is_empty() {
            return Ok(None);
        }
        NaiveTime::parse_from_str(&raw, TIME_FORMAT)
            .map(Some)
            .map_err(serde::de::Error::custom)
    }
}

mod timestamp {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::constants::TIMESTAMP_FORMAT;

    pub fn serialize<S: Serializer>(ts: &NaiveDateTime, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&ts.format(TIMESTAMP_FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(d)?;
        NaiveDateTime::parse_from_str(&raw, TIMESTAMP_FORMAT).map_err(serde::de::Error::custom)
    }
}
