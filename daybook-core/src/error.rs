//! Error types for daybook.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur in daybook operations.
#[derive(Error, Debug)]
pub enum DaybookError {
    /// Malformed user input: bad date, bad time, empty description, bad month.
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// The backing file could not be read or written.
    #[error("Could not access {}: {source}", .path.display())]
    Persistence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl DaybookError {
    pub(crate) fn persistence(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DaybookError::Persistence {
            path: path.into(),
            source,
        }
    }

    /// Whether the caller can recover by asking the user again.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, DaybookError::Validation(_) | DaybookError::NotFound(_))
    }
}

/// Result type alias for daybook operations.
pub type DaybookResult<T> = Result<T, DaybookError>;
