//! Error types for weekgrid.

use thiserror::Error;

/// Errors that can occur in weekgrid operations.
#[derive(Error, Debug)]
pub enum WeekGridError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid time '{0}'. Expected HH:MM")]
    InvalidTime(String),

    #[error("Invalid date '{0}'. Expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Date out of range: {0}")]
    DateOutOfRange(String),

    #[error("Event must end after it starts ({start} - {end})")]
    InvalidTimeRange { start: String, end: String },

    #[error("Event is too short: {minutes} minutes (minimum is {minimum})")]
    EventTooShort { minutes: i64, minimum: i64 },

    #[error("Invalid storage key '{0}'")]
    InvalidKey(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Drag error: {0}")]
    Drag(#[from] crate::drag::DragError),
}

impl From<serde_json::Error> for WeekGridError {
    fn from(e: serde_json::Error) -> Self {
        WeekGridError::Serialization(e.to_string())
    }
}

/// Result type alias for weekgrid operations.
pub type WeekGridResult<T> = Result<T, WeekGridError>;
