//! Error types for feelviz

use chrono::NaiveDate;
use thiserror::Error;

/// Result type alias for feelviz operations
pub type Result<T> = std::result::Result<T, FeelvizError>;

/// Main error type for feelviz
#[derive(Error, Debug)]
pub enum FeelvizError {
    #[error("Invalid date range: {start} .. {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    #[error("Unknown item type {value:?} on line {line}")]
    UnknownItemType { line: u64, value: String },

    #[error("No day statistics recorded for {date}")]
    DataIntegrity { date: NaiveDate },

    #[error("Lookup miss: {0}")]
    LookupMiss(String),

    #[error("Item not in the current graph: {0}")]
    UnknownItem(String),

    #[error("Mood state out of range -3..=3: {0}")]
    InvalidMoodState(i64),

    #[error("Invalid record on line {line}: {reason}")]
    InvalidRecord { line: u64, reason: String },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Settings error: {0}")]
    Settings(#[from] serde_json::Error),
}

impl FeelvizError {
    /// Whether the error only rejected a mutation and left engine state intact
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            FeelvizError::InvalidRange { .. }
                | FeelvizError::UnknownItem(_)
                | FeelvizError::InvalidMoodState(_)
        )
    }
}
