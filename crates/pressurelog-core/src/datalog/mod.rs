//! Data Logging
//!
//! Bounded pressure history and its on-disk encoding.

mod error;
mod format;
mod store;

pub use error::LogError;
pub use format::{
    format_line, parse_line, read_entries, to_csv_string, write_entries, LogFile,
    DEFAULT_LOG_FILE,
};
pub use store::{LogStore, SharedLogStore, DEFAULT_CAPACITY, MAX_CAPACITY};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A single logged sample: wall-clock time and a pressure value in PSI
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    timestamp: NaiveDateTime,
    value: f64,
}

impl LogEntry {
    /// Create a new log entry
    pub fn new(timestamp: NaiveDateTime, value: f64) -> Self {
        Self { timestamp, value }
    }

    /// Time the sample was taken
    pub fn timestamp(&self) -> NaiveDateTime {
        self.timestamp
    }

    /// Sampled value (PSI)
    pub fn value(&self) -> f64 {
        self.value
    }
}
