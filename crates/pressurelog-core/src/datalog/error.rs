//! Log persistence errors

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while persisting or removing the log file
///
/// A missing file on load is not an error; it yields an empty store.
#[derive(Error, Debug)]
pub enum LogError {
    #[error("Failed to open log file {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write log file {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to remove log file {}: {source}", path.display())]
    Remove {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
