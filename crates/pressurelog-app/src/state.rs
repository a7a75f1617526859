//! Shared application state

use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use pressurelog_core::datalog::{LogEntry, SharedLogStore};
use pressurelog_core::sampler::{SampleReport, Sampler};
use pressurelog_core::sensor::{SensorError, SensorSource, SystemClock};

/// Longest custom message accepted (one line of a 20x4 display)
pub const MAX_MESSAGE_CHARS: usize = 20;

/// Sampler as wired by the application
pub type AppSampler = Sampler<SystemClock, Box<dyn SensorSource + Send>>;

/// State shared by the web handlers and the background tasks
///
/// Read paths (page rendering, download) only take the store lock. Writes to
/// the history and the log file go through the sampler lock.
#[derive(Clone)]
pub struct AppState {
    sampler: Arc<Mutex<AppSampler>>,
    store: SharedLogStore,
    clock: SystemClock,
    message: Arc<RwLock<String>>,
    live_reading: Arc<RwLock<Option<f64>>>,
}

impl AppState {
    /// Build the state around a sampler
    pub fn new(sampler: AppSampler, message: impl Into<String>) -> Self {
        let store = sampler.store().clone();
        let clock = sampler.clock().clone();
        Self {
            sampler: Arc::new(Mutex::new(sampler)),
            store,
            clock,
            message: Arc::new(RwLock::new(truncate_message(&message.into()))),
            live_reading: Arc::new(RwLock::new(None)),
        }
    }

    /// History shared with the sampler
    pub fn store(&self) -> &SharedLogStore {
        &self.store
    }

    /// Clock used to stamp samples
    pub fn clock(&self) -> &SystemClock {
        &self.clock
    }

    /// Take and persist one sample
    pub fn sample_now(&self) -> Result<SampleReport, SensorError> {
        self.sampler.lock().sample()
    }

    /// Take a live reading and remember it for display
    pub fn refresh_live_reading(&self) -> Result<f64, SensorError> {
        let value = self.sampler.lock().read_live()?;
        *self.live_reading.write() = Some(value);
        Ok(value)
    }

    /// Last live reading, if any succeeded
    pub fn live_reading(&self) -> Option<f64> {
        *self.live_reading.read()
    }

    /// Rewrite the log file from memory
    pub fn flush(&self) {
        match self.sampler.lock().save() {
            Ok(count) => tracing::debug!("Flushed {count} entries"),
            Err(e) => tracing::debug!("Flush failed: {e}"),
        }
    }

    /// Clear the history and delete the log file
    pub fn clear_history(&self) {
        if let Err(e) = self.sampler.lock().clear() {
            tracing::warn!("Failed to delete log file: {e}");
        }
    }

    /// Message of the last failed save
    pub fn last_save_error(&self) -> Option<String> {
        self.sampler.lock().last_save_error().map(str::to_string)
    }

    /// Current custom message
    pub fn message(&self) -> String {
        self.message.read().clone()
    }

    /// Replace the custom message, truncated to [`MAX_MESSAGE_CHARS`]
    pub fn set_message(&self, message: &str) {
        *self.message.write() = truncate_message(message);
    }

    /// Copy of the history, oldest first
    pub fn entries(&self) -> Vec<LogEntry> {
        self.store.snapshot()
    }
}

fn truncate_message(message: &str) -> String {
    message.trim().chars().take(MAX_MESSAGE_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_message() {
        assert_eq!(truncate_message("  hello "), "hello");
        assert_eq!(
            truncate_message("this message is far too long"),
            "this message is far "
        );
        assert_eq!(truncate_message("presión ñññññññññññññññ").chars().count(), 20);
    }
}
