//! Sampler
//!
//! Pulls one reading from the sensor, stamps it with the clock, appends it to
//! the shared store and rewrites the log file. Persistence is best effort: a
//! failed save is recorded and logged, and the next sample tries again.

use crate::datalog::{LogEntry, LogError, LogFile, LogStore, SharedLogStore};
use crate::sensor::{ClockSource, SensorError, SensorSource};

/// Result of one logged sample
#[derive(Debug)]
pub struct SampleReport {
    /// The entry that was appended
    pub entry: LogEntry,
    /// Whether the append pushed out the oldest entry
    pub evicted: bool,
    /// Outcome of rewriting the log file (entries written)
    pub save: Result<usize, LogError>,
}

/// Drives sensor → store → log file
pub struct Sampler<C, S> {
    clock: C,
    sensor: S,
    store: SharedLogStore,
    log_file: LogFile,
    last_save_error: Option<String>,
}

impl<C: ClockSource, S: SensorSource> Sampler<C, S> {
    /// Create a sampler writing into `store` and persisting to `log_file`
    pub fn new(clock: C, sensor: S, store: SharedLogStore, log_file: LogFile) -> Self {
        Self {
            clock,
            sensor,
            store,
            log_file,
            last_save_error: None,
        }
    }

    /// Shared store the sampler appends to
    pub fn store(&self) -> &SharedLogStore {
        &self.store
    }

    /// Log file the sampler persists to
    pub fn log_file(&self) -> &LogFile {
        &self.log_file
    }

    /// Clock used to stamp entries
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Message of the most recent failed save, cleared by the next success
    pub fn last_save_error(&self) -> Option<&str> {
        self.last_save_error.as_deref()
    }

    /// Read the sensor without logging (live display)
    pub fn read_live(&mut self) -> Result<f64, SensorError> {
        let value = self.sensor.read()?;
        if !value.is_finite() {
            return Err(SensorError::InvalidData(format!("non-finite reading {value}")));
        }
        Ok(value)
    }

    /// Take a reading, append it and persist the store
    ///
    /// Fails only if the sensor cannot be read, in which case nothing is
    /// appended. Save failures are reported in the returned [`SampleReport`].
    pub fn sample(&mut self) -> Result<SampleReport, SensorError> {
        let value = self.read_live()?;
        let entry = LogEntry::new(self.clock.now(), value);

        let evicted = self.store.append(entry);
        let save = self.save();

        Ok(SampleReport {
            entry,
            evicted,
            save,
        })
    }

    /// Rewrite the log file from the current store contents
    pub fn save(&mut self) -> Result<usize, LogError> {
        let snapshot = self.store.snapshot();
        match self.log_file.save(&snapshot) {
            Ok(count) => {
                self.last_save_error = None;
                Ok(count)
            }
            Err(e) => {
                tracing::warn!("Failed to save log: {e}");
                self.last_save_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Empty the store and delete the log file
    ///
    /// The in-memory store is cleared even if the file cannot be removed.
    pub fn clear(&mut self) -> Result<(), LogError> {
        self.store.clear();
        self.log_file.remove()?;
        tracing::info!("Log cleared");
        Ok(())
    }
}

/// Load the persisted history, falling back to an empty store on any error
pub fn load_or_empty(log_file: &LogFile, capacity: usize) -> LogStore {
    match log_file.load(capacity) {
        Ok(store) => store,
        Err(e) => {
            tracing::warn!("Starting with empty history: {e}");
            LogStore::new(capacity)
        }
    }
}
