//! # PressureLog Core Library
//!
//! Core functionality for the PressureLog pressure data logger.

#![warn(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

//!
//! This library provides:
//! - A fixed-capacity sample history with oldest-first eviction
//! - A line-oriented log file format that survives truncated writes
//! - Pressure transducer conversion and zero-offset calibration
//! - Clock sources and a sampler tying sensor, history and file together
//! - JSON configuration
//!
//! ## Example
//!
//! ```rust,no_run
//! use pressurelog_core::prelude::*;
//!
//! let config = LoggerConfig::default();
//! let log_file = config.log_file();
//! let store = SharedLogStore::new(load_or_empty(&log_file, config.capacity));
//!
//! let mut sampler = Sampler::new(SystemClock::new(), config.build_sensor(), store, log_file);
//! let report = sampler.sample()?;
//! println!("{:.2} PSI at {}", report.entry.value(), report.entry.timestamp());
//! # Ok::<(), pressurelog_core::sensor::SensorError>(())
//! ```

pub mod config;
pub mod datalog;
pub mod sampler;
pub mod sensor;
pub mod unit_conversion;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::{LoggerConfig, SensorKind};
    pub use crate::datalog::{LogEntry, LogError, LogFile, LogStore, SharedLogStore};
    pub use crate::sampler::{load_or_empty, SampleReport, Sampler};
    pub use crate::sensor::{
        calibrate, ClockSource, ManualClock, PressureTransducer, SensorSource, SystemClock,
    };
}

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
