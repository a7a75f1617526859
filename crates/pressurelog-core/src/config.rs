//! Logger configuration
//!
//! Stored as `config.json`. Every field has a default, so a partial file (or
//! none at all) is valid.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::datalog::{LogFile, DEFAULT_CAPACITY, DEFAULT_LOG_FILE, MAX_CAPACITY};
use crate::sensor::{
    AnalogInput, CalibrationSettings, IioAdc, PressureTransducer, SimulatedAdc, TransducerConfig,
};

/// Default config file name
pub const CONFIG_FILE: &str = "config.json";

/// Errors loading or validating configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to access config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Top-level logger configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    /// Where the history is persisted
    pub log_path: PathBuf,

    /// Maximum number of entries kept
    pub capacity: usize,

    /// Seconds between logged samples
    pub sample_interval_secs: u64,

    /// Milliseconds between live (unlogged) readings
    pub display_interval_ms: u64,

    /// Web interface settings
    pub http: HttpSettings,

    /// Sensor wiring and constants
    pub sensor: SensorSettings,

    /// Calibration routine settings
    pub calibration: CalibrationSettings,

    /// Initial message shown on the status page
    pub welcome_message: String,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            log_path: data_dir().join(DEFAULT_LOG_FILE),
            capacity: DEFAULT_CAPACITY,
            sample_interval_secs: 600,
            display_interval_ms: 1000,
            http: HttpSettings::default(),
            sensor: SensorSettings::default(),
            calibration: CalibrationSettings::default(),
            welcome_message: "Welcome!".to_string(),
        }
    }
}

/// Web interface settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpSettings {
    /// Listen address
    pub bind: String,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Where raw readings come from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SensorKind {
    /// Random walk around a fixed pressure
    Simulated {
        /// Pressure the simulation hovers around (PSI)
        baseline_psi: f64,
    },
    /// Linux IIO sysfs channel
    Iio {
        /// Path to the `in_voltageN_raw` attribute
        path: PathBuf,
    },
}

impl Default for SensorKind {
    fn default() -> Self {
        SensorKind::Simulated { baseline_psi: 20.0 }
    }
}

/// Sensor wiring and constants
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorSettings {
    /// Raw input source
    pub source: SensorKind,

    /// Transducer constants
    pub transducer: TransducerConfig,
}

impl LoggerConfig {
    /// Default config file path
    pub fn default_path() -> PathBuf {
        data_dir().join(CONFIG_FILE)
    }

    /// Load configuration from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: LoggerConfig =
            serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration, using defaults if the file does not exist
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::info!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Save configuration as pretty JSON, creating parent directories
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let io_err = |source: std::io::Error| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }

        let content = serde_json::to_string_pretty(self).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, content).map_err(io_err)?;
        Ok(())
    }

    /// Reject values that would stall or break the sampler
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.capacity == 0 {
            return Err(ConfigError::Invalid("capacity must be at least 1".into()));
        }
        if self.capacity > MAX_CAPACITY {
            return Err(ConfigError::Invalid(format!(
                "capacity must be at most {MAX_CAPACITY}"
            )));
        }
        if self.sample_interval_secs == 0 {
            return Err(ConfigError::Invalid(
                "sample_interval_secs must be at least 1".into(),
            ));
        }
        if self.display_interval_ms == 0 {
            return Err(ConfigError::Invalid(
                "display_interval_ms must be at least 1".into(),
            ));
        }
        if !self.sensor.transducer.is_valid() {
            return Err(ConfigError::Invalid(
                "transducer constants must be positive".into(),
            ));
        }
        Ok(())
    }

    /// Interval between logged samples
    pub fn sample_interval(&self) -> Duration {
        Duration::from_secs(self.sample_interval_secs)
    }

    /// Interval between live readings
    pub fn display_interval(&self) -> Duration {
        Duration::from_millis(self.display_interval_ms)
    }

    /// Handle for the persisted log
    pub fn log_file(&self) -> LogFile {
        LogFile::new(&self.log_path)
    }

    /// Build the configured raw input
    pub fn build_input(&self) -> Box<dyn AnalogInput + Send> {
        let transducer = &self.sensor.transducer;
        match &self.sensor.source {
            SensorKind::Simulated { baseline_psi } => Box::new(SimulatedAdc::new(
                transducer.psi_to_raw(*baseline_psi),
                transducer.adc_max,
            )),
            SensorKind::Iio { path } => Box::new(IioAdc::new(path)),
        }
    }

    /// Build the configured pressure sensor
    pub fn build_sensor(&self) -> PressureTransducer<Box<dyn AnalogInput + Send>> {
        PressureTransducer::new(self.build_input(), self.sensor.transducer)
    }
}

/// Application data directory
fn data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("PressureLog")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = LoggerConfig::default();
        assert_eq!(config.capacity, 2016);
        assert_eq!(config.sample_interval(), Duration::from_secs(600));
        assert_eq!(config.calibration.samples, 30);
        assert!(config.log_path.ends_with(DEFAULT_LOG_FILE));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(
            &path,
            r#"{ "capacity": 3, "sensor": { "source": { "type": "iio", "path": "/dev/null" } } }"#,
        )
        .unwrap();

        let config = LoggerConfig::load(&path).unwrap();
        assert_eq!(config.capacity, 3);
        assert_eq!(config.sample_interval_secs, 600);
        assert_eq!(
            config.sensor.source,
            SensorKind::Iio {
                path: PathBuf::from("/dev/null")
            }
        );
        assert_eq!(config.sensor.transducer, TransducerConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE);

        let config = LoggerConfig {
            capacity: 144,
            welcome_message: "Tank A".to_string(),
            ..LoggerConfig::default()
        };
        config.save(&path).unwrap();

        assert_eq!(LoggerConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let config = LoggerConfig::load_or_default(dir.path().join("absent.json")).unwrap();
        assert_eq!(config, LoggerConfig::default());
    }

    #[test]
    fn test_rejects_invalid_values() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE);

        fs::write(&path, r#"{ "capacity": 0 }"#).unwrap();
        assert!(matches!(
            LoggerConfig::load(&path),
            Err(ConfigError::Invalid(_))
        ));

        fs::write(&path, r#"{ "capacity": 18446744073709551615 }"#).unwrap();
        assert!(matches!(
            LoggerConfig::load(&path),
            Err(ConfigError::Invalid(_))
        ));

        fs::write(&path, format!(r#"{{ "capacity": {} }}"#, MAX_CAPACITY + 1)).unwrap();
        assert!(LoggerConfig::load(&path).is_err());

        fs::write(&path, format!(r#"{{ "capacity": {MAX_CAPACITY} }}"#)).unwrap();
        assert!(LoggerConfig::load(&path).is_ok());

        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            LoggerConfig::load(&path),
            Err(ConfigError::Parse { .. })
        ));
    }
}
