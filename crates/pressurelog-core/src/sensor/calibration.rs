//! Zero-offset calibration
//!
//! Averages raw samples taken at a known reference pressure and derives the
//! transducer's zero-pressure voltage:
//! `offset = mean(sample volts) - known_pascals / pascals_per_volt`.

use std::thread;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::{AnalogInput, SensorError, TransducerConfig};
use crate::unit_conversion::psi_to_pascal;

/// How many samples to average and how far apart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalibrationSettings {
    /// Number of raw samples to average
    pub samples: u32,
    /// Delay between samples in milliseconds
    pub delay_ms: u64,
}

impl Default for CalibrationSettings {
    fn default() -> Self {
        Self {
            samples: 30,
            delay_ms: 1000,
        }
    }
}

impl CalibrationSettings {
    /// Delay between samples
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

/// Run a calibration against a known reference pressure
///
/// Blocks for roughly `samples * delay`. Returns the new `offset_volts`; the
/// caller decides whether to apply or store it.
pub fn calibrate<A: AnalogInput + ?Sized>(
    input: &mut A,
    transducer: &TransducerConfig,
    settings: &CalibrationSettings,
    known_psi: f64,
) -> Result<f64, SensorError> {
    if settings.samples == 0 {
        return Err(SensorError::NoSamples);
    }

    let mut total = 0u64;
    for i in 0..settings.samples {
        if i > 0 && settings.delay_ms > 0 {
            thread::sleep(settings.delay());
        }
        total += u64::from(input.read_raw()?);
    }

    let mean_raw = total as f64 / f64::from(settings.samples);
    let mean_volts = mean_raw * transducer.reference_voltage / f64::from(transducer.adc_max);
    let offset = mean_volts - psi_to_pascal(known_psi) / transducer.pascals_per_volt;

    tracing::info!(
        "Calibration: {} samples, mean {:.4} V, offset {:.10} V",
        settings.samples,
        mean_volts,
        offset
    );
    Ok(offset)
}
