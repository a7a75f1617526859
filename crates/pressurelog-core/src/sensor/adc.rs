//! Analog inputs
//!
//! `IioAdc` reads a Linux IIO channel through sysfs. `SimulatedAdc` produces
//! a slowly wandering signal for running without hardware.

use std::fs;
use std::path::{Path, PathBuf};

use rand::rngs::StdRng;
use rand::Rng;
use rand::SeedableRng;

use super::{AnalogInput, SensorError};

/// ADC channel exposed by the Linux IIO subsystem
/// (e.g. `/sys/bus/iio/devices/iio:device0/in_voltage0_raw`)
#[derive(Debug, Clone)]
pub struct IioAdc {
    path: PathBuf,
}

impl IioAdc {
    /// Read raw samples from the given sysfs attribute
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    /// Path of the sysfs attribute
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl AnalogInput for IioAdc {
    fn read_raw(&mut self) -> Result<u16, SensorError> {
        let content = fs::read_to_string(&self.path)?;
        content.trim().parse::<u16>().map_err(|e| {
            SensorError::InvalidData(format!("{}: {e}", self.path.display()))
        })
    }
}

/// Simulated ADC wandering around a baseline count
pub struct SimulatedAdc {
    /// Centre of the simulated signal
    baseline: f64,
    /// Current value (random walk, pulled back towards the baseline)
    current: f64,
    /// Maximum step per sample in counts
    step: f64,
    /// Full-scale count
    adc_max: u16,
    rng: StdRng,
}

impl SimulatedAdc {
    /// Create a simulator centred on `baseline`
    pub fn new(baseline: u16, adc_max: u16) -> Self {
        Self::with_rng(baseline, adc_max, StdRng::from_entropy())
    }

    /// Create a reproducible simulator
    pub fn seeded(baseline: u16, adc_max: u16, seed: u64) -> Self {
        Self::with_rng(baseline, adc_max, StdRng::seed_from_u64(seed))
    }

    fn with_rng(baseline: u16, adc_max: u16, rng: StdRng) -> Self {
        let baseline = f64::from(baseline.min(adc_max));
        Self {
            baseline,
            current: baseline,
            step: 4.0,
            adc_max,
            rng,
        }
    }
}

impl AnalogInput for SimulatedAdc {
    fn read_raw(&mut self) -> Result<u16, SensorError> {
        let noise = self.rng.gen_range(-self.step..=self.step);
        let pull = (self.baseline - self.current) * 0.1;
        self.current = (self.current + noise + pull).clamp(0.0, f64::from(self.adc_max));
        Ok(self.current.round() as u16)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_simulated_adc_stays_in_range() {
        let mut adc = SimulatedAdc::seeded(4090, 4095, 7);
        for _ in 0..1000 {
            let raw = adc.read_raw().unwrap();
            assert!(raw <= 4095);
        }
    }

    #[test]
    fn test_simulated_adc_tracks_baseline() {
        let mut adc = SimulatedAdc::seeded(1500, 4095, 42);
        let mean: f64 = (0..500)
            .map(|_| f64::from(adc.read_raw().unwrap()))
            .sum::<f64>()
            / 500.0;
        assert!((mean - 1500.0).abs() < 20.0);
    }

    #[test]
    fn test_iio_adc_reads_sysfs_value() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("in_voltage0_raw");
        fs::write(&path, "2048\n").unwrap();

        let mut adc = IioAdc::new(&path);
        assert_eq!(adc.read_raw().unwrap(), 2048);

        fs::write(&path, "garbage\n").unwrap();
        assert!(matches!(adc.read_raw(), Err(SensorError::InvalidData(_))));
    }

    #[test]
    fn test_iio_adc_missing_file() {
        let mut adc = IioAdc::new("/nonexistent/in_voltage0_raw");
        assert!(matches!(adc.read_raw(), Err(SensorError::IoError(_))));
    }
}
