//! Pressure transducer
//!
//! Ratiometric 0-300 kPa transducer read through an ADC:
//! `pascals = (volts - offset_volts) * pascals_per_volt`.

use serde::{Deserialize, Serialize};

use super::{AnalogInput, SensorError, SensorSource};
use crate::unit_conversion::{pascal_to_psi, psi_to_pascal};

/// Electrical constants of the transducer and ADC
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransducerConfig {
    /// Full-scale ADC count
    pub adc_max: u16,
    /// ADC reference voltage (V)
    pub reference_voltage: f64,
    /// Transducer sensitivity (Pa per V)
    pub pascals_per_volt: f64,
    /// Output voltage at zero pressure (V), set by calibration
    pub offset_volts: f64,
}

impl Default for TransducerConfig {
    fn default() -> Self {
        Self {
            adc_max: 4095,
            reference_voltage: 3.3,
            pascals_per_volt: 300_000.0,
            offset_volts: 0.6116746902,
        }
    }
}

impl TransducerConfig {
    /// Convert an ADC count to volts
    #[inline]
    pub fn raw_to_volts(&self, raw: u16) -> f64 {
        raw as f64 * self.reference_voltage / self.adc_max as f64
    }

    /// Convert volts to PSI using the current offset
    #[inline]
    pub fn volts_to_psi(&self, volts: f64) -> f64 {
        pascal_to_psi((volts - self.offset_volts) * self.pascals_per_volt)
    }

    /// Convert an ADC count straight to PSI
    pub fn raw_to_psi(&self, raw: u16) -> f64 {
        self.volts_to_psi(self.raw_to_volts(raw))
    }

    /// ADC count that would read as `psi` (clamped to the ADC range)
    pub fn psi_to_raw(&self, psi: f64) -> u16 {
        let volts = psi_to_pascal(psi) / self.pascals_per_volt + self.offset_volts;
        let raw = (volts * self.adc_max as f64 / self.reference_voltage).round();
        raw.clamp(0.0, self.adc_max as f64) as u16
    }

    /// Check that the constants can produce a finite reading
    pub fn is_valid(&self) -> bool {
        self.adc_max > 0
            && self.reference_voltage > 0.0
            && self.pascals_per_volt > 0.0
            && self.offset_volts.is_finite()
    }
}

/// A pressure sensor made of an analog input and a transducer model
#[derive(Debug)]
pub struct PressureTransducer<A> {
    input: A,
    config: TransducerConfig,
}

impl<A: AnalogInput> PressureTransducer<A> {
    /// Create a sensor reading `input` with the given constants
    pub fn new(input: A, config: TransducerConfig) -> Self {
        Self { input, config }
    }
}

impl<A: AnalogInput> SensorSource for PressureTransducer<A> {
    fn read(&mut self) -> Result<f64, SensorError> {
        let raw = self.input.read_raw()?;
        if raw > self.config.adc_max {
            return Err(SensorError::InvalidData(format!(
                "raw value {raw} exceeds ADC full scale {}",
                self.config.adc_max
            )));
        }
        Ok(self.config.raw_to_psi(raw))
    }
}
