//! Sensor and Clock Sources
//!
//! The collaborators the sampler pulls from: a wall clock, an analog input,
//! and the pressure transducer that turns raw ADC counts into PSI.

mod adc;
mod calibration;
mod clock;
mod transducer;

pub use adc::{IioAdc, SimulatedAdc};
pub use calibration::{calibrate, CalibrationSettings};
pub use clock::{ManualClock, SystemClock};
pub use transducer::{PressureTransducer, TransducerConfig};

use chrono::NaiveDateTime;
use thiserror::Error;

/// Errors that can occur while reading a sensor
#[derive(Error, Debug)]
pub enum SensorError {
    #[error("Sensor read failed: {0}")]
    ReadFailed(String),

    #[error("Sensor returned invalid data: {0}")]
    InvalidData(String),

    #[error("Calibration needs at least one sample")]
    NoSamples,

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Source of wall-clock time
///
/// Implementations should never go backwards between calls; the log keeps
/// entries in call order and does not sort them.
pub trait ClockSource {
    /// Current local time, second resolution, no timezone
    fn now(&self) -> NaiveDateTime;
}

/// Source of calibrated readings in physical units
pub trait SensorSource {
    /// Take one reading
    fn read(&mut self) -> Result<f64, SensorError>;
}

/// Raw analog-to-digital converter input
pub trait AnalogInput {
    /// Take one raw ADC sample
    fn read_raw(&mut self) -> Result<u16, SensorError>;
}

impl<S: SensorSource + ?Sized> SensorSource for Box<S> {
    fn read(&mut self) -> Result<f64, SensorError> {
        (**self).read()
    }
}

impl<A: AnalogInput + ?Sized> AnalogInput for Box<A> {
    fn read_raw(&mut self) -> Result<u16, SensorError> {
        (**self).read_raw()
    }
}

impl<C: ClockSource + ?Sized> ClockSource for Box<C> {
    fn now(&self) -> NaiveDateTime {
        (**self).now()
    }
}
