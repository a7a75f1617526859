//! Clock sources

use std::sync::Arc;

use chrono::{Duration, Local, NaiveDateTime, SubsecRound};
use parking_lot::RwLock;

use super::ClockSource;

/// Local wall clock with an adjustable offset
///
/// Clones share the offset, so adjusting one handle adjusts them all.
#[derive(Debug, Clone, Default)]
pub struct SystemClock {
    offset: Arc<RwLock<Duration>>,
}

impl SystemClock {
    /// Create a clock that follows the system time
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the clock read `target` from now on
    pub fn adjust(&self, target: NaiveDateTime) {
        let delta = target - Local::now().naive_local();
        *self.offset.write() = delta;
        tracing::info!("Clock adjusted to {target}");
    }

    /// Current offset from the system time
    pub fn offset(&self) -> Duration {
        *self.offset.read()
    }
}

impl ClockSource for SystemClock {
    fn now(&self) -> NaiveDateTime {
        (Local::now().naive_local() + *self.offset.read()).trunc_subsecs(0)
    }
}

/// A clock that only moves when told to
///
/// Useful for simulations and tests.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<RwLock<NaiveDateTime>>,
}

impl ManualClock {
    /// Create a clock stopped at `start`
    pub fn new(start: NaiveDateTime) -> Self {
        Self {
            now: Arc::new(RwLock::new(start)),
        }
    }

    /// Set the current time
    pub fn set(&self, time: NaiveDateTime) {
        *self.now.write() = time;
    }

    /// Move the clock forward
    pub fn advance(&self, by: Duration) {
        let mut now = self.now.write();
        *now += by;
    }
}

impl ClockSource for ManualClock {
    fn now(&self) -> NaiveDateTime {
        *self.now.read()
    }
}
