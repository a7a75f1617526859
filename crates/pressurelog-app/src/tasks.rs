//! Background tasks
//!
//! Two timers drive the sampler: a slow one that logs and persists a sample,
//! and a fast one that refreshes the live reading shown on the status page.
//! Sensor and file access block, so each tick runs on the blocking pool.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::state::AppState;

/// Log one sample every `interval`, starting one interval from now
pub fn spawn_sampling(state: AppState, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately
        ticker.tick().await;

        loop {
            ticker.tick().await;

            let tick_state = state.clone();
            let result = tokio::task::spawn_blocking(move || tick_state.sample_now()).await;
            match result {
                Ok(Ok(report)) => {
                    tracing::info!(
                        "Logged {:.2} PSI at {}{}",
                        report.entry.value(),
                        report.entry.timestamp(),
                        if report.evicted { " (oldest entry dropped)" } else { "" }
                    );
                }
                Ok(Err(e)) => tracing::warn!("Skipping sample, sensor read failed: {e}"),
                Err(e) => tracing::error!("Sampling task panicked: {e}"),
            }
        }
    })
}

/// Refresh the live reading every `interval`
pub fn spawn_live_display(state: AppState, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;

            let tick_state = state.clone();
            match tokio::task::spawn_blocking(move || tick_state.refresh_live_reading()).await {
                Ok(Ok(psi)) => tracing::debug!("P: {psi:.2} PSI"),
                Ok(Err(e)) => tracing::debug!("Live reading failed: {e}"),
                Err(e) => tracing::error!("Live reading task panicked: {e}"),
            }
        }
    })
}
