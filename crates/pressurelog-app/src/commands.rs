//! Command implementations behind the CLI

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use anyhow::{bail, Context, Result};
use pressurelog_core::config::LoggerConfig;
use pressurelog_core::datalog::{write_entries, SharedLogStore};
use pressurelog_core::sampler::{load_or_empty, Sampler};
use pressurelog_core::sensor::{calibrate, SensorSource, SystemClock};

use crate::state::AppState;
use crate::{tasks, web};

/// Run the logger: sampling, live display and web interface
pub async fn run(config: LoggerConfig) -> Result<()> {
    let log_file = config.log_file();
    if let Some(parent) = log_file.path().parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            tracing::warn!("Cannot create {}: {e}", parent.display());
        }
    }

    let store = SharedLogStore::new(load_or_empty(&log_file, config.capacity));
    tracing::info!(
        "History: {}/{} entries, sampling every {}s",
        store.len(),
        store.capacity(),
        config.sample_interval_secs
    );

    let sensor: Box<dyn SensorSource + Send> = Box::new(config.build_sensor());
    let sampler = Sampler::new(SystemClock::new(), sensor, store, log_file);
    let state = AppState::new(sampler, config.welcome_message.clone());

    let sampling = tasks::spawn_sampling(state.clone(), config.sample_interval());
    let display = tasks::spawn_live_display(state.clone(), config.display_interval());

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for shutdown signal: {e}");
        }
    };
    let served = web::serve(state.clone(), &config.http.bind, shutdown).await;

    sampling.abort();
    display.abort();

    tracing::info!("Shutting down, saving history");
    let flush_state = state.clone();
    tokio::task::spawn_blocking(move || flush_state.flush()).await?;

    served.with_context(|| format!("Web server on {} failed", config.http.bind))
}

/// Print the stored history as a table
pub fn show<W: Write>(config: &LoggerConfig, out: &mut W) -> Result<()> {
    let store = config
        .log_file()
        .load(config.capacity)
        .context("Failed to load history")?;

    if store.is_empty() {
        writeln!(out, "No entries logged.")?;
        return Ok(());
    }

    writeln!(out, "{:<10}  {:<5}  {:>14}", "Date", "Time", "Pressure (PSI)")?;
    for entry in &store {
        let t = entry.timestamp();
        writeln!(
            out,
            "{:<10}  {:<5}  {:>14.2}",
            t.format("%Y-%m-%d").to_string(),
            t.format("%H:%M").to_string(),
            entry.value()
        )?;
    }
    writeln!(out, "{} of {} entries", store.len(), store.capacity())?;
    Ok(())
}

/// Write the stored history as CSV to `output`, or to `out` if none is given
pub fn export<W: Write>(config: &LoggerConfig, output: Option<&Path>, out: &mut W) -> Result<usize> {
    let store = config
        .log_file()
        .load(config.capacity)
        .context("Failed to load history")?;

    let count = match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            write_entries(file, &store)?
        }
        None => write_entries(out, &store)?,
    };
    Ok(count)
}

/// Delete the stored history
pub fn clear(config: &LoggerConfig) -> Result<()> {
    config
        .log_file()
        .remove()
        .context("Failed to clear history")?;
    Ok(())
}

/// Run the calibration routine and return the new offset in volts
///
/// The offset is not written back to the configuration.
pub fn run_calibration(config: &LoggerConfig, known_psi: f64) -> Result<f64> {
    if !known_psi.is_finite() {
        bail!("Reference pressure must be a finite number");
    }

    let mut input = config.build_input();
    let offset = calibrate(
        &mut input,
        &config.sensor.transducer,
        &config.calibration,
        known_psi,
    )
    .context("Calibration failed")?;
    Ok(offset)
}

/// Write a default configuration file
pub fn init_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }
    LoggerConfig::default().save(path)?;
    Ok(())
}
