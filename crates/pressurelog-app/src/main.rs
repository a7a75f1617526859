use std::io;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use pressurelog_app::{commands, LONG_VERSION};
use pressurelog_core::config::LoggerConfig;
use tracing_subscriber::EnvFilter;

/// PressureLog - pressure transducer data logger
#[derive(Parser)]
#[command(author, version = LONG_VERSION, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (default: <data dir>/PressureLog/config.json)
    #[arg(short, long, value_name = "FILE", env = "PRESSURELOG_CONFIG")]
    config: Option<PathBuf>,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, value_name = "LEVEL", default_value = "info")]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Start sampling and serve the web interface
    Run,

    /// Print the stored history
    Show,

    /// Write the stored history as CSV
    Export {
        /// Output file (default: stdout)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Delete the stored history
    Clear,

    /// Compute the transducer zero offset against a known pressure
    Calibrate {
        /// Pressure currently applied to the transducer (PSI)
        #[arg(long)]
        known_psi: f64,
    },

    /// Write a default configuration file
    InitConfig {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level)),
        )
        .init();

    let config_path = cli.config.unwrap_or_else(LoggerConfig::default_path);

    let load_config = || LoggerConfig::load_or_default(&config_path);

    match cli.command {
        Commands::Run => commands::run(load_config()?).await?,
        Commands::Show => commands::show(&load_config()?, &mut io::stdout().lock())?,
        Commands::Export { output } => {
            let config = load_config()?;
            let count = commands::export(&config, output.as_deref(), &mut io::stdout().lock())?;
            if let Some(path) = output {
                eprintln!("Exported {count} entries to {}", path.display());
            }
        }
        Commands::Clear => {
            commands::clear(&load_config()?)?;
            println!("History cleared");
        }
        Commands::Calibrate { known_psi } => {
            let config = load_config()?;
            println!(
                "Calibrating: {} samples, {} ms apart...",
                config.calibration.samples, config.calibration.delay_ms
            );
            let offset = tokio::task::spawn_blocking(move || {
                commands::run_calibration(&config, known_psi)
            })
            .await??;
            println!("offset_volts = {offset:.10}");
            println!("Set sensor.transducer.offset_volts in the config to apply it.");
        }
        Commands::InitConfig { force } => {
            commands::init_config(&config_path, force)?;
            println!("Wrote default configuration to {}", config_path.display());
        }
    }

    Ok(())
}
