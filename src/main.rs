//! CLI entry point for motorscope.
//!
//! Provides command-line interface for:
//! - Live ingestion from a serial link (`run`)
//! - A hardware-free simulated stream (`simulate`)
//! - Listing serial ports visible on this host (`ports`)
//!
//! The ingestion pipeline runs on its own blocking reader thread; this binary
//! is only the consumer, ticking on a tokio interval to print the latest
//! values and range hints, and exporting the channel windows to CSV on
//! shutdown when asked to.
//!
//! # Usage
//!
//! ```bash
//! motorscope run --port /dev/ttyACM0 --export session
//! motorscope simulate --corruption 0.05 --duration 10
//! motorscope ports
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use motorscope::config::Settings;
use motorscope::error::ScopeError;
use motorscope::logging;
use motorscope::telemetry::{IngestionPipeline, TelemetryHub};
use motorscope::transport::sim::SimTransport;
use motorscope::transport::BoxedTransport;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

/// How often the consumer tick samples the hub.
const CONSUMER_TICK: Duration = Duration::from_millis(100);

#[derive(Parser)]
#[command(name = "motorscope")]
#[command(about = "Live telemetry scope for sentinel-framed serial streams", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(long, global = true, default_value = "config/default.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ingest live telemetry from the configured serial link
    Run {
        /// Override the configured port
        #[arg(long)]
        port: Option<String>,

        /// Override the configured baud rate
        #[arg(long)]
        baud: Option<u32>,

        /// Stop after this many seconds (default: run until Ctrl-C)
        #[arg(long)]
        duration: Option<u64>,

        /// Export channel windows to CSV on shutdown, with this file stem
        #[arg(long)]
        export: Option<String>,
    },

    /// Ingest a simulated stream (no hardware required)
    Simulate {
        /// Probability that a simulated frame arrives truncated
        #[arg(long, default_value_t = 0.0)]
        corruption: f64,

        /// Stop after this many seconds (default: run until Ctrl-C)
        #[arg(long)]
        duration: Option<u64>,

        /// Export channel windows to CSV on shutdown, with this file stem
        #[arg(long)]
        export: Option<String>,
    },

    /// List serial ports visible on this host
    Ports,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            port,
            baud,
            duration,
            export,
        } => {
            let mut settings = load_settings(&cli.config)?;
            if let Some(port) = port {
                settings.link.port = port;
            }
            if let Some(baud) = baud {
                settings.link.baud = baud;
            }

            let transport = match connect(&settings) {
                Ok(transport) => transport,
                Err(e) => {
                    // Connect failures are reported, not fatal; there is just
                    // nothing left for a headless process to do.
                    warn!(error = %e, "running disconnected, no data will arrive");
                    return Ok(());
                }
            };
            drive(transport, &settings, duration, export).await
        }
        Commands::Simulate {
            corruption,
            duration,
            export,
        } => {
            let settings = load_settings(&cli.config)?;
            let transport = Box::new(
                SimTransport::new(settings.field_count()).with_corruption(corruption),
            );
            drive(transport, &settings, duration, export).await
        }
        Commands::Ports => list_ports(),
    }
}

fn load_settings(path: &Path) -> Result<Settings> {
    let settings = Settings::load_from(path)
        .with_context(|| format!("failed to load configuration from {}", path.display()))?;
    settings
        .validate()
        .map_err(ScopeError::Configuration)?;
    logging::init_from_settings(&settings).map_err(anyhow::Error::msg)?;
    Ok(settings)
}

#[cfg(feature = "link_serial")]
fn connect(settings: &Settings) -> Result<BoxedTransport, ScopeError> {
    use motorscope::transport::serial::SerialTransport;
    Ok(Box::new(SerialTransport::connect(&settings.link)?))
}

#[cfg(not(feature = "link_serial"))]
fn connect(_settings: &Settings) -> Result<BoxedTransport, ScopeError> {
    Err(ScopeError::FeatureNotEnabled("link_serial".to_string()))
}

/// Start the pipeline, tick the consumer until Ctrl-C or the deadline, then
/// stop and optionally export.
async fn drive(
    transport: BoxedTransport,
    settings: &Settings,
    duration: Option<u64>,
    export: Option<String>,
) -> Result<()> {
    let hub = Arc::new(TelemetryHub::from_settings(settings)?);
    let mut pipeline =
        IngestionPipeline::new(transport, Arc::clone(&hub), settings.field_count());
    pipeline.start()?;

    let deadline = duration.map(|secs| tokio::time::Instant::now() + Duration::from_secs(secs));
    let mut ticker = tokio::time::interval(CONSUMER_TICK);
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                print_status(&hub);
                if deadline.is_some_and(|d| tokio::time::Instant::now() >= d) {
                    break;
                }
            }
            result = tokio::signal::ctrl_c() => {
                result.context("failed to listen for Ctrl-C")?;
                println!();
                break;
            }
        }
    }

    pipeline.stop()?;
    if let Some(stem) = export {
        export_windows(&hub, settings, &stem)?;
    }
    Ok(())
}

#[cfg(feature = "storage_csv")]
fn export_windows(hub: &TelemetryHub, settings: &Settings, stem: &str) -> Result<()> {
    use motorscope::data::CsvExporter;
    let path = CsvExporter::new(&settings.storage).export(hub, stem)?;
    println!("Exported channel windows to {}", path.display());
    Ok(())
}

#[cfg(not(feature = "storage_csv"))]
fn export_windows(_hub: &TelemetryHub, _settings: &Settings, _stem: &str) -> Result<()> {
    Err(ScopeError::FeatureNotEnabled("storage_csv".to_string()).into())
}

fn print_status(hub: &TelemetryHub) {
    let values: Vec<String> = hub
        .latest()
        .into_iter()
        .map(|(name, value)| format!("{name}={value}"))
        .collect();
    let hints: Vec<String> = hub
        .range_hints()
        .into_iter()
        .map(|hint| format!("{}=±{}", hint.id, hint.span.1))
        .collect();
    println!("{}  |  {}", values.join("  "), hints.join("  "));
}

#[cfg(feature = "link_serial")]
fn list_ports() -> Result<()> {
    let ports = motorscope::transport::serial::available_ports()?;
    if ports.is_empty() {
        println!("No serial ports found.");
    }
    for port in ports {
        println!("{}  ({:?})", port.port_name, port.port_type);
    }
    Ok(())
}

#[cfg(not(feature = "link_serial"))]
fn list_ports() -> Result<()> {
    Err(ScopeError::FeatureNotEnabled("link_serial".to_string()).into())
}
