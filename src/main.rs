//! sysmon samples local host resources and shows a rolling dashboard.
//!
//! Run with:  `RUST_LOG=info sysmon --interval-ms 500 --export-csv metrics.csv`

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use sysmon_config::{default_path, load as load_config, MonitorConfig};
use sysmon_core::MetricSelector;
use sysmon_runtime::{shutdown_signal, Session};
use tracing_subscriber::EnvFilter;

/// Command-line flags.  Every flag overrides the matching config-file value.
#[derive(Debug, Parser)]
#[command(author, version, about = "Local host resource monitor", long_about = None)]
struct Cli {
    /// Path to the configuration file.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Sampling interval in milliseconds (minimum 250).
    #[arg(long, value_name = "MS")]
    interval_ms: Option<u64>,

    /// Visible history window in seconds (minimum 10).
    #[arg(long, value_name = "SECONDS")]
    history_seconds: Option<u64>,

    /// Write every snapshot to this CSV file.
    #[arg(long, value_name = "FILE")]
    export_csv: Option<PathBuf>,

    /// Graph shown on the dashboard: cpu, ram or both.
    #[arg(long, value_name = "MODE")]
    graph: Option<MetricSelector>,

    /// Sample (and export) without printing the dashboard.
    #[arg(long)]
    no_render: bool,
}

impl Cli {
    fn apply(self, config: &mut MonitorConfig) {
        if let Some(ms) = self.interval_ms {
            config.sampling.interval_ms = ms;
        }
        if let Some(secs) = self.history_seconds {
            config.history.history_seconds = secs;
        }
        if let Some(path) = self.export_csv {
            config.export.csv = Some(path);
        }
        if let Some(graph) = self.graph {
            config.display.graph = graph;
        }
        if self.no_render {
            config.display.render = false;
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Structured logging to stderr; RUST_LOG controls verbosity (default: info).
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("sysmon v{} starting", env!("CARGO_PKG_VERSION"));

    let cli = Cli::parse();
    let path = cli.config.clone().unwrap_or_else(default_path);
    let mut config = load_config(&path).context("loading configuration")?;
    cli.apply(&mut config);

    let mut session = Session::open(&config).context("starting monitor session")?;
    let mut stdout = std::io::stdout().lock();
    session.run(&mut stdout, shutdown_signal()).await?;

    tracing::info!("sysmon stopped");
    Ok(())
}
