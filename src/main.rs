//! `kci-samples` entry point.
//!
//! Fetches the latest KernelCI lavas and builds and stores them as JSON
//! samples. Exits with 0 on success and a negative status when the samples
//! directory is unusable or records cannot be listed.

use std::path::PathBuf;

use clap::Parser;
use kci_samples::source::KernelCiSource;
use kci_samples::{Config, Persister};
use tracing_subscriber::EnvFilter;

/// Download recent KernelCI results as offline sample data
#[derive(Debug, Parser)]
#[command(name = "kci-samples", version, about)]
struct Cli {
    /// Directory to write samples to (default: `samples` next to the binary)
    #[arg(long, value_name = "DIR")]
    samples_dir: Option<PathBuf>,

    /// Number of records to fetch per category
    #[arg(long, value_name = "N")]
    sample_size: Option<usize>,

    /// JSON configuration file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// URL marker of the lab that publishes boot-* instead of lava-json-* files
    #[arg(long, value_name = "MARKER")]
    non_lava_lab: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = match Config::load(cli.config.as_deref()).await {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Failed to load configuration");
            std::process::exit(e.exit_code());
        }
    };

    if let Some(dir) = cli.samples_dir {
        config.samples_dir = dir;
    }
    if let Some(size) = cli.sample_size {
        config.sample_size = size;
    }
    if let Some(marker) = cli.non_lava_lab {
        config.non_lava_lab = marker;
    }

    if let Err(e) = config.validate() {
        tracing::error!(error = %e, "Invalid configuration");
        std::process::exit(e.exit_code());
    }

    let persister = Persister::from_config(&config);
    let source = match KernelCiSource::from_config(&config, persister.session().clone()) {
        Ok(source) => source,
        Err(e) => {
            tracing::error!(error = %e, "Failed to set up KernelCI client");
            std::process::exit(e.exit_code());
        }
    };

    let status = kci_samples::run(&config, &source, &persister).await;
    std::process::exit(status);
}
