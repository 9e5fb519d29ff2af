//! Sample generation run: list, download, persist, summarize

use crate::config::Config;
use crate::error::{Error, Result};
use crate::persist::Persister;
use crate::samples_dir::ensure_samples_dir;
use crate::source::SampleSource;
use crate::types::{Category, RunSummary};
use tracing::{error, info};

/// Download the latest lavas and builds into the configured samples directory
///
/// Fails before any download if the samples directory is unusable or the
/// source cannot list records. Individual sample failures only show up in the
/// returned counts.
pub async fn generate_samples(
    config: &Config,
    source: &dyn SampleSource,
    persister: &Persister,
) -> Result<RunSummary> {
    info!("Generating sample data");

    let samples_dir = config.samples_dir.as_path();
    ensure_samples_dir(samples_dir).await?;

    let lavas = source.lavas(config.sample_size).await?;
    let builds = source.builds(config.sample_size).await?;

    info!(
        source = source.name(),
        "Retrieved {} lavas and {} builds",
        lavas.len(),
        builds.len()
    );

    let lava_outcome = persister.persist(Category::Lava, &lavas, samples_dir).await;
    let build_outcome = persister
        .persist(Category::Build, &builds, samples_dir)
        .await;

    let summary = RunSummary::from_outcomes(&lava_outcome, &build_outcome);

    info!(
        "Lavas: saved {} to disk, {} failed",
        summary.lavas.saved, summary.lavas.failed
    );
    info!(
        "Builds: saved {} to disk, {} failed",
        summary.builds.saved, summary.builds.failed
    );
    info!(
        "Boots: saved {} to disk, {} failed",
        summary.boots.saved, summary.boots.failed
    );

    Ok(summary)
}

/// Run a generation and map the result to a process status code
///
/// Returns `0` on success, [`crate::error::EXIT_SAMPLES_DIR`] if the samples
/// directory is unusable and [`crate::error::EXIT_SOURCE`] if records could
/// not be listed.
pub async fn run(config: &Config, source: &dyn SampleSource, persister: &Persister) -> i32 {
    match generate_samples(config, source, persister).await {
        Ok(_) => 0,
        Err(e) => {
            match &e {
                Error::SamplesDir { .. } => {
                    error!(error = %e, "Aborting: samples directory is not usable")
                }
                _ => error!(error = %e, "Aborting: could not list samples"),
            }
            e.exit_code()
        }
    }
}
