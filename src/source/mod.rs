//! Sources of sample descriptors
//!
//! A [`SampleSource`] lists the most recently created records of each
//! category and returns the URL their JSON payload can be downloaded from.

mod kernelci;

pub use kernelci::KernelCiSource;

use crate::error::Result;
use crate::types::Descriptors;
use async_trait::async_trait;

/// Lists recently created build and lava records
///
/// # Examples
///
/// ```no_run
/// use kci_samples::source::{KernelCiSource, SampleSource};
/// use kci_samples::{Config, HttpSession};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = Config::default();
/// let source = KernelCiSource::from_config(&config, HttpSession::new(config.http.clone()))?;
///
/// let builds = source.builds(5).await?;
/// for (id, url) in &builds {
///     println!("{id}: {url}");
/// }
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait SampleSource: Send + Sync {
    /// Up to `how_many` recent build records, id to `build.json` URL
    async fn builds(&self, how_many: usize) -> Result<Descriptors>;

    /// Up to `how_many` recent lava records, id to `lava-json-*.json` URL
    async fn lavas(&self, how_many: usize) -> Result<Descriptors>;

    /// Human-readable name for logging
    fn name(&self) -> &'static str;
}

/// Fixed, in-memory descriptors
///
/// Useful for offline runs and tests. When more descriptors are stored than
/// requested, the ones with the smallest identifiers are returned.
#[derive(Clone, Debug, Default)]
pub struct StaticSource {
    builds: Descriptors,
    lavas: Descriptors,
}

impl StaticSource {
    /// Create a source serving the given batches
    pub fn new(builds: Descriptors, lavas: Descriptors) -> Self {
        Self { builds, lavas }
    }
}

fn take(descriptors: &Descriptors, how_many: usize) -> Descriptors {
    let mut ids: Vec<_> = descriptors.keys().collect();
    ids.sort();
    ids.into_iter()
        .take(how_many)
        .map(|id| (id.clone(), descriptors[id].clone()))
        .collect()
}

#[async_trait]
impl SampleSource for StaticSource {
    async fn builds(&self, how_many: usize) -> Result<Descriptors> {
        Ok(take(&self.builds, how_many))
    }

    async fn lavas(&self, how_many: usize) -> Result<Descriptors> {
        Ok(take(&self.lavas, how_many))
    }

    fn name(&self) -> &'static str {
        "static"
    }
}
