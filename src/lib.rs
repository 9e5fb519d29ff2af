//! # kci-samples
//!
//! Downloads a bounded batch of recently created KernelCI results (build
//! artifacts and LAVA test-run logs) and stores them as JSON files for use as
//! offline sample data.
//!
//! ## Flow
//!
//! 1. The samples directory is created if needed and checked for write access.
//! 2. A [`SampleSource`](source::SampleSource) lists the newest lava and build
//!    records as `id -> download URL` maps.
//! 3. The [`Persister`] downloads every URL with one shared HTTP client and
//!    writes `{category}_{id}.json` files. Labs that only publish `boot-*`
//!    files are handled by [`OverrideRules`].
//! 4. Saved/failed counts are logged per category (lavas, builds, boots).
//!
//! ## Quick Start
//!
//! ```no_run
//! use kci_samples::source::KernelCiSource;
//! use kci_samples::{Config, Persister, generate_samples};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load(None).await?;
//!     let persister = Persister::from_config(&config);
//!     let source = KernelCiSource::from_config(&config, persister.session().clone())?;
//!
//!     let summary = generate_samples(&config, &source, &persister).await?;
//!     println!("saved {} builds", summary.builds.saved);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Configuration types
pub mod config;
/// Error types
pub mod error;
/// Generation run orchestration
pub mod generate;
/// Shared HTTP client
pub mod http;
/// Lab-specific URL overrides
pub mod overrides;
/// Download-and-persist engine
pub mod persist;
/// Samples directory validation
pub mod samples_dir;
/// Sample record sources
pub mod source;
/// Core types
pub mod types;

// Re-export commonly used types
pub use config::Config;
pub use error::{Error, FetchError, Result};
pub use generate::{generate_samples, run};
pub use http::HttpSession;
pub use overrides::{OverrideRule, OverrideRules};
pub use persist::Persister;
pub use samples_dir::is_samples_dir_ok;
pub use types::{Category, CategoryCounts, Descriptors, PersistOutcome, RecordId, RunSummary};
