//! Error types for kci-samples
//!
//! Two layers of errors live here:
//! - [`Error`] covers run-level failures (configuration, samples directory,
//!   KernelCI API access). These abort a run.
//! - [`FetchError`] classifies why a single sample could not be persisted.
//!   These never abort a batch; they end up in the failed map.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for kci-samples operations
pub type Result<T> = std::result::Result<T, Error>;

/// Exit code reported when the samples directory cannot be used
pub const EXIT_SAMPLES_DIR: i32 = -1;

/// Exit code reported when sample records cannot be listed
pub const EXIT_SOURCE: i32 = -2;

/// Main error type for kci-samples
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "sample_size")
        key: Option<String>,
    },

    /// Samples directory is missing, cannot be created or is not writable
    #[error("samples directory {path} is not usable: {reason}")]
    SamplesDir {
        /// The directory that was checked
        path: PathBuf,
        /// Why the directory cannot be used
        reason: String,
    },

    /// KernelCI API answered with a non-success status
    #[error("KernelCI API returned HTTP {status} for {url}")]
    Api {
        /// HTTP status code returned by the API
        status: u16,
        /// The requested URL
        url: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Network error
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Malformed URL in configuration or API data
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Build a configuration error for the given key
    pub fn config(key: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Config {
            message: message.into(),
            key: Some(key.into()),
        }
    }

    /// Negative process exit code for run-fatal errors
    ///
    /// Samples directory problems map to [`EXIT_SAMPLES_DIR`]; everything
    /// else that can stop a run before persisting maps to [`EXIT_SOURCE`].
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::SamplesDir { .. } => EXIT_SAMPLES_DIR,
            _ => EXIT_SOURCE,
        }
    }
}

/// Why a single sample failed to persist
#[derive(Debug, Error)]
pub enum FetchError {
    /// Shared HTTP client could not be built
    #[error("HTTP client unavailable: {0}")]
    Session(String),

    /// DNS, connect, TLS, timeout or reset while talking to the server
    #[error("connection issues: {0}")]
    Connection(#[source] reqwest::Error),

    /// Server answered with anything other than 200
    #[error("HTTP response: status_code = {0}")]
    Status(u16),

    /// Response body could not be read or decoded as text
    #[error("unreadable response body: {0}")]
    Body(#[source] reqwest::Error),

    /// Response body is not valid UTF-8 text
    #[error("response body is not valid UTF-8: {0}")]
    Decode(#[source] std::string::FromUtf8Error),

    /// Sample could not be written into the samples directory
    #[error("failed to write {path}: {source}")]
    Write {
        /// Destination file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}
