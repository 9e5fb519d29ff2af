//! Configuration types for kci-samples
//!
//! Values are layered, lowest precedence first: built-in defaults, an
//! optional JSON config file, `KCI_*` environment variables (a `.env` file is
//! honoured), then command-line flags applied by the binary.

use crate::error::{Error, Result};
use crate::overrides::{DEFAULT_NON_LAVA_LAB, OverrideRules};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable holding the KernelCI API base URL
pub const ENV_API_URL: &str = "KCI_API_URL";
/// Environment variable holding the KernelCI storage base URL
pub const ENV_STORAGE_URL: &str = "KCI_STORAGE_URL";
/// Environment variable holding the KernelCI API token
pub const ENV_API_TOKEN: &str = "KCI_API_TOKEN";
/// Environment variable holding the non-lava lab marker
pub const ENV_NON_LAVA_LAB: &str = "KCI_NON_LAVA_LAB";
/// Environment variable overriding the samples directory
pub const ENV_SAMPLES_DIR: &str = "KCI_SAMPLES_DIR";
/// Environment variable overriding the sample size
pub const ENV_SAMPLE_SIZE: &str = "KCI_SAMPLE_SIZE";

/// HTTP client settings shared by every request of a run
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Per-request timeout in seconds (default: 30)
    #[serde(default = "default_http_timeout", with = "duration_serde")]
    pub timeout: Duration,

    /// User-Agent header sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: default_http_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

/// KernelCI backend endpoints and credentials
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KernelCiConfig {
    /// Base URL of the KernelCI REST API
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Base URL of the KernelCI file storage
    #[serde(default = "default_storage_url")]
    pub storage_url: String,

    /// API token sent in the `Authorization` header
    #[serde(default)]
    pub token: Option<String>,
}

impl Default for KernelCiConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            storage_url: default_storage_url(),
            token: None,
        }
    }
}

/// Main configuration for a sample generation run
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Where sample files are written (default: `samples` next to the executable)
    #[serde(default = "default_samples_dir")]
    pub samples_dir: PathBuf,

    /// How many records of each category to fetch (default: 10)
    #[serde(default = "default_sample_size")]
    pub sample_size: usize,

    /// URL marker of the lab that publishes `boot-*` instead of `lava-json-*`
    #[serde(default = "default_non_lava_lab")]
    pub non_lava_lab: String,

    /// Explicit override rules; when unset, a single rule is derived from
    /// `non_lava_lab`
    #[serde(default)]
    pub overrides: Option<OverrideRules>,

    /// HTTP client settings
    #[serde(default)]
    pub http: HttpConfig,

    /// KernelCI endpoints
    #[serde(default)]
    pub kernelci: KernelCiConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            samples_dir: default_samples_dir(),
            sample_size: default_sample_size(),
            non_lava_lab: default_non_lava_lab(),
            overrides: None,
            http: HttpConfig::default(),
            kernelci: KernelCiConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from defaults, an optional file and the environment
    ///
    /// A `.env` file in the working directory is loaded first if present.
    pub async fn load(path: Option<&Path>) -> Result<Self> {
        dotenvy::dotenv().ok();

        let mut config = match path {
            Some(path) => Self::from_file(path).await?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Read a JSON config file; missing keys fall back to defaults
    pub async fn from_file(path: &Path) -> Result<Self> {
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            Error::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to read config file '{}': {}", path.display(), e),
            ))
        })?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Apply `KCI_*` overrides using the given variable lookup
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_API_URL) {
            self.kernelci.api_url = url;
        }
        if let Some(url) = lookup(ENV_STORAGE_URL) {
            self.kernelci.storage_url = url;
        }
        if let Some(token) = lookup(ENV_API_TOKEN) {
            self.kernelci.token = Some(token);
        }
        if let Some(marker) = lookup(ENV_NON_LAVA_LAB) {
            self.non_lava_lab = marker;
        }
        if let Some(dir) = lookup(ENV_SAMPLES_DIR) {
            self.samples_dir = PathBuf::from(dir);
        }
        if let Some(size) = lookup(ENV_SAMPLE_SIZE) {
            self.sample_size = size.trim().parse().map_err(|_| {
                Error::config(
                    "sample_size",
                    format!("{ENV_SAMPLE_SIZE} must be a positive integer, got '{size}'"),
                )
            })?;
        }
        Ok(())
    }

    /// Reject settings that would make a run meaningless
    pub fn validate(&self) -> Result<()> {
        if self.sample_size == 0 {
            return Err(Error::config("sample_size", "must be greater than zero"));
        }
        if self.overrides.is_none() && self.non_lava_lab.trim().is_empty() {
            return Err(Error::config("non_lava_lab", "marker must not be empty"));
        }
        url::Url::parse(&self.kernelci.api_url)
            .map_err(|e| Error::config("kernelci.api_url", e.to_string()))?;
        url::Url::parse(&self.kernelci.storage_url)
            .map_err(|e| Error::config("kernelci.storage_url", e.to_string()))?;
        Ok(())
    }

    /// Override rules in effect for this configuration
    pub fn override_rules(&self) -> OverrideRules {
        self.overrides
            .clone()
            .unwrap_or_else(|| OverrideRules::non_lava_lab(self.non_lava_lab.clone()))
    }
}

fn default_samples_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join("samples")))
        .unwrap_or_else(|| PathBuf::from("samples"))
}

fn default_sample_size() -> usize {
    10
}

fn default_non_lava_lab() -> String {
    DEFAULT_NON_LAVA_LAB.to_string()
}

fn default_http_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_user_agent() -> String {
    concat!("kci-samples/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_api_url() -> String {
    "https://api.kernelci.org".to_string()
}

fn default_storage_url() -> String {
    "https://storage.kernelci.org".to_string()
}

// Duration serialization helper
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}
