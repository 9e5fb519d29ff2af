//! Lazily-built HTTP client shared by every request of a run

use crate::config::HttpConfig;
use crate::error::{Error, Result};
use reqwest::header::{CONNECTION, HeaderMap, HeaderValue};
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::debug;

/// Handle to the process-wide HTTP connection pool
///
/// The underlying `reqwest::Client` is built on first use and reused for the
/// lifetime of the session, keeping connections alive between downloads.
/// Clones share the same client.
#[derive(Clone, Debug)]
pub struct HttpSession {
    config: HttpConfig,
    client: Arc<OnceCell<reqwest::Client>>,
}

impl HttpSession {
    /// Create a session; no client is built until the first request
    pub fn new(config: HttpConfig) -> Self {
        Self {
            config,
            client: Arc::new(OnceCell::new()),
        }
    }

    /// Shared client, building it on first call
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created (e.g. TLS backend
    /// initialisation failure)
    pub async fn client(&self) -> Result<&reqwest::Client> {
        self.client
            .get_or_try_init(|| async { build_client(&self.config) })
            .await
    }

    /// Whether the client has been built yet
    pub fn is_initialized(&self) -> bool {
        self.client.initialized()
    }

    /// Settings this session builds its client with
    pub fn config(&self) -> &HttpConfig {
        &self.config
    }
}

impl Default for HttpSession {
    fn default() -> Self {
        Self::new(HttpConfig::default())
    }
}

fn build_client(config: &HttpConfig) -> Result<reqwest::Client> {
    debug!(timeout_secs = config.timeout.as_secs(), "Creating shared HTTP client");

    let mut headers = HeaderMap::new();
    headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));

    reqwest::Client::builder()
        .timeout(config.timeout)
        .user_agent(config.user_agent.as_str())
        .default_headers(headers)
        .build()
        .map_err(|e| Error::Other(format!("Failed to create HTTP client: {}", e)))
}
