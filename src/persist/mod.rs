//! Download-and-persist loop for sample batches
//!
//! Each descriptor of a batch is handled independently: the URL is passed
//! through the override rules, fetched with the shared HTTP client and, on a
//! 200 response, written to `{category}_{id}.json` in the samples directory.
//! Any failure is logged and recorded; the batch always runs to completion.

use crate::config::Config;
use crate::error::FetchError;
use crate::http::HttpSession;
use crate::overrides::OverrideRules;
use crate::types::{Category, Descriptors, PersistOutcome, RecordId};
use std::path::Path;
use tracing::{debug, error, info, warn};


/// Persistence engine for sample batches
#[derive(Clone, Debug)]
pub struct Persister {
    session: HttpSession,
    rules: OverrideRules,
}

impl Persister {
    /// Create a persister using the given HTTP session and override rules
    pub fn new(session: HttpSession, rules: OverrideRules) -> Self {
        Self { session, rules }
    }

    /// Create a persister with a fresh session and the configured rules
    pub fn from_config(config: &Config) -> Self {
        Self::new(HttpSession::new(config.http.clone()), config.override_rules())
    }

    /// HTTP session used for downloads
    pub fn session(&self) -> &HttpSession {
        &self.session
    }

    /// Download every descriptor and write successes to `samples_dir`
    ///
    /// `samples_dir` must already exist and be writable (see
    /// [`crate::samples_dir::is_samples_dir_ok`]). Existing files with the same
    /// name are overwritten.
    ///
    /// The returned outcome partitions the input identifiers: saved ones map to
    /// the file name, failed ones to the URL that was actually requested and
    /// the category it was fetched under. A failed write or a body that is not
    /// valid UTF-8 counts as a failed sample, like a failed download.
    pub async fn persist(
        &self,
        category: Category,
        descriptors: &Descriptors,
        samples_dir: &Path,
    ) -> PersistOutcome {
        let mut outcome = PersistOutcome::default();

        if descriptors.is_empty() {
            warn!(category = %category, "Persisting skipped due to empty list of samples");
            return outcome;
        }

        for (id, url) in descriptors {
            let (effective, url) = self.rules.rewrite(category, url);
            if effective != category {
                info!(
                    url = %url,
                    category = %effective,
                    "Non-lava lab detected, switching lava-json- file to boot- file"
                );
            }

            match self.persist_one(effective, id, &url, samples_dir).await {
                Ok(file_name) => outcome.record_saved(id.clone(), file_name),
                Err(e) => {
                    error!(id = %id, url = %url, error = %e, "Failed to download sample");
                    outcome.record_failed(id.clone(), effective, url);
                }
            }
        }

        outcome
    }

    async fn persist_one(
        &self,
        category: Category,
        id: &RecordId,
        url: &str,
        samples_dir: &Path,
    ) -> std::result::Result<String, FetchError> {
        let client = self
            .session
            .client()
            .await
            .map_err(|e| FetchError::Session(e.to_string()))?;

        debug!(url = %url, "Downloading sample");
        let response = client
            .get(url)
            .send()
            .await
            .map_err(FetchError::Connection)?;

        let status = response.status().as_u16();
        if status != 200 {
            return Err(FetchError::Status(status));
        }

        let body = response.bytes().await.map_err(FetchError::Body)?;
        let content = String::from_utf8(body.to_vec()).map_err(FetchError::Decode)?;

        let file_name = category.file_name(id);
        write_atomically(&samples_dir.join(&file_name), content.as_bytes()).await?;

        debug!(bytes = content.len(), file = %file_name, "Written sample");
        Ok(file_name)
    }
}

/// Write `content` next to `path` and rename it into place
///
/// A failed write never leaves a truncated sample behind, and an existing
/// sample is only replaced once the new content is fully on disk.
async fn write_atomically(path: &Path, content: &[u8]) -> std::result::Result<(), FetchError> {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let part = path.with_file_name(format!(".{file_name}.part"));

    let written = match tokio::fs::write(&part, content).await {
        Ok(()) => tokio::fs::rename(&part, path).await,
        Err(e) => Err(e),
    };

    if let Err(source) = written {
        // best effort, the sample is already counted as failed
        let _ = tokio::fs::remove_file(&part).await;
        return Err(FetchError::Write {
            path: path.to_path_buf(),
            source,
        });
    }
    Ok(())
}
