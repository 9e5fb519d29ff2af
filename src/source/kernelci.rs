//! KernelCI backend API client

use super::SampleSource;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::http::HttpSession;
use crate::types::{Descriptors, RecordId};
use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

const BUILD_RESOURCE: &str = "build";
const TEST_GROUP_RESOURCE: &str = "test/group";

/// Envelope of every KernelCI API list response
#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    #[serde(default = "Vec::new")]
    result: Vec<T>,
}

/// MongoDB object id as serialized by the API (`{"$oid": "..."}`)
#[derive(Debug, Deserialize)]
struct ObjectId {
    #[serde(rename = "$oid")]
    oid: String,
}

#[derive(Debug, Deserialize)]
struct BuildRecord {
    #[serde(rename = "_id")]
    id: ObjectId,
    #[serde(default)]
    file_server_resource: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TestGroupRecord {
    #[serde(rename = "_id")]
    id: ObjectId,
    #[serde(default)]
    file_server_resource: Option<String>,
    #[serde(default)]
    lab_name: Option<String>,
    #[serde(default)]
    device_type: Option<String>,
}

/// [`SampleSource`] backed by the KernelCI REST API and file storage
#[derive(Clone, Debug)]
pub struct KernelCiSource {
    session: HttpSession,
    api_url: Url,
    storage_url: String,
    token: Option<String>,
}

impl KernelCiSource {
    /// Create a source for the configured KernelCI instance
    ///
    /// # Errors
    /// Returns error if the configured API URL cannot be parsed
    pub fn from_config(config: &Config, session: HttpSession) -> Result<Self> {
        Ok(Self {
            session,
            api_url: Url::parse(&config.kernelci.api_url)?,
            storage_url: config.kernelci.storage_url.trim_end_matches('/').to_string(),
            token: config.kernelci.token.clone(),
        })
    }

    /// Newest `how_many` records of `resource`
    async fn query<T: DeserializeOwned>(
        &self,
        resource: &str,
        how_many: usize,
        fields: &[&str],
    ) -> Result<Vec<T>> {
        let mut url = Url::parse(&format!(
            "{}/{}",
            self.api_url.as_str().trim_end_matches('/'),
            resource
        ))?;
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("limit", &how_many.to_string())
                .append_pair("sort", "created_on")
                .append_pair("sort_order", "-1");
            for field in fields {
                query.append_pair("field", field);
            }
        }

        debug!(url = %url, "Querying KernelCI");
        let client = self.session.client().await?;
        let mut request = client.get(url.clone());
        if let Some(token) = &self.token {
            request = request.header(reqwest::header::AUTHORIZATION, token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Api {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body: ApiResponse<T> = response.json().await?;
        Ok(body.result)
    }

    fn storage_path(&self, resource: &str) -> String {
        format!("{}/{}", self.storage_url, resource.trim_matches('/'))
    }

    fn build_url(&self, record: &BuildRecord) -> Option<String> {
        let resource = record.file_server_resource.as_deref()?;
        Some(format!("{}/build.json", self.storage_path(resource)))
    }

    fn lava_url(&self, record: &TestGroupRecord) -> Option<String> {
        let resource = record.file_server_resource.as_deref()?;
        let lab = record.lab_name.as_deref()?;
        let device = record.device_type.as_deref()?;
        Some(format!(
            "{}/{}/lava-json-{}.json",
            self.storage_path(resource),
            lab,
            device
        ))
    }
}

#[async_trait]
impl SampleSource for KernelCiSource {
    async fn builds(&self, how_many: usize) -> Result<Descriptors> {
        let records: Vec<BuildRecord> = self
            .query(BUILD_RESOURCE, how_many, &["_id", "file_server_resource"])
            .await?;

        let mut descriptors = Descriptors::new();
        for record in records.iter().take(how_many) {
            match self.build_url(record) {
                Some(url) => {
                    descriptors.insert(RecordId::new(record.id.oid.clone()), url);
                }
                None => warn!(id = %record.id.oid, "Skipping build without file_server_resource"),
            }
        }
        Ok(descriptors)
    }

    async fn lavas(&self, how_many: usize) -> Result<Descriptors> {
        let records: Vec<TestGroupRecord> = self
            .query(
                TEST_GROUP_RESOURCE,
                how_many,
                &["_id", "file_server_resource", "lab_name", "device_type"],
            )
            .await?;

        let mut descriptors = Descriptors::new();
        for record in records.iter().take(how_many) {
            match self.lava_url(record) {
                Some(url) => {
                    descriptors.insert(RecordId::new(record.id.oid.clone()), url);
                }
                None => warn!(
                    id = %record.id.oid,
                    "Skipping test group without storage location, lab or device type"
                ),
            }
        }
        Ok(descriptors)
    }

    fn name(&self) -> &'static str {
        "kernelci"
    }
}
