//! HTTP data source backed by the IDS dashboard endpoints

use std::time::Duration;
use async_trait::async_trait;

use aw_core::{DataSource, FetchError, Resource, Snapshot};

use crate::{DashboardConfig, DataError};

/// Data source that polls the backend over HTTP
pub struct HttpSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpSource {
    /// Create a source for the given base URL
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> Result<Self, DataError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self {
            client: builder.build()?,
            base_url,
        })
    }

    pub fn from_config(config: &DashboardConfig) -> Result<Self, DataError> {
        Self::new(config.base_url.clone(), config.request_timeout()?)
    }

    /// Full URL of a resource endpoint
    pub fn endpoint(&self, resource: Resource) -> String {
        format!("{}{}", self.base_url, resource.path())
    }
}

#[async_trait]
impl DataSource for HttpSource {
    async fn fetch(&self, resource: Resource) -> Result<Snapshot, FetchError> {
        let url = self.endpoint(resource);
        tracing::debug!("GET {}", url);

        let response = self.client.get(&url).send().await.map_err(|e| FetchError::Network {
            resource,
            message: e.to_string(),
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                resource,
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(|e| FetchError::Network {
            resource,
            message: e.to_string(),
        })?;

        Snapshot::decode(resource, &body)
            .map_err(|source| FetchError::MalformedPayload { resource, source })
    }

    fn source_name(&self) -> &str {
        &self.base_url
    }
}
