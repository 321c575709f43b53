//! Data source abstraction

use thiserror::Error;

use crate::model::{Resource, Snapshot};

/// Trait for data sources
#[async_trait::async_trait]
pub trait DataSource: Send + Sync {
    /// Fetch the current snapshot of one resource
    async fn fetch(&self, resource: Resource) -> Result<Snapshot, FetchError>;

    /// Get the source name (base URL or "demo")
    fn source_name(&self) -> &str;
}

/// Errors that can occur while fetching a resource
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("request for {resource} failed: {message}")]
    Network { resource: Resource, message: String },

    #[error("{resource} endpoint answered with HTTP {status}")]
    Status { resource: Resource, status: u16 },

    #[error("malformed {resource} payload: {source}")]
    MalformedPayload {
        resource: Resource,
        source: serde_json::Error,
    },
}

/// Coarse failure classification used in diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    NetworkFailure,
    MalformedPayload,
}

impl FetchError {
    pub fn resource(&self) -> Resource {
        match self {
            FetchError::Network { resource, .. }
            | FetchError::Status { resource, .. }
            | FetchError::MalformedPayload { resource, .. } => *resource,
        }
    }

    pub fn kind(&self) -> FailureKind {
        match self {
            FetchError::Network { .. } | FetchError::Status { .. } => FailureKind::NetworkFailure,
            FetchError::MalformedPayload { .. } => FailureKind::MalformedPayload,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_kinds() {
        let status = FetchError::Status { resource: Resource::Geo, status: 503 };
        assert_eq!(status.kind(), FailureKind::NetworkFailure);
        assert_eq!(status.resource(), Resource::Geo);
        assert_eq!(status.to_string(), "geo endpoint answered with HTTP 503");

        let parse = serde_json::from_str::<u64>("{").unwrap_err();
        let malformed = FetchError::MalformedPayload { resource: Resource::Alerts, source: parse };
        assert_eq!(malformed.kind(), FailureKind::MalformedPayload);
    }
}
