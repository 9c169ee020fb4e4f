// ABOUTME: The RepositoryApi trait consumed by the deployment state machine.
// ABOUTME: Implemented over HTTP by CentralClient and by scripted fakes in tests.

use super::bundle::Bundle;
use super::error::ClientError;
use super::model::DeploymentStatus;
use crate::types::{Coordinates, DeploymentId, PublishMode};
use async_trait::async_trait;
use serde::Serialize;

/// Remote operations on deployments. Implementations never retry.
#[async_trait]
pub trait RepositoryApi: Send + Sync {
    /// Upload a bundle and return the identifier the service assigned to it.
    async fn upload_bundle(
        &self,
        bundle: &Bundle,
        mode: PublishMode,
    ) -> Result<DeploymentId, ClientError>;

    /// Fetch the current status snapshot of a deployment.
    async fn deployment_status(&self, id: &DeploymentId)
    -> Result<DeploymentStatus, ClientError>;

    /// Ask the service to publish a validated deployment.
    async fn publish_deployment(&self, id: &DeploymentId) -> Result<(), ClientError>;

    /// List deployments of a namespace in the requested order.
    async fn list_deployments(
        &self,
        request: &ListRequest,
    ) -> Result<Vec<DeploymentStatus>, ClientError>;

    /// Remove a deployment server-side.
    async fn drop_deployment(&self, id: &DeploymentId) -> Result<(), ClientError>;

    /// Whether the given coordinates are already published.
    async fn is_published(&self, coordinates: &Coordinates) -> Result<bool, ClientError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

/// Body of a deployment listing request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListRequest {
    pub namespace: String,
    pub offset: u32,
    pub limit: u32,
    pub sort_field: String,
    pub sort_direction: SortDirection,
}

impl ListRequest {
    pub const CREATE_TIMESTAMP: &'static str = "createTimestamp";

    /// Most recently created deployments first.
    pub fn newest_first(namespace: impl Into<String>, limit: u32) -> Self {
        Self {
            namespace: namespace.into(),
            offset: 0,
            limit,
            sort_field: Self::CREATE_TIMESTAMP.to_string(),
            sort_direction: SortDirection::Desc,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newest_first_serializes_camel_case() {
        let request = ListRequest::newest_first("org.example", 500);
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "namespace": "org.example",
                "offset": 0,
                "limit": 500,
                "sortField": "createTimestamp",
                "sortDirection": "desc"
            })
        );
    }
}
