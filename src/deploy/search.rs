// ABOUTME: Newest-first deployment search shared by publish, release and clean.
// ABOUTME: The first listed deployment matching the filter wins.

use crate::client::{DeploymentState, DeploymentStatus, ListRequest, RepositoryApi};
use crate::types::Coordinates;
use tracing::debug;

use super::error::DeployError;

/// How many deployments one search looks at.
pub const SEARCH_LIMIT: u32 = 500;

/// Predicate over listed deployments. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeploymentFilter {
    pub state: Option<DeploymentState>,
    pub purl_prefix: Option<String>,
}

impl DeploymentFilter {
    pub fn any() -> Self {
        Self::default()
    }

    pub fn in_state(mut self, state: DeploymentState) -> Self {
        self.state = Some(state);
        self
    }

    pub fn with_purl_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.purl_prefix = Some(prefix.into());
        self
    }

    /// VALIDATED deployments containing a component at these coordinates.
    pub fn validated(coordinates: &Coordinates) -> Self {
        Self::any()
            .in_state(DeploymentState::Validated)
            .with_purl_prefix(coordinates.purl_prefix())
    }

    pub fn matches(&self, status: &DeploymentStatus) -> bool {
        if let Some(state) = &self.state
            && status.state() != state
        {
            return false;
        }
        match &self.purl_prefix {
            Some(prefix) => status.purls().any(|purl| purl.starts_with(prefix.as_str())),
            None => true,
        }
    }
}

/// List up to `limit` deployments of a namespace, newest first.
pub async fn list_newest<A: RepositoryApi + ?Sized>(
    api: &A,
    namespace: &str,
    limit: u32,
) -> Result<Vec<DeploymentStatus>, DeployError> {
    let request = ListRequest::newest_first(namespace, limit);
    let deployments = api.list_deployments(&request).await?;
    debug!(namespace, count = deployments.len(), "listed deployments");
    Ok(deployments)
}

/// The newest deployment of `namespace` that satisfies `filter`.
pub async fn find_latest<A: RepositoryApi + ?Sized>(
    api: &A,
    namespace: &str,
    filter: &DeploymentFilter,
) -> Result<Option<DeploymentStatus>, DeployError> {
    let candidates = list_newest(api, namespace, SEARCH_LIMIT).await?;
    Ok(candidates.into_iter().find(|status| filter.matches(status)))
}

/// The newest VALIDATED deployment for the coordinates, or `NoMatchFound`.
pub async fn find_latest_validated<A: RepositoryApi + ?Sized>(
    api: &A,
    coordinates: &Coordinates,
) -> Result<DeploymentStatus, DeployError> {
    find_latest(
        api,
        coordinates.namespace(),
        &DeploymentFilter::validated(coordinates),
    )
    .await?
    .ok_or_else(|| DeployError::NoMatchFound {
        coordinates: coordinates.clone(),
    })
}
