// ABOUTME: Read-only queries against the publisher API.
// ABOUTME: Fetches one deployment status or checks whether coordinates are published.

use crate::client::{DeploymentStatus, RepositoryApi};
use crate::types::{Coordinates, DeploymentId};
use tracing::debug;

use super::error::DeployError;

pub async fn status<A: RepositoryApi + ?Sized>(
    api: &A,
    id: &DeploymentId,
) -> Result<DeploymentStatus, DeployError> {
    let status = api.deployment_status(id).await?;
    debug!(deployment = %id, state = %status.state(), "fetched status");
    Ok(status)
}

pub async fn is_published<A: RepositoryApi + ?Sized>(
    api: &A,
    coordinates: &Coordinates,
) -> Result<bool, DeployError> {
    let published = api.is_published(coordinates).await?;
    debug!(%coordinates, published, "checked publication");
    Ok(published)
}
