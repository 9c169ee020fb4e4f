// ABOUTME: Generic deployment struct parameterized by state marker.
// ABOUTME: Holds the server id and the most recent status snapshot.

use crate::client::{Bundle, DeploymentStatus, RepositoryApi};
use crate::types::{DeploymentId, PublishMode};
use tracing::info;

use super::error::DeployError;
use super::state::Uploaded;

/// A deployment tracked by the orchestrator, parameterized by its current state.
///
/// Transitions consume the deployment and return it in the next state, so a
/// deployment cannot be published before it validated or awaited twice.
#[derive(Debug)]
pub struct Deployment<S> {
    pub(crate) id: DeploymentId,
    pub(crate) last_status: Option<DeploymentStatus>,
    pub(crate) state: S,
}

impl Deployment<Uploaded> {
    /// Upload a bundle and start tracking the resulting deployment.
    pub async fn upload<A: RepositoryApi + ?Sized>(
        api: &A,
        bundle: &Bundle,
        mode: PublishMode,
    ) -> Result<Self, DeployError> {
        let id = api.upload_bundle(bundle, mode).await?;
        info!(deployment = %id, bundle = bundle.name(), %mode, "bundle uploaded");
        Ok(Self::attach(id, mode))
    }

    /// Track a deployment that was uploaded earlier.
    pub fn attach(id: DeploymentId, mode: PublishMode) -> Self {
        Deployment {
            id,
            last_status: None,
            state: Uploaded { mode },
        }
    }

    pub fn mode(&self) -> PublishMode {
        self.state.mode
    }
}

impl<S> Deployment<S> {
    pub(crate) fn observed(status: DeploymentStatus, state: S) -> Self {
        Deployment {
            id: status.id().clone(),
            last_status: Some(status),
            state,
        }
    }

    pub(crate) fn advance<T>(self, status: DeploymentStatus, state: T) -> Deployment<T> {
        Deployment {
            id: self.id,
            last_status: Some(status),
            state,
        }
    }

    pub fn id(&self) -> &DeploymentId {
        &self.id
    }

    /// The most recent status snapshot, if the deployment was polled.
    pub fn last_status(&self) -> Option<&DeploymentStatus> {
        self.last_status.as_ref()
    }

    /// Package URLs of the components in the last snapshot.
    pub fn components(&self) -> Vec<String> {
        self.last_status
            .as_ref()
            .map(|s| s.purls().map(str::to_string).collect())
            .unwrap_or_default()
    }
}
