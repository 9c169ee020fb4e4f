// ABOUTME: Publish-now and release-latest-validated entry points.
// ABOUTME: Resolve a target to a deployment, re-read its state, then publish it.

use crate::client::{DeploymentState, DeploymentStatus, RepositoryApi};
use crate::types::{Coordinates, DeploymentId};
use serde::Serialize;
use tracing::info;

use super::deployment::Deployment;
use super::error::DeployError;
use super::search::find_latest_validated;
use super::state::Validated;

/// Which deployment to act on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// An explicit deployment id.
    Id(DeploymentId),
    /// The newest VALIDATED deployment containing these coordinates.
    Latest(Coordinates),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PublishAction {
    /// The publish call was made.
    Published,
    /// Dry run: the publish call was skipped.
    WouldPublish,
    /// The deployment was already publishing; nothing was done.
    AlreadyPublishing,
}

/// What a publish or release run did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublishReport {
    pub deployment_id: DeploymentId,
    /// State observed before acting.
    pub state: DeploymentState,
    pub action: PublishAction,
    pub components: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Acceptance {
    ValidatedOrPublishing,
    ValidatedOnly,
}

impl Acceptance {
    fn expected(self) -> &'static str {
        match self {
            Acceptance::ValidatedOrPublishing => "expected VALIDATED or PUBLISHING",
            Acceptance::ValidatedOnly => "expected VALIDATED",
        }
    }
}

/// Publish a deployment now. A deployment that is already publishing is left alone.
pub async fn publish_now<A: RepositoryApi + ?Sized>(
    api: &A,
    target: &Target,
    dry_run: bool,
) -> Result<PublishReport, DeployError> {
    publish_target(api, target, dry_run, Acceptance::ValidatedOrPublishing).await
}

/// Publish the selected deployment, which must be VALIDATED.
pub async fn release<A: RepositoryApi + ?Sized>(
    api: &A,
    target: &Target,
    dry_run: bool,
) -> Result<PublishReport, DeployError> {
    publish_target(api, target, dry_run, Acceptance::ValidatedOnly).await
}

async fn resolve<A: RepositoryApi + ?Sized>(
    api: &A,
    target: &Target,
) -> Result<DeploymentId, DeployError> {
    match target {
        Target::Id(id) if id.is_blank() => Err(DeployError::Validation(
            "deployment id to publish must not be blank".to_string(),
        )),
        Target::Id(id) => Ok(id.clone()),
        Target::Latest(coordinates) => {
            let found = find_latest_validated(api, coordinates).await?;
            info!(
                deployment = %found.id(),
                %coordinates,
                "found latest VALIDATED deployment"
            );
            Ok(found.deployment_id)
        }
    }
}

async fn publish_target<A: RepositoryApi + ?Sized>(
    api: &A,
    target: &Target,
    dry_run: bool,
    acceptance: Acceptance,
) -> Result<PublishReport, DeployError> {
    let id = resolve(api, target).await?;

    // The search result may be stale; decide on a fresh snapshot.
    let status = api.deployment_status(&id).await?;
    let state = status.state().clone();
    let components: Vec<String> = status.purls().map(str::to_string).collect();

    let action = match &state {
        DeploymentState::Validated if dry_run => {
            info!(deployment = %id, "dry run: would publish deployment");
            PublishAction::WouldPublish
        }
        DeploymentState::Validated => {
            Deployment::observed(status, Validated).publish(api).await?;
            PublishAction::Published
        }
        DeploymentState::Publishing if acceptance == Acceptance::ValidatedOrPublishing => {
            info!(deployment = %id, "deployment is already publishing");
            PublishAction::AlreadyPublishing
        }
        _ => return Err(not_publishable(status, acceptance)),
    };

    Ok(PublishReport {
        deployment_id: id,
        state,
        action,
        components,
    })
}

fn not_publishable(status: DeploymentStatus, acceptance: Acceptance) -> DeployError {
    DeployError::NotPublishable {
        id: status.deployment_id,
        state: status.deployment_state,
        expected: acceptance.expected(),
    }
}
