// ABOUTME: Upload-and-wait: the primary workflow from local bundle to outcome.
// ABOUTME: Decides whether to stop at VALIDATED or follow the deployment to PUBLISHED.

use crate::client::{Bundle, DeploymentState, RepositoryApi};
use crate::types::{DeploymentId, PublishMode};
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::info;

use super::deployment::Deployment;
use super::error::DeployError;
use super::state::Uploaded;
use super::transitions::ValidationOutcome;
use super::wait::WaitPolicy;

/// How a successful run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Validated; a user must publish it.
    AwaitingManualPublish,
    /// Publishing is underway and was not waited for.
    PublishingStarted,
    /// Published.
    Published,
}

/// Summary of a successful run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeployReport {
    pub deployment_id: DeploymentId,
    pub state: DeploymentState,
    pub outcome: Outcome,
    pub components: Vec<String>,
}

impl DeployReport {
    fn new<S>(deployment: &Deployment<S>, state: DeploymentState, outcome: Outcome) -> Self {
        Self {
            deployment_id: deployment.id().clone(),
            state,
            outcome,
            components: deployment.components(),
        }
    }
}

/// Drive an uploaded deployment to its outcome under `policy`.
pub async fn await_outcome<A: RepositoryApi + ?Sized>(
    api: &A,
    deployment: Deployment<Uploaded>,
    policy: &WaitPolicy,
    cancel: &CancellationToken,
) -> Result<DeployReport, DeployError> {
    let mode = deployment.mode();
    let report = match deployment.wait_for_validation(api, policy, cancel).await? {
        ValidationOutcome::Validated(d) if mode == PublishMode::UserManaged => {
            DeployReport::new(&d, DeploymentState::Validated, Outcome::AwaitingManualPublish)
        }
        ValidationOutcome::Validated(d) if policy.wait_for_completion => {
            let published = d.wait_for_publishing(api, policy, cancel).await?;
            DeployReport::new(&published, DeploymentState::Published, Outcome::Published)
        }
        ValidationOutcome::Validated(d) => {
            DeployReport::new(&d, DeploymentState::Validated, Outcome::PublishingStarted)
        }
        ValidationOutcome::Publishing(d) if policy.wait_for_completion => {
            let published = d.wait_for_publishing(api, policy, cancel).await?;
            DeployReport::new(&published, DeploymentState::Published, Outcome::Published)
        }
        ValidationOutcome::Publishing(d) => {
            DeployReport::new(&d, DeploymentState::Publishing, Outcome::PublishingStarted)
        }
        ValidationOutcome::Published(d) => {
            DeployReport::new(&d, DeploymentState::Published, Outcome::Published)
        }
    };
    info!(
        deployment = %report.deployment_id,
        state = %report.state,
        outcome = ?report.outcome,
        "deployment finished"
    );
    Ok(report)
}

/// Upload `bundle` and wait for its outcome.
pub async fn upload_and_wait<A: RepositoryApi + ?Sized>(
    api: &A,
    bundle: &Bundle,
    mode: PublishMode,
    policy: &WaitPolicy,
    cancel: &CancellationToken,
) -> Result<DeployReport, DeployError> {
    let deployment = Deployment::upload(api, bundle, mode).await?;
    await_outcome(api, deployment, policy, cancel).await
}
