// ABOUTME: State transitions for deployments: validation wait, publishing wait, publish.
// ABOUTME: Each transition consumes the deployment and returns it in its next state.

use crate::client::{DeploymentState, DeploymentStatus, RepositoryApi};
use tokio_util::sync::CancellationToken;
use tracing::info;

use super::classify::{format_errors, has_errors};
use super::deployment::Deployment;
use super::error::{DeployError, Phase};
use super::state::{AwaitingPublication, Published, Publishing, Uploaded, Validated};
use super::wait::{Step, WaitPolicy, poll_until};

/// Where the validation phase ended.
#[derive(Debug)]
pub enum ValidationOutcome {
    /// Validated without errors; user-managed deployments stop here.
    Validated(Deployment<Validated>),
    /// Already publishing when observed.
    Publishing(Deployment<Publishing>),
    /// Already published when observed.
    Published(Deployment<Published>),
}

impl ValidationOutcome {
    pub fn state(&self) -> DeploymentState {
        match self {
            ValidationOutcome::Validated(_) => DeploymentState::Validated,
            ValidationOutcome::Publishing(_) => DeploymentState::Publishing,
            ValidationOutcome::Published(_) => DeploymentState::Published,
        }
    }
}

enum Reached {
    Validated(DeploymentStatus),
    Publishing(DeploymentStatus),
    Published(DeploymentStatus),
}

fn failed(status: &DeploymentStatus) -> DeployError {
    DeployError::FailedState {
        id: status.id().clone(),
        errors: format_errors(status),
    }
}

fn classify_validation(status: DeploymentStatus) -> Result<Step<Reached>, DeployError> {
    if status.state().is_in_progress() {
        return Ok(Step::Continue);
    }
    match status.state().clone() {
        DeploymentState::Validated if has_errors(status.effective_errors()) => {
            Err(DeployError::ErrorsPresent {
                id: status.id().clone(),
                state: DeploymentState::Validated,
                errors: format_errors(&status),
            })
        }
        DeploymentState::Validated => Ok(Step::Done(Reached::Validated(status))),
        DeploymentState::Publishing => Ok(Step::Done(Reached::Publishing(status))),
        DeploymentState::Published => Ok(Step::Done(Reached::Published(status))),
        DeploymentState::Failed => Err(failed(&status)),
        state => Err(DeployError::UnexpectedState {
            id: status.id().clone(),
            state,
        }),
    }
}

fn classify_publishing(status: DeploymentStatus) -> Result<Step<DeploymentStatus>, DeployError> {
    match status.state().clone() {
        DeploymentState::Published => Ok(Step::Done(status)),
        DeploymentState::Failed => Err(failed(&status)),
        _ => Ok(Step::Continue),
    }
}

impl Deployment<Uploaded> {
    /// Poll until the deployment leaves PENDING/VALIDATING.
    ///
    /// FAILED, VALIDATED with errors and unknown states end the wait with an
    /// error. The validation budget bounds the whole phase.
    pub async fn wait_for_validation<A: RepositoryApi + ?Sized>(
        self,
        api: &A,
        policy: &WaitPolicy,
        cancel: &CancellationToken,
    ) -> Result<ValidationOutcome, DeployError> {
        info!(deployment = %self.id, "waiting for validation");
        let reached = poll_until(
            api,
            &self.id,
            Phase::Validation,
            &policy.validation,
            policy.transient_retries,
            cancel,
            classify_validation,
        )
        .await?;

        let outcome = match reached {
            Reached::Validated(status) => {
                ValidationOutcome::Validated(self.advance(status, Validated))
            }
            Reached::Publishing(status) => {
                ValidationOutcome::Publishing(self.advance(status, Publishing))
            }
            Reached::Published(status) => {
                ValidationOutcome::Published(self.advance(status, Published))
            }
        };
        info!(state = %outcome.state(), "validation phase finished");
        Ok(outcome)
    }
}

impl<S: AwaitingPublication> Deployment<S> {
    /// Poll until PUBLISHED. FAILED ends the wait; any other state keeps polling.
    pub async fn wait_for_publishing<A: RepositoryApi + ?Sized>(
        self,
        api: &A,
        policy: &WaitPolicy,
        cancel: &CancellationToken,
    ) -> Result<Deployment<Published>, DeployError> {
        info!(deployment = %self.id, "waiting for publishing");
        let status = poll_until(
            api,
            &self.id,
            Phase::Publishing,
            &policy.publishing,
            policy.transient_retries,
            cancel,
            classify_publishing,
        )
        .await?;
        info!(deployment = %self.id, "deployment published");
        Ok(self.advance(status, Published))
    }
}

impl Deployment<Validated> {
    /// Ask the service to publish. The deployment moves to PUBLISHING remotely.
    pub async fn publish<A: RepositoryApi + ?Sized>(
        self,
        api: &A,
    ) -> Result<Deployment<Publishing>, DeployError> {
        api.publish_deployment(&self.id).await?;
        info!(deployment = %self.id, "publish requested");
        Ok(Deployment {
            id: self.id,
            last_status: self.last_status,
            state: Publishing,
        })
    }
}
