// ABOUTME: Wait budgets and the shared status polling loop.
// ABOUTME: Checks cancellation before each poll and races it against each sleep.

use crate::client::{DeploymentState, DeploymentStatus, RepositoryApi};
use crate::types::DeploymentId;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::error::{DeployError, Phase};

pub const DEFAULT_VALIDATION_WAIT: Duration = Duration::from_secs(300);
pub const DEFAULT_PUBLISHING_WAIT: Duration = Duration::from_secs(600);
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// How long one phase may take and how often it is polled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitBudget {
    max_wait: Duration,
    poll_interval: Duration,
}

impl WaitBudget {
    /// Requires `0 < poll_interval < max_wait`.
    pub fn new(max_wait: Duration, poll_interval: Duration) -> Result<Self, DeployError> {
        if poll_interval.is_zero() {
            return Err(DeployError::Validation(
                "poll interval must be greater than zero".to_string(),
            ));
        }
        if poll_interval >= max_wait {
            return Err(DeployError::Validation(format!(
                "poll interval ({}) must be shorter than the maximum wait ({})",
                humantime::format_duration(poll_interval),
                humantime::format_duration(max_wait)
            )));
        }
        Ok(Self {
            max_wait,
            poll_interval,
        })
    }

    pub fn max_wait(&self) -> Duration {
        self.max_wait
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }
}

/// Budgets and switches for a full upload-to-outcome run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitPolicy {
    pub validation: WaitBudget,
    pub publishing: WaitBudget,
    /// Keep waiting through PUBLISHING until PUBLISHED.
    pub wait_for_completion: bool,
    /// Consecutive transport failures tolerated per phase.
    pub transient_retries: u32,
}

impl WaitPolicy {
    pub fn new(validation: WaitBudget, publishing: WaitBudget) -> Self {
        Self {
            validation,
            publishing,
            wait_for_completion: true,
            transient_retries: 0,
        }
    }

    pub fn wait_for_completion(mut self, wait: bool) -> Self {
        self.wait_for_completion = wait;
        self
    }

    pub fn transient_retries(mut self, retries: u32) -> Self {
        self.transient_retries = retries;
        self
    }
}

impl Default for WaitPolicy {
    fn default() -> Self {
        Self::new(
            WaitBudget {
                max_wait: DEFAULT_VALIDATION_WAIT,
                poll_interval: DEFAULT_POLL_INTERVAL,
            },
            WaitBudget {
                max_wait: DEFAULT_PUBLISHING_WAIT,
                poll_interval: DEFAULT_POLL_INTERVAL,
            },
        )
    }
}

/// What the phase classifier decided about one snapshot.
pub(crate) enum Step<T> {
    Continue,
    Done(T),
}

/// Poll `id` until `decide` finishes the phase, fails it, or the budget runs out.
pub(crate) async fn poll_until<A, T, F>(
    api: &A,
    id: &DeploymentId,
    phase: Phase,
    budget: &WaitBudget,
    transient_retries: u32,
    cancel: &CancellationToken,
    mut decide: F,
) -> Result<T, DeployError>
where
    A: RepositoryApi + ?Sized,
    F: FnMut(DeploymentStatus) -> Result<Step<T>, DeployError>,
{
    let start = Instant::now();
    let mut last_state: Option<DeploymentState> = None;
    let mut failures = 0u32;

    while start.elapsed() < budget.max_wait() {
        if cancel.is_cancelled() {
            return Err(DeployError::Interrupted {
                phase,
                id: id.clone(),
                last_state,
            });
        }

        match api.deployment_status(id).await {
            Ok(status) => {
                failures = 0;
                debug!(
                    deployment = %id,
                    %phase,
                    state = %status.state(),
                    elapsed = ?start.elapsed(),
                    "polled deployment"
                );
                last_state = Some(status.state().clone());
                if let Step::Done(reached) = decide(status)? {
                    return Ok(reached);
                }
            }
            Err(e) if e.is_transient() && failures < transient_retries => {
                failures += 1;
                warn!(
                    deployment = %id,
                    %phase,
                    attempt = failures,
                    error = %e,
                    "status poll failed, retrying"
                );
            }
            Err(e) => return Err(e.into()),
        }

        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                return Err(DeployError::Interrupted {
                    phase,
                    id: id.clone(),
                    last_state,
                });
            }
            _ = tokio::time::sleep(budget.poll_interval()) => {}
        }
    }

    Err(DeployError::Timeout {
        phase,
        id: id.clone(),
        last_state,
        elapsed: start.elapsed(),
        budget: budget.max_wait(),
    })
}
