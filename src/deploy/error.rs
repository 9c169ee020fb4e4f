// ABOUTME: Error types for deployment lifecycle operations.
// ABOUTME: Every failure carries the deployment id and last observed state when known.

use crate::client::{ClientError, ClientErrorKind, DeploymentState};
use crate::types::{Coordinates, DeploymentId};
use std::fmt;
use std::time::Duration;

/// Which wait loop was running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Validation,
    Publishing,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Validation => f.write_str("validation"),
            Phase::Publishing => f.write_str("publishing"),
        }
    }
}

fn state_or_unknown(state: &Option<DeploymentState>) -> String {
    state
        .as_ref()
        .map(|s| s.to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Errors that end an orchestration run.
#[derive(Debug, thiserror::Error)]
pub enum DeployError {
    /// The repository call itself failed.
    #[error(transparent)]
    Client(#[from] ClientError),

    /// A local precondition failed.
    #[error("invalid input: {0}")]
    Validation(String),

    /// The deployment reached FAILED.
    #[error("deployment {id} failed\n{errors}")]
    FailedState { id: DeploymentId, errors: String },

    /// The deployment was validated but reported errors.
    #[error("deployment {id} is {state} but reported errors\n{errors}")]
    ErrorsPresent {
        id: DeploymentId,
        state: DeploymentState,
        errors: String,
    },

    /// The phase budget ran out before a terminal state.
    #[error(
        "timed out waiting for {phase} of deployment {id} after {elapsed:?} (budget {budget:?}, last state: {})",
        state_or_unknown(.last_state)
    )]
    Timeout {
        phase: Phase,
        id: DeploymentId,
        last_state: Option<DeploymentState>,
        elapsed: Duration,
        budget: Duration,
    },

    /// Waiting was cancelled locally. The remote deployment is untouched.
    #[error(
        "waiting for {phase} of deployment {id} was interrupted (last state: {})",
        state_or_unknown(.last_state)
    )]
    Interrupted {
        phase: Phase,
        id: DeploymentId,
        last_state: Option<DeploymentState>,
    },

    /// No deployment matched the search.
    #[error("no VALIDATED deployment found for {coordinates}")]
    NoMatchFound { coordinates: Coordinates },

    /// The service reported a state outside the known enumeration.
    #[error("deployment {id} has unexpected state {state}")]
    UnexpectedState {
        id: DeploymentId,
        state: DeploymentState,
    },

    /// The deployment is in a state the requested action cannot start from.
    #[error("deployment {id} is not in a publishable state ({expected}); current state: {state}")]
    NotPublishable {
        id: DeploymentId,
        state: DeploymentState,
        expected: &'static str,
    },
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeployErrorKind {
    Auth,
    NotFound,
    BadRequest,
    ServerError,
    UnexpectedStatus,
    Transport,
    Decode,
    Validation,
    FailedState,
    ErrorsPresent,
    Timeout,
    Interrupted,
    NoMatchFound,
    UnexpectedState,
    NotPublishable,
}

impl DeployError {
    pub fn kind(&self) -> DeployErrorKind {
        match self {
            DeployError::Client(e) => match e.kind() {
                ClientErrorKind::Validation => DeployErrorKind::Validation,
                ClientErrorKind::BadRequest => DeployErrorKind::BadRequest,
                ClientErrorKind::Auth => DeployErrorKind::Auth,
                ClientErrorKind::NotFound => DeployErrorKind::NotFound,
                ClientErrorKind::ServerError => DeployErrorKind::ServerError,
                ClientErrorKind::UnexpectedStatus => DeployErrorKind::UnexpectedStatus,
                ClientErrorKind::Transport => DeployErrorKind::Transport,
                ClientErrorKind::Decode => DeployErrorKind::Decode,
            },
            DeployError::Validation(_) => DeployErrorKind::Validation,
            DeployError::FailedState { .. } => DeployErrorKind::FailedState,
            DeployError::ErrorsPresent { .. } => DeployErrorKind::ErrorsPresent,
            DeployError::Timeout { .. } => DeployErrorKind::Timeout,
            DeployError::Interrupted { .. } => DeployErrorKind::Interrupted,
            DeployError::NoMatchFound { .. } => DeployErrorKind::NoMatchFound,
            DeployError::UnexpectedState { .. } => DeployErrorKind::UnexpectedState,
            DeployError::NotPublishable { .. } => DeployErrorKind::NotPublishable,
        }
    }

    /// The deployment this failure concerns, if one was selected.
    pub fn deployment_id(&self) -> Option<&DeploymentId> {
        match self {
            DeployError::FailedState { id, .. }
            | DeployError::ErrorsPresent { id, .. }
            | DeployError::Timeout { id, .. }
            | DeployError::Interrupted { id, .. }
            | DeployError::UnexpectedState { id, .. }
            | DeployError::NotPublishable { id, .. } => Some(id),
            _ => None,
        }
    }

    /// The last state observed before failing.
    pub fn last_state(&self) -> Option<&DeploymentState> {
        match self {
            DeployError::FailedState { .. } => Some(&DeploymentState::Failed),
            DeployError::ErrorsPresent { state, .. }
            | DeployError::UnexpectedState { state, .. }
            | DeployError::NotPublishable { state, .. } => Some(state),
            DeployError::Timeout { last_state, .. } | DeployError::Interrupted { last_state, .. } => {
                last_state.as_ref()
            }
            _ => None,
        }
    }

    /// The phase a wait failure happened in.
    pub fn phase(&self) -> Option<Phase> {
        match self {
            DeployError::Timeout { phase, .. } | DeployError::Interrupted { phase, .. } => {
                Some(*phase)
            }
            _ => None,
        }
    }
}
