// ABOUTME: Deployment orchestration using the type state pattern.
// ABOUTME: Exports the state machine, wait policy, classifier and entry points.

mod classify;
mod clean;
mod deployment;
mod error;
mod inspect;
mod publish;
mod search;
mod state;
mod transitions;
mod upload;
mod wait;

pub use classify::{format_errors, has_errors};
pub use clean::{CleanAction, CleanEntry, CleanOptions, CleanReport, CleanTarget, clean};
pub use deployment::Deployment;
pub use error::{DeployError, DeployErrorKind, Phase};
pub use inspect::{is_published, status};
pub use publish::{PublishAction, PublishReport, Target, publish_now, release};
pub use search::{
    DeploymentFilter, SEARCH_LIMIT, find_latest, find_latest_validated, list_newest,
};
pub use state::{AwaitingPublication, Published, Publishing, Uploaded, Validated};
pub use transitions::ValidationOutcome;
pub use upload::{DeployReport, Outcome, await_outcome, upload_and_wait};
pub use wait::{
    DEFAULT_POLL_INTERVAL, DEFAULT_PUBLISHING_WAIT, DEFAULT_VALIDATION_WAIT, WaitBudget,
    WaitPolicy,
};
