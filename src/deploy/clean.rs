// ABOUTME: Clean entry point: drop one, the latest, or all deployments of a namespace.
// ABOUTME: The failed-only guard and dry run apply identically in every mode.

use crate::client::{DeploymentState, RepositoryApi};
use crate::types::DeploymentId;
use serde::Serialize;
use tracing::{info, warn};

use super::error::DeployError;
use super::search::{SEARCH_LIMIT, list_newest};

/// Which deployments to consider for dropping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CleanTarget {
    Id(DeploymentId),
    /// The most recently created deployment of the namespace.
    Latest { namespace: String },
    /// Every listed deployment of the namespace.
    All { namespace: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CleanOptions {
    /// Only drop deployments in FAILED.
    pub remove_failed_only: bool,
    pub dry_run: bool,
}

impl Default for CleanOptions {
    fn default() -> Self {
        Self {
            remove_failed_only: true,
            dry_run: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CleanAction {
    Dropped,
    WouldDrop,
    /// Kept by the failed-only guard.
    Skipped,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CleanEntry {
    pub deployment_id: DeploymentId,
    /// Unknown when an id was dropped without fetching its status.
    pub state: Option<DeploymentState>,
    pub action: CleanAction,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CleanReport {
    pub entries: Vec<CleanEntry>,
}

impl CleanReport {
    pub fn count(&self, action: CleanAction) -> usize {
        self.entries.iter().filter(|e| e.action == action).count()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Drop the targeted deployments. The first failing drop aborts the run.
pub async fn clean<A: RepositoryApi + ?Sized>(
    api: &A,
    target: &CleanTarget,
    options: CleanOptions,
) -> Result<CleanReport, DeployError> {
    if let CleanTarget::Id(id) = target
        && id.is_blank()
    {
        return Err(DeployError::Validation(
            "deployment id to drop must not be blank".to_string(),
        ));
    }

    let candidates: Vec<(DeploymentId, Option<DeploymentState>)> = match target {
        CleanTarget::Id(id) if options.remove_failed_only => {
            let status = api.deployment_status(id).await?;
            vec![(id.clone(), Some(status.deployment_state))]
        }
        CleanTarget::Id(id) => vec![(id.clone(), None)],
        CleanTarget::Latest { namespace } => list_newest(api, namespace, 1)
            .await?
            .into_iter()
            .take(1)
            .map(|s| (s.deployment_id, Some(s.deployment_state)))
            .collect(),
        CleanTarget::All { namespace } => list_newest(api, namespace, SEARCH_LIMIT)
            .await?
            .into_iter()
            .map(|s| (s.deployment_id, Some(s.deployment_state)))
            .collect(),
    };

    if candidates.is_empty() {
        info!("no deployments found to clean");
    }

    let mut report = CleanReport::default();
    for (id, state) in candidates {
        let action = if options.remove_failed_only && state != Some(DeploymentState::Failed) {
            warn!(
                deployment = %id,
                state = state.as_ref().map(|s| s.as_str()).unwrap_or("unknown"),
                "not FAILED, skipping"
            );
            CleanAction::Skipped
        } else if options.dry_run {
            info!(deployment = %id, "dry run: would drop deployment");
            CleanAction::WouldDrop
        } else {
            api.drop_deployment(&id).await?;
            info!(deployment = %id, "dropped deployment");
            CleanAction::Dropped
        };
        report.entries.push(CleanEntry {
            deployment_id: id,
            state,
            action,
        });
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_options_guard_failed_only() {
        let options = CleanOptions::default();
        assert!(options.remove_failed_only);
        assert!(!options.dry_run);
    }

    #[test]
    fn report_counts_by_action() {
        let report = CleanReport {
            entries: vec![
                CleanEntry {
                    deployment_id: DeploymentId::new("a"),
                    state: Some(DeploymentState::Failed),
                    action: CleanAction::WouldDrop,
                },
                CleanEntry {
                    deployment_id: DeploymentId::new("b"),
                    state: Some(DeploymentState::Published),
                    action: CleanAction::Skipped,
                },
            ],
        };
        assert_eq!(report.count(CleanAction::WouldDrop), 1);
        assert_eq!(report.count(CleanAction::Skipped), 1);
        assert_eq!(report.count(CleanAction::Dropped), 0);
    }
}
