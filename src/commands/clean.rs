// ABOUTME: Clean command implementation.
// ABOUTME: Drops one deployment, the latest, or all deployments of a namespace.

use super::Context;
use central_publish::deploy::{self, CleanAction, CleanOptions, CleanTarget};
use central_publish::error::{Error, Result};
use central_publish::types::DeploymentId;

pub async fn clean(
    ctx: Context,
    deployment_id: Option<String>,
    namespace: Option<String>,
    all: bool,
    include_non_failed: bool,
    dry_run: bool,
) -> Result<()> {
    let target = match deployment_id {
        Some(id) => {
            let id = DeploymentId::new(id.trim());
            if id.is_blank() {
                return Err(Error::MissingArgument(
                    "--deployment-id must not be blank".to_string(),
                ));
            }
            CleanTarget::Id(id)
        }
        None => {
            let namespace = namespace
                .or_else(|| ctx.config.project.as_ref().map(|p| p.namespace.clone()))
                .ok_or_else(|| {
                    Error::MissingArgument("--deployment-id or --namespace".to_string())
                })?;
            if all {
                CleanTarget::All { namespace }
            } else {
                CleanTarget::Latest { namespace }
            }
        }
    };
    let options = CleanOptions {
        remove_failed_only: ctx.config.clean.remove_failed_only && !include_non_failed,
        dry_run,
    };

    let client = ctx.client()?;
    let report = deploy::clean(&client, &target, options).await?;

    for entry in &report.entries {
        let state = entry
            .state
            .as_ref()
            .map(|s| s.to_string())
            .unwrap_or_else(|| "unknown".to_string());
        match entry.action {
            CleanAction::Dropped => ctx
                .output
                .progress(&format!("  {} [{state}]: dropped", entry.deployment_id)),
            CleanAction::WouldDrop => ctx
                .output
                .progress(&format!("  {} [{state}]: would drop", entry.deployment_id)),
            CleanAction::Skipped => ctx.output.warning(&format!(
                "{} is {state}, not FAILED; kept (use --include-non-failed to drop it)",
                entry.deployment_id
            )),
        }
    }

    let message = if report.is_empty() {
        "No deployments found".to_string()
    } else if dry_run {
        format!(
            "[dry run] Would drop {}, skipped {}",
            report.count(CleanAction::WouldDrop),
            report.count(CleanAction::Skipped)
        )
    } else {
        format!(
            "Dropped {}, skipped {}",
            report.count(CleanAction::Dropped),
            report.count(CleanAction::Skipped)
        )
    };
    ctx.output.report(&message, &report);
    Ok(())
}
