// ABOUTME: Publish and release command implementations.
// ABOUTME: Release requires VALIDATED; publish also accepts a deployment already publishing.

use super::Context;
use crate::cli::TargetArgs;
use central_publish::deploy::{self, PublishAction};
use central_publish::error::Result;

pub async fn publish(ctx: Context, args: TargetArgs, dry_run: bool, strict: bool) -> Result<()> {
    let target = ctx.target(&args)?;
    let client = ctx.client()?;

    let report = if strict {
        deploy::release(&client, &target, dry_run).await?
    } else {
        deploy::publish_now(&client, &target, dry_run).await?
    };

    for component in &report.components {
        ctx.output.progress(&format!("  {component}"));
    }
    let message = match report.action {
        PublishAction::Published => format!("Publishing deployment {}", report.deployment_id),
        PublishAction::WouldPublish => {
            format!("[dry run] Would publish deployment {}", report.deployment_id)
        }
        PublishAction::AlreadyPublishing => {
            format!("Deployment {} is already publishing", report.deployment_id)
        }
    };
    ctx.output.report(&message, &report);
    Ok(())
}
