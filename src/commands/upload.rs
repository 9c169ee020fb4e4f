// ABOUTME: Upload command implementation.
// ABOUTME: Uploads a bundle, then waits for validation and optionally publication.

use super::Context;
use crate::cli::WaitArgs;
use central_publish::client::Bundle;
use central_publish::deploy::{self, DeployError, Outcome};
use central_publish::error::Result;
use central_publish::types::PublishMode;
use std::path::PathBuf;

pub async fn upload(
    mut ctx: Context,
    file: PathBuf,
    name: Option<String>,
    publishing_type: Option<String>,
    wait: WaitArgs,
) -> Result<()> {
    let mode = match publishing_type {
        Some(value) => value
            .parse::<PublishMode>()
            .map_err(|e| DeployError::Validation(e.to_string()))?,
        None => ctx.config.publishing_type,
    };

    let mut wait_config = ctx.config.wait;
    if let Some(validation) = wait.max_wait_validation {
        wait_config.validation = validation;
    }
    if let Some(publishing) = wait.max_wait_publishing {
        wait_config.publishing = publishing;
    }
    if let Some(interval) = wait.poll_interval {
        wait_config.poll_interval = interval;
    }
    if let Some(retries) = wait.transient_retries {
        wait_config.transient_retries = retries;
    }
    if wait.no_wait {
        wait_config.for_completion = false;
    }
    let policy = wait_config.policy()?;

    let bundle = Bundle::new(&file, name.as_deref())?;
    let client = ctx.client()?;

    ctx.output.start_timer();
    ctx.output.progress(&format!(
        "Uploading {} as '{}' ({mode})",
        bundle.file_name(),
        bundle.name()
    ));

    let report = deploy::upload_and_wait(&client, &bundle, mode, &policy, &ctx.cancel).await?;

    for component in &report.components {
        ctx.output.progress(&format!("  {component}"));
    }
    let message = match report.outcome {
        Outcome::AwaitingManualPublish => format!(
            "Deployment {} is VALIDATED and waiting to be published",
            report.deployment_id
        ),
        Outcome::PublishingStarted => {
            format!("Deployment {} is publishing", report.deployment_id)
        }
        Outcome::Published => format!("Deployment {} published", report.deployment_id),
    };
    ctx.output.report(&message, &report);
    Ok(())
}
