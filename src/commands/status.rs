// ABOUTME: Status, list and published command implementations.
// ABOUTME: Read-only queries against the publisher API.

use super::Context;
use crate::cli::CoordinateArgs;
use central_publish::client::DeploymentStatus;
use central_publish::deploy::{self, SEARCH_LIMIT, format_errors, has_errors};
use central_publish::error::{Error, Result};
use central_publish::types::DeploymentId;
use chrono::{DateTime, Utc};

/// Name, creation time, components and errors of one deployment.
fn show_details(ctx: &Context, status: &DeploymentStatus) {
    if let Some(name) = &status.deployment_name {
        ctx.output.progress(&format!("Name: {name}"));
    }
    if let Some(created) = status
        .create_timestamp
        .and_then(DateTime::<Utc>::from_timestamp_millis)
    {
        ctx.output
            .progress(&format!("Created: {}", created.format("%Y-%m-%d %H:%M:%S UTC")));
    }
    for purl in status.purls() {
        ctx.output.progress(&format!("  {purl}"));
    }
    if has_errors(status.effective_errors()) {
        ctx.output.progress(&format_errors(status));
    }
}

pub async fn status(ctx: Context, deployment_id: String) -> Result<()> {
    let client = ctx.client()?;
    let id = DeploymentId::new(deployment_id.trim());
    let status = deploy::status(&client, &id).await?;

    show_details(&ctx, &status);
    ctx.output
        .report(&format!("Deployment {}: {}", status.id(), status.state()), &status);
    Ok(())
}

pub async fn published(ctx: Context, args: CoordinateArgs) -> Result<()> {
    let coordinates = ctx.coordinates(&args)?.ok_or_else(|| {
        Error::MissingArgument("--namespace, --name and --version".to_string())
    })?;
    let client = ctx.client()?;
    let published = deploy::is_published(&client, &coordinates).await?;

    let message = if published {
        format!("{coordinates} is published")
    } else {
        format!("{coordinates} is not published")
    };
    ctx.output.report(
        &message,
        &serde_json::json!({ "coordinates": coordinates.to_string(), "published": published }),
    );
    Ok(())
}

pub async fn list(ctx: Context, namespace: Option<String>, all: bool) -> Result<()> {
    let namespace = namespace
        .or_else(|| ctx.config.project.as_ref().map(|p| p.namespace.clone()))
        .ok_or_else(|| Error::MissingArgument("--namespace".to_string()))?;
    let limit = if all { SEARCH_LIMIT } else { 1 };
    let client = ctx.client()?;
    let mut deployments = deploy::list_newest(&client, &namespace, limit).await?;
    deployments.truncate(limit as usize);

    for status in &deployments {
        ctx.output
            .progress(&format!("Deployment {}: {}", status.id(), status.state()));
        show_details(&ctx, status);
    }

    let message = match deployments.len() {
        0 => format!("No deployments found in {namespace}"),
        1 => format!("1 deployment in {namespace}"),
        n => format!("{n} deployments in {namespace}"),
    };
    ctx.output.report(&message, &deployments);
    Ok(())
}
