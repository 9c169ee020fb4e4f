// ABOUTME: Entry point for the central-publish CLI application.
// ABOUTME: Parses arguments, loads config, and dispatches to command handlers.

mod cli;
mod commands;

use central_publish::config::{Config, EnvValue};
use central_publish::deploy::{DeployError, DeployErrorKind};
use central_publish::error::{Error, Result};
use central_publish::output::{Output, OutputMode};
use clap::Parser;
use cli::{Cli, Commands};
use commands::Context;
use std::env;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize tracing subscriber based on verbose flag
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let mode = if cli.json {
        OutputMode::Json
    } else if cli.quiet {
        OutputMode::Quiet
    } else {
        OutputMode::Normal
    };

    let cancel = CancellationToken::new();
    let interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            interrupt.cancel();
        }
    });

    if let Err(e) = run(cli, Output::new(mode), cancel).await {
        report_failure(&Output::new(mode), &e);
        let interrupted = e
            .as_deploy()
            .is_some_and(|d| d.kind() == DeployErrorKind::Interrupted);
        std::process::exit(if interrupted { 130 } else { 1 });
    }
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::discover_or_default(&env::current_dir()?)?,
    };
    if let Some(url) = &cli.api_url {
        config.api_url = Some(url.clone());
    }
    if let Some(token) = &cli.token {
        config.credentials.token = Some(EnvValue::Literal(token.clone()));
    }
    Ok(config)
}

async fn run(cli: Cli, output: Output, cancel: CancellationToken) -> Result<()> {
    let config = load_config(&cli)?;
    let ctx = Context {
        config,
        output,
        cancel,
    };

    match cli.command {
        Commands::Upload {
            file,
            name,
            publishing_type,
            wait,
        } => commands::upload(ctx, file, name, publishing_type, wait).await,
        Commands::Publish { target, dry_run } => {
            commands::publish(ctx, target, dry_run, false).await
        }
        Commands::Release { target, dry_run } => {
            commands::publish(ctx, target, dry_run, true).await
        }
        Commands::Clean {
            deployment_id,
            namespace,
            all,
            include_non_failed,
            dry_run,
        } => {
            commands::clean(
                ctx,
                deployment_id,
                namespace,
                all,
                include_non_failed,
                dry_run,
            )
            .await
        }
        Commands::Status { deployment_id } => commands::status(ctx, deployment_id).await,
        Commands::List { namespace, all } => commands::list(ctx, namespace, all).await,
        Commands::Published { coordinates } => commands::published(ctx, coordinates).await,
    }
}

/// Print the error with the deployment id and last state when known.
fn report_failure(output: &Output, error: &Error) {
    let mut context = Vec::new();
    if let Some(deploy) = error.as_deploy() {
        if let Some(id) = deploy.deployment_id() {
            context.push(("deployment", id.to_string()));
        }
        if let Some(state) = deploy.last_state() {
            context.push(("state", state.to_string()));
        }
    }
    if let Error::Client(client) | Error::Deploy(DeployError::Client(client)) = error
        && let Some(code) = client.status_code()
    {
        context.push(("http status", code.to_string()));
    }
    output.failure(&error.to_string(), &context);
}
