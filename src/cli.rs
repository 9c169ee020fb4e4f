// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Defines all subcommands and their arguments.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "central-publish")]
#[command(about = "Upload, validate, publish and clean Central Portal deployments")]
#[command(version)]
pub struct Cli {
    /// Config file (default: central.yml in the current directory)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Publisher API base URL
    #[arg(long, global = true, env = "CENTRAL_API_URL")]
    pub api_url: Option<String>,

    /// Bearer token for the publisher API
    #[arg(long, global = true, env = "CENTRAL_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Show debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only print the final result
    #[arg(short, long, global = true, conflicts_with = "json")]
    pub quiet: bool,

    /// Print JSON lines
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Upload a bundle and wait for validation (and publication)
    Upload {
        /// Bundle zip file
        file: PathBuf,

        /// Deployment name (default: file name without extension)
        #[arg(long)]
        name: Option<String>,

        /// USER_MANAGED or AUTOMATIC
        #[arg(long)]
        publishing_type: Option<String>,

        #[command(flatten)]
        wait: WaitArgs,
    },

    /// Publish a VALIDATED deployment; a PUBLISHING one is left alone
    Publish {
        #[command(flatten)]
        target: TargetArgs,

        /// Report what would be published without publishing
        #[arg(long)]
        dry_run: bool,
    },

    /// Publish the latest VALIDATED deployment
    Release {
        #[command(flatten)]
        target: TargetArgs,

        /// Report what would be published without publishing
        #[arg(long)]
        dry_run: bool,
    },

    /// Drop deployments
    Clean {
        /// Drop this deployment
        #[arg(long, conflicts_with = "namespace")]
        deployment_id: Option<String>,

        /// Namespace to clean (default: project namespace from config)
        #[arg(long)]
        namespace: Option<String>,

        /// Consider every listed deployment, not only the latest
        #[arg(long, conflicts_with = "deployment_id")]
        all: bool,

        /// Also drop deployments that are not FAILED
        #[arg(long)]
        include_non_failed: bool,

        /// Report what would be dropped without dropping
        #[arg(long)]
        dry_run: bool,
    },

    /// Show a deployment's status
    Status {
        /// Deployment id
        deployment_id: String,
    },

    /// List the newest deployment of a namespace, or all of them
    List {
        /// Namespace to list (default: project namespace from config)
        #[arg(long)]
        namespace: Option<String>,

        /// List every deployment, not only the newest
        #[arg(long)]
        all: bool,
    },

        /// Check whether coordinates are already published
    Published {
        #[command(flatten)]
        coordinates: CoordinateArgs,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct CoordinateArgs {
    /// Group id / namespace
    #[arg(long, alias = "group")]
    pub namespace: Option<String>,

    /// Artifact id
    #[arg(long, alias = "artifact")]
    pub name: Option<String>,

    #[arg(long)]
    pub version: Option<String>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct TargetArgs {
    /// Act on this deployment instead of searching
    #[arg(long)]
    pub deployment_id: Option<String>,

    #[command(flatten)]
    pub coordinates: CoordinateArgs,
}

#[derive(Args, Debug, Clone, Default)]
pub struct WaitArgs {
    /// Maximum time to wait for validation (e.g. 5m)
    #[arg(long, value_parser = humantime::parse_duration)]
    pub max_wait_validation: Option<Duration>,

    /// Maximum time to wait for publication (e.g. 10m)
    #[arg(long, value_parser = humantime::parse_duration)]
    pub max_wait_publishing: Option<Duration>,

    /// Time between status polls (e.g. 5s)
    #[arg(long, value_parser = humantime::parse_duration)]
    pub poll_interval: Option<Duration>,

    /// Return once publishing has started instead of waiting for PUBLISHED
    #[arg(long)]
    pub no_wait: bool,

    /// Tolerate this many consecutive network failures while polling
    #[arg(long)]
    pub transient_retries: Option<u32>,
}
