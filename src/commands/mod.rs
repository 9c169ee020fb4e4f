// ABOUTME: Command module aggregator for the central-publish CLI.
// ABOUTME: Holds the shared command context and merges CLI flags over config values.

mod clean;
mod publish;
mod status;
mod upload;

pub use clean::clean;
pub use publish::publish;
pub use status::{list, published, status};
pub use upload::upload;

use crate::cli::{CoordinateArgs, TargetArgs};
use central_publish::client::CentralClient;
use central_publish::config::Config;
use central_publish::deploy::Target;
use central_publish::error::{Error, Result};
use central_publish::output::Output;
use central_publish::types::{Coordinates, DeploymentId};
use tokio_util::sync::CancellationToken;

/// Everything a command handler needs.
pub struct Context {
    pub config: Config,
    pub output: Output,
    pub cancel: CancellationToken,
}

impl Context {
    pub fn client(&self) -> Result<CentralClient> {
        Ok(CentralClient::new(self.config.client_config()?)?)
    }

    /// Coordinates from flags, falling back field by field to the config project.
    pub fn coordinates(&self, args: &CoordinateArgs) -> Result<Option<Coordinates>> {
        if args.namespace.is_none() && args.name.is_none() && args.version.is_none() {
            return self.config.coordinates();
        }
        let project = self.config.project.as_ref();
        let namespace = args
            .namespace
            .clone()
            .or_else(|| project.map(|p| p.namespace.clone()));
        let name = args.name.clone().or_else(|| project.map(|p| p.name.clone()));
        let version = args
            .version
            .clone()
            .or_else(|| project.map(|p| p.version.clone()));

        match (namespace, name, version) {
            (None, None, None) => Ok(None),
            (Some(namespace), Some(name), Some(version)) => {
                Coordinates::new(&namespace, &name, &version)
                    .map(Some)
                    .map_err(|e| Error::InvalidConfig(format!("coordinates: {e}")))
            }
            _ => Err(Error::MissingArgument(
                "--namespace, --name and --version must be given together".to_string(),
            )),
        }
    }

    pub fn target(&self, args: &TargetArgs) -> Result<Target> {
        if let Some(id) = args.deployment_id.as_deref().map(str::trim)
            && !id.is_empty()
        {
            return Ok(Target::Id(DeploymentId::new(id)));
        }
        self.coordinates(&args.coordinates)?
            .map(Target::Latest)
            .ok_or_else(|| {
                Error::MissingArgument(
                    "--deployment-id or --namespace/--name/--version".to_string(),
                )
            })
    }
}
