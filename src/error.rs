// ABOUTME: Application-wide error types for central-publish.
// ABOUTME: Wraps configuration problems and the library's client and deploy errors.

use crate::client::ClientError;
use crate::deploy::DeployError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("configuration file not found in {0}")]
    ConfigNotFound(PathBuf),

    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("missing credentials: {0}")]
    MissingCredentials(String),

    #[error("missing argument: {0}")]
    MissingArgument(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Client(#[from] ClientError),

    #[error(transparent)]
    Deploy(#[from] DeployError),
}

impl Error {
    /// The deploy failure behind this error, if any.
    pub fn as_deploy(&self) -> Option<&DeployError> {
        match self {
            Error::Deploy(e) => Some(e),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
