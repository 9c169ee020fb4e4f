// ABOUTME: Configuration types and parsing for central.yml.
// ABOUTME: Handles YAML parsing, env var interpolation, and wait policy construction.

mod credentials;
mod env_value;

pub use credentials::{Credentials, encode_user_token};
pub use env_value::EnvValue;

use crate::client::ClientConfig;
use crate::deploy::{
    DEFAULT_POLL_INTERVAL, DEFAULT_PUBLISHING_WAIT, DEFAULT_VALIDATION_WAIT, WaitBudget, WaitPolicy,
};
use crate::error::{Error, Result};
use crate::types::{Coordinates, PublishMode};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

pub const CONFIG_FILENAME: &str = "central.yml";
pub const CONFIG_FILENAME_ALT: &str = "central.yaml";
pub const CONFIG_FILENAME_DIR: &str = ".central/config.yml";

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Config {
    /// Publisher API base URL.
    #[serde(default)]
    pub api_url: Option<String>,

    #[serde(default)]
    pub credentials: Credentials,

    /// Coordinates used to find deployments when no id is given.
    #[serde(default)]
    pub project: Option<ProjectConfig>,

    #[serde(default)]
    pub publishing_type: PublishMode,

    #[serde(default)]
    pub wait: WaitConfig,

    #[serde(default)]
    pub clean: CleanConfig,

    #[serde(default = "default_request_timeout", with = "humantime_serde")]
    pub request_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: None,
            credentials: Credentials::default(),
            project: None,
            publishing_type: PublishMode::default(),
            wait: WaitConfig::default(),
            clean: CleanConfig::default(),
            request_timeout: default_request_timeout(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProjectConfig {
    #[serde(alias = "group")]
    pub namespace: String,
    #[serde(alias = "artifact")]
    pub name: String,
    pub version: String,
}

impl ProjectConfig {
    pub fn coordinates(&self) -> Result<Coordinates> {
        Coordinates::new(&self.namespace, &self.name, &self.version)
            .map_err(|e| Error::InvalidConfig(format!("project: {e}")))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct WaitConfig {
    #[serde(default = "default_validation_wait", with = "humantime_serde")]
    pub validation: Duration,
    #[serde(default = "default_publishing_wait", with = "humantime_serde")]
    pub publishing: Duration,
    #[serde(default = "default_poll_interval", with = "humantime_serde")]
    pub poll_interval: Duration,
    /// Follow automatic deployments through PUBLISHING to PUBLISHED.
    #[serde(default = "default_true")]
    pub for_completion: bool,
    #[serde(default)]
    pub transient_retries: u32,
}

impl Default for WaitConfig {
    fn default() -> Self {
        Self {
            validation: DEFAULT_VALIDATION_WAIT,
            publishing: DEFAULT_PUBLISHING_WAIT,
            poll_interval: DEFAULT_POLL_INTERVAL,
            for_completion: true,
            transient_retries: 0,
        }
    }
}

impl WaitConfig {
    pub fn policy(&self) -> Result<WaitPolicy> {
        let validation = WaitBudget::new(self.validation, self.poll_interval)
            .map_err(|e| Error::InvalidConfig(format!("wait.validation: {e}")))?;
        let publishing = WaitBudget::new(self.publishing, self.poll_interval)
            .map_err(|e| Error::InvalidConfig(format!("wait.publishing: {e}")))?;
        Ok(WaitPolicy::new(validation, publishing)
            .wait_for_completion(self.for_completion)
            .transient_retries(self.transient_retries))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct CleanConfig {
    #[serde(default = "default_true")]
    pub remove_failed_only: bool,
}

impl Default for CleanConfig {
    fn default() -> Self {
        Self {
            remove_failed_only: true,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(300)
}

fn default_validation_wait() -> Duration {
    DEFAULT_VALIDATION_WAIT
}

fn default_publishing_wait() -> Duration {
    DEFAULT_PUBLISHING_WAIT
}

fn default_poll_interval() -> Duration {
    DEFAULT_POLL_INTERVAL
}

impl Config {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(Error::from)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn discover(dir: &Path) -> Result<Self> {
        let candidates = [
            dir.join(CONFIG_FILENAME),
            dir.join(CONFIG_FILENAME_ALT),
            dir.join(CONFIG_FILENAME_DIR),
        ];

        for path in &candidates {
            if path.exists() {
                return Self::load(path);
            }
        }

        Err(Error::ConfigNotFound(dir.to_path_buf()))
    }

    /// Like `discover`, but a directory without a config file yields the defaults.
    pub fn discover_or_default(dir: &Path) -> Result<Self> {
        match Self::discover(dir) {
            Err(Error::ConfigNotFound(_)) => Ok(Self::default()),
            other => other,
        }
    }

    pub fn coordinates(&self) -> Result<Option<Coordinates>> {
        self.project.as_ref().map(ProjectConfig::coordinates).transpose()
    }

    pub fn client_config(&self) -> Result<ClientConfig> {
        let mut config =
            ClientConfig::new(self.credentials.bearer_token()?).request_timeout(self.request_timeout);
        if let Some(url) = &self.api_url {
            config = config.base_url(url.as_str());
        }
        Ok(config)
    }
}
