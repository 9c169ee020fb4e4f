// ABOUTME: Publishing type chosen at upload time.
// ABOUTME: User-managed deployments stop at VALIDATED; automatic ones continue to PUBLISHED.

use serde::{Deserialize, Deserializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid publishing type '{0}' (expected USER_MANAGED or AUTOMATIC)")]
pub struct ParsePublishModeError(pub String);

/// How the remote service proceeds once a deployment is validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PublishMode {
    /// Stop at VALIDATED and wait for an explicit publish call.
    #[default]
    UserManaged,
    /// Progress VALIDATED -> PUBLISHING -> PUBLISHED without intervention.
    Automatic,
}

impl PublishMode {
    /// Value of the `publishingType` query parameter.
    pub fn as_api_str(&self) -> &'static str {
        match self {
            PublishMode::UserManaged => "USER_MANAGED",
            PublishMode::Automatic => "AUTOMATIC",
        }
    }
}

impl FromStr for PublishMode {
    type Err = ParsePublishModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase().replace('-', "_");
        match normalized.as_str() {
            "USER_MANAGED" => Ok(PublishMode::UserManaged),
            "AUTOMATIC" => Ok(PublishMode::Automatic),
            _ => Err(ParsePublishModeError(s.to_string())),
        }
    }
}

impl fmt::Display for PublishMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_api_str())
    }
}

impl<'de> Deserialize<'de> for PublishMode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
