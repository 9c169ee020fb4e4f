// ABOUTME: Status payloads returned by the publisher API.
// ABOUTME: The errors field is resolved once into a tagged union at parse time.

use crate::types::DeploymentId;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Lifecycle state reported by the service.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DeploymentState {
    Pending,
    Validating,
    Validated,
    Publishing,
    Published,
    Failed,
    /// A value outside the documented enumeration, kept verbatim.
    Other(String),
}

impl DeploymentState {
    pub fn parse(value: &str) -> Self {
        match value {
            "PENDING" => DeploymentState::Pending,
            "VALIDATING" => DeploymentState::Validating,
            "VALIDATED" => DeploymentState::Validated,
            "PUBLISHING" => DeploymentState::Publishing,
            "PUBLISHED" => DeploymentState::Published,
            "FAILED" => DeploymentState::Failed,
            other => DeploymentState::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            DeploymentState::Pending => "PENDING",
            DeploymentState::Validating => "VALIDATING",
            DeploymentState::Validated => "VALIDATED",
            DeploymentState::Publishing => "PUBLISHING",
            DeploymentState::Published => "PUBLISHED",
            DeploymentState::Failed => "FAILED",
            DeploymentState::Other(s) => s,
        }
    }

    /// Still moving through validation; poll again.
    pub fn is_in_progress(&self) -> bool {
        matches!(self, DeploymentState::Pending | DeploymentState::Validating)
    }

    /// Only these states may carry meaningful errors.
    pub fn carries_errors(&self) -> bool {
        matches!(self, DeploymentState::Validated | DeploymentState::Failed)
    }
}

impl fmt::Display for DeploymentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for DeploymentState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for DeploymentState {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Option::<String>::deserialize(deserializer)?;
        Ok(match value {
            Some(s) => DeploymentState::parse(&s),
            None => DeploymentState::Other("null".to_string()),
        })
    }
}

/// The `errors` field, whose shape varies between endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ErrorsPayload {
    #[default]
    Absent,
    List(Vec<String>),
    /// Component key to its error messages.
    Map(BTreeMap<String, Vec<String>>),
    Text(String),
}

impl From<Value> for ErrorsPayload {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => ErrorsPayload::Absent,
            Value::Array(items) => ErrorsPayload::List(items.into_iter().map(render).collect()),
            Value::Object(map) => ErrorsPayload::Map(
                map.into_iter()
                    .map(|(key, value)| (key, flatten(value)))
                    .collect(),
            ),
            Value::String(s) => ErrorsPayload::Text(s),
            other => ErrorsPayload::Text(other.to_string()),
        }
    }
}

fn render(value: Value) -> String {
    match value {
        Value::String(s) => s,
        other => other.to_string(),
    }
}

fn flatten(value: Value) -> Vec<String> {
    match value {
        Value::Null => Vec::new(),
        Value::Array(items) => items.into_iter().map(render).collect(),
        other => vec![render(other)],
    }
}

impl<'de> Deserialize<'de> for ErrorsPayload {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(ErrorsPayload::from)
    }
}

impl Serialize for ErrorsPayload {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ErrorsPayload::Absent => serializer.serialize_none(),
            ErrorsPayload::List(items) => items.serialize(serializer),
            ErrorsPayload::Map(map) => map.serialize(serializer),
            ErrorsPayload::Text(s) => serializer.serialize_str(s),
        }
    }
}

static NO_ERRORS: ErrorsPayload = ErrorsPayload::Absent;

/// One component inside a deployment.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentVersion {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub purl: Option<String>,
    #[serde(default)]
    pub errors: ErrorsPayload,
}

/// A status snapshot of one deployment.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentStatus {
    pub deployment_id: DeploymentId,
    #[serde(default)]
    pub deployment_name: Option<String>,
    pub deployment_state: DeploymentState,
    /// Milliseconds since the epoch.
    #[serde(default)]
    pub create_timestamp: Option<i64>,
    #[serde(default)]
    pub errors: ErrorsPayload,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub deployed_component_versions: Vec<ComponentVersion>,
}

impl DeploymentStatus {
    pub fn new(id: impl Into<String>, state: DeploymentState) -> Self {
        Self {
            deployment_id: DeploymentId::new(id),
            deployment_name: None,
            deployment_state: state,
            create_timestamp: None,
            errors: ErrorsPayload::Absent,
            deployed_component_versions: Vec::new(),
        }
    }

    pub fn id(&self) -> &DeploymentId {
        &self.deployment_id
    }

    pub fn state(&self) -> &DeploymentState {
        &self.deployment_state
    }

    /// The errors payload, ignored for states that cannot carry errors.
    pub fn effective_errors(&self) -> &ErrorsPayload {
        if self.deployment_state.carries_errors() {
            &self.errors
        } else {
            &NO_ERRORS
        }
    }

    /// Package URLs of the deployed components.
    pub fn purls(&self) -> impl Iterator<Item = &str> {
        self.deployed_component_versions
            .iter()
            .filter_map(|c| c.purl.as_deref())
    }
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
