// ABOUTME: Maven group/artifact/version coordinates.
// ABOUTME: Renders the purl prefix used to match deployed components.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoordinatesError {
    #[error("{0} cannot be empty")]
    Empty(&'static str),

    #[error("invalid character in {field}: '{ch}'")]
    InvalidChar { field: &'static str, ch: char },

    #[error("expected group:artifact:version, got '{0}'")]
    Malformed(String),
}

/// A group/artifact/version triple identifying one published unit.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Coordinates {
    group: String,
    artifact: String,
    version: String,
}

impl Coordinates {
    pub fn new(group: &str, artifact: &str, version: &str) -> Result<Self, CoordinatesError> {
        Ok(Self {
            group: validate("group", group)?,
            artifact: validate("artifact", artifact)?,
            version: validate("version", version)?,
        })
    }

    pub fn group(&self) -> &str {
        &self.group
    }

    pub fn artifact(&self) -> &str {
        &self.artifact
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// The group doubles as the publishing namespace.
    pub fn namespace(&self) -> &str {
        &self.group
    }

    /// Prefix every component purl of this GAV starts with.
    pub fn purl_prefix(&self) -> String {
        format!(
            "pkg:maven/{}/{}@{}",
            self.group, self.artifact, self.version
        )
    }
}

fn validate(field: &'static str, value: &str) -> Result<String, CoordinatesError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(CoordinatesError::Empty(field));
    }
    if let Some(ch) = value
        .chars()
        .find(|c| c.is_whitespace() || matches!(c, ':' | '/' | '@'))
    {
        return Err(CoordinatesError::InvalidChar { field, ch });
    }
    Ok(value.to_string())
}

impl FromStr for Coordinates {
    type Err = CoordinatesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(':').collect();
        match parts.as_slice() {
            [group, artifact, version] => Coordinates::new(group, artifact, version),
            _ => Err(CoordinatesError::Malformed(s.to_string())),
        }
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group, self.artifact, self.version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn purl_prefix_uses_maven_scheme() {
        let gav = Coordinates::new("org.example", "widget", "1.2.0").unwrap();
        assert_eq!(gav.purl_prefix(), "pkg:maven/org.example/widget@1.2.0");
    }

    #[test]
    fn parses_colon_separated() {
        let gav: Coordinates = "org.example:widget:1.2.0".parse().unwrap();
        assert_eq!(gav.group(), "org.example");
        assert_eq!(gav.artifact(), "widget");
        assert_eq!(gav.version(), "1.2.0");
        assert_eq!(gav.to_string(), "org.example:widget:1.2.0");
    }

    #[test]
    fn rejects_missing_parts() {
        assert!(matches!(
            "org.example:widget".parse::<Coordinates>(),
            Err(CoordinatesError::Malformed(_))
        ));
    }

    #[test]
    fn rejects_empty_field() {
        assert_eq!(
            Coordinates::new("org.example", " ", "1.0"),
            Err(CoordinatesError::Empty("artifact"))
        );
    }

    #[test]
    fn rejects_purl_separators() {
        assert_eq!(
            Coordinates::new("org/example", "widget", "1.0"),
            Err(CoordinatesError::InvalidChar {
                field: "group",
                ch: '/'
            })
        );
    }
}
