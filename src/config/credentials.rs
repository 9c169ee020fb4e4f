// ABOUTME: Portal credentials: a ready token, or a username and password pair.
// ABOUTME: A pair is combined into the base64 bearer token the portal expects.

use super::EnvValue;
use crate::error::{Error, Result};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::Deserialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub token: Option<EnvValue>,
    #[serde(default)]
    pub username: Option<EnvValue>,
    #[serde(default)]
    pub password: Option<EnvValue>,
}

impl Credentials {
    /// Resolve to the bearer token. An explicit token wins over a username/password pair.
    pub fn bearer_token(&self) -> Result<String> {
        if let Some(token) = &self.token
            && let Some(token) = token.resolve_non_blank()?
        {
            return Ok(token);
        }

        match (&self.username, &self.password) {
            (Some(username), Some(password)) => {
                let username = username.resolve_non_blank()?.ok_or_else(|| {
                    Error::MissingCredentials("username is empty".to_string())
                })?;
                let password = password.resolve_non_blank()?.ok_or_else(|| {
                    Error::MissingCredentials("password is empty".to_string())
                })?;
                Ok(encode_user_token(&username, &password))
            }
            (Some(_), None) | (None, Some(_)) => Err(Error::MissingCredentials(
                "username and password must be given together".to_string(),
            )),
            (None, None) => Err(Error::MissingCredentials(
                "set a token (--token or CENTRAL_TOKEN) or username and password".to_string(),
            )),
        }
    }
}

/// `base64(username:password)`, the portal's user token format.
pub fn encode_user_token(username: &str, password: &str) -> String {
    STANDARD.encode(format!("{username}:{password}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_wins_over_pair() {
        let creds = Credentials {
            token: Some(EnvValue::Literal(" abc ".into())),
            username: Some(EnvValue::Literal("user".into())),
            password: Some(EnvValue::Literal("pass".into())),
        };
        assert_eq!(creds.bearer_token().unwrap(), "abc");
    }

    #[test]
    fn pair_is_base64_encoded() {
        let creds = Credentials {
            token: Some(EnvValue::Literal("   ".into())),
            username: Some(EnvValue::Literal("user".into())),
            password: Some(EnvValue::Literal("pass".into())),
        };
        assert_eq!(creds.bearer_token().unwrap(), "dXNlcjpwYXNz");
    }

    #[test]
    fn missing_everything_is_an_error() {
        let err = Credentials::default().bearer_token().unwrap_err();
        assert!(matches!(err, Error::MissingCredentials(_)));
    }

    #[test]
    fn half_a_pair_is_an_error() {
        let creds = Credentials {
            username: Some(EnvValue::Literal("user".into())),
            ..Default::default()
        };
        assert!(matches!(
            creds.bearer_token().unwrap_err(),
            Error::MissingCredentials(_)
        ));
    }
}
