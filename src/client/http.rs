// ABOUTME: reqwest-backed implementation of RepositoryApi.
// ABOUTME: Holds only immutable configuration, so one client can serve concurrent invocations.

use super::api::{ListRequest, RepositoryApi};
use super::bundle::Bundle;
use super::error::{ClientError, DecodeSnafu, TransportSnafu};
use super::model::DeploymentStatus;
use crate::types::{Coordinates, DeploymentId, PublishMode};
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::multipart::{Form, Part};
use reqwest::{Method, RequestBuilder, Url};
use serde::Deserialize;
use snafu::ResultExt;
use std::fmt;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "https://central.sonatype.com/api/v1";

const MEDIA_JSON: &str = "application/json";
const MEDIA_OCTET_STREAM: &str = "application/octet-stream";

/// Connection settings for the publisher API.
#[derive(Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub token: String,
    pub request_timeout: Duration,
}

impl ClientConfig {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            token: token.into(),
            request_timeout: Duration::from_secs(300),
        }
    }

    /// Override the API base URL. Blank values keep the default.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        let url = url.into();
        if !url.trim().is_empty() {
            self.base_url = url.trim().trim_end_matches('/').to_string();
        }
        self
    }

    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("token", &"<redacted>")
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

/// HTTP client for the publisher API.
#[derive(Debug, Clone)]
pub struct CentralClient {
    http: reqwest::Client,
    base: Url,
    config: ClientConfig,
}

impl CentralClient {
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .user_agent(concat!("central-publish/", env!("CARGO_PKG_VERSION")))
            .build()
            .context(TransportSnafu {
                operation: "build client",
            })?;
        let base = Url::parse(&config.base_url)
            .ok()
            .filter(|url| !url.cannot_be_a_base())
            .ok_or_else(|| ClientError::InvalidRequest {
                operation: "build client",
                reason: format!("invalid base URL '{}'", config.base_url),
            })?;
        Ok(Self { http, base, config })
    }

    /// Resolve path segments against the base URL. Each segment is percent-encoded.
    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn request(&self, method: Method, segments: &[&str]) -> RequestBuilder {
        self.http
            .request(method, self.url(segments))
            .bearer_auth(&self.config.token)
            .header(ACCEPT, MEDIA_JSON)
    }

    /// Request against `publisher/deployment/{id}`. Blank ids never reach the network.
    fn deployment_request(
        &self,
        operation: &'static str,
        method: Method,
        id: &DeploymentId,
    ) -> Result<RequestBuilder, ClientError> {
        if id.is_blank() {
            return Err(ClientError::InvalidRequest {
                operation,
                reason: "deployment id must not be blank".to_string(),
            });
        }
        Ok(self.request(method, &["publisher", "deployment", id.as_str()]))
    }

    /// Send one request and return the body of a 2xx response.
    async fn execute(
        &self,
        operation: &'static str,
        request: RequestBuilder,
    ) -> Result<String, ClientError> {
        debug!(operation, "sending request");
        let response = request.send().await.context(TransportSnafu { operation })?;
        let status = response.status();
        let body = response.text().await.context(TransportSnafu { operation })?;
        debug!(operation, status = status.as_u16(), "received response");

        if status.is_success() {
            Ok(body)
        } else {
            Err(ClientError::from_status(operation, status.as_u16(), body))
        }
    }
}

#[derive(Deserialize)]
struct DeploymentList {
    #[serde(default)]
    deployments: Option<Vec<DeploymentStatus>>,
}

#[derive(Deserialize)]
struct PublishedResponse {
    #[serde(default)]
    published: bool,
}

/// The upload endpoint answers with the bare id, sometimes JSON-quoted.
fn parse_deployment_id(operation: &'static str, body: &str) -> Result<DeploymentId, ClientError> {
    let id = body.trim().trim_matches('"').trim();
    if id.is_empty() {
        return Err(ClientError::InvalidResponse {
            operation,
            message: "response did not contain a deployment id".to_string(),
        });
    }
    Ok(DeploymentId::new(id))
}

#[async_trait]
impl RepositoryApi for CentralClient {
    async fn upload_bundle(
        &self,
        bundle: &Bundle,
        mode: PublishMode,
    ) -> Result<DeploymentId, ClientError> {
        const OPERATION: &str = "upload bundle";

        let bytes = tokio::fs::read(bundle.path())
            .await
            .map_err(|e| ClientError::InvalidBundle {
                path: bundle.path().to_path_buf(),
                reason: e.to_string(),
            })?;
        let part = Part::bytes(bytes)
            .file_name(bundle.file_name())
            .mime_str(MEDIA_OCTET_STREAM)
            .context(TransportSnafu {
                operation: OPERATION,
            })?;
        let form = Form::new().part("bundle", part);

        let request = self
            .request(Method::POST, &["publisher", "upload"])
            .query(&[("name", bundle.name()), ("publishingType", mode.as_api_str())])
            .multipart(form);

        let body = self.execute(OPERATION, request).await?;
        parse_deployment_id(OPERATION, &body)
    }

    async fn deployment_status(
        &self,
        id: &DeploymentId,
    ) -> Result<DeploymentStatus, ClientError> {
        const OPERATION: &str = "get deployment status";

        let request = self
            .request(Method::POST, &["publisher", "status"])
            .query(&[("id", id.as_str())]);
        let body = self.execute(OPERATION, request).await?;
        serde_json::from_str(&body).context(DecodeSnafu {
            operation: OPERATION,
        })
    }

    async fn publish_deployment(&self, id: &DeploymentId) -> Result<(), ClientError> {
        const OPERATION: &str = "publish deployment";

        let request = self.deployment_request(OPERATION, Method::POST, id)?;
        self.execute(OPERATION, request).await?;
        Ok(())
    }

    async fn list_deployments(
        &self,
        request: &ListRequest,
    ) -> Result<Vec<DeploymentStatus>, ClientError> {
        const OPERATION: &str = "list deployments";

        let http_request = self
            .request(Method::POST, &["publisher", "deployments", "files"])
            .json(request);
        let body = self.execute(OPERATION, http_request).await?;
        let list: DeploymentList = serde_json::from_str(&body).context(DecodeSnafu {
            operation: OPERATION,
        })?;
        Ok(list.deployments.unwrap_or_default())
    }

    async fn drop_deployment(&self, id: &DeploymentId) -> Result<(), ClientError> {
        const OPERATION: &str = "drop deployment";

        let request = self.deployment_request(OPERATION, Method::DELETE, id)?;
        self.execute(OPERATION, request).await?;
        Ok(())
    }

    async fn is_published(&self, coordinates: &Coordinates) -> Result<bool, ClientError> {
        const OPERATION: &str = "check published";

        let request = self.request(Method::GET, &["publisher", "published"]).query(&[
            ("namespace", coordinates.group()),
            ("name", coordinates.artifact()),
            ("version", coordinates.version()),
        ]);
        let body = self.execute(OPERATION, request).await?;
        let response: PublishedResponse = serde_json::from_str(&body).context(DecodeSnafu {
            operation: OPERATION,
        })?;
        Ok(response.published)
    }
}
