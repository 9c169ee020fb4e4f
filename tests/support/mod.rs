// ABOUTME: Test support utilities.
// ABOUTME: Provides a scripted RepositoryApi fake and tracing setup for integration tests.

// Each test binary only uses some of these helpers, so allow dead_code.
#![allow(dead_code)]

use async_trait::async_trait;
use central_publish::client::{
    Bundle, ClientError, ComponentVersion, DeploymentState, DeploymentStatus, ErrorsPayload,
    ListRequest, RepositoryApi,
};
use central_publish::types::{Coordinates, DeploymentId, PublishMode};
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Mutex, Once};

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for tests. Safe to call multiple times.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::EnvFilter;
        let filter = EnvFilter::from_default_env()
            .add_directive("central_publish=debug".parse().unwrap());
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// One scripted answer to a status poll.
#[derive(Clone)]
pub enum Reply {
    Status(DeploymentStatus),
    /// A connection-level failure.
    NetworkError,
}

/// A recorded call against the fake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Upload { name: String, mode: PublishMode },
    Status(String),
    Publish(String),
    List(ListRequest),
    Drop(String),
    Published(String),
}

/// In-memory RepositoryApi with scripted status replies.
///
/// Each deployment id has a queue of replies; the last reply repeats once the
/// queue is down to one entry.
pub struct FakeRepository {
    upload_id: String,
    scripts: Mutex<HashMap<String, VecDeque<Reply>>>,
    listing: Vec<DeploymentStatus>,
    failing_drops: HashSet<String>,
    published: bool,
    calls: Mutex<Vec<Call>>,
}

impl FakeRepository {
    pub fn new() -> Self {
        Self {
            upload_id: "dep-1".to_string(),
            scripts: Mutex::new(HashMap::new()),
            listing: Vec::new(),
            failing_drops: HashSet::new(),
            published: false,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn upload_id(mut self, id: &str) -> Self {
        self.upload_id = id.to_string();
        self
    }

    pub fn script(self, id: &str, replies: Vec<Reply>) -> Self {
        self.scripts
            .lock()
            .unwrap()
            .insert(id.to_string(), replies.into());
        self
    }

    /// Script a sequence of plain states for `id`.
    pub fn states(self, id: &str, states: &[DeploymentState]) -> Self {
        let replies = states
            .iter()
            .map(|s| Reply::Status(status(id, s.clone())))
            .collect();
        self.script(id, replies)
    }

    pub fn listing(mut self, deployments: Vec<DeploymentStatus>) -> Self {
        self.listing = deployments;
        self
    }

    pub fn failing_drop(mut self, id: &str) -> Self {
        self.failing_drops.insert(id.to_string());
        self
    }

    pub fn published(mut self, published: bool) -> Self {
        self.published = published;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn status_polls(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, Call::Status(_)))
            .count()
    }

    pub fn publish_calls(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Publish(id) => Some(id),
                _ => None,
            })
            .collect()
    }

    pub fn drop_calls(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Drop(id) => Some(id),
                _ => None,
            })
            .collect()
    }

    pub fn list_requests(&self) -> Vec<ListRequest> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::List(request) => Some(request),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl RepositoryApi for FakeRepository {
    async fn upload_bundle(
        &self,
        bundle: &Bundle,
        mode: PublishMode,
    ) -> Result<DeploymentId, ClientError> {
        self.record(Call::Upload {
            name: bundle.name().to_string(),
            mode,
        });
        Ok(DeploymentId::new(self.upload_id.clone()))
    }

    async fn deployment_status(
        &self,
        id: &DeploymentId,
    ) -> Result<DeploymentStatus, ClientError> {
        self.record(Call::Status(id.to_string()));
        let reply = {
            let mut scripts = self.scripts.lock().unwrap();
            scripts.get_mut(id.as_str()).and_then(|queue| {
                if queue.len() > 1 {
                    queue.pop_front()
                } else {
                    queue.front().cloned()
                }
            })
        };
        match reply {
            Some(Reply::Status(status)) => Ok(status),
            Some(Reply::NetworkError) => Err(ClientError::Transport {
                operation: "status",
                source: Box::new(std::io::Error::other("connection reset")),
            }),
            None => Err(ClientError::from_status(
                "status",
                404,
                format!("no deployment {id}"),
            )),
        }
    }

    async fn publish_deployment(&self, id: &DeploymentId) -> Result<(), ClientError> {
        self.record(Call::Publish(id.to_string()));
        Ok(())
    }

    async fn list_deployments(
        &self,
        request: &ListRequest,
    ) -> Result<Vec<DeploymentStatus>, ClientError> {
        self.record(Call::List(request.clone()));
        Ok(self
            .listing
            .iter()
            .take(request.limit as usize)
            .cloned()
            .collect())
    }

    async fn drop_deployment(&self, id: &DeploymentId) -> Result<(), ClientError> {
        self.record(Call::Drop(id.to_string()));
        if self.failing_drops.contains(id.as_str()) {
            return Err(ClientError::from_status(
                "drop",
                500,
                "drop failed".to_string(),
            ));
        }
        Ok(())
    }

    async fn is_published(&self, coordinates: &Coordinates) -> Result<bool, ClientError> {
        self.record(Call::Published(coordinates.to_string()));
        Ok(self.published)
    }
}

pub fn status(id: &str, state: DeploymentState) -> DeploymentStatus {
    DeploymentStatus::new(id, state)
}

pub fn status_with_purl(id: &str, state: DeploymentState, purl: &str) -> DeploymentStatus {
    let mut status = DeploymentStatus::new(id, state);
    status.deployed_component_versions.push(ComponentVersion {
        purl: Some(purl.to_string()),
        ..Default::default()
    });
    status
}

pub fn with_errors(mut status: DeploymentStatus, errors: ErrorsPayload) -> DeploymentStatus {
    status.errors = errors;
    status
}

/// A bundle file inside a temp dir; keep the dir alive for the test.
pub fn bundle_file(dir: &tempfile::TempDir) -> Bundle {
    let path = dir.path().join("widget-1.0.0.zip");
    std::fs::write(&path, b"PK\x03\x04").unwrap();
    Bundle::new(path, None).unwrap()
}
