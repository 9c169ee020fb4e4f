// ABOUTME: Repository client for the Central Portal publisher API.
// ABOUTME: One request per operation; HTTP outcomes are classified into typed errors here.

mod api;
mod bundle;
mod error;
mod http;
mod model;

pub use api::{ListRequest, RepositoryApi, SortDirection};
pub use bundle::Bundle;
pub use error::{ClientError, ClientErrorKind};
pub use http::{CentralClient, ClientConfig, DEFAULT_BASE_URL};
pub use model::{ComponentVersion, DeploymentState, DeploymentStatus, ErrorsPayload};
