// ABOUTME: Client error types with SNAFU context selectors.
// ABOUTME: Maps HTTP status codes to a fixed taxonomy carrying the response body.

use snafu::Snafu;
use std::path::PathBuf;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

fn boxed(err: reqwest::Error) -> BoxError {
    Box::new(err)
}

/// Failure of a single repository call.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum ClientError {
    #[snafu(display("invalid bundle {}: {reason}", path.display()))]
    InvalidBundle { path: PathBuf, reason: String },

    /// Rejected locally; nothing was sent.
    #[snafu(display("{operation}: {reason}"))]
    InvalidRequest {
        operation: &'static str,
        reason: String,
    },

    #[snafu(display("{operation}: bad request (400): {body}"))]
    BadRequest { operation: &'static str, body: String },

    #[snafu(display("{operation}: unauthorized (401): {body}"))]
    Unauthorized { operation: &'static str, body: String },

    #[snafu(display("{operation}: forbidden (403): {body}"))]
    Forbidden { operation: &'static str, body: String },

    #[snafu(display("{operation}: not found (404): {body}"))]
    NotFound { operation: &'static str, body: String },

    #[snafu(display("{operation}: internal server error (500): {body}"))]
    ServerError { operation: &'static str, body: String },

    #[snafu(display("{operation}: unexpected HTTP status {code}: {body}"))]
    UnexpectedStatus {
        operation: &'static str,
        code: u16,
        body: String,
    },

    #[snafu(display("{operation}: request failed: {source}"))]
    Transport {
        operation: &'static str,
        #[snafu(source(from(reqwest::Error, boxed)))]
        source: BoxError,
    },

    #[snafu(display("{operation}: malformed response: {source}"))]
    Decode {
        operation: &'static str,
        source: serde_json::Error,
    },

    #[snafu(display("{operation}: {message}"))]
    InvalidResponse {
        operation: &'static str,
        message: String,
    },
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientErrorKind {
    /// Local precondition failed before any request was sent.
    Validation,
    BadRequest,
    /// 401 or 403.
    Auth,
    NotFound,
    ServerError,
    UnexpectedStatus,
    /// The request never produced an HTTP response.
    Transport,
    /// The response could not be understood.
    Decode,
}

impl ClientError {
    /// Classify a non-success HTTP status.
    pub fn from_status(operation: &'static str, code: u16, body: String) -> Self {
        match code {
            400 => ClientError::BadRequest { operation, body },
            401 => ClientError::Unauthorized { operation, body },
            403 => ClientError::Forbidden { operation, body },
            404 => ClientError::NotFound { operation, body },
            500 => ClientError::ServerError { operation, body },
            _ => ClientError::UnexpectedStatus {
                operation,
                code,
                body,
            },
        }
    }

    pub fn kind(&self) -> ClientErrorKind {
        match self {
            ClientError::InvalidBundle { .. } | ClientError::InvalidRequest { .. } => {
                ClientErrorKind::Validation
            }
            ClientError::BadRequest { .. } => ClientErrorKind::BadRequest,
            ClientError::Unauthorized { .. } | ClientError::Forbidden { .. } => {
                ClientErrorKind::Auth
            }
            ClientError::NotFound { .. } => ClientErrorKind::NotFound,
            ClientError::ServerError { .. } => ClientErrorKind::ServerError,
            ClientError::UnexpectedStatus { .. } => ClientErrorKind::UnexpectedStatus,
            ClientError::Transport { .. } => ClientErrorKind::Transport,
            ClientError::Decode { .. } | ClientError::InvalidResponse { .. } => {
                ClientErrorKind::Decode
            }
        }
    }

    /// HTTP status code, if the failure came from a response.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ClientError::BadRequest { .. } => Some(400),
            ClientError::Unauthorized { .. } => Some(401),
            ClientError::Forbidden { .. } => Some(403),
            ClientError::NotFound { .. } => Some(404),
            ClientError::ServerError { .. } => Some(500),
            ClientError::UnexpectedStatus { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// Response body returned with an HTTP failure.
    pub fn body(&self) -> Option<&str> {
        match self {
            ClientError::BadRequest { body, .. }
            | ClientError::Unauthorized { body, .. }
            | ClientError::Forbidden { body, .. }
            | ClientError::NotFound { body, .. }
            | ClientError::ServerError { body, .. }
            | ClientError::UnexpectedStatus { body, .. } => Some(body),
            _ => None,
        }
    }

    /// Network-level failures; the only errors a poll may retry.
    pub fn is_transient(&self) -> bool {
        self.kind() == ClientErrorKind::Transport
    }
}
