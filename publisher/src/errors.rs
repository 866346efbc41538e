//! Error types for sitepub

use std::fmt;

use thiserror::Error;

/// Main error type for sitepub
#[derive(Error, Debug)]
pub enum PublishError {
    #[error("Site not configured for GitHub deployment: {0}")]
    UnconfiguredSite(String),

    #[error("Remote error: {0}")]
    Remote(#[from] RemoteError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Shutdown error: {0}")]
    ShutdownError(String),
}

/// Classification of a content repository failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteErrorKind {
    /// Transport failure: DNS, connect, TLS, timeout
    Network,
    /// Missing or rejected credentials
    Auth,
    /// Primary or secondary rate limit hit
    RateLimit,
    /// Revision precondition did not match the live file
    Conflict,
    NotFound,
    /// Any other non-success HTTP status
    Status,
    /// Response body could not be decoded
    Decode,
}

impl fmt::Display for RemoteErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RemoteErrorKind::Network => "network",
            RemoteErrorKind::Auth => "auth",
            RemoteErrorKind::RateLimit => "rate limit",
            RemoteErrorKind::Conflict => "conflict",
            RemoteErrorKind::NotFound => "not found",
            RemoteErrorKind::Status => "status",
            RemoteErrorKind::Decode => "decode",
        };
        f.write_str(s)
    }
}

/// Failure of a content repository operation.
///
/// Every repository operation surfaces its failures as this single type; the
/// `cause` carries the underlying message for the caller.
#[derive(Error, Debug, Clone)]
#[error("{operation} failed ({kind}): {cause}")]
pub struct RemoteError {
    pub operation: String,
    pub kind: RemoteErrorKind,
    /// HTTP status when the service answered
    pub status: Option<u16>,
    pub cause: String,
}

impl RemoteError {
    pub fn new(operation: impl Into<String>, kind: RemoteErrorKind, cause: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            kind,
            status: None,
            cause: cause.into(),
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn is_conflict(&self) -> bool {
        self.kind == RemoteErrorKind::Conflict
    }

    pub fn is_not_found(&self) -> bool {
        self.kind == RemoteErrorKind::NotFound
    }

    /// Attach the operation name to a transport error
    pub fn from_reqwest(operation: impl Into<String>, err: reqwest::Error) -> Self {
        let kind = if err.is_decode() {
            RemoteErrorKind::Decode
        } else {
            RemoteErrorKind::Network
        };
        let mut remote = Self::new(operation, kind, err.to_string());
        remote.status = err.status().map(|s| s.as_u16());
        remote
    }
}
