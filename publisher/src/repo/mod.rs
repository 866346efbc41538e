//! Content repository abstraction
//!
//! The reconciler talks to the versioned file store only through
//! [`ContentRepository`]. The GitHub implementation lives in
//! [`crate::http::client::GitHubClient`]; tests substitute an in-memory fake.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::RemoteError;
use crate::models::site::ContentRevision;

/// Author and committer identity attached to writes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitIdentity {
    pub name: String,
    pub email: String,
}

impl Default for CommitIdentity {
    fn default() -> Self {
        Self {
            name: "SiteHub Editor".to_string(),
            email: "editor@sitehub.co.za".to_string(),
        }
    }
}

/// A create-or-update of a single file
#[derive(Debug, Clone)]
pub struct FileWrite {
    pub path: String,
    pub content: Vec<u8>,
    pub message: String,

    /// `None` creates the file; `Some` updates only if the live revision matches
    pub expected_revision: Option<ContentRevision>,
    pub identity: CommitIdentity,
}

/// Commit produced by a write
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRef {
    pub revision: String,
    pub url: String,
}

/// One commit touching a path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeRecord {
    pub revision: String,
    pub message: String,
    pub author: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
    pub url: String,
}

/// One deployment attempt to a hosting environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentEvent {
    pub id: u64,

    /// Commit the deployment was built from
    pub revision: Option<String>,
    pub environment: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

/// A status reported for a deployment event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentEventStatus {
    /// Raw upstream state, e.g. `success` or `in_progress`
    pub state: String,
    pub created_at: Option<DateTime<Utc>>,
}

/// Remote versioned file store scoped to a single repository.
///
/// Implementations never retry; every failure is returned as a
/// [`RemoteError`].
#[async_trait]
pub trait ContentRepository: Send + Sync {
    /// Current revision of the file at `path`, or `None` if it does not exist
    async fn read_file(&self, path: &str) -> Result<Option<ContentRevision>, RemoteError>;

    /// Create or conditionally update a file
    async fn write_file(&self, write: FileWrite) -> Result<CommitRef, RemoteError>;

    /// Commits touching `path`, most recent first, at most `limit`
    async fn list_recent_changes(
        &self,
        path: &str,
        limit: u8,
    ) -> Result<Vec<ChangeRecord>, RemoteError>;

    /// Deployment events of `environment`, most recent first, at most `limit`
    async fn list_deployment_events(
        &self,
        environment: &str,
        limit: u8,
    ) -> Result<Vec<DeploymentEvent>, RemoteError>;

    /// Statuses of one deployment event, most recent first, at most `limit`
    async fn list_deployment_event_statuses(
        &self,
        event_id: u64,
        limit: u8,
    ) -> Result<Vec<DeploymentEventStatus>, RemoteError>;
}
