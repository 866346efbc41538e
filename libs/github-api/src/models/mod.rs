//! API models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Response of `GET /repos/{owner}/{repo}/contents/{path}`.
///
/// A file path yields a single object, a directory path yields an array.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ContentResponse {
    File(ContentFile),
    Directory(Vec<serde_json::Value>),
}

/// A single file entry of the contents API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentFile {
    pub sha: String,
    pub path: String,
    #[serde(default)]
    pub size: u64,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

/// Author or committer identity attached to a contents write
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitIdentity {
    pub name: String,
    pub email: String,
}

/// Body of `PUT /repos/{owner}/{repo}/contents/{path}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PutContentRequest {
    pub message: String,

    /// Base64 encoded file content
    pub content: String,

    /// Blob SHA of the file being replaced; omitted when creating
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,

    pub author: CommitIdentity,
    pub committer: CommitIdentity,
}

/// Response of a successful contents write
#[derive(Debug, Clone, Deserialize)]
pub struct PutContentResponse {
    #[serde(default)]
    pub content: Option<ContentFile>,
    pub commit: CommitSummary,
}

/// Commit created by a contents write
#[derive(Debug, Clone, Deserialize)]
pub struct CommitSummary {
    pub sha: String,
    pub html_url: String,
}

/// Item of `GET /repos/{owner}/{repo}/commits`
#[derive(Debug, Clone, Deserialize)]
pub struct CommitListItem {
    pub sha: String,
    pub html_url: String,
    pub commit: CommitDetail,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommitDetail {
    pub message: String,
    #[serde(default)]
    pub author: Option<GitActor>,
}

/// Git-level author signature
#[derive(Debug, Clone, Deserialize)]
pub struct GitActor {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
}

/// Item of `GET /repos/{owner}/{repo}/deployments`
#[derive(Debug, Clone, Deserialize)]
pub struct Deployment {
    pub id: u64,
    #[serde(default)]
    pub sha: Option<String>,
    #[serde(default)]
    pub environment: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Item of `GET /repos/{owner}/{repo}/deployments/{id}/statuses`
#[derive(Debug, Clone, Deserialize)]
pub struct DeploymentStatus {
    pub id: u64,
    pub state: String,
    #[serde(default)]
    pub environment_url: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Error body returned by the GitHub API
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub documentation_url: Option<String>,
}
