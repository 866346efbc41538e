//! API models

use serde::{Deserialize, Serialize};

/// Body of `POST /api/github/deploy-site/{siteId}`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploySiteRequest {
    pub html_content: String,
    #[serde(default)]
    pub site_name: Option<String>,
    #[serde(default)]
    pub commit_message: Option<String>,
}

/// Successful publish response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploySiteResponse {
    pub success: bool,
    pub message: String,
    pub commit_sha: String,
    pub commit_url: String,
    pub site_url: String,
    pub deployment_status: String,
}

/// Successful status response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteStatusResponse {
    pub success: bool,
    pub site_folder: String,
    pub site_url: String,
    pub repo_url: String,
    pub deployment_status: String,
    /// Human readable badge text: Live, Deploying, Failed or Unknown
    pub status_label: String,
    pub recent_commits: Vec<RecentCommit>,
}

/// Commit entry of a status response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecentCommit {
    /// Seven character abbreviated SHA
    pub sha: String,
    pub message: String,
    pub author: Option<String>,
    /// RFC 3339 author date
    pub date: Option<String>,
    pub url: String,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, details: Option<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
            details,
        }
    }
}
