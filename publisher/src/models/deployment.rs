//! Deployment models

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::site::SiteLocation;

/// State of the latest GitHub Pages deployment of a site
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeploymentState {
    #[default]
    Unknown,
    Pending,
    InProgress,
    Success,
    Failure,
    Error,
}

impl DeploymentState {
    /// Map a GitHub deployment status `state` onto the published states.
    ///
    /// `queued` is reported as pending; `inactive` and anything unrecognised
    /// as unknown.
    pub fn from_upstream(state: &str) -> Self {
        match state {
            "pending" | "queued" => DeploymentState::Pending,
            "in_progress" => DeploymentState::InProgress,
            "success" => DeploymentState::Success,
            "failure" => DeploymentState::Failure,
            "error" => DeploymentState::Error,
            _ => DeploymentState::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DeploymentState::Unknown => "unknown",
            DeploymentState::Pending => "pending",
            DeploymentState::InProgress => "in_progress",
            DeploymentState::Success => "success",
            DeploymentState::Failure => "failure",
            DeploymentState::Error => "error",
        }
    }

    /// Whether GitHub Pages will not move this deployment any further
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            DeploymentState::Success | DeploymentState::Failure | DeploymentState::Error
        )
    }
}

impl fmt::Display for DeploymentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a successful publish
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeploymentDescriptor {
    pub success: bool,
    pub commit_revision: String,
    pub commit_url: String,
    pub site_url: String,

    /// Always `Pending`: the Pages build runs after the commit lands
    pub deployment_status: DeploymentState,
}

/// One entry of a site's recent change history
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecentChange {
    pub short_revision: String,
    pub message: String,
    pub author: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
    pub url: String,
}

/// Aggregated status snapshot of a site
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeploymentStatusView {
    pub site_location: SiteLocation,
    pub site_url: String,
    pub repo_url: String,
    pub deployment_status: DeploymentState,

    /// Commit the latest deployment was built from, if there is one
    pub deployment_revision: Option<String>,

    /// Most recent first
    pub recent_changes: Vec<RecentChange>,
}
