//! Publish and status reconciliation against the content repository

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::deploy::status::{latest_state, recent_changes};
use crate::errors::PublishError;
use crate::models::deployment::{DeploymentDescriptor, DeploymentState, DeploymentStatusView};
use crate::models::site::{ContentRevision, SiteId, SiteLocation};
use crate::repo::{CommitIdentity, ContentRepository, FileWrite};
use crate::sites::registry::SiteRegistry;

/// What a publish does when reading the current revision fails for a reason
/// other than the file being absent
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProbePolicy {
    /// Fail the publish with the read error
    #[default]
    Strict,
    /// Log the error and write without a revision precondition
    Lenient,
}

/// Reconciler options
#[derive(Debug, Clone)]
pub struct ReconcilerOptions {
    /// GitHub Pages root; sites are served under `{base}/sites/{folder}/`
    pub pages_base_url: String,

    /// Web URL of the repository, e.g. `https://github.com/owner/repo`
    pub repo_web_url: String,
    pub branch: String,

    /// Deployment environment GitHub Pages reports to
    pub environment: String,
    pub identity: CommitIdentity,
    pub probe_policy: ProbePolicy,

    /// Number of commits returned by a status query
    pub recent_changes_limit: u8,
}

impl Default for ReconcilerOptions {
    fn default() -> Self {
        Self {
            pages_base_url: "https://dean-sitehub.github.io/dean-sitehub".to_string(),
            repo_web_url: "https://github.com/Deankann2023/sitehub-customer-sites".to_string(),
            branch: "main".to_string(),
            environment: "github-pages".to_string(),
            identity: CommitIdentity::default(),
            probe_policy: ProbePolicy::Strict,
            recent_changes_limit: 5,
        }
    }
}

/// A request to publish new page content for a site
#[derive(Debug, Clone)]
pub struct PublishRequest {
    pub site_id: SiteId,
    pub content: String,
    pub site_name: Option<String>,
    pub commit_message: Option<String>,
}

impl PublishRequest {
    pub fn new(site_id: impl Into<SiteId>, content: impl Into<String>) -> Self {
        Self {
            site_id: site_id.into(),
            content: content.into(),
            site_name: None,
            commit_message: None,
        }
    }

    pub fn with_site_name(mut self, site_name: impl Into<String>) -> Self {
        self.site_name = Some(site_name.into());
        self
    }

    pub fn with_commit_message(mut self, message: impl Into<String>) -> Self {
        self.commit_message = Some(message.into());
        self
    }
}

/// Orchestrates site publishes and status queries.
///
/// Holds no mutable state: every call resolves the site, talks to the
/// repository and returns. Nothing is retried.
pub struct Reconciler {
    registry: SiteRegistry,
    repo: Arc<dyn ContentRepository>,
    options: ReconcilerOptions,
}

impl Reconciler {
    pub fn new(
        registry: SiteRegistry,
        repo: Arc<dyn ContentRepository>,
        options: ReconcilerOptions,
    ) -> Self {
        Self {
            registry,
            repo,
            options,
        }
    }

    pub fn registry(&self) -> &SiteRegistry {
        &self.registry
    }

    pub fn options(&self) -> &ReconcilerOptions {
        &self.options
    }

    /// Public URL a site is served from
    pub fn site_url(&self, location: &SiteLocation) -> String {
        format!(
            "{}/{}/",
            self.options.pages_base_url.trim_end_matches('/'),
            location.folder_path()
        )
    }

    /// Repository browser URL of a site's folder
    pub fn repo_url(&self, location: &SiteLocation) -> String {
        format!(
            "{}/tree/{}/{}",
            self.options.repo_web_url.trim_end_matches('/'),
            self.options.branch,
            location.folder_path()
        )
    }

    /// Write new content for a site and report the resulting commit.
    ///
    /// The returned status is always pending: the Pages build has not run yet.
    pub async fn publish(&self, request: PublishRequest) -> Result<DeploymentDescriptor, PublishError> {
        let location = self.registry.resolve(&request.site_id)?;
        let path = location.index_path();
        info!("Publishing site {} to {}", request.site_id, path);

        let expected_revision = self.probe(&path).await?;

        let message = match non_empty(request.commit_message) {
            Some(message) => message,
            None => self.default_commit_message(request.site_name.as_deref(), location),
        };

        let write = FileWrite {
            path: path.clone(),
            content: request.content.into_bytes(),
            message,
            expected_revision,
            identity: self.options.identity.clone(),
        };
        let commit = self.repo.write_file(write).await?;
        info!("Published {} in commit {}", path, commit.revision);

        Ok(DeploymentDescriptor {
            success: true,
            commit_revision: commit.revision,
            commit_url: commit.url,
            site_url: self.site_url(location),
            deployment_status: DeploymentState::Pending,
        })
    }

    /// Recent changes and latest Pages deployment state of a site
    pub async fn status(&self, site_id: &SiteId) -> Result<DeploymentStatusView, PublishError> {
        let location = self.registry.resolve(site_id)?;
        let folder = location.folder_path();
        let limit = self.options.recent_changes_limit;

        let (changes, events) = tokio::try_join!(
            self.repo.list_recent_changes(&folder, limit),
            self.repo.list_deployment_events(&self.options.environment, 1),
        )?;

        let latest = events.first();
        let deployment_status = match latest {
            Some(event) => {
                let statuses = self.repo.list_deployment_event_statuses(event.id, 1).await?;
                latest_state(&statuses)
            }
            None => {
                debug!("No deployments in environment {}", self.options.environment);
                DeploymentState::Unknown
            }
        };

        Ok(DeploymentStatusView {
            site_location: location.clone(),
            site_url: self.site_url(location),
            repo_url: self.repo_url(location),
            deployment_status,
            deployment_revision: latest.and_then(|event| event.revision.clone()),
            recent_changes: recent_changes(changes, usize::from(limit)),
        })
    }

    /// Read the current revision to use as the write precondition
    async fn probe(&self, path: &str) -> Result<Option<ContentRevision>, PublishError> {
        match self.repo.read_file(path).await {
            Ok(Some(revision)) => {
                debug!("{} is at revision {}", path, revision);
                Ok(Some(revision))
            }
            Ok(None) => {
                info!("{} does not exist, creating it", path);
                Ok(None)
            }
            Err(e) => match self.options.probe_policy {
                ProbePolicy::Strict => Err(e.into()),
                ProbePolicy::Lenient => {
                    warn!("Could not read {}, writing without a revision: {}", path, e);
                    Ok(None)
                }
            },
        }
    }

    fn default_commit_message(&self, site_name: Option<&str>, location: &SiteLocation) -> String {
        let name = site_name
            .filter(|n| !n.is_empty())
            .unwrap_or(location.as_str());
        format!(
            "Update {} via {} - {}",
            name,
            self.options.identity.name,
            Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
        )
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
