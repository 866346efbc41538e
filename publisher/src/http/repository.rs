//! [`ContentRepository`] backed by the GitHub REST API

use async_trait::async_trait;

use crate::errors::RemoteError;
use crate::http::client::GitHubClient;
use crate::models::site::ContentRevision;
use crate::repo::{
    ChangeRecord, CommitRef, ContentRepository, DeploymentEvent, DeploymentEventStatus, FileWrite,
};

#[async_trait]
impl ContentRepository for GitHubClient {
    async fn read_file(&self, path: &str) -> Result<Option<ContentRevision>, RemoteError> {
        self.get_file_sha(path).await
    }

    async fn write_file(&self, write: FileWrite) -> Result<CommitRef, RemoteError> {
        self.put_file(write).await
    }

    async fn list_recent_changes(
        &self,
        path: &str,
        limit: u8,
    ) -> Result<Vec<ChangeRecord>, RemoteError> {
        self.list_commits(path, limit).await
    }

    async fn list_deployment_events(
        &self,
        environment: &str,
        limit: u8,
    ) -> Result<Vec<DeploymentEvent>, RemoteError> {
        self.list_deployments(environment, limit).await
    }

    async fn list_deployment_event_statuses(
        &self,
        event_id: u64,
        limit: u8,
    ) -> Result<Vec<DeploymentEventStatus>, RemoteError> {
        self.list_deployment_statuses(event_id, limit).await
    }
}
