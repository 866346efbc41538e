//! Repository deployments API

use github_api::{Deployment, DeploymentStatus};

use crate::errors::RemoteError;
use crate::http::client::GitHubClient;
use crate::repo::{DeploymentEvent, DeploymentEventStatus};

impl GitHubClient {
    /// List deployments of an environment, newest first
    pub async fn list_deployments(
        &self,
        environment: &str,
        per_page: u8,
    ) -> Result<Vec<DeploymentEvent>, RemoteError> {
        let operation = format!("list deployments for {}", environment);
        let url = self.endpoint(["deployments"]);
        let query = [
            ("environment", environment.to_string()),
            ("per_page", per_page.to_string()),
        ];

        let deployments: Vec<Deployment> = self.get(&operation, url, &query).await?;
        Ok(deployments
            .into_iter()
            .map(|d| DeploymentEvent {
                id: d.id,
                revision: d.sha,
                environment: d.environment,
                created_at: d.created_at,
            })
            .collect())
    }

    /// List statuses of a deployment, newest first
    pub async fn list_deployment_statuses(
        &self,
        deployment_id: u64,
        per_page: u8,
    ) -> Result<Vec<DeploymentEventStatus>, RemoteError> {
        let operation = format!("list statuses for deployment {}", deployment_id);
        let id = deployment_id.to_string();
        let url = self.endpoint(["deployments", id.as_str(), "statuses"]);
        let query = [("per_page", per_page.to_string())];

        let statuses: Vec<DeploymentStatus> = self.get(&operation, url, &query).await?;
        Ok(statuses
            .into_iter()
            .map(|s| DeploymentEventStatus {
                state: s.state,
                created_at: s.created_at,
            })
            .collect())
    }
}
