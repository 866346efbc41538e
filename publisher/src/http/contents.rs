//! Repository contents API

use base64::{engine::general_purpose::STANDARD, Engine as _};
use github_api::{
    CommitIdentity as ApiIdentity, ContentResponse, PutContentRequest, PutContentResponse,
};
use tracing::debug;

use crate::errors::RemoteError;
use crate::http::client::GitHubClient;
use crate::models::site::ContentRevision;
use crate::repo::{CommitIdentity, CommitRef, FileWrite};

impl GitHubClient {
    /// Get the blob SHA of a file on the configured branch.
    ///
    /// Returns `None` when the path does not exist or names a directory.
    pub async fn get_file_sha(&self, path: &str) -> Result<Option<ContentRevision>, RemoteError> {
        let operation = format!("read {}", path);
        let url = self.endpoint(std::iter::once("contents").chain(path.split('/')));
        let query = [("ref", self.branch().to_string())];

        match self.get::<ContentResponse>(&operation, url, &query).await {
            Ok(ContentResponse::File(file)) => Ok(Some(ContentRevision(file.sha))),
            Ok(ContentResponse::Directory(_)) => {
                debug!("{} is a directory, no revision to carry", path);
                Ok(None)
            }
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Create or update a file on the configured branch
    pub async fn put_file(&self, write: FileWrite) -> Result<CommitRef, RemoteError> {
        let operation = format!("write {}", write.path);
        let url = self.endpoint(std::iter::once("contents").chain(write.path.split('/')));

        let body = PutContentRequest {
            message: write.message,
            content: STANDARD.encode(&write.content),
            sha: write.expected_revision.map(|r| r.0),
            branch: Some(self.branch().to_string()),
            author: to_api_identity(&write.identity),
            committer: to_api_identity(&write.identity),
        };

        let response: PutContentResponse = self.put(&operation, url, &body).await?;
        Ok(CommitRef {
            revision: response.commit.sha,
            url: response.commit.html_url,
        })
    }
}

fn to_api_identity(identity: &CommitIdentity) -> ApiIdentity {
    ApiIdentity {
        name: identity.name.clone(),
        email: identity.email.clone(),
    }
}
