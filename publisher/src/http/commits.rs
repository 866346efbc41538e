//! Repository commits API

use github_api::CommitListItem;

use crate::errors::RemoteError;
use crate::http::client::GitHubClient;
use crate::repo::ChangeRecord;

impl GitHubClient {
    /// List commits on the configured branch that touch `path`
    pub async fn list_commits(&self, path: &str, per_page: u8) -> Result<Vec<ChangeRecord>, RemoteError> {
        let operation = format!("list commits for {}", path);
        let url = self.endpoint(["commits"]);
        let query = [
            ("path", path.to_string()),
            ("sha", self.branch().to_string()),
            ("per_page", per_page.to_string()),
        ];

        let commits: Vec<CommitListItem> = self.get(&operation, url, &query).await?;
        Ok(commits.into_iter().map(to_change_record).collect())
    }
}

fn to_change_record(item: CommitListItem) -> ChangeRecord {
    let (author, timestamp) = match item.commit.author {
        Some(actor) => (actor.name, actor.date),
        None => (None, None),
    };
    ChangeRecord {
        revision: item.sha,
        message: item.commit.message,
        author,
        timestamp,
        url: item.html_url,
    }
}
