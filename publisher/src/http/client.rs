//! HTTP client implementation

use std::time::Duration;

use reqwest::{header, Client, RequestBuilder, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::{debug, error};
use url::Url;

use crate::errors::{PublishError, RemoteError, RemoteErrorKind};

/// Media type requested from the GitHub REST API
pub const GITHUB_MEDIA_TYPE: &str = "application/vnd.github+json";

/// REST API version pinned on every request
pub const GITHUB_API_VERSION: &str = "2022-11-28";

/// Connection options for a single GitHub repository
#[derive(Debug)]
pub struct GitHubOptions {
    /// API root, e.g. `https://api.github.com`
    pub api_base_url: String,
    pub owner: String,
    pub repo: String,

    /// Branch written to and read from
    pub branch: String,

    /// Token sent as a bearer credential; anonymous when absent
    pub token: Option<SecretString>,
    pub user_agent: String,
    pub request_timeout: Duration,
}

impl Default for GitHubOptions {
    fn default() -> Self {
        Self {
            api_base_url: "https://api.github.com".to_string(),
            owner: String::new(),
            repo: String::new(),
            branch: "main".to_string(),
            token: None,
            user_agent: format!("sitepub/{}", env!("CARGO_PKG_VERSION")),
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// HTTP client for one GitHub repository
pub struct GitHubClient {
    client: Client,
    api_base: Url,
    owner: String,
    repo: String,
    branch: String,
    token: Option<SecretString>,
}

impl GitHubClient {
    /// Create a new GitHub client
    pub fn new(options: GitHubOptions) -> Result<Self, PublishError> {
        let api_base = Url::parse(&options.api_base_url).map_err(|e| {
            PublishError::ConfigError(format!(
                "Invalid GitHub API URL '{}': {}",
                options.api_base_url, e
            ))
        })?;
        if api_base.cannot_be_a_base() {
            return Err(PublishError::ConfigError(format!(
                "GitHub API URL '{}' cannot be used as a base",
                options.api_base_url
            )));
        }
        if options.owner.is_empty() || options.repo.is_empty() {
            return Err(PublishError::ConfigError(
                "GitHub owner and repo must be set".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(options.request_timeout)
            .user_agent(options.user_agent)
            .build()
            .map_err(|e| PublishError::ConfigError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_base,
            owner: options.owner,
            repo: options.repo,
            branch: options.branch,
            token: options.token,
        })
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn repo(&self) -> &str {
        &self.repo
    }

    pub fn branch(&self) -> &str {
        &self.branch
    }

    /// `{api}/repos/{owner}/{repo}/{segments...}` with each segment escaped
    pub(crate) fn endpoint<'a>(&self, segments: impl IntoIterator<Item = &'a str>) -> Url {
        let mut url = self.api_base.clone();
        // cannot_be_a_base was rejected in new()
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty()
                .extend(["repos", self.owner.as_str(), self.repo.as_str()])
                .extend(segments);
        }
        url
    }

    /// Make a GET request
    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        operation: &str,
        url: Url,
        query: &[(&str, String)],
    ) -> Result<T, RemoteError> {
        debug!("GET {}", url);
        let request = self.client.get(url).query(query);
        self.send(operation, request).await
    }

    /// Make a PUT request with a JSON body
    pub(crate) async fn put<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        operation: &str,
        url: Url,
        body: &B,
    ) -> Result<T, RemoteError> {
        debug!("PUT {}", url);
        let request = self.client.put(url).json(body);
        self.send(operation, request).await
    }

    async fn send<T: DeserializeOwned>(
        &self,
        operation: &str,
        request: RequestBuilder,
    ) -> Result<T, RemoteError> {
        let mut request = request
            .header(header::ACCEPT, GITHUB_MEDIA_TYPE)
            .header("X-GitHub-Api-Version", GITHUB_API_VERSION);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token.expose_secret());
        }

        let response = request
            .send()
            .await
            .map_err(|e| RemoteError::from_reqwest(operation, e))?;

        let status = response.status();
        if !status.is_success() {
            let rate_limited = response
                .headers()
                .get("x-ratelimit-remaining")
                .and_then(|v| v.to_str().ok())
                .map(|v| v.trim() == "0")
                .unwrap_or(false);
            let body = response.text().await.unwrap_or_default();
            if status != StatusCode::NOT_FOUND {
                error!("GitHub {} failed: {} - {}", operation, status, body);
            }
            return Err(classify_failure(operation, status, rate_limited, &body));
        }

        response
            .json()
            .await
            .map_err(|e| RemoteError::from_reqwest(operation, e))
    }
}

/// Turn a non-success GitHub response into a [`RemoteError`]
pub fn classify_failure(
    operation: &str,
    status: StatusCode,
    rate_limited: bool,
    body: &str,
) -> RemoteError {
    let message = serde_json::from_str::<github_api::ErrorResponse>(body)
        .ok()
        .map(|e| e.message)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| {
            if body.is_empty() {
                status.to_string()
            } else {
                body.to_string()
            }
        });

    let kind = match status {
        StatusCode::UNAUTHORIZED => RemoteErrorKind::Auth,
        StatusCode::FORBIDDEN if rate_limited || mentions_rate_limit(&message) => {
            RemoteErrorKind::RateLimit
        }
        StatusCode::FORBIDDEN => RemoteErrorKind::Auth,
        StatusCode::TOO_MANY_REQUESTS => RemoteErrorKind::RateLimit,
        StatusCode::NOT_FOUND => RemoteErrorKind::NotFound,
        StatusCode::CONFLICT => RemoteErrorKind::Conflict,
        // Creating over an existing file without its sha
        StatusCode::UNPROCESSABLE_ENTITY if message.contains("sha") => RemoteErrorKind::Conflict,
        _ => RemoteErrorKind::Status,
    };

    RemoteError::new(operation, kind, message).with_status(status.as_u16())
}

fn mentions_rate_limit(message: &str) -> bool {
    message.to_ascii_lowercase().contains("rate limit")
}
