//! Settings file management

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::deploy::reconciler::ProbePolicy;
use crate::logs::LogLevel;
use crate::repo::CommitIdentity;

/// Service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,

    /// Emit JSON log lines on stdout
    #[serde(default)]
    pub json_logs: bool,

    /// Also write daily rotated log files under the storage layout
    #[serde(default)]
    pub log_to_file: bool,

    /// Local HTTP server configuration
    #[serde(default)]
    pub server: ServerSettings,

    /// Content repository configuration
    #[serde(default)]
    pub github: GitHubSettings,

    /// GitHub Pages configuration
    #[serde(default)]
    pub pages: PagesSettings,

    /// Author and committer of every publish
    #[serde(default)]
    pub identity: CommitIdentity,

    /// Handling of revision read failures during publish
    #[serde(default)]
    pub probe_policy: ProbePolicy,

    /// Poll the Pages deployment in the background after each publish
    #[serde(default)]
    pub watch_after_publish: bool,

    /// Site id to folder under `sites/`
    #[serde(default)]
    pub sites: BTreeMap<String, String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: LogLevel::Info,
            json_logs: false,
            log_to_file: false,
            server: ServerSettings::default(),
            github: GitHubSettings::default(),
            pages: PagesSettings::default(),
            identity: CommitIdentity::default(),
            probe_policy: ProbePolicy::Strict,
            watch_after_publish: false,
            sites: BTreeMap::new(),
        }
    }
}

/// Local HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_server_host")]
    pub host: String,

    #[serde(default = "default_server_port")]
    pub port: u16,
}

fn default_server_host() -> String {
    "127.0.0.1".to_string()
}

fn default_server_port() -> u16 {
    8080
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
        }
    }
}

/// GitHub repository settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubSettings {
    /// REST API root
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Web root used to build repository links
    #[serde(default = "default_web_base_url")]
    pub web_base_url: String,

    #[serde(default = "default_owner")]
    pub owner: String,

    #[serde(default = "default_repo")]
    pub repo: String,

    #[serde(default = "default_branch")]
    pub branch: String,

    /// Deployment environment GitHub Pages reports to
    #[serde(default = "default_environment")]
    pub environment: String,

    /// Name of the environment variable holding the API token
    #[serde(default = "default_token_env")]
    pub token_env: String,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_api_base_url() -> String {
    "https://api.github.com".to_string()
}

fn default_web_base_url() -> String {
    "https://github.com".to_string()
}

fn default_owner() -> String {
    "Deankann2023".to_string()
}

fn default_repo() -> String {
    "sitehub-customer-sites".to_string()
}

fn default_branch() -> String {
    "main".to_string()
}

fn default_environment() -> String {
    "github-pages".to_string()
}

fn default_token_env() -> String {
    "GITHUB_TOKEN".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

impl Default for GitHubSettings {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            web_base_url: default_web_base_url(),
            owner: default_owner(),
            repo: default_repo(),
            branch: default_branch(),
            environment: default_environment(),
            token_env: default_token_env(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl GitHubSettings {
    /// `https://github.com/{owner}/{repo}`
    pub fn repo_web_url(&self) -> String {
        format!(
            "{}/{}/{}",
            self.web_base_url.trim_end_matches('/'),
            self.owner,
            self.repo
        )
    }
}

/// GitHub Pages settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PagesSettings {
    /// Root the Pages site is served from
    #[serde(default = "default_pages_base_url")]
    pub base_url: String,
}

fn default_pages_base_url() -> String {
    "https://dean-sitehub.github.io/dean-sitehub".to_string()
}

impl Default for PagesSettings {
    fn default() -> Self {
        Self {
            base_url: default_pages_base_url(),
        }
    }
}
