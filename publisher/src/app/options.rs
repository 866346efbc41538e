//! Application configuration options

use std::time::Duration;

use secrecy::SecretString;

use crate::deploy::reconciler::ReconcilerOptions;
use crate::errors::PublishError;
use crate::http::client::GitHubOptions;
use crate::sites::registry::SiteRegistry;
use crate::storage::settings::Settings;
use crate::workers::watcher;

/// Main application options
#[derive(Debug)]
pub struct AppOptions {
    /// Server configuration
    pub server: ServerOptions,

    /// GitHub client configuration
    pub github: GitHubOptions,

    /// Reconciler configuration
    pub reconciler: ReconcilerOptions,

    /// Site registry built from the settings mapping
    pub registry: SiteRegistry,

    /// Watch each publish until its Pages deployment settles
    pub watch_after_publish: bool,

    /// Deployment watcher options
    pub watcher: watcher::Options,
}

impl AppOptions {
    /// Build options from settings.
    ///
    /// `token` is the GitHub API token, if one was found.
    pub fn from_settings(settings: &Settings, token: Option<SecretString>) -> Result<Self, PublishError> {
        let registry = SiteRegistry::try_from(&settings.sites)?;

        let github = GitHubOptions {
            api_base_url: settings.github.api_base_url.clone(),
            owner: settings.github.owner.clone(),
            repo: settings.github.repo.clone(),
            branch: settings.github.branch.clone(),
            token,
            request_timeout: Duration::from_secs(settings.github.request_timeout_secs),
            ..Default::default()
        };

        let reconciler = ReconcilerOptions {
            pages_base_url: settings.pages.base_url.clone(),
            repo_web_url: settings.github.repo_web_url(),
            branch: settings.github.branch.clone(),
            environment: settings.github.environment.clone(),
            identity: settings.identity.clone(),
            probe_policy: settings.probe_policy,
            ..Default::default()
        };

        Ok(Self {
            server: ServerOptions {
                host: settings.server.host.clone(),
                port: settings.server.port,
            },
            github,
            reconciler,
            registry,
            watch_after_publish: settings.watch_after_publish,
            watcher: watcher::Options::default(),
        })
    }
}

/// Local HTTP server options
#[derive(Debug, Clone)]
pub struct ServerOptions {
    /// Host to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}
