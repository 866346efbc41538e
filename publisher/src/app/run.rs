//! Main application run loop

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::app::options::AppOptions;
use crate::deploy::reconciler::{Reconciler, ReconcilerOptions};
use crate::errors::PublishError;
use crate::http::client::{GitHubClient, GitHubOptions};
use crate::server::serve::serve;
use crate::server::state::ServerState;
use crate::sites::registry::SiteRegistry;

/// Maximum delay for graceful shutdown
const MAX_SHUTDOWN_DELAY: Duration = Duration::from_secs(30);

/// Run the publishing service until `shutdown_signal` resolves
pub async fn run(
    options: AppOptions,
    shutdown_signal: impl Future<Output = ()> + Send + 'static,
) -> Result<(), PublishError> {
    info!("Initializing sitepub...");

    let (shutdown_tx, _shutdown_rx): (broadcast::Sender<()>, _) = broadcast::channel(1);
    let mut shutdown_manager = ShutdownManager::new(shutdown_tx.clone());

    if let Err(e) = init(options, shutdown_tx.clone(), &mut shutdown_manager).await {
        error!("Failed to start sitepub: {}", e);
        shutdown_manager.shutdown().await?;
        return Err(e);
    }

    shutdown_signal.await;
    info!("Shutdown signal received, shutting down...");

    drop(shutdown_tx);
    shutdown_manager.shutdown().await
}

// =============================== INITIALIZATION ================================== //

async fn init(
    options: AppOptions,
    shutdown_tx: broadcast::Sender<()>,
    shutdown_manager: &mut ShutdownManager,
) -> Result<(), PublishError> {
    let reconciler = Arc::new(init_reconciler(options.github, options.reconciler, options.registry)?);

    let mut state = ServerState::new(reconciler, shutdown_tx.clone());
    if options.watch_after_publish {
        state = state.with_watcher(options.watcher);
    }

    let mut shutdown_rx = shutdown_tx.subscribe();
    let handle = serve(&options.server, Arc::new(state), async move {
        let _ = shutdown_rx.recv().await;
    })
    .await?;

    shutdown_manager.with_server_handle(handle)
}

fn init_reconciler(
    github: GitHubOptions,
    options: ReconcilerOptions,
    registry: SiteRegistry,
) -> Result<Reconciler, PublishError> {
    if github.token.is_none() {
        warn!("No GitHub token configured, publishes will be rejected by GitHub");
    }
    if registry.is_empty() {
        warn!("No sites configured, every request will be rejected");
    } else {
        info!("Serving {} configured site(s)", registry.len());
    }
    info!(
        "Publishing to {}/{} on branch {}",
        github.owner, github.repo, github.branch
    );

    let client = GitHubClient::new(github)?;
    Ok(Reconciler::new(registry, Arc::new(client), options))
}

// ================================= SHUTDOWN ====================================== //

struct ShutdownManager {
    shutdown_tx: broadcast::Sender<()>,
    server_handle: Option<JoinHandle<Result<(), PublishError>>>,
}

impl ShutdownManager {
    fn new(shutdown_tx: broadcast::Sender<()>) -> Self {
        Self {
            shutdown_tx,
            server_handle: None,
        }
    }

    fn with_server_handle(
        &mut self,
        handle: JoinHandle<Result<(), PublishError>>,
    ) -> Result<(), PublishError> {
        if self.server_handle.is_some() {
            return Err(PublishError::ShutdownError("server_handle already set".to_string()));
        }
        self.server_handle = Some(handle);
        Ok(())
    }

    async fn shutdown(&mut self) -> Result<(), PublishError> {
        let _ = self.shutdown_tx.send(());

        match tokio::time::timeout(MAX_SHUTDOWN_DELAY, self.shutdown_impl()).await {
            Ok(result) => result,
            Err(_) => Err(PublishError::ShutdownError(format!(
                "Shutdown timed out after {:?}",
                MAX_SHUTDOWN_DELAY
            ))),
        }
    }

    async fn shutdown_impl(&mut self) -> Result<(), PublishError> {
        info!("Shutting down sitepub...");

        if let Some(handle) = self.server_handle.take() {
            handle
                .await
                .map_err(|e| PublishError::ShutdownError(e.to_string()))??;
        }

        info!("Shutdown complete");
        Ok(())
    }
}
