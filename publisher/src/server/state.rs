//! Server state

use std::sync::Arc;

use tokio::sync::broadcast;

use crate::deploy::reconciler::Reconciler;
use crate::workers::watcher;

/// Server state shared across handlers
pub struct ServerState {
    pub reconciler: Arc<Reconciler>,

    /// Spawn a deployment watcher after each successful publish
    pub watch_after_publish: bool,
    pub watcher: watcher::Options,

    /// Fires once when the service shuts down
    pub shutdown_tx: broadcast::Sender<()>,
}

impl ServerState {
    pub fn new(reconciler: Arc<Reconciler>, shutdown_tx: broadcast::Sender<()>) -> Self {
        Self {
            reconciler,
            watch_after_publish: false,
            watcher: watcher::Options::default(),
            shutdown_tx,
        }
    }

    pub fn with_watcher(mut self, options: watcher::Options) -> Self {
        self.watch_after_publish = true;
        self.watcher = options;
        self
    }
}
