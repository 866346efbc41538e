//! Deployment watcher
//!
//! Polls a site's status after a publish until GitHub Pages reports a
//! terminal state.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::deploy::reconciler::Reconciler;
use crate::errors::PublishError;
use crate::models::deployment::DeploymentState;
use crate::models::site::SiteId;
use crate::utils::{calc_exp_backoff, CooldownOptions};

/// Watcher options
#[derive(Debug, Clone)]
pub struct Options {
    /// Delay before each poll
    pub cooldown: CooldownOptions,

    /// Polls before giving up
    pub max_attempts: u32,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            cooldown: CooldownOptions::default(),
            max_attempts: 10,
        }
    }
}

/// How a watch ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchOutcome {
    /// A terminal state was observed
    Settled(DeploymentState),
    /// Attempts ran out; carries the last observed state
    TimedOut(DeploymentState),
    Cancelled,
}

/// Poll the status of `site_id` until the deployment of `revision` settles,
/// attempts run out or `shutdown_signal` resolves.
///
/// Deployments of other commits are treated as not started yet. Remote
/// errors count as a failed attempt; an unconfigured site ends the watch with
/// an error.
pub async fn run<S, F>(
    options: &Options,
    reconciler: &Reconciler,
    site_id: &SiteId,
    revision: &str,
    sleep_fn: S,
    mut shutdown_signal: Pin<Box<dyn Future<Output = ()> + Send>>,
) -> Result<WatchOutcome, PublishError>
where
    S: Fn(Duration) -> F,
    F: Future<Output = ()>,
{
    info!("Watching deployment of site {} at {}", site_id, revision);
    let mut last = DeploymentState::Unknown;

    for attempt in 0..options.max_attempts {
        tokio::select! {
            biased;
            _ = &mut shutdown_signal => {
                info!("Deployment watch of {} cancelled", site_id);
                return Ok(WatchOutcome::Cancelled);
            }
            _ = sleep_fn(calc_exp_backoff(&options.cooldown, attempt)) => {}
        }

        match reconciler.status(site_id).await {
            Ok(view) if view.deployment_revision.as_deref() != Some(revision) => {
                debug!(
                    "No deployment of {} for site {} yet (poll {})",
                    revision,
                    site_id,
                    attempt + 1
                );
            }
            Ok(view) => {
                last = view.deployment_status;
                debug!("Site {} deployment is {} (poll {})", site_id, last, attempt + 1);
                if last.is_terminal() {
                    info!("Site {} deployment settled: {}", site_id, last);
                    return Ok(WatchOutcome::Settled(last));
                }
            }
            Err(PublishError::Remote(e)) => {
                warn!("Status poll {} for {} failed: {}", attempt + 1, site_id, e);
            }
            Err(e) => return Err(e),
        }
    }

    warn!(
        "Gave up watching {} after {} polls, last state {}",
        site_id, options.max_attempts, last
    );
    Ok(WatchOutcome::TimedOut(last))
}
