//! Status aggregation helpers

use crate::models::deployment::{DeploymentState, RecentChange};
use crate::repo::{ChangeRecord, DeploymentEventStatus};

/// Length of an abbreviated commit revision
pub const SHORT_REVISION_LEN: usize = 7;

/// State of the most recent status in a newest-first list
pub fn latest_state(statuses: &[DeploymentEventStatus]) -> DeploymentState {
    statuses
        .first()
        .map(|s| DeploymentState::from_upstream(&s.state))
        .unwrap_or(DeploymentState::Unknown)
}

/// First seven characters of a revision
pub fn short_revision(revision: &str) -> String {
    revision.chars().take(SHORT_REVISION_LEN).collect()
}

/// Convert newest-first change records into at most `limit` recent changes
pub fn recent_changes(records: Vec<ChangeRecord>, limit: usize) -> Vec<RecentChange> {
    records
        .into_iter()
        .take(limit)
        .map(|record| RecentChange {
            short_revision: short_revision(&record.revision),
            message: record.message,
            author: record.author,
            timestamp: record.timestamp,
            url: record.url,
        })
        .collect()
}

/// Label an editor sees for a deployment state
pub fn status_label(state: DeploymentState) -> &'static str {
    match state {
        DeploymentState::Success => "Live",
        DeploymentState::Pending | DeploymentState::InProgress => "Deploying",
        DeploymentState::Failure | DeploymentState::Error => "Failed",
        DeploymentState::Unknown => "Unknown",
    }
}
