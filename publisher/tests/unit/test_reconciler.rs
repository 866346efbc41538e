//! Reconciler unit tests

mod common;

use common::{network_error, reconciler, Call, FakeRepository, INDEX_PATH, SITE_ID};
use sitepub::deploy::reconciler::{ProbePolicy, PublishRequest};
use sitepub::errors::{PublishError, RemoteErrorKind};
use sitepub::models::deployment::DeploymentState;
use sitepub::models::site::SiteId;

#[tokio::test]
async fn test_unconfigured_site_makes_no_remote_calls() {
    let repo = FakeRepository::new();
    let reconciler = reconciler(repo.clone(), ProbePolicy::Strict);

    let publish = reconciler
        .publish(PublishRequest::new("missing", "<html></html>"))
        .await;
    assert!(matches!(publish, Err(PublishError::UnconfiguredSite(id)) if id == "missing"));

    let status = reconciler.status(&SiteId::from("missing")).await;
    assert!(matches!(status, Err(PublishError::UnconfiguredSite(_))));

    assert!(repo.calls().is_empty());
}

#[tokio::test]
async fn test_first_publish_creates_without_precondition() {
    let repo = FakeRepository::new();
    let reconciler = reconciler(repo.clone(), ProbePolicy::Strict);

    let descriptor = reconciler
        .publish(PublishRequest::new(SITE_ID, "<html>hi</html>"))
        .await
        .unwrap();

    assert!(descriptor.success);
    assert_eq!(descriptor.deployment_status, DeploymentState::Pending);
    assert_eq!(descriptor.site_url, "https://acme.github.io/sites/sites/demo-site/");
    assert!(descriptor.commit_url.ends_with(&descriptor.commit_revision));

    let calls = repo.calls();
    assert_eq!(calls[0], Call::Read(INDEX_PATH.to_string()));
    assert!(matches!(
        &calls[1],
        Call::Write { path, expected: None, .. } if path == INDEX_PATH
    ));
    assert_eq!(repo.file(INDEX_PATH).unwrap().1, "<html>hi</html>");
}

#[tokio::test]
async fn test_update_carries_current_revision() {
    let repo = FakeRepository::new();
    let revision = repo.seed_file(INDEX_PATH, "<html>old</html>");
    let reconciler = reconciler(repo.clone(), ProbePolicy::Strict);

    let descriptor = reconciler
        .publish(PublishRequest::new(SITE_ID, "<html>new</html>"))
        .await
        .unwrap();
    assert_eq!(descriptor.deployment_status, DeploymentState::Pending);

    let writes = repo.writes();
    assert_eq!(writes.len(), 1);
    assert!(matches!(
        &writes[0],
        Call::Write { expected: Some(rev), .. } if *rev == revision.0
    ));
    assert_eq!(repo.file(INDEX_PATH).unwrap().1, "<html>new</html>");
}

#[tokio::test]
async fn test_conflict_is_reported_without_retry() {
    let repo = FakeRepository::new();
    repo.seed_file(INDEX_PATH, "<html>old</html>");
    repo.race_next_write();
    let reconciler = reconciler(repo.clone(), ProbePolicy::Strict);

    let result = reconciler
        .publish(PublishRequest::new(SITE_ID, "<html>mine</html>"))
        .await;

    match result {
        Err(PublishError::Remote(e)) => {
            assert_eq!(e.kind, RemoteErrorKind::Conflict);
            assert!(e.cause.contains("does not match"));
        }
        other => panic!("expected conflict, got {:?}", other),
    }
    assert_eq!(repo.writes().len(), 1);
    assert_eq!(repo.file(INDEX_PATH).unwrap().1, "<html>old</html>");
}

#[tokio::test]
async fn test_publish_twice_with_same_content() {
    let repo = FakeRepository::new();
    let reconciler = reconciler(repo.clone(), ProbePolicy::Strict);

    let first = reconciler
        .publish(PublishRequest::new(SITE_ID, "<html>same</html>"))
        .await
        .unwrap();
    let second = reconciler
        .publish(PublishRequest::new(SITE_ID, "<html>same</html>"))
        .await
        .unwrap();

    assert!(first.success && second.success);
    assert_ne!(first.commit_revision, second.commit_revision);
    assert_eq!(repo.writes().len(), 2);
}

#[tokio::test]
async fn test_strict_probe_propagates_read_errors() {
    let repo = FakeRepository::new();
    repo.fail_reads_with(network_error("read sites/demo-site/index.html"));
    let reconciler = reconciler(repo.clone(), ProbePolicy::Strict);

    let result = reconciler
        .publish(PublishRequest::new(SITE_ID, "<html></html>"))
        .await;

    assert!(matches!(result, Err(PublishError::Remote(e)) if e.kind == RemoteErrorKind::Network));
    assert!(repo.writes().is_empty());
}

#[tokio::test]
async fn test_lenient_probe_writes_without_precondition() {
    let repo = FakeRepository::new();
    repo.fail_reads_with(network_error("read sites/demo-site/index.html"));
    let reconciler = reconciler(repo.clone(), ProbePolicy::Lenient);

    let descriptor = reconciler
        .publish(PublishRequest::new(SITE_ID, "<html></html>"))
        .await
        .unwrap();

    assert_eq!(descriptor.deployment_status, DeploymentState::Pending);
    assert!(matches!(&repo.writes()[0], Call::Write { expected: None, .. }));
}

#[tokio::test]
async fn test_commit_messages() {
    let repo = FakeRepository::new();
    let reconciler = reconciler(repo.clone(), ProbePolicy::Strict);

    reconciler
        .publish(PublishRequest::new(SITE_ID, "a").with_site_name("Buy Kit"))
        .await
        .unwrap();
    reconciler
        .publish(PublishRequest::new(SITE_ID, "b"))
        .await
        .unwrap();
    reconciler
        .publish(PublishRequest::new(SITE_ID, "c").with_commit_message("Fix typo on home page"))
        .await
        .unwrap();

    let messages: Vec<String> = repo
        .writes()
        .into_iter()
        .filter_map(|c| match c {
            Call::Write { message, .. } => Some(message),
            _ => None,
        })
        .collect();

    assert!(messages[0].starts_with("Update Buy Kit via SiteHub Editor - "));
    assert!(messages[1].starts_with("Update demo-site via SiteHub Editor - "));
    assert!(messages[1].ends_with(" UTC"));
    assert_eq!(messages[2], "Fix typo on home page");
}

#[tokio::test]
async fn test_only_empty_fields_fall_back_to_defaults() {
    let repo = FakeRepository::new();
    let reconciler = reconciler(repo.clone(), ProbePolicy::Strict);

    reconciler
        .publish(
            PublishRequest::new(SITE_ID, "a")
                .with_site_name("")
                .with_commit_message(""),
        )
        .await
        .unwrap();
    reconciler
        .publish(PublishRequest::new(SITE_ID, "b").with_commit_message(" "))
        .await
        .unwrap();
    reconciler
        .publish(PublishRequest::new(SITE_ID, "c").with_site_name(" "))
        .await
        .unwrap();

    let messages: Vec<String> = repo
        .writes()
        .into_iter()
        .filter_map(|c| match c {
            Call::Write { message, .. } => Some(message),
            _ => None,
        })
        .collect();

    assert!(messages[0].starts_with("Update demo-site via SiteHub Editor - "));
    assert_eq!(messages[1], " ");
    assert!(messages[2].starts_with("Update   via SiteHub Editor - "));
}

#[tokio::test]
async fn test_status_without_deployments_is_unknown() {
    let repo = FakeRepository::new();
    for i in 0..7 {
        repo.seed_commit(INDEX_PATH, &format!("change {}", i));
    }
    repo.seed_commit("sites/other-site/index.html", "unrelated");
    let reconciler = reconciler(repo.clone(), ProbePolicy::Strict);

    let view = reconciler.status(&SiteId::from(SITE_ID)).await.unwrap();

    assert_eq!(view.deployment_status, DeploymentState::Unknown);
    assert_eq!(view.deployment_revision, None);
    assert_eq!(view.recent_changes.len(), 5);
    assert_eq!(view.recent_changes[0].message, "change 6");
    assert_eq!(view.recent_changes[4].message, "change 2");
    assert!(view.recent_changes.iter().all(|c| c.short_revision.len() == 7));
    assert_eq!(view.site_location.as_str(), "demo-site");
    assert_eq!(view.repo_url, "https://github.com/acme/sites/tree/main/sites/demo-site");

    let calls = repo.calls();
    assert!(calls.contains(&Call::ListChanges("sites/demo-site".to_string(), 5)));
    assert!(calls.contains(&Call::ListEvents("github-pages".to_string(), 1)));
    assert!(!calls.iter().any(|c| matches!(c, Call::ListStatuses(..))));
}

#[tokio::test]
async fn test_status_uses_most_recent_status_only() {
    let repo = FakeRepository::new();
    repo.push_deployment(11);
    repo.push_status(11, "success");
    repo.push_status(11, "in_progress");
    let reconciler = reconciler(repo.clone(), ProbePolicy::Strict);

    let view = reconciler.status(&SiteId::from(SITE_ID)).await.unwrap();

    assert_eq!(view.deployment_status, DeploymentState::InProgress);
    assert!(repo.calls().contains(&Call::ListStatuses(11, 1)));
}

#[tokio::test]
async fn test_status_reports_revision_of_latest_deployment() {
    let repo = FakeRepository::new();
    repo.push_deployment_for(4, "0000000000000000000000000000000000000004");
    repo.push_status(4, "success");
    let reconciler = reconciler(repo.clone(), ProbePolicy::Strict);

    let view = reconciler.status(&SiteId::from(SITE_ID)).await.unwrap();
    assert_eq!(
        view.deployment_revision.as_deref(),
        Some("0000000000000000000000000000000000000004")
    );
}

#[tokio::test]
async fn test_status_ignores_older_deployments() {
    let repo = FakeRepository::new();
    repo.push_deployment(1);
    repo.push_status(1, "success");
    repo.push_deployment(2);
    let reconciler = reconciler(repo.clone(), ProbePolicy::Strict);

    let view = reconciler.status(&SiteId::from(SITE_ID)).await.unwrap();

    assert_eq!(view.deployment_status, DeploymentState::Unknown);
    assert!(repo.calls().contains(&Call::ListStatuses(2, 1)));
}

#[tokio::test]
async fn test_status_surfaces_remote_errors() {
    let repo = FakeRepository::new();
    repo.fail_lists_with(network_error("list deployments for github-pages"));
    let reconciler = reconciler(repo.clone(), ProbePolicy::Strict);

    let result = reconciler.status(&SiteId::from(SITE_ID)).await;

    match result {
        Err(PublishError::Remote(e)) => assert_eq!(e.cause, "connection reset by peer"),
        other => panic!("expected remote error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_publish_then_status_end_to_end() {
    let repo = FakeRepository::new();
    let reconciler = reconciler(repo.clone(), ProbePolicy::Strict);

    let descriptor = reconciler
        .publish(PublishRequest::new(SITE_ID, "<html>hi</html>"))
        .await
        .unwrap();
    assert!(descriptor.success);
    assert_eq!(descriptor.deployment_status, DeploymentState::Pending);
    assert!(descriptor.site_url.ends_with("/sites/demo-site/"));

    let view = reconciler.status(&SiteId::from(SITE_ID)).await.unwrap();
    assert_eq!(view.deployment_status, DeploymentState::Unknown);
    assert_eq!(view.recent_changes.len(), 1);
    assert_eq!(
        view.recent_changes[0].short_revision,
        &descriptor.commit_revision[..7]
    );
    assert_eq!(view.recent_changes[0].url, descriptor.commit_url);
}
