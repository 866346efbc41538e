//! HTTP adapter unit tests

mod common;

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use common::{network_error, reconciler, FakeRepository, INDEX_PATH};
use serde_json::{json, Value};
use sitepub::deploy::reconciler::ProbePolicy;
use sitepub::server::serve::router;
use sitepub::server::state::ServerState;
use tokio::sync::broadcast;
use tower::ServiceExt;

const ROUTE: &str = "/api/github/deploy-site/A";

fn app(repo: Arc<FakeRepository>) -> Router {
    let (shutdown_tx, _) = broadcast::channel(1);
    let state = ServerState::new(
        Arc::new(reconciler(repo, ProbePolicy::Strict)),
        shutdown_tx,
    );
    router(Arc::new(state))
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn post(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_post_publishes_site() {
    let repo = FakeRepository::new();

    let (status, body) = send(
        app(repo.clone()),
        post(
            ROUTE,
            json!({ "htmlContent": "<html>hi</html>", "siteName": "Demo" }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["deploymentStatus"], "pending");
    assert_eq!(body["siteUrl"], "https://acme.github.io/sites/sites/demo-site/");
    assert_eq!(body["message"], "Site deployed to GitHub successfully");
    assert!(body["commitSha"].as_str().unwrap().len() == 40);
    assert!(body["commitUrl"].as_str().unwrap().starts_with("https://github.com/"));
    assert_eq!(repo.file(INDEX_PATH).unwrap().1, "<html>hi</html>");
}

#[tokio::test]
async fn test_unconfigured_site_is_bad_request() {
    let repo = FakeRepository::new();

    let (status, body) = send(
        app(repo.clone()),
        post("/api/github/deploy-site/nope", json!({ "htmlContent": "x" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Site not configured for GitHub deployment");

    let (status, _) = send(app(repo.clone()), get("/api/github/deploy-site/nope")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert!(repo.calls().is_empty());
}

#[tokio::test]
async fn test_invalid_body_is_json_bad_request() {
    let repo = FakeRepository::new();

    let (status, body) = send(app(repo.clone()), post(ROUTE, json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Failed to deploy to GitHub");
    assert!(body["details"].as_str().unwrap().contains("htmlContent"));

    let request = Request::builder()
        .method("POST")
        .uri(ROUTE)
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = send(app(repo.clone()), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);

    assert!(repo.calls().is_empty());
}

#[tokio::test]
async fn test_unconfigured_site_wins_over_invalid_body() {
    let repo = FakeRepository::new();

    let (status, body) = send(
        app(repo.clone()),
        post("/api/github/deploy-site/nope", json!({})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Site not configured for GitHub deployment");
    assert!(repo.calls().is_empty());
}

#[tokio::test]
async fn test_conflict_maps_to_409() {
    let repo = FakeRepository::new();
    repo.seed_file(INDEX_PATH, "<html>old</html>");
    repo.race_next_write();

    let (status, body) = send(app(repo), post(ROUTE, json!({ "htmlContent": "x" }))).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Failed to deploy to GitHub");
    assert!(body["details"].as_str().unwrap().contains("conflict"));
}

#[tokio::test]
async fn test_get_returns_status_view() {
    let repo = FakeRepository::new();
    repo.seed_commit(INDEX_PATH, "Update Demo via SiteHub Editor");
    repo.push_deployment(3);
    repo.push_status(3, "success");

    let (status, body) = send(app(repo), get(ROUTE)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["siteFolder"], "demo-site");
    assert_eq!(body["deploymentStatus"], "success");
    assert_eq!(body["statusLabel"], "Live");
    assert_eq!(
        body["repoUrl"],
        "https://github.com/acme/sites/tree/main/sites/demo-site"
    );
    let commits = body["recentCommits"].as_array().unwrap();
    assert_eq!(commits.len(), 1);
    assert_eq!(commits[0]["sha"].as_str().unwrap().len(), 7);
    assert_eq!(commits[0]["message"], "Update Demo via SiteHub Editor");
    assert_eq!(commits[0]["author"], "Someone");
}

#[tokio::test]
async fn test_get_remote_error_is_server_error() {
    let repo = FakeRepository::new();
    repo.fail_lists_with(network_error("list commits for sites/demo-site"));

    let (status, body) = send(app(repo), get(ROUTE)).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Failed to get GitHub info");
    assert!(body["details"]
        .as_str()
        .unwrap()
        .contains("connection reset by peer"));
}

#[tokio::test]
async fn test_other_methods_not_allowed() {
    let repo = FakeRepository::new();
    let request = Request::builder()
        .method("DELETE")
        .uri(ROUTE)
        .body(Body::empty())
        .unwrap();

    let (status, body) = send(app(repo), request).await;

    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body["error"], "Method not allowed");
}

#[tokio::test]
async fn test_health() {
    let (status, body) = send(app(FakeRepository::new()), get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "sitepub");
}
