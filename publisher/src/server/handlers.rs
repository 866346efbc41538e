//! HTTP request handlers

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::SecondsFormat;
use publish_api::{DeploySiteRequest, DeploySiteResponse, ErrorResponse, RecentCommit, SiteStatusResponse};
use serde::Serialize;
use tracing::{error, warn};

use crate::deploy::reconciler::PublishRequest;
use crate::deploy::status::status_label;
use crate::errors::PublishError;
use crate::models::deployment::DeploymentStatusView;
use crate::models::site::SiteId;
use crate::server::state::ServerState;
use crate::utils::version_info;
use crate::workers::watcher;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
}

/// Health check handler
pub async fn health_handler() -> impl IntoResponse {
    let version = version_info();
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: "sitepub".to_string(),
        version: version.version,
    })
}

/// Version response
#[derive(Debug, Serialize)]
pub struct VersionResponse {
    pub version: String,
    pub git_hash: String,
    pub build_time: String,
}

/// Version handler
pub async fn version_handler() -> impl IntoResponse {
    let version = version_info();
    Json(VersionResponse {
        version: version.version,
        git_hash: version.git_hash,
        build_time: version.build_time,
    })
}

/// Publish handler: `POST /api/github/deploy-site/{site_id}`
///
/// The site is resolved before the body is looked at, so an unknown site is
/// reported as such whatever was sent.
pub async fn deploy_site_handler(
    State(state): State<Arc<ServerState>>,
    Path(site_id): Path<String>,
    body: Result<Json<DeploySiteRequest>, JsonRejection>,
) -> Response {
    let site_id = SiteId(site_id);
    if let Err(e) = state.reconciler.registry().resolve(&site_id) {
        warn!("Rejected deploy of {}: {}", site_id, e);
        return error_response(e, "Failed to deploy to GitHub");
    }

    let body = match body {
        Ok(Json(body)) => body,
        Err(rejection) => {
            warn!("Invalid deploy request for {}: {}", site_id, rejection.body_text());
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::new(
                    "Failed to deploy to GitHub",
                    Some(rejection.body_text()),
                )),
            )
                .into_response();
        }
    };

    let request = PublishRequest {
        site_id: site_id.clone(),
        content: body.html_content,
        site_name: body.site_name,
        commit_message: body.commit_message,
    };

    match state.reconciler.publish(request).await {
        Ok(descriptor) => {
            if state.watch_after_publish {
                spawn_watcher(&state, site_id, descriptor.commit_revision.clone());
            }
            Json(DeploySiteResponse {
                success: descriptor.success,
                message: "Site deployed to GitHub successfully".to_string(),
                commit_sha: descriptor.commit_revision,
                commit_url: descriptor.commit_url,
                site_url: descriptor.site_url,
                deployment_status: descriptor.deployment_status.to_string(),
            })
            .into_response()
        }
        Err(e) => {
            error!("GitHub deployment error for {}: {}", site_id, e);
            error_response(e, "Failed to deploy to GitHub")
        }
    }
}

/// Status handler: `GET /api/github/deploy-site/{site_id}`
pub async fn site_status_handler(
    State(state): State<Arc<ServerState>>,
    Path(site_id): Path<String>,
) -> Response {
    let site_id = SiteId(site_id);
    match state.reconciler.status(&site_id).await {
        Ok(view) => Json(to_status_response(view)).into_response(),
        Err(e) => {
            error!("GitHub info error for {}: {}", site_id, e);
            error_response(e, "Failed to get GitHub info")
        }
    }
}

/// Any other method on the deploy-site route
pub async fn method_not_allowed_handler() -> Response {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(ErrorResponse::new("Method not allowed", None)),
    )
        .into_response()
}

fn to_status_response(view: DeploymentStatusView) -> SiteStatusResponse {
    SiteStatusResponse {
        success: true,
        site_folder: view.site_location.to_string(),
        site_url: view.site_url,
        repo_url: view.repo_url,
        deployment_status: view.deployment_status.to_string(),
        status_label: status_label(view.deployment_status).to_string(),
        recent_commits: view
            .recent_changes
            .into_iter()
            .map(|change| RecentCommit {
                sha: change.short_revision,
                message: change.message,
                author: change.author,
                date: change
                    .timestamp
                    .map(|t| t.to_rfc3339_opts(SecondsFormat::Secs, true)),
                url: change.url,
            })
            .collect(),
    }
}

fn error_response(err: PublishError, context: &str) -> Response {
    let (status, body) = match err {
        PublishError::UnconfiguredSite(_) => (
            StatusCode::BAD_REQUEST,
            ErrorResponse::new("Site not configured for GitHub deployment", None),
        ),
        PublishError::Remote(remote) => {
            let status = if remote.is_conflict() {
                StatusCode::CONFLICT
            } else {
                StatusCode::INTERNAL_SERVER_ERROR
            };
            (status, ErrorResponse::new(context, Some(remote.to_string())))
        }
        other => (
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorResponse::new(context, Some(other.to_string())),
        ),
    };
    (status, Json(body)).into_response()
}

fn spawn_watcher(state: &Arc<ServerState>, site_id: SiteId, revision: String) {
    let reconciler = state.reconciler.clone();
    let options = state.watcher.clone();
    let mut shutdown_rx = state.shutdown_tx.subscribe();

    tokio::spawn(async move {
        let shutdown = Box::pin(async move {
            let _ = shutdown_rx.recv().await;
        });
        let result = watcher::run(
            &options,
            &reconciler,
            &site_id,
            &revision,
            tokio::time::sleep,
            shutdown,
        )
        .await;
        if let Err(e) = result {
            warn!("Deployment watch of {} stopped: {}", site_id, e);
        }
    });
}
