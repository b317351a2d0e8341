//! Integration tests for the health endpoints.

mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use serde_json::json;
use todo_test_support::{FailingTodoRepository, RecordingEventPublisher};

#[tokio::test]
async fn test_root_returns_status_ok() {
    let app = common::build_test_app();

    let (status, json) = common::get_json(app.router, "/").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!({ "status": "ok" }));
}

#[tokio::test]
async fn test_health_returns_200_with_status_healthy() {
    let app = common::build_test_app();

    let (status, json) = common::get_json(app.router, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!({ "status": "healthy" }));
}

#[tokio::test]
async fn test_healthz_reports_connected_database() {
    let app = common::build_test_app();

    let (status, json) = common::get_json(app.router, "/healthz").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!({ "status": "ready", "database": "connected" }));
}

#[tokio::test]
async fn test_healthz_returns_500_when_store_is_down() {
    let router = common::build_app_with(
        Arc::new(FailingTodoRepository),
        Arc::new(RecordingEventPublisher::new()),
    );

    let (status, json) = common::get_json(router, "/healthz").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"], "not_ready");
}

#[tokio::test]
async fn test_unknown_route_returns_404() {
    let app = common::build_test_app();

    let (status, _) = common::get_json(app.router, "/api/v1/nonexistent").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}
