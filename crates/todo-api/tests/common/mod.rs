//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use todo_core::publisher::EventPublisher;
use todo_core::repository::TodoRepository;
use todo_test_support::{FixedClock, InMemoryTodoRepository, RecordingEventPublisher};
use tower::ServiceExt;

use todo_api::state::AppState;

/// The router plus handles on the doubles behind it.
pub struct TestApp {
    pub router: Router,
    pub repository: Arc<InMemoryTodoRepository>,
    pub publisher: Arc<RecordingEventPublisher>,
}

/// Build the full app router over an in-memory store and a recording
/// publisher, with a fixed clock. Uses the same router as `main.rs`.
pub fn build_test_app() -> TestApp {
    let repository = Arc::new(InMemoryTodoRepository::new());
    let publisher = Arc::new(RecordingEventPublisher::new());
    let router = build_app_with(repository.clone(), publisher.clone());
    TestApp {
        router,
        repository,
        publisher,
    }
}

/// Build the full app router over the given store and publisher.
pub fn build_app_with(
    repository: Arc<dyn TodoRepository>,
    publisher: Arc<dyn EventPublisher>,
) -> Router {
    let app_state = AppState::new(Arc::new(FixedClock::test_epoch()), repository, publisher);
    todo_api::app(app_state)
}

/// Send a request with an optional raw body and return status and JSON.
pub async fn send(
    app: Router,
    method: &str,
    uri: &str,
    body: Option<Vec<u8>>,
) -> (StatusCode, serde_json::Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(bytes) => builder
            .header("content-type", "application/json")
            .body(Body::from(bytes))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if body_bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&body_bytes).unwrap_or(serde_json::Value::Null)
    };

    (status, json)
}

/// Send a GET request and return the response.
pub async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    send(app, "GET", uri, None).await
}

/// Send a POST request with a JSON body and return the response.
pub async fn post_json(
    app: Router,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    send(app, "POST", uri, Some(serde_json::to_vec(body).unwrap())).await
}

/// Send a PUT request with a JSON body and return the response.
pub async fn put_json(
    app: Router,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    send(app, "PUT", uri, Some(serde_json::to_vec(body).unwrap())).await
}
