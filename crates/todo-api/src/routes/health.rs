//! Liveness and readiness endpoints.

use axum::extract::State;
use axum::http::StatusCode;
use axum::{Json, Router, routing::get};
use serde::Serialize;
use tracing::error;

use crate::error::ErrorBody;
use crate::state::AppState;

/// Root status response.
#[derive(Serialize)]
pub struct StatusResponse {
    /// Service status.
    pub status: &'static str,
}

/// Liveness response.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Always `healthy` while the process serves requests.
    pub status: &'static str,
}

/// Readiness probe response.
#[derive(Serialize)]
pub struct ReadinessResponse {
    /// Readiness status.
    pub status: &'static str,
    /// Database connectivity.
    pub database: &'static str,
}

/// GET /
async fn root() -> Json<StatusResponse> {
    Json(StatusResponse { status: "ok" })
}

/// GET /health
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse { status: "healthy" })
}

/// GET /healthz
async fn readiness_check(
    State(state): State<AppState>,
) -> Result<Json<ReadinessResponse>, (StatusCode, Json<ErrorBody>)> {
    match state.todo_repository.ping().await {
        Ok(()) => Ok(Json(ReadinessResponse {
            status: "ready",
            database: "connected",
        })),
        Err(e) => {
            error!(error = %e, "readiness check failed");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorBody {
                    error: "not_ready",
                    message: format!("database connection failed: {e}"),
                }),
            ))
        }
    }
}

/// Returns the health check router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route("/healthz", get(readiness_check))
}
