//! Todo backend HTTP API.
//!
//! Exposes list/create/update over the todo table and publishes a domain
//! event after every committed mutation.

use axum::Router;
use tower_http::LatencyUnit;
use tower_http::cors::CorsLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

/// Builds the full application router with request logging and permissive
/// CORS for the frontend.
pub fn app(state: state::AppState) -> Router {
    // TODO: Replace CorsLayer::permissive() with the frontend origin once it is configurable.
    Router::new()
        .merge(routes::health::router())
        .merge(routes::todos::router())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .latency_unit(LatencyUnit::Millis),
                ),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}
