//! Notifier error types.

use thiserror::Error;
use todo_bus::error::BusError;

/// Startup and runtime errors for the notifier.
#[derive(Debug, Error)]
pub enum NotifierError {
    /// A configuration value is invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// The webhook HTTP client could not be built.
    #[error("webhook client setup failed: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// The bus client failed in a way the consumer loop cannot absorb.
    #[error(transparent)]
    Bus(#[from] BusError),
}

/// A bus payload that cannot be rendered.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The payload is not JSON.
    #[error("payload is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The payload is JSON but not an object.
    #[error("payload is not a JSON object")]
    NotAnObject,
}
