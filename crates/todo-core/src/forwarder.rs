//! Notification forwarding port.
//!
//! A forwarder delivers one rendered notification to an external chat
//! channel. Each call makes at most one outbound attempt; there is no retry
//! queue behind it.

use async_trait::async_trait;
use thiserror::Error;

/// Outcome of a successful `forward` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// The notification was accepted by the webhook.
    Sent,
    /// Forwarding is disabled; the notification was only logged.
    Skipped,
}

/// A failed outbound webhook call.
#[derive(Debug, Error)]
pub enum ForwardError {
    /// The request never got a response.
    #[error("webhook request failed: {0}")]
    Request(String),

    /// The webhook answered with a non-success status.
    #[error("webhook returned {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, for diagnostics.
        body: String,
    },
}

/// Sink for rendered notifications.
#[async_trait]
pub trait Forwarder: Send + Sync {
    /// Deliver `text`. Exactly one outbound attempt is made.
    async fn forward(&self, text: &str) -> Result<Delivery, ForwardError>;
}
