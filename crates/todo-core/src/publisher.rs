//! Event publication port.
//!
//! Publication is best-effort: callers log a `PublishError` and carry on.
//! Nothing here is allowed to undo a committed mutation.

use async_trait::async_trait;
use thiserror::Error;

use crate::event::TodoEvent;

/// A failed attempt to hand an event to the bus.
#[derive(Debug, Error)]
#[error("event publication failed: {0}")]
pub struct PublishError(pub String);

/// Sink for todo events.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Hand `event` to the bus. Must return promptly even when the bus is
    /// unreachable.
    async fn publish(&self, event: &TodoEvent) -> Result<(), PublishError>;
}
