//! Shared application state.

use std::sync::Arc;

use todo_core::clock::Clock;
use todo_core::publisher::EventPublisher;
use todo_core::repository::TodoRepository;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Clock used to timestamp published events.
    pub clock: Arc<dyn Clock + Send + Sync>,
    /// The todo store.
    pub todo_repository: Arc<dyn TodoRepository>,
    /// Best-effort sink for domain events.
    pub event_publisher: Arc<dyn EventPublisher>,
}

impl AppState {
    /// Create new application state.
    #[must_use]
    pub fn new(
        clock: Arc<dyn Clock + Send + Sync>,
        todo_repository: Arc<dyn TodoRepository>,
        event_publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            clock,
            todo_repository,
            event_publisher,
        }
    }
}
