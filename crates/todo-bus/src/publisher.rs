//! `EventPublisher` backed by the bus client.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use todo_core::event::TodoEvent;
use todo_core::publisher::{EventPublisher, PublishError};

use crate::client::BusClient;

/// Default upper bound on a single publish call.
pub const DEFAULT_PUBLISH_TIMEOUT: Duration = Duration::from_millis(500);

/// Publishes todo events as JSON on a fixed subject.
#[derive(Debug, Clone)]
pub struct BusPublisher {
    client: Arc<BusClient>,
    subject: String,
    timeout: Duration,
}

impl BusPublisher {
    /// Creates a publisher for `subject` with the default timeout.
    #[must_use]
    pub fn new(client: Arc<BusClient>, subject: impl Into<String>) -> Self {
        Self {
            client,
            subject: subject.into(),
            timeout: DEFAULT_PUBLISH_TIMEOUT,
        }
    }

    /// Overrides the publish timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl EventPublisher for BusPublisher {
    async fn publish(&self, event: &TodoEvent) -> Result<(), PublishError> {
        let payload = Bytes::from(event.to_payload());
        match tokio::time::timeout(self.timeout, self.client.publish(&self.subject, payload)).await {
            Ok(result) => result.map_err(|e| PublishError(e.to_string())),
            Err(_) => Err(PublishError(format!(
                "publish timed out after {}ms",
                self.timeout.as_millis()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use todo_core::event::TodoEvent;
    use todo_core::retry::RetryPolicy;
    use todo_core::todo::TodoRecord;
    use todo_test_support::FixedClock;

    use super::*;
    use crate::memory::InMemoryBus;

    fn event() -> TodoEvent {
        TodoEvent::created(
            TodoRecord {
                id: 1,
                todo: "buy milk".to_owned(),
                done: false,
            },
            &FixedClock::test_epoch(),
        )
    }

    #[tokio::test]
    async fn test_publish_delivers_json_payload_to_subscriber() {
        // Arrange
        let bus = InMemoryBus::new();
        let client = Arc::new(BusClient::new(Arc::new(bus.clone()), RetryPolicy::default()));
        client.connect().await.unwrap();
        let mut sub = client.queue_subscribe("todos", "broadcasters").await.unwrap();
        let publisher = BusPublisher::new(Arc::clone(&client), "todos");

        // Act
        publisher.publish(&event()).await.unwrap();

        // Assert
        let payload = sub.next().await.unwrap();
        assert_eq!(TodoEvent::from_payload(&payload).unwrap(), event());
        assert_eq!(bus.published_count(), 1);
    }

    #[tokio::test]
    async fn test_publish_reports_error_when_disconnected() {
        // Arrange
        let client = Arc::new(BusClient::new(
            Arc::new(InMemoryBus::unreachable()),
            RetryPolicy::default(),
        ));
        let publisher = BusPublisher::new(client, "todos");

        // Act
        let result = publisher.publish(&event()).await;

        // Assert
        let err = result.unwrap_err();
        assert!(err.to_string().contains("not connected"));
    }
}
