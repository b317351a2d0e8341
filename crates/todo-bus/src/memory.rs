//! In-memory broker with queue-group delivery.
//!
//! Used by tests and local runs without a NATS server. Each published
//! payload goes to exactly one live member of every queue-group subscribed
//! to the subject, chosen round-robin. [`InMemoryBus::go_down`] simulates an
//! outage: connects and publishes fail and existing subscriptions end.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::mpsc;

use crate::error::BusError;
use crate::state::StateReporter;
use crate::transport::{BusConnector, BusTransport, Subscription};

#[derive(Debug, Default)]
struct QueueGroup {
    members: Vec<mpsc::UnboundedSender<Bytes>>,
    next: usize,
}

impl QueueGroup {
    /// Hands `payload` to one live member. Returns false if none is left.
    fn deliver(&mut self, payload: Bytes) -> bool {
        self.members.retain(|member| !member.is_closed());
        if self.members.is_empty() {
            return false;
        }
        let index = self.next % self.members.len();
        self.next = self.next.wrapping_add(1);
        self.members[index].send(payload).is_ok()
    }
}

#[derive(Debug)]
struct Broker {
    available: bool,
    generation: u64,
    groups: HashMap<(String, String), QueueGroup>,
    published: usize,
}

/// Shared handle to an in-memory broker. Clones talk to the same broker.
#[derive(Debug, Clone)]
pub struct InMemoryBus {
    broker: Arc<Mutex<Broker>>,
}

impl Default for InMemoryBus {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryBus {
    /// Creates a reachable, empty broker.
    #[must_use]
    pub fn new() -> Self {
        Self {
            broker: Arc::new(Mutex::new(Broker {
                available: true,
                generation: 0,
                groups: HashMap::new(),
                published: 0,
            })),
        }
    }

    /// Creates a broker that refuses connections until [`Self::come_up`].
    #[must_use]
    pub fn unreachable() -> Self {
        let bus = Self::new();
        bus.lock().available = false;
        bus
    }

    fn lock(&self) -> MutexGuard<'_, Broker> {
        self.broker.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Simulates an outage: closes every transport and subscription.
    pub fn go_down(&self) {
        let mut broker = self.lock();
        broker.available = false;
        broker.generation += 1;
        broker.groups.clear();
    }

    /// Ends an outage; new connection attempts succeed again.
    pub fn come_up(&self) {
        self.lock().available = true;
    }

    /// Number of payloads accepted since creation.
    #[must_use]
    pub fn published_count(&self) -> usize {
        self.lock().published
    }
}

#[async_trait]
impl BusConnector for InMemoryBus {
    fn address(&self) -> &str {
        "memory://"
    }

    async fn connect(&self, _reporter: StateReporter) -> Result<Arc<dyn BusTransport>, BusError> {
        let broker = self.lock();
        if !broker.available {
            return Err(BusError::Connect("in-memory bus is down".to_owned()));
        }
        Ok(Arc::new(InMemoryTransport {
            bus: self.clone(),
            generation: broker.generation,
        }))
    }
}

/// One connection to an [`InMemoryBus`].
#[derive(Debug)]
pub struct InMemoryTransport {
    bus: InMemoryBus,
    generation: u64,
}

impl InMemoryTransport {
    fn live_broker(&self) -> Option<MutexGuard<'_, Broker>> {
        let broker = self.bus.lock();
        (broker.available && broker.generation == self.generation).then_some(broker)
    }
}

#[async_trait]
impl BusTransport for InMemoryTransport {
    async fn publish(&self, subject: &str, payload: Bytes) -> Result<(), BusError> {
        let mut broker = self
            .live_broker()
            .ok_or_else(|| BusError::Publish("connection closed".to_owned()))?;
        broker.published += 1;
        for ((group_subject, _), group) in &mut broker.groups {
            if group_subject == subject {
                group.deliver(payload.clone());
            }
        }
        Ok(())
    }

    async fn queue_subscribe(
        &self,
        subject: &str,
        queue_group: &str,
    ) -> Result<Subscription, BusError> {
        let mut broker = self
            .live_broker()
            .ok_or_else(|| BusError::Subscribe("connection closed".to_owned()))?;
        let (tx, rx) = mpsc::unbounded_channel();
        broker
            .groups
            .entry((subject.to_owned(), queue_group.to_owned()))
            .or_default()
            .members
            .push(tx);
        Ok(Subscription::new(futures::stream::unfold(
            rx,
            |mut rx| async move { rx.recv().await.map(|payload| (payload, rx)) },
        )))
    }

    async fn flush(&self) -> Result<(), BusError> {
        Ok(())
    }

    fn is_closed(&self) -> bool {
        self.bus.lock().generation != self.generation
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::sync::watch;

    use super::*;
    use crate::state::ConnectionState;

    fn reporter() -> StateReporter {
        let (tx, _rx) = watch::channel(ConnectionState::Disconnected);
        StateReporter::new(Arc::new(tx))
    }

    async fn next_within(sub: &mut Subscription) -> Option<Bytes> {
        tokio::time::timeout(Duration::from_millis(100), sub.next())
            .await
            .ok()
            .flatten()
    }

    #[tokio::test]
    async fn test_each_message_reaches_one_group_member() {
        // Arrange
        let bus = InMemoryBus::new();
        let transport = bus.connect(reporter()).await.unwrap();
        let mut a = transport.queue_subscribe("todos", "broadcasters").await.unwrap();
        let mut b = transport.queue_subscribe("todos", "broadcasters").await.unwrap();

        // Act
        transport.publish("todos", Bytes::from_static(b"1")).await.unwrap();
        transport.publish("todos", Bytes::from_static(b"2")).await.unwrap();

        // Assert
        assert_eq!(next_within(&mut a).await, Some(Bytes::from_static(b"1")));
        assert_eq!(next_within(&mut b).await, Some(Bytes::from_static(b"2")));
        assert_eq!(next_within(&mut a).await, None);
        assert_eq!(next_within(&mut b).await, None);
    }

    #[tokio::test]
    async fn test_distinct_groups_each_receive_the_message() {
        // Arrange
        let bus = InMemoryBus::new();
        let transport = bus.connect(reporter()).await.unwrap();
        let mut a = transport.queue_subscribe("todos", "broadcasters").await.unwrap();
        let mut b = transport.queue_subscribe("todos", "auditors").await.unwrap();

        // Act
        transport.publish("todos", Bytes::from_static(b"x")).await.unwrap();

        // Assert
        assert!(next_within(&mut a).await.is_some());
        assert!(next_within(&mut b).await.is_some());
    }

    #[tokio::test]
    async fn test_dropped_member_is_skipped() {
        // Arrange
        let bus = InMemoryBus::new();
        let transport = bus.connect(reporter()).await.unwrap();
        let a = transport.queue_subscribe("todos", "broadcasters").await.unwrap();
        let mut b = transport.queue_subscribe("todos", "broadcasters").await.unwrap();
        drop(a);

        // Act
        transport.publish("todos", Bytes::from_static(b"x")).await.unwrap();

        // Assert
        assert!(next_within(&mut b).await.is_some());
    }

    #[tokio::test]
    async fn test_outage_closes_transport_and_ends_subscriptions() {
        // Arrange
        let bus = InMemoryBus::new();
        let transport = bus.connect(reporter()).await.unwrap();
        let mut sub = transport.queue_subscribe("todos", "broadcasters").await.unwrap();

        // Act
        bus.go_down();

        // Assert
        assert!(transport.is_closed());
        assert_eq!(sub.next().await, None);
        assert!(transport.publish("todos", Bytes::new()).await.is_err());
        assert!(bus.connect(reporter()).await.is_err());

        bus.come_up();
        let fresh = bus.connect(reporter()).await.unwrap();
        assert!(!fresh.is_closed());
    }
}
