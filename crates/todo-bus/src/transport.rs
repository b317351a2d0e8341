//! Wire abstraction under the bus client.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::{BoxStream, Stream, StreamExt};

use crate::error::BusError;
use crate::state::StateReporter;

/// Stream of message payloads delivered to one queue-group member.
///
/// Ends when the underlying connection is closed for good. Dropping it
/// unsubscribes.
pub struct Subscription {
    inner: BoxStream<'static, Bytes>,
}

impl Subscription {
    /// Wraps any payload stream.
    pub fn new<S>(stream: S) -> Self
    where
        S: Stream<Item = Bytes> + Send + 'static,
    {
        Self {
            inner: stream.boxed(),
        }
    }

    /// Waits for the next delivered payload.
    pub async fn next(&mut self) -> Option<Bytes> {
        self.inner.next().await
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").finish_non_exhaustive()
    }
}

/// An established bus connection.
#[async_trait]
pub trait BusTransport: Send + Sync {
    /// Enqueues `payload` on `subject`. Does not wait for consumers.
    async fn publish(&self, subject: &str, payload: Bytes) -> Result<(), BusError>;

    /// Joins `queue_group` on `subject`. Each message on the subject reaches
    /// exactly one member of the group.
    async fn queue_subscribe(
        &self,
        subject: &str,
        queue_group: &str,
    ) -> Result<Subscription, BusError>;

    /// Waits until every enqueued publish has been written out.
    async fn flush(&self) -> Result<(), BusError>;

    /// True once the connection is gone for good and will not recover on
    /// its own.
    fn is_closed(&self) -> bool;
}

/// Factory for transports; one call is one connection attempt.
#[async_trait]
pub trait BusConnector: Send + Sync {
    /// Human-readable address, for logs.
    fn address(&self) -> &str;

    /// Makes a single connection attempt. `reporter` receives state changes
    /// the transport detects after it is handed back.
    async fn connect(&self, reporter: StateReporter) -> Result<Arc<dyn BusTransport>, BusError>;
}
