//! NATS transport.
//!
//! `async-nats` reconnects on its own once a connection has been made and
//! replays subscriptions afterwards, so this module only forwards its
//! connection events into the shared state and marks the transport closed
//! when the client gives up.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_nats::{Client, ConnectOptions, Event};
use async_trait::async_trait;
use bytes::Bytes;
use futures::StreamExt;
use tracing::{debug, info, warn};

use crate::error::BusError;
use crate::state::{ConnectionState, StateReporter};
use crate::transport::{BusConnector, BusTransport, Subscription};

/// Connects to a NATS server.
#[derive(Debug, Clone)]
pub struct NatsConnector {
    url: String,
}

impl NatsConnector {
    /// Creates a connector for `url`, e.g. `nats://my-nats:4222`.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

#[async_trait]
impl BusConnector for NatsConnector {
    fn address(&self) -> &str {
        &self.url
    }

    async fn connect(&self, reporter: StateReporter) -> Result<Arc<dyn BusTransport>, BusError> {
        let closed = Arc::new(AtomicBool::new(false));
        let closed_flag = Arc::clone(&closed);

        let client = ConnectOptions::new()
            .event_callback(move |event| {
                let reporter = reporter.clone();
                let closed = Arc::clone(&closed_flag);
                async move {
                    match event {
                        Event::Connected => {
                            info!("bus connection established");
                            reporter.report(ConnectionState::Connected);
                        }
                        Event::Disconnected => {
                            warn!("lost connection to bus, reconnecting in background");
                            reporter.report(ConnectionState::Disconnected);
                        }
                        Event::Closed => {
                            warn!("bus connection closed");
                            closed.store(true, Ordering::SeqCst);
                            reporter.report(ConnectionState::Disconnected);
                        }
                        other => debug!(event = %other, "bus event"),
                    }
                }
            })
            .connect(self.url.as_str())
            .await
            .map_err(|e| BusError::Connect(e.to_string()))?;

        Ok(Arc::new(NatsTransport { client, closed }))
    }
}

/// A live NATS client.
#[derive(Debug)]
pub struct NatsTransport {
    client: Client,
    closed: Arc<AtomicBool>,
}

#[async_trait]
impl BusTransport for NatsTransport {
    async fn publish(&self, subject: &str, payload: Bytes) -> Result<(), BusError> {
        self.client
            .publish(subject.to_owned(), payload)
            .await
            .map_err(|e| BusError::Publish(e.to_string()))
    }

    async fn queue_subscribe(
        &self,
        subject: &str,
        queue_group: &str,
    ) -> Result<Subscription, BusError> {
        let subscriber = self
            .client
            .queue_subscribe(subject.to_owned(), queue_group.to_owned())
            .await
            .map_err(|e| BusError::Subscribe(e.to_string()))?;
        Ok(Subscription::new(subscriber.map(|message| message.payload)))
    }

    async fn flush(&self) -> Result<(), BusError> {
        self.client
            .flush()
            .await
            .map_err(|e| BusError::Flush(e.to_string()))
    }

    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}
