//! Reconnecting bus client.

use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use bytes::Bytes;
use todo_core::retry::RetryPolicy;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::error::BusError;
use crate::shutdown::stopped;
use crate::state::{ConnectionState, StateReporter};
use crate::transport::{BusConnector, BusTransport, Subscription};

/// How often a connected client checks whether its transport has closed.
const LIVENESS_INTERVAL: Duration = Duration::from_secs(1);

/// Default upper bound on the flush performed by [`BusClient::close`].
pub const DEFAULT_FLUSH_TIMEOUT: Duration = Duration::from_secs(3);

/// A bus connection with explicit state and backoff-driven (re)connection.
///
/// One instance is shared by every publisher or consumer in a process.
pub struct BusClient {
    connector: Arc<dyn BusConnector>,
    policy: RetryPolicy,
    flush_timeout: Duration,
    transport: RwLock<Option<Arc<dyn BusTransport>>>,
    state: Arc<watch::Sender<ConnectionState>>,
}

impl std::fmt::Debug for BusClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BusClient")
            .field("address", &self.connector.address())
            .field("policy", &self.policy)
            .field("flush_timeout", &self.flush_timeout)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

impl BusClient {
    /// Creates a disconnected client.
    #[must_use]
    pub fn new(connector: Arc<dyn BusConnector>, policy: RetryPolicy) -> Self {
        let (state, _) = watch::channel(ConnectionState::Disconnected);
        Self {
            connector,
            policy,
            flush_timeout: DEFAULT_FLUSH_TIMEOUT,
            transport: RwLock::new(None),
            state: Arc::new(state),
        }
    }

    /// Overrides how long [`Self::close`] waits for pending publishes.
    #[must_use]
    pub fn with_flush_timeout(mut self, flush_timeout: Duration) -> Self {
        self.flush_timeout = flush_timeout;
        self
    }

    /// Current connection state.
    #[must_use]
    pub fn state(&self) -> ConnectionState {
        *self.state.borrow()
    }

    /// Receiver that observes every state change.
    #[must_use]
    pub fn watch_state(&self) -> watch::Receiver<ConnectionState> {
        self.state.subscribe()
    }

    fn set_state(&self, state: ConnectionState) {
        self.state.send_replace(state);
    }

    fn current(&self) -> Option<Arc<dyn BusTransport>> {
        self.transport
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn replace(&self, transport: Option<Arc<dyn BusTransport>>) -> Option<Arc<dyn BusTransport>> {
        std::mem::replace(
            &mut *self.transport.write().unwrap_or_else(PoisonError::into_inner),
            transport,
        )
    }

    fn live_transport(&self) -> Result<Arc<dyn BusTransport>, BusError> {
        // A reconnecting NATS client would buffer instead of failing.
        if self.state() != ConnectionState::Connected {
            return Err(BusError::NotConnected);
        }
        self.current()
            .filter(|t| !t.is_closed())
            .ok_or(BusError::NotConnected)
    }

    /// Runs one connection round: up to `policy.max_attempts` attempts with
    /// exponential backoff between them.
    ///
    /// # Errors
    ///
    /// Returns `BusError::Unavailable` once every attempt has failed; the
    /// client is then `Disconnected` and the caller decides how to degrade.
    pub async fn connect(&self) -> Result<(), BusError> {
        let max_attempts = self.policy.max_attempts.max(1);
        let address = self.connector.address();
        self.set_state(ConnectionState::Connecting);

        for attempt in 1..=max_attempts {
            info!(attempt, max_attempts, address, "connecting to bus");
            let reporter = StateReporter::new(Arc::clone(&self.state));
            match self.connector.connect(reporter).await {
                Ok(transport) => {
                    self.replace(Some(transport));
                    self.set_state(ConnectionState::Connected);
                    info!(address, "connected to bus");
                    return Ok(());
                }
                Err(e) => {
                    warn!(attempt, max_attempts, address, error = %e, "bus connection attempt failed");
                    if attempt < max_attempts {
                        tokio::time::sleep(self.policy.delay_for(attempt)).await;
                    }
                }
            }
        }

        self.set_state(ConnectionState::Disconnected);
        error!(attempts = max_attempts, address, "bus unavailable, max retries reached");
        Err(BusError::Unavailable {
            attempts: max_attempts,
        })
    }

    /// Repeats connection rounds until one succeeds or `shutdown` fires,
    /// pausing `policy.max_delay` between rounds.
    ///
    /// # Errors
    ///
    /// Returns `BusError::ShuttingDown` if the stop signal wins.
    pub async fn connect_until(&self, shutdown: &mut watch::Receiver<bool>) -> Result<(), BusError> {
        loop {
            tokio::select! {
                result = self.connect() => {
                    if result.is_ok() {
                        return Ok(());
                    }
                }
                () = stopped(shutdown) => {
                    self.set_state(ConnectionState::Disconnected);
                    return Err(BusError::ShuttingDown);
                }
            }

            warn!(
                retry_in_secs = self.policy.max_delay.as_secs(),
                "bus still unavailable, retrying in background"
            );
            tokio::select! {
                () = tokio::time::sleep(self.policy.max_delay) => {}
                () = stopped(shutdown) => return Err(BusError::ShuttingDown),
            }
        }
    }

    /// Keeps the client connected in the background until `shutdown` fires.
    ///
    /// Used by publishers: while the bus is unreachable the client stays
    /// `Disconnected` and publishes fail fast.
    pub fn spawn_connection_loop(self: &Arc<Self>, shutdown: watch::Receiver<bool>) -> JoinHandle<()> {
        let client = Arc::clone(self);
        tokio::spawn(async move {
            let mut shutdown = shutdown;
            loop {
                if client.connect_until(&mut shutdown).await.is_err() {
                    return;
                }
                loop {
                    tokio::select! {
                        () = tokio::time::sleep(LIVENESS_INTERVAL) => {}
                        () = stopped(&mut shutdown) => return,
                    }
                    if client.current().is_none_or(|t| t.is_closed()) {
                        warn!("bus connection lost, reconnecting");
                        client.reset();
                        break;
                    }
                }
            }
        })
    }

    /// Drops the current transport and marks the client `Disconnected`.
    pub fn reset(&self) {
        self.replace(None);
        self.set_state(ConnectionState::Disconnected);
    }

    /// Publishes `payload` on `subject` without waiting for consumers.
    ///
    /// # Errors
    ///
    /// Returns `BusError::NotConnected` immediately when there is no live
    /// connection, or the transport's publish error.
    pub async fn publish(&self, subject: &str, payload: Bytes) -> Result<(), BusError> {
        self.live_transport()?.publish(subject, payload).await
    }

    /// Joins `queue_group` on `subject`.
    ///
    /// # Errors
    ///
    /// Returns `BusError::NotConnected` when there is no live connection, or
    /// the transport's subscribe error.
    pub async fn queue_subscribe(
        &self,
        subject: &str,
        queue_group: &str,
    ) -> Result<Subscription, BusError> {
        self.live_transport()?
            .queue_subscribe(subject, queue_group)
            .await
    }

    /// Flushes already-enqueued publishes and drops the connection.
    ///
    /// The flush only runs while the client is `Connected` and is bounded by
    /// the flush timeout; a reconnecting transport is dropped unflushed.
    ///
    /// # Errors
    ///
    /// Returns the transport's flush error, or `BusError::Flush` if the flush
    /// timed out. The connection is dropped regardless.
    pub async fn close(&self) -> Result<(), BusError> {
        let connected = self.state() == ConnectionState::Connected;
        let transport = self.replace(None);
        self.set_state(ConnectionState::Disconnected);
        let Some(transport) = transport else {
            return Ok(());
        };
        if !connected || transport.is_closed() {
            info!("bus connection dropped without flush");
            return Ok(());
        }
        match tokio::time::timeout(self.flush_timeout, transport.flush()).await {
            Ok(result) => {
                info!("bus connection closed");
                result
            }
            Err(_) => Err(BusError::Flush(format!(
                "timed out after {}ms",
                self.flush_timeout.as_millis()
            ))),
        }
    }
}
