//! The notifier's consume → render → forward loop.

use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use todo_bus::client::BusClient;
use todo_bus::error::BusError;
use todo_bus::shutdown::stopped;
use todo_core::forwarder::{Delivery, Forwarder};
use tokio::sync::watch;
use tracing::{debug, error, info, instrument, warn};

use crate::error::NotifierError;
use crate::render::{ReceivedEvent, render};

/// Where the notifier is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifierState {
    /// No bus connection.
    Disconnected,
    /// Connection rounds in progress.
    Connecting,
    /// Joined the queue-group, waiting for the next message.
    Subscribed,
    /// Decoding and rendering a message.
    Rendering,
    /// Waiting on the outbound webhook call.
    Forwarding,
    /// Stop signal received; draining and closing.
    ShuttingDown,
}

impl fmt::Display for NotifierState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Disconnected => "disconnected",
            Self::Connecting => "connecting",
            Self::Subscribed => "subscribed",
            Self::Rendering => "rendering",
            Self::Forwarding => "forwarding",
            Self::ShuttingDown => "shutting_down",
        };
        f.write_str(name)
    }
}

/// What became of one delivered message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handled {
    /// Rendered and handed to the forwarder.
    Forwarded(Delivery),
    /// Not a JSON object; dropped.
    Malformed,
    /// The webhook call failed; dropped.
    ForwardFailed,
}

/// Why the inner receive loop stopped.
enum Interrupt {
    StreamEnded,
    Shutdown,
}

/// Queue-group consumer that forwards every todo event it receives.
pub struct Notifier {
    bus: Arc<BusClient>,
    forwarder: Arc<dyn Forwarder>,
    subject: String,
    queue_group: String,
    state: watch::Sender<NotifierState>,
}

impl fmt::Debug for Notifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Notifier")
            .field("subject", &self.subject)
            .field("queue_group", &self.queue_group)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

impl Notifier {
    /// Creates a notifier that has not yet connected.
    #[must_use]
    pub fn new(
        bus: Arc<BusClient>,
        forwarder: Arc<dyn Forwarder>,
        subject: impl Into<String>,
        queue_group: impl Into<String>,
    ) -> Self {
        let (state, _) = watch::channel(NotifierState::Disconnected);
        Self {
            bus,
            forwarder,
            subject: subject.into(),
            queue_group: queue_group.into(),
            state,
        }
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> NotifierState {
        *self.state.borrow()
    }

    /// Receiver that observes every state change.
    #[must_use]
    pub fn watch_state(&self) -> watch::Receiver<NotifierState> {
        self.state.subscribe()
    }

    fn set_state(&self, state: NotifierState) {
        let previous = self.state.send_replace(state);
        if previous != state {
            debug!(from = %previous, to = %state, "notifier state changed");
        }
    }

    /// Consumes messages until `shutdown` fires.
    ///
    /// Connection loss ends the current subscription; the notifier then
    /// reconnects with the bus client's backoff and joins the queue-group
    /// again. On shutdown the subscription is dropped before the bus
    /// connection is flushed and closed.
    ///
    /// # Errors
    ///
    /// Returns `NotifierError::Bus` only for bus failures other than the
    /// stop signal.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) -> Result<(), NotifierError> {
        loop {
            self.set_state(NotifierState::Connecting);
            match self.bus.connect_until(&mut shutdown).await {
                Ok(()) => {}
                Err(BusError::ShuttingDown) => break,
                Err(e) => return Err(e.into()),
            }

            let mut subscription = match self
                .bus
                .queue_subscribe(&self.subject, &self.queue_group)
                .await
            {
                Ok(subscription) => subscription,
                Err(e) => {
                    warn!(error = %e, subject = %self.subject, "subscribe failed, reconnecting");
                    self.bus.reset();
                    self.set_state(NotifierState::Disconnected);
                    continue;
                }
            };
            info!(
                subject = %self.subject,
                queue_group = %self.queue_group,
                "subscribed, waiting for messages"
            );
            self.set_state(NotifierState::Subscribed);

            let interrupt = loop {
                let next = tokio::select! {
                    next = subscription.next() => next,
                    () = stopped(&mut shutdown) => break Interrupt::Shutdown,
                };
                let Some(payload) = next else {
                    break Interrupt::StreamEnded;
                };
                self.handle_payload(&payload).await;
                self.set_state(NotifierState::Subscribed);
            };

            drop(subscription);
            match interrupt {
                Interrupt::Shutdown => break,
                Interrupt::StreamEnded => {
                    warn!(subject = %self.subject, "subscription ended, reconnecting");
                    self.bus.reset();
                    self.set_state(NotifierState::Disconnected);
                }
            }
        }

        self.set_state(NotifierState::ShuttingDown);
        info!("shutting down notifier");
        if let Err(e) = self.bus.close().await {
            warn!(error = %e, "failed to flush bus connection on shutdown");
        }
        Ok(())
    }

    /// Decodes, renders and forwards one message payload.
    ///
    /// Never fails: malformed payloads and webhook failures are logged and
    /// the message is dropped.
    #[instrument(skip(self, payload), fields(bytes = payload.len()))]
    pub async fn handle_payload(&self, payload: &Bytes) -> Handled {
        self.set_state(NotifierState::Rendering);
        let event = match ReceivedEvent::decode(payload) {
            Ok(event) => event,
            Err(e) => {
                error!(error = %e, "failed to decode message, dropping");
                return Handled::Malformed;
            }
        };
        info!(
            action = %event.action(),
            todo_id = %event.todo_id(),
            "received todo event"
        );
        let text = render(&event);

        self.set_state(NotifierState::Forwarding);
        match self.forwarder.forward(&text).await {
            Ok(delivery) => Handled::Forwarded(delivery),
            Err(e) => {
                error!(error = %e, todo_id = %event.todo_id(), "failed to forward notification, dropping");
                Handled::ForwardFailed
            }
        }
    }
}
