//! Connection state reporting.

use std::fmt;
use std::sync::Arc;

use tokio::sync::watch;

/// Lifecycle of the bus connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// No usable connection.
    Disconnected,
    /// A connection round is in progress.
    Connecting,
    /// Publishes and subscriptions flow.
    Connected,
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Disconnected => "disconnected",
            Self::Connecting => "connecting",
            Self::Connected => "connected",
        })
    }
}

/// Cloneable handle through which a transport pushes state changes it
/// observes on its own, such as a dropped socket.
#[derive(Debug, Clone)]
pub struct StateReporter(Arc<watch::Sender<ConnectionState>>);

impl StateReporter {
    pub(crate) fn new(sender: Arc<watch::Sender<ConnectionState>>) -> Self {
        Self(sender)
    }

    /// Publishes `state` to every watcher.
    pub fn report(&self, state: ConnectionState) {
        self.0.send_replace(state);
    }
}
