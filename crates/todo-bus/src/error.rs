//! Bus error types.

use thiserror::Error;

/// Errors raised by the bus client.
#[derive(Debug, Error)]
pub enum BusError {
    /// A single connection attempt failed.
    #[error("bus connection failed: {0}")]
    Connect(String),

    /// Every attempt of a connection round failed.
    #[error("bus unavailable after {attempts} attempts")]
    Unavailable {
        /// Number of attempts made.
        attempts: u32,
    },

    /// There is no live connection to use.
    #[error("bus not connected")]
    NotConnected,

    /// The bus refused or dropped a publish.
    #[error("bus publish failed: {0}")]
    Publish(String),

    /// The bus refused a subscription.
    #[error("bus subscribe failed: {0}")]
    Subscribe(String),

    /// Pending publishes could not be flushed.
    #[error("bus flush failed: {0}")]
    Flush(String),

    /// A stop signal arrived before the operation completed.
    #[error("bus client shutting down")]
    ShuttingDown,
}
