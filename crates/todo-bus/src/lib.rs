//! Todo Bus — the event bus client shared by the backend and the notifier.
//!
//! [`client::BusClient`] owns connection establishment with capped
//! exponential backoff and exposes the connection state. The wire is
//! abstracted behind [`transport::BusConnector`] / [`transport::BusTransport`]
//! with a NATS implementation for production. The `test-util` feature adds
//! an in-memory broker that honours queue-group semantics for tests.

pub mod client;
pub mod error;
#[cfg(any(test, feature = "test-util"))]
pub mod memory;
pub mod nats;
pub mod publisher;
pub mod shutdown;
pub mod state;
pub mod transport;
