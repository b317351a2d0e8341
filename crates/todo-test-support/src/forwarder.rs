//! Test forwarders — mock `Forwarder` implementations for tests.

use std::sync::Mutex;

use async_trait::async_trait;
use todo_core::forwarder::{Delivery, ForwardError, Forwarder};

/// A forwarder that records every notification and reports it as sent.
#[derive(Debug, Default)]
pub struct RecordingForwarder {
    sent: Mutex<Vec<String>>,
}

impl RecordingForwarder {
    /// Create an empty recording forwarder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every forwarded text, in delivery order.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn sent(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Forwarder for RecordingForwarder {
    async fn forward(&self, text: &str) -> Result<Delivery, ForwardError> {
        self.sent.lock().unwrap().push(text.to_string());
        Ok(Delivery::Sent)
    }
}

/// A forwarder whose webhook always answers 500, recording each attempt.
#[derive(Debug, Default)]
pub struct FailingForwarder {
    attempts: Mutex<Vec<String>>,
}

impl FailingForwarder {
    /// Create a failing forwarder with no recorded attempts.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every text whose delivery was attempted.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn attempts(&self) -> Vec<String> {
        self.attempts.lock().unwrap().clone()
    }
}

#[async_trait]
impl Forwarder for FailingForwarder {
    async fn forward(&self, text: &str) -> Result<Delivery, ForwardError> {
        self.attempts.lock().unwrap().push(text.to_string());
        Err(ForwardError::Status {
            status: 500,
            body: "internal error".into(),
        })
    }
}
