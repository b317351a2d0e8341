//! Shared test mocks and utilities for the todo event pipeline.

mod clock;
mod forwarder;
mod publisher;
mod repository;

pub use clock::FixedClock;
pub use forwarder::{FailingForwarder, RecordingForwarder};
pub use publisher::{FailingEventPublisher, RecordingEventPublisher};
pub use repository::{FailingTodoRepository, InMemoryTodoRepository};
