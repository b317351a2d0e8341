//! Todo Core — shared domain abstractions.
//!
//! This crate defines the record, event and port types that both the
//! backend and the notifier depend on. It contains no infrastructure code.

pub mod clock;
pub mod error;
pub mod event;
pub mod forwarder;
pub mod publisher;
pub mod repository;
pub mod retry;
pub mod todo;
