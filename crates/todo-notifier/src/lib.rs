//! Todo Notifier — consumes todo events from the bus and forwards a
//! rendered notification to a Discord channel.
//!
//! Instances share one queue-group, so a scaled deployment posts each event
//! once. Delivery to Discord is attempted once per received event; failures
//! are logged and dropped.

pub mod config;
pub mod error;
pub mod forward;
pub mod render;
pub mod service;
