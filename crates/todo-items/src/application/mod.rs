//! Application layer for the Todo Items context.

pub mod command_handlers;
pub mod query_handlers;
