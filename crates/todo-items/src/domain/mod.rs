//! Domain layer for the Todo Items context.

pub mod commands;
pub mod validation;
