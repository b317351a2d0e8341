//! Todo Items bounded context.
//!
//! Responsible for validating and applying todo mutations and for emitting
//! the resulting domain events once a mutation has committed.

pub mod application;
pub mod domain;
