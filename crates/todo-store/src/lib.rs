//! PostgreSQL implementation of the todo store.

pub mod pg_todo_repository;
pub mod pool;
pub mod schema;
