//! Todo repository abstraction.

use async_trait::async_trait;

use crate::error::DomainError;
use crate::todo::TodoRecord;

/// Repository trait over the single todo table.
///
/// Implementations must make each call atomic: an insert assigns a fresh id
/// and a done-flag write touches exactly one row.
#[async_trait]
pub trait TodoRepository: Send + Sync {
    /// Load every todo, incomplete first, then by ascending id.
    async fn list(&self) -> Result<Vec<TodoRecord>, DomainError>;

    /// Insert a new todo with `done = false` and return the persisted row.
    async fn insert(&self, text: &str) -> Result<TodoRecord, DomainError>;

    /// Write the done flag of an existing todo and return the updated row.
    ///
    /// Returns `DomainError::NotFound` if no row has `id`.
    async fn set_done(&self, id: i64, done: bool) -> Result<TodoRecord, DomainError>;

    /// Check that the store is reachable.
    async fn ping(&self) -> Result<(), DomainError>;
}
