//! Test repositories — mock `TodoRepository` implementations for tests.

use std::sync::Mutex;

use async_trait::async_trait;
use todo_core::error::DomainError;
use todo_core::repository::TodoRepository;
use todo_core::todo::TodoRecord;

/// A mutex-guarded in-memory todo table.
///
/// Ids are assigned from a counter that starts after the largest seeded id,
/// so ids are never reused.
#[derive(Debug, Default)]
pub struct InMemoryTodoRepository {
    inner: Mutex<Table>,
}

#[derive(Debug, Default)]
struct Table {
    rows: Vec<TodoRecord>,
    last_id: i64,
}

impl InMemoryTodoRepository {
    /// Create an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a repository seeded with `todos`.
    #[must_use]
    pub fn with_todos(todos: Vec<TodoRecord>) -> Self {
        let last_id = todos.iter().map(|t| t.id).max().unwrap_or(0);
        Self {
            inner: Mutex::new(Table {
                rows: todos,
                last_id,
            }),
        }
    }

    /// Returns a snapshot of the stored rows in insertion order.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn todos(&self) -> Vec<TodoRecord> {
        self.inner.lock().unwrap().rows.clone()
    }
}

#[async_trait]
impl TodoRepository for InMemoryTodoRepository {
    async fn list(&self) -> Result<Vec<TodoRecord>, DomainError> {
        let mut rows = self.inner.lock().unwrap().rows.clone();
        rows.sort_by_key(|t| (t.done, t.id));
        Ok(rows)
    }

    async fn insert(&self, text: &str) -> Result<TodoRecord, DomainError> {
        let mut table = self.inner.lock().unwrap();
        table.last_id += 1;
        let todo = TodoRecord {
            id: table.last_id,
            todo: text.to_owned(),
            done: false,
        };
        table.rows.push(todo.clone());
        Ok(todo)
    }

    async fn set_done(&self, id: i64, done: bool) -> Result<TodoRecord, DomainError> {
        let mut table = self.inner.lock().unwrap();
        let row = table
            .rows
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(DomainError::NotFound(id))?;
        row.done = done;
        Ok(row.clone())
    }

    async fn ping(&self) -> Result<(), DomainError> {
        Ok(())
    }
}

/// A repository that always returns an infrastructure error. Useful for
/// testing error-handling paths.
#[derive(Debug)]
pub struct FailingTodoRepository;

#[async_trait]
impl TodoRepository for FailingTodoRepository {
    async fn list(&self) -> Result<Vec<TodoRecord>, DomainError> {
        Err(DomainError::Infrastructure("connection refused".into()))
    }

    async fn insert(&self, _text: &str) -> Result<TodoRecord, DomainError> {
        Err(DomainError::Infrastructure("connection refused".into()))
    }

    async fn set_done(&self, _id: i64, _done: bool) -> Result<TodoRecord, DomainError> {
        Err(DomainError::Infrastructure("connection refused".into()))
    }

    async fn ping(&self) -> Result<(), DomainError> {
        Err(DomainError::Infrastructure("connection refused".into()))
    }
}
