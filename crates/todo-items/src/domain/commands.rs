//! Commands for the Todo Items context.

use uuid::Uuid;

/// Command to create a new todo.
#[derive(Debug, Clone)]
pub struct CreateTodo {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The todo text, not yet validated.
    pub text: String,
}

/// Command to set the done flag of an existing todo.
#[derive(Debug, Clone)]
pub struct SetTodoDone {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The todo to update.
    pub id: i64,
    /// The new value of the done flag.
    pub done: bool,
}
