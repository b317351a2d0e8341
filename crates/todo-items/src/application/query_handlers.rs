//! Query handlers for the Todo Items context.

use todo_core::error::DomainError;
use todo_core::repository::TodoRepository;
use todo_core::todo::TodoRecord;
use tracing::info;

/// Lists every todo, incomplete first, then by ascending id.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` if the store cannot be read.
pub async fn list_todos(repo: &dyn TodoRepository) -> Result<Vec<TodoRecord>, DomainError> {
    let todos = repo.list().await?;
    info!(count = todos.len(), "retrieved todos");
    Ok(todos)
}
