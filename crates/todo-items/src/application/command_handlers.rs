//! Command handlers for the Todo Items context.
//!
//! Each handler validates, commits the mutation through the repository and
//! only then hands the resulting event to the publisher. Publication is
//! best-effort: failures are logged and never reach the caller.

use todo_core::clock::Clock;
use todo_core::error::DomainError;
use todo_core::event::TodoEvent;
use todo_core::publisher::EventPublisher;
use todo_core::repository::TodoRepository;
use todo_core::todo::TodoRecord;
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::commands::{CreateTodo, SetTodoDone};
use crate::domain::validation::validate_todo_text;

async fn publish_best_effort(publisher: &dyn EventPublisher, event: &TodoEvent, correlation_id: Uuid) {
    match publisher.publish(event).await {
        Ok(()) => info!(
            %correlation_id,
            action = %event.action,
            todo_id = event.todo.id,
            "published todo event"
        ),
        Err(e) => warn!(
            %correlation_id,
            action = %event.action,
            todo_id = event.todo.id,
            error = %e,
            "skipping todo event publication"
        ),
    }
}

/// Handles the `CreateTodo` command: validates the text, inserts the todo and
/// publishes a `created` event.
///
/// # Errors
///
/// Returns `DomainError::Validation` if the text is blank or too long, and
/// `DomainError::Infrastructure` if the insert fails. No event is published
/// in either case.
pub async fn handle_create_todo(
    command: &CreateTodo,
    clock: &dyn Clock,
    repo: &dyn TodoRepository,
    publisher: &dyn EventPublisher,
) -> Result<TodoRecord, DomainError> {
    if let Err(e) = validate_todo_text(&command.text) {
        warn!(
            correlation_id = %command.correlation_id,
            length = command.text.chars().count(),
            "blocked todo: {e}"
        );
        return Err(e);
    }

    let todo = repo.insert(&command.text).await?;
    info!(correlation_id = %command.correlation_id, todo_id = todo.id, "created todo");

    let event = TodoEvent::created(todo.clone(), clock);
    publish_best_effort(publisher, &event, command.correlation_id).await;

    Ok(todo)
}

/// Handles the `SetTodoDone` command: writes the done flag and publishes an
/// `updated` event.
///
/// Writing the current value again is not deduplicated; it still publishes.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the todo does not exist, and
/// `DomainError::Infrastructure` if the update fails. No event is published
/// in either case.
pub async fn handle_set_todo_done(
    command: &SetTodoDone,
    clock: &dyn Clock,
    repo: &dyn TodoRepository,
    publisher: &dyn EventPublisher,
) -> Result<TodoRecord, DomainError> {
    let todo = repo.set_done(command.id, command.done).await?;
    info!(
        correlation_id = %command.correlation_id,
        todo_id = todo.id,
        done = todo.done,
        "updated todo"
    );

    let event = TodoEvent::updated(todo.clone(), clock);
    publish_best_effort(publisher, &event, command.correlation_id).await;

    Ok(todo)
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use todo_core::error::DomainError;
    use todo_core::event::TodoAction;
    use todo_core::todo::TodoRecord;
    use uuid::Uuid;

    use crate::application::command_handlers::{handle_create_todo, handle_set_todo_done};
    use crate::domain::commands::{CreateTodo, SetTodoDone};
    use todo_test_support::{
        FailingEventPublisher, FailingTodoRepository, FixedClock, InMemoryTodoRepository,
        RecordingEventPublisher,
    };

    fn clock() -> FixedClock {
        FixedClock(Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap())
    }

    fn create(text: &str) -> CreateTodo {
        CreateTodo {
            correlation_id: Uuid::new_v4(),
            text: text.to_owned(),
        }
    }

    fn set_done(id: i64, done: bool) -> SetTodoDone {
        SetTodoDone {
            correlation_id: Uuid::new_v4(),
            id,
            done,
        }
    }

    #[tokio::test]
    async fn test_create_todo_persists_and_publishes_created_event() {
        // Arrange
        let repo = InMemoryTodoRepository::new();
        let publisher = RecordingEventPublisher::new();

        // Act
        let todo = handle_create_todo(&create("buy milk"), &clock(), &repo, &publisher)
            .await
            .unwrap();

        // Assert
        assert_eq!(
            todo,
            TodoRecord {
                id: 1,
                todo: "buy milk".to_owned(),
                done: false,
            }
        );
        assert_eq!(repo.todos(), vec![todo.clone()]);

        let published = publisher.published();
        assert_eq!(published.len(), 1);
        assert_eq!(published[0].action, TodoAction::Created);
        assert_eq!(published[0].todo, todo);
        assert_eq!(published[0].timestamp, "2026-01-15T10:00:00.000000Z");
    }

    #[tokio::test]
    async fn test_create_todo_assigns_unused_ids() {
        // Arrange
        let repo = InMemoryTodoRepository::new();
        let publisher = RecordingEventPublisher::new();

        // Act
        let first = handle_create_todo(&create("one"), &clock(), &repo, &publisher)
            .await
            .unwrap();
        let second = handle_create_todo(&create("two"), &clock(), &repo, &publisher)
            .await
            .unwrap();

        // Assert
        assert_ne!(first.id, second.id);
        assert!(!second.done);
    }

    #[tokio::test]
    async fn test_create_todo_rejects_long_text_without_persisting() {
        // Arrange
        let repo = InMemoryTodoRepository::new();
        let publisher = RecordingEventPublisher::new();
        let text = "x".repeat(141);

        // Act
        let result = handle_create_todo(&create(&text), &clock(), &repo, &publisher).await;

        // Assert
        assert!(matches!(result, Err(DomainError::Validation(_))));
        assert!(repo.todos().is_empty());
        assert!(publisher.published().is_empty());
    }

    #[tokio::test]
    async fn test_create_todo_succeeds_when_publishing_fails() {
        // Arrange
        let repo = InMemoryTodoRepository::new();

        // Act
        let result = handle_create_todo(&create("buy milk"), &clock(), &repo, &FailingEventPublisher).await;

        // Assert
        assert!(result.is_ok());
        assert_eq!(repo.todos().len(), 1);
    }

    #[tokio::test]
    async fn test_create_todo_does_not_publish_when_store_fails() {
        // Arrange
        let publisher = RecordingEventPublisher::new();

        // Act
        let result =
            handle_create_todo(&create("buy milk"), &clock(), &FailingTodoRepository, &publisher).await;

        // Assert
        assert!(matches!(result, Err(DomainError::Infrastructure(_))));
        assert!(publisher.published().is_empty());
    }

    #[tokio::test]
    async fn test_set_done_updates_and_publishes_updated_event() {
        // Arrange
        let repo = InMemoryTodoRepository::new();
        let publisher = RecordingEventPublisher::new();
        let todo = handle_create_todo(&create("buy milk"), &clock(), &repo, &publisher)
            .await
            .unwrap();

        // Act
        let updated = handle_set_todo_done(&set_done(todo.id, true), &clock(), &repo, &publisher)
            .await
            .unwrap();

        // Assert
        assert!(updated.done);
        assert_eq!(updated.todo, "buy milk");
        let published = publisher.published();
        assert_eq!(published.len(), 2);
        assert_eq!(published[1].action, TodoAction::Updated);
        assert!(published[1].todo.done);
    }

    #[tokio::test]
    async fn test_set_done_twice_keeps_state_and_publishes_twice() {
        // Arrange
        let repo = InMemoryTodoRepository::with_todos(vec![TodoRecord {
            id: 7,
            todo: "water plants".to_owned(),
            done: false,
        }]);
        let publisher = RecordingEventPublisher::new();

        // Act
        let first = handle_set_todo_done(&set_done(7, true), &clock(), &repo, &publisher)
            .await
            .unwrap();
        let second = handle_set_todo_done(&set_done(7, true), &clock(), &repo, &publisher)
            .await
            .unwrap();

        // Assert
        assert_eq!(first, second);
        let published = publisher.published();
        assert_eq!(published.len(), 2);
        assert!(published.iter().all(|e| e.action == TodoAction::Updated));
    }

    #[tokio::test]
    async fn test_set_done_on_unknown_id_returns_not_found_without_publishing() {
        // Arrange
        let repo = InMemoryTodoRepository::new();
        let publisher = RecordingEventPublisher::new();

        // Act
        let result = handle_set_todo_done(&set_done(42, true), &clock(), &repo, &publisher).await;

        // Assert
        match result {
            Err(DomainError::NotFound(id)) => assert_eq!(id, 42),
            other => panic!("expected NotFound, got {other:?}"),
        }
        assert!(publisher.published().is_empty());
    }
}
