//! Routes for the Todo Items bounded context.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{
    Json, Router,
    routing::{get, put},
};
use serde::Deserialize;
use todo_core::todo::TodoRecord;
use tracing::{info, instrument};
use uuid::Uuid;

use todo_items::application::{command_handlers, query_handlers};
use todo_items::domain::commands;

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for POST /todos.
#[derive(Debug, Deserialize)]
pub struct CreateTodoRequest {
    /// The todo text.
    pub todo: String,
}

/// Request body for PUT /todos/{id}.
#[derive(Debug, Deserialize)]
pub struct UpdateTodoRequest {
    /// The new done flag.
    pub done: bool,
}

/// GET /todos
#[instrument(skip(state))]
async fn list_todos(State(state): State<AppState>) -> Result<Json<Vec<TodoRecord>>, ApiError> {
    let todos = query_handlers::list_todos(&*state.todo_repository).await?;
    Ok(Json(todos))
}

/// POST /todos
#[instrument(skip(state, request), fields(length = request.todo.chars().count()))]
async fn create_todo(
    State(state): State<AppState>,
    Json(request): Json<CreateTodoRequest>,
) -> Result<(StatusCode, Json<TodoRecord>), ApiError> {
    let command = commands::CreateTodo {
        correlation_id: Uuid::new_v4(),
        text: request.todo,
    };

    info!(correlation_id = %command.correlation_id, "handling create_todo command");

    let todo = command_handlers::handle_create_todo(
        &command,
        state.clock.as_ref(),
        &*state.todo_repository,
        &*state.event_publisher,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(todo)))
}

/// PUT /todos/{id}
#[instrument(skip(state, request), fields(todo_id = id, done = request.done))]
async fn update_todo(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateTodoRequest>,
) -> Result<Json<TodoRecord>, ApiError> {
    let command = commands::SetTodoDone {
        correlation_id: Uuid::new_v4(),
        id,
        done: request.done,
    };

    info!(correlation_id = %command.correlation_id, "handling set_todo_done command");

    let todo = command_handlers::handle_set_todo_done(
        &command,
        state.clock.as_ref(),
        &*state.todo_repository,
        &*state.event_publisher,
    )
    .await?;

    Ok(Json(todo))
}

/// Returns the router for the todo context.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/todos", get(list_todos).post(create_todo))
        .route("/todos/{id}", put(update_todo))
}
