//! `PostgreSQL` implementation of the `TodoRepository` trait.

use async_trait::async_trait;
use sqlx::PgPool;

use todo_core::error::DomainError;
use todo_core::repository::TodoRepository;
use todo_core::todo::TodoRecord;

type TodoRow = (i64, String, bool);

fn to_record((id, todo, done): TodoRow) -> TodoRecord {
    TodoRecord { id, todo, done }
}

#[allow(clippy::needless_pass_by_value)]
fn infrastructure(e: sqlx::Error) -> DomainError {
    DomainError::Infrastructure(format!("database error: {e}"))
}

/// PostgreSQL-backed todo repository.
///
/// Every operation is a single statement, so each insert and done-flag
/// write commits atomically on its own.
#[derive(Debug, Clone)]
pub struct PgTodoRepository {
    pool: PgPool,
}

impl PgTodoRepository {
    /// Creates a new `PgTodoRepository`.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TodoRepository for PgTodoRepository {
    async fn list(&self) -> Result<Vec<TodoRecord>, DomainError> {
        let rows = sqlx::query_as::<_, TodoRow>("SELECT id, todo, done FROM todos ORDER BY done, id")
            .fetch_all(&self.pool)
            .await
            .map_err(infrastructure)?;
        Ok(rows.into_iter().map(to_record).collect())
    }

    async fn insert(&self, text: &str) -> Result<TodoRecord, DomainError> {
        let row = sqlx::query_as::<_, TodoRow>(
            "INSERT INTO todos (todo, done) VALUES ($1, FALSE) RETURNING id, todo, done",
        )
        .bind(text)
        .fetch_one(&self.pool)
        .await
        .map_err(infrastructure)?;
        Ok(to_record(row))
    }

    async fn set_done(&self, id: i64, done: bool) -> Result<TodoRecord, DomainError> {
        let row = sqlx::query_as::<_, TodoRow>(
            "UPDATE todos SET done = $1 WHERE id = $2 RETURNING id, todo, done",
        )
        .bind(done)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(infrastructure)?;
        row.map(to_record).ok_or(DomainError::NotFound(id))
    }

    async fn ping(&self) -> Result<(), DomainError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(infrastructure)?;
        Ok(())
    }
}
