//! Integration tests for `PgTodoRepository`.
//!
//! These need a PostgreSQL server; run with
//! `DATABASE_URL=postgres://... cargo test -- --ignored`.

use sqlx::PgPool;
use todo_core::error::DomainError;
use todo_core::repository::TodoRepository;
use todo_store::pg_todo_repository::PgTodoRepository;

// --- insert ---

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn test_insert_assigns_fresh_ids_and_starts_not_done(pool: PgPool) {
    let repo = PgTodoRepository::new(pool);

    let first = repo.insert("buy milk").await.unwrap();
    let second = repo.insert("walk dog").await.unwrap();

    assert_eq!(first.todo, "buy milk");
    assert!(!first.done);
    assert_ne!(first.id, second.id);
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn test_insert_rejects_text_longer_than_column(pool: PgPool) {
    let repo = PgTodoRepository::new(pool);

    let result = repo.insert(&"x".repeat(141)).await;

    assert!(matches!(result, Err(DomainError::Infrastructure(_))));
}

// --- ordering ---

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn test_list_orders_incomplete_first_then_by_id(pool: PgPool) {
    let repo = PgTodoRepository::new(pool);
    let a = repo.insert("a").await.unwrap();
    let b = repo.insert("b").await.unwrap();
    let c = repo.insert("c").await.unwrap();
    repo.set_done(a.id, true).await.unwrap();

    let ids: Vec<i64> = repo.list().await.unwrap().iter().map(|t| t.id).collect();

    assert_eq!(ids, vec![b.id, c.id, a.id]);
}

// --- set_done ---

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn test_set_done_returns_updated_row(pool: PgPool) {
    let repo = PgTodoRepository::new(pool);
    let todo = repo.insert("buy milk").await.unwrap();

    let updated = repo.set_done(todo.id, true).await.unwrap();
    let again = repo.set_done(todo.id, true).await.unwrap();

    assert!(updated.done);
    assert_eq!(updated.todo, "buy milk");
    assert_eq!(updated, again);
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn test_set_done_on_missing_row_returns_not_found(pool: PgPool) {
    let repo = PgTodoRepository::new(pool);

    match repo.set_done(999, true).await {
        Err(DomainError::NotFound(id)) => assert_eq!(id, 999),
        other => panic!("expected NotFound, got {other:?}"),
    }
}

// --- ping ---

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn test_ping_succeeds_on_live_pool(pool: PgPool) {
    let repo = PgTodoRepository::new(pool);

    repo.ping().await.unwrap();
}
