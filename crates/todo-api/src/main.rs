//! Todo API server entry point.

use std::sync::Arc;

use todo_api::config::ApiConfig;
use todo_api::error::AppError;
use todo_api::state::AppState;
use todo_bus::client::BusClient;
use todo_bus::nats::NatsConnector;
use todo_bus::publisher::BusPublisher;
use todo_bus::shutdown::terminate_signal;
use todo_core::clock::SystemClock;
use todo_core::retry::RetryPolicy;
use todo_store::pg_todo_repository::PgTodoRepository;
use todo_store::pool::connect_with_retry;
use todo_store::schema::MIGRATOR;
use tokio::sync::watch;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // Initialize tracing subscriber.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    tracing::info!("Starting todo API server");

    let config = ApiConfig::from_env()?;
    let policy = RetryPolicy::default();

    // Database first: without it no request can succeed.
    let pool = connect_with_retry(&config.database_url, config.db_max_connections, &policy).await?;
    MIGRATOR.run(&pool).await?;
    tracing::info!("Database initialized");

    // The bus connects in the background; until then publishes are skipped.
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let bus = Arc::new(BusClient::new(
        Arc::new(NatsConnector::new(config.nats_url.clone())),
        policy,
    ));
    let bus_task = bus.spawn_connection_loop(shutdown_rx);

    let app_state = AppState::new(
        Arc::new(SystemClock),
        Arc::new(PgTodoRepository::new(pool)),
        Arc::new(BusPublisher::new(Arc::clone(&bus), config.nats_subject.clone())),
    );
    let app = todo_api::app(app_state);

    tracing::info!("Listening on {}", config.listen_addr);
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(terminate_signal())
        .await?;

    shutdown_tx.send_replace(true);
    if let Err(e) = bus_task.await {
        tracing::error!(error = %e, "bus connection task failed");
    }
    if let Err(e) = bus.close().await {
        tracing::warn!(error = %e, "failed to flush pending events");
    }
    tracing::info!("Server stopped");

    Ok(())
}
