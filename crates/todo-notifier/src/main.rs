//! Todo notifier entry point.

use std::sync::Arc;

use todo_bus::client::BusClient;
use todo_bus::nats::NatsConnector;
use todo_bus::shutdown::terminate_signal;
use todo_core::retry::RetryPolicy;
use todo_notifier::config::NotifierConfig;
use todo_notifier::error::NotifierError;
use todo_notifier::forward;
use todo_notifier::service::Notifier;
use tokio::sync::watch;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), NotifierError> {
    // Initialize tracing subscriber.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    tracing::info!("Starting todo notifier");

    let config = NotifierConfig::from_env()?;
    let forwarder = forward::from_config(&config)?;

    let bus = Arc::new(BusClient::new(
        Arc::new(NatsConnector::new(config.nats_url.clone())),
        RetryPolicy::default(),
    ));
    let notifier = Notifier::new(bus, forwarder, config.subject, config.queue_group);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        terminate_signal().await;
        shutdown_tx.send_replace(true);
    });

    notifier.run(shutdown_rx).await?;
    tracing::info!("Notifier stopped");

    Ok(())
}
