//! Connection pool bootstrap with retry.

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use todo_core::retry::RetryPolicy;
use tracing::{info, warn};

/// Connects to `database_url`, retrying with `policy` while the database is
/// still coming up.
///
/// # Errors
///
/// Returns the last connection error once `policy.max_attempts` attempts
/// have failed.
pub async fn connect_with_retry(
    database_url: &str,
    max_connections: u32,
    policy: &RetryPolicy,
) -> Result<PgPool, sqlx::Error> {
    let mut attempt = 1;
    loop {
        match PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
        {
            Ok(pool) => {
                info!(attempt, "connected to database");
                return Ok(pool);
            }
            Err(e) if attempt < policy.max_attempts => {
                let delay = policy.delay_for(attempt);
                warn!(
                    attempt,
                    max_attempts = policy.max_attempts,
                    retry_in_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                    error = %e,
                    "database connection failed, retrying"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}
