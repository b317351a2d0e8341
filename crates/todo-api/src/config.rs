//! Environment configuration for the API server.

use std::net::SocketAddr;

use todo_core::event::TODO_EVENTS_SUBJECT;

use crate::error::AppError;

/// Settings read once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// PostgreSQL connection string (`DATABASE_URL`, required).
    pub database_url: String,
    /// Pool size (`DB_MAX_CONNECTIONS`, default 10).
    pub db_max_connections: u32,
    /// Listen address (`HOST`/`PORT`, default `0.0.0.0:3000`).
    pub listen_addr: SocketAddr,
    /// Bus server (`NATS_URL`, default `nats://my-nats:4222`).
    pub nats_url: String,
    /// Subject todo events go to (`NATS_SUBJECT`, default `todos`).
    pub nats_subject: String,
}

impl ApiConfig {
    /// Reads the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if `DATABASE_URL` is missing or a value
    /// fails to parse.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through `lookup`.
    ///
    /// # Errors
    ///
    /// See [`ApiConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let database_url = lookup("DATABASE_URL")
            .ok_or_else(|| AppError::Config("DATABASE_URL environment variable must be set".into()))?;
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port: u16 = lookup("PORT")
            .unwrap_or_else(|| "3000".to_string())
            .parse()
            .map_err(|e| AppError::Config(format!("PORT must be a valid u16: {e}")))?;
        let db_max_connections: u32 = lookup("DB_MAX_CONNECTIONS")
            .unwrap_or_else(|| "10".to_string())
            .parse()
            .map_err(|e| AppError::Config(format!("DB_MAX_CONNECTIONS must be a valid u32: {e}")))?;
        let listen_addr: SocketAddr = format!("{host}:{port}")
            .parse()
            .map_err(|e| AppError::Config(format!("invalid HOST:PORT combination: {e}")))?;

        Ok(Self {
            database_url,
            db_max_connections,
            listen_addr,
            nats_url: lookup("NATS_URL").unwrap_or_else(|| "nats://my-nats:4222".to_string()),
            nats_subject: lookup("NATS_SUBJECT").unwrap_or_else(|| TODO_EVENTS_SUBJECT.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults_apply_when_only_database_url_is_set() {
        let config = ApiConfig::from_lookup(lookup(&[("DATABASE_URL", "postgres://db/todos")])).unwrap();

        assert_eq!(config.database_url, "postgres://db/todos");
        assert_eq!(config.listen_addr, "0.0.0.0:3000".parse().unwrap());
        assert_eq!(config.db_max_connections, 10);
        assert_eq!(config.nats_url, "nats://my-nats:4222");
        assert_eq!(config.nats_subject, "todos");
    }

    #[test]
    fn test_missing_database_url_is_a_config_error() {
        let result = ApiConfig::from_lookup(lookup(&[]));

        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn test_invalid_port_is_a_config_error() {
        let result = ApiConfig::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://db/todos"),
            ("PORT", "eighty"),
        ]));

        assert!(matches!(result, Err(AppError::Config(msg)) if msg.contains("PORT")));
    }
}
