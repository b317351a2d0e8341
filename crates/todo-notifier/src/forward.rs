//! Forwarders that deliver rendered notifications.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use todo_core::forwarder::{Delivery, ForwardError, Forwarder};
use tracing::{info, warn};

use crate::config::{DiscordCredentials, NotifierConfig};
use crate::error::NotifierError;

/// Upper bound on a single webhook call.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Serialize)]
struct CreateMessage<'a> {
    content: &'a str,
}

/// Posts notifications to a Discord channel through the bot REST API.
pub struct DiscordForwarder {
    client: reqwest::Client,
    url: String,
    authorization: String,
}

impl std::fmt::Debug for DiscordForwarder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiscordForwarder")
            .field("url", &self.url)
            .finish_non_exhaustive()
    }
}

impl DiscordForwarder {
    /// Builds a forwarder posting to `{api_base}/channels/{channel_id}/messages`.
    ///
    /// # Errors
    ///
    /// Returns the `reqwest` error if the HTTP client cannot be built.
    pub fn new(api_base: &str, credentials: &DiscordCredentials) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            url: format!(
                "{}/channels/{}/messages",
                api_base.trim_end_matches('/'),
                credentials.channel_id
            ),
            authorization: format!("Bot {}", credentials.bot_token),
        })
    }
}

#[async_trait]
impl Forwarder for DiscordForwarder {
    async fn forward(&self, text: &str) -> Result<Delivery, ForwardError> {
        let response = self
            .client
            .post(&self.url)
            .header("Authorization", &self.authorization)
            .json(&CreateMessage { content: text })
            .send()
            .await
            .map_err(|e| ForwardError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ForwardError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let preview: String = text.chars().take(50).collect();
        info!(status = status.as_u16(), preview = %preview, "sent message to Discord");
        Ok(Delivery::Sent)
    }
}

/// Logs the full notification instead of sending it.
#[derive(Debug, Default)]
pub struct LogOnlyForwarder;

#[async_trait]
impl Forwarder for LogOnlyForwarder {
    async fn forward(&self, text: &str) -> Result<Delivery, ForwardError> {
        info!(message = %text, "[LOG ONLY MODE] would send to Discord");
        Ok(Delivery::Skipped)
    }
}

/// Picks the forwarder for `config`.
///
/// Forwarding needs both the enabled flag and a complete set of
/// credentials; otherwise notifications are only logged.
///
/// # Errors
///
/// Returns `NotifierError::HttpClient` if the webhook client cannot be built.
pub fn from_config(config: &NotifierConfig) -> Result<Arc<dyn Forwarder>, NotifierError> {
    if !config.discord_enabled {
        info!("Discord notifications: DISABLED (log only mode)");
        return Ok(Arc::new(LogOnlyForwarder));
    }
    let Some(credentials) = &config.discord else {
        warn!("Discord credentials not configured, notifications will only be logged");
        return Ok(Arc::new(LogOnlyForwarder));
    };
    info!(channel_id = %credentials.channel_id, "Discord notifications: ENABLED");
    Ok(Arc::new(DiscordForwarder::new(
        &config.discord_api_base,
        credentials,
    )?))
}
