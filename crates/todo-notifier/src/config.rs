//! Environment configuration for the notifier.

use todo_core::event::TODO_EVENTS_SUBJECT;

use crate::error::NotifierError;

/// Default Discord REST API base URL.
pub const DEFAULT_DISCORD_API_BASE: &str = "https://discord.com/api";

/// Bot credentials for posting to a Discord channel.
#[derive(Clone, PartialEq, Eq)]
pub struct DiscordCredentials {
    /// Target channel id.
    pub channel_id: String,
    /// Bot token, sent as `Authorization: Bot <token>`.
    pub bot_token: String,
}

impl std::fmt::Debug for DiscordCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiscordCredentials")
            .field("channel_id", &self.channel_id)
            .field("bot_token", &"<redacted>")
            .finish()
    }
}

/// Settings read once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotifierConfig {
    /// Bus server (`NATS_URL`).
    pub nats_url: String,
    /// Subject to consume (`NATS_SUBJECT`).
    pub subject: String,
    /// Queue-group shared by all instances (`NATS_QUEUE_GROUP`).
    pub queue_group: String,
    /// `DISCORD_ENABLED`; when false, notifications are only logged.
    pub discord_enabled: bool,
    /// `DISCORD_CHANNEL_ID` + `DISCORD_BOT_TOKEN`, if both are non-empty.
    pub discord: Option<DiscordCredentials>,
    /// `DISCORD_API_BASE`, overridable for tests and proxies.
    pub discord_api_base: String,
}

impl NotifierConfig {
    /// Reads the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `NotifierError::Config` if `DISCORD_ENABLED` is not a boolean.
    pub fn from_env() -> Result<Self, NotifierError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through `lookup`.
    ///
    /// # Errors
    ///
    /// See [`NotifierConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, NotifierError> {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let discord_enabled = match non_empty("DISCORD_ENABLED") {
            None => true,
            Some(raw) => match raw.trim().to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" => true,
                "false" | "0" | "no" => false,
                other => {
                    return Err(NotifierError::Config(format!(
                        "DISCORD_ENABLED must be true or false, got {other:?}"
                    )));
                }
            },
        };

        let discord = match (non_empty("DISCORD_CHANNEL_ID"), non_empty("DISCORD_BOT_TOKEN")) {
            (Some(channel_id), Some(bot_token)) => Some(DiscordCredentials {
                channel_id,
                bot_token,
            }),
            _ => None,
        };

        Ok(Self {
            nats_url: non_empty("NATS_URL").unwrap_or_else(|| "nats://my-nats:4222".to_string()),
            subject: non_empty("NATS_SUBJECT").unwrap_or_else(|| TODO_EVENTS_SUBJECT.to_string()),
            queue_group: non_empty("NATS_QUEUE_GROUP").unwrap_or_else(|| "broadcasters".to_string()),
            discord_enabled,
            discord,
            discord_api_base: non_empty("DISCORD_API_BASE")
                .unwrap_or_else(|| DEFAULT_DISCORD_API_BASE.to_string()),
        })
    }
}
