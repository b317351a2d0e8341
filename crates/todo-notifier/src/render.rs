//! Turns a received todo event into the chat message posted to Discord.
//!
//! Decoding is lenient: any JSON object is renderable, and missing fields
//! fall back to placeholders. Only payloads that are not a JSON object are
//! rejected.

use std::fmt::Write as _;

use serde_json::{Map, Value};
use todo_core::event::{TodoAction, TodoEvent};

use crate::error::DecodeError;

const RULE: &str = "━━━━━━━━━━━━━━━━━━━━━";

/// A bus payload that decoded to a JSON object.
#[derive(Debug, Clone, PartialEq)]
pub struct ReceivedEvent {
    raw: Map<String, Value>,
}

/// Text of a scalar field, with strings shown unquoted.
fn display(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(fields) => !fields.is_empty(),
    }
}

impl ReceivedEvent {
    /// Decodes a raw bus payload.
    ///
    /// # Errors
    ///
    /// Returns `DecodeError::Json` if the payload is not JSON and
    /// `DecodeError::NotAnObject` if it is JSON but not an object.
    pub fn decode(payload: &[u8]) -> Result<Self, DecodeError> {
        match serde_json::from_slice(payload)? {
            Value::Object(raw) => Ok(Self { raw }),
            _ => Err(DecodeError::NotAnObject),
        }
    }

    fn todo_field(&self, key: &str) -> Option<&Value> {
        self.raw.get("todo").and_then(Value::as_object)?.get(key)
    }

    /// The action, `unknown` when absent.
    #[must_use]
    pub fn action(&self) -> TodoAction {
        self.raw
            .get("action")
            .map_or_else(|| "unknown".to_owned(), display)
            .into()
    }

    /// The todo id as text, `?` when absent.
    #[must_use]
    pub fn todo_id(&self) -> String {
        self.todo_field("id").map_or_else(|| "?".to_owned(), display)
    }

    /// The todo text, empty when absent.
    #[must_use]
    pub fn task(&self) -> String {
        self.todo_field("todo").map(display).unwrap_or_default()
    }

    /// The done flag, `false` when absent.
    #[must_use]
    pub fn done(&self) -> bool {
        self.todo_field("done").is_some_and(truthy)
    }

    /// The event timestamp, `N/A` when absent.
    #[must_use]
    pub fn timestamp(&self) -> String {
        self.raw
            .get("timestamp")
            .map_or_else(|| "N/A".to_owned(), display)
    }

    /// The payload as received, pretty-printed.
    #[must_use]
    pub fn pretty(&self) -> String {
        serde_json::to_string_pretty(&self.raw).unwrap_or_default()
    }
}

impl From<&TodoEvent> for ReceivedEvent {
    fn from(event: &TodoEvent) -> Self {
        match serde_json::to_value(event) {
            Ok(Value::Object(raw)) => Self { raw },
            _ => Self { raw: Map::new() },
        }
    }
}

/// Headline and emoji for an event.
fn headline(action: &TodoAction, done: bool) -> (&'static str, String) {
    match action {
        TodoAction::Created => ("📝", "NEW TODO CREATED".to_owned()),
        TodoAction::Updated if done => ("✅", "TODO MARKED COMPLETE".to_owned()),
        TodoAction::Updated => ("🔄", "TODO REOPENED".to_owned()),
        TodoAction::Other(action) => ("ℹ️", format!("TODO ACTION: {}", action.to_uppercase())),
    }
}

/// Renders `event` as a Discord markdown message.
///
/// Pure: the same event always renders to the same text.
#[must_use]
pub fn render(event: &ReceivedEvent) -> String {
    let done = event.done();
    let (emoji, title) = headline(&event.action(), done);
    let status = if done { "✅ Done" } else { "⏳ Pending" };

    let mut text = String::new();
    let _ = writeln!(text, "{emoji} **{title}** {emoji}");
    let _ = writeln!(text, "{RULE}");
    let _ = writeln!(text, "**ID:** {}", event.todo_id());
    let _ = writeln!(text, "**Task:** {}", event.task());
    let _ = writeln!(text, "**Status:** {status}");
    let _ = writeln!(text, "**Timestamp:** {}", event.timestamp());
    let _ = writeln!(text, "{RULE}");
    let _ = write!(text, "```json\n{}\n```", event.pretty());
    text
}
