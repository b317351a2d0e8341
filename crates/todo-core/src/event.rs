//! Domain events emitted after a todo mutation commits.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::clock::Clock;
use crate::todo::TodoRecord;

/// Default bus subject todo events are published on.
pub const TODO_EVENTS_SUBJECT: &str = "todos";

/// What happened to the todo.
///
/// Unknown action names are preserved verbatim so consumers can still report
/// them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TodoAction {
    /// A todo was inserted.
    Created,
    /// A todo's done flag was written.
    Updated,
    /// Any action this build does not know about.
    Other(String),
}

impl TodoAction {
    /// Returns the wire name of the action.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Created => "created",
            Self::Updated => "updated",
            Self::Other(name) => name,
        }
    }
}

impl From<String> for TodoAction {
    fn from(value: String) -> Self {
        match value.as_str() {
            "created" => Self::Created,
            "updated" => Self::Updated,
            _ => Self::Other(value),
        }
    }
}

impl From<TodoAction> for String {
    fn from(value: TodoAction) -> Self {
        match value {
            TodoAction::Other(name) => name,
            known => known.as_str().to_owned(),
        }
    }
}

impl fmt::Display for TodoAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Notification payload published after a successful mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoEvent {
    /// The kind of mutation.
    pub action: TodoAction,
    /// Snapshot of the record after the mutation.
    pub todo: TodoRecord,
    /// ISO-8601 time the event was built.
    pub timestamp: String,
}

impl TodoEvent {
    /// Builds a `created` event for a freshly inserted record.
    #[must_use]
    pub fn created(todo: TodoRecord, clock: &dyn Clock) -> Self {
        Self {
            action: TodoAction::Created,
            todo,
            timestamp: clock.timestamp(),
        }
    }

    /// Builds an `updated` event for a record whose done flag was written.
    #[must_use]
    pub fn updated(todo: TodoRecord, clock: &dyn Clock) -> Self {
        Self {
            action: TodoAction::Updated,
            todo,
            timestamp: clock.timestamp(),
        }
    }

    /// Serializes the event to its JSON wire form.
    #[must_use]
    pub fn to_payload(&self) -> Vec<u8> {
        // Serialization of derived Serialize types with string keys is infallible.
        serde_json::to_vec(self).expect("TodoEvent serialization is infallible")
    }

    /// Parses an event from its JSON wire form.
    ///
    /// # Errors
    ///
    /// Returns the decoder error if the payload is not valid JSON or lacks a
    /// required field.
    pub fn from_payload(payload: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(payload)
    }
}
