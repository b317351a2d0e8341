//! The todo record as persisted and as carried on events.

use serde::{Deserialize, Serialize};

/// Maximum length of a todo's text, in characters.
pub const MAX_TODO_LENGTH: usize = 140;

/// A single row of the todo table.
///
/// The JSON shape (`{"id", "todo", "done"}`) is shared by the HTTP API and
/// the bus payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoRecord {
    /// Store-assigned identifier. Immutable.
    pub id: i64,
    /// The todo text.
    pub todo: String,
    /// Completion flag, the only field that changes after creation.
    pub done: bool,
}
