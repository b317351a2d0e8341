//! Validation rules for todo text.

use todo_core::error::DomainError;
use todo_core::todo::MAX_TODO_LENGTH;

/// Checks that `text` is non-blank and at most `MAX_TODO_LENGTH` characters.
///
/// Length is counted in characters, not bytes.
///
/// # Errors
///
/// Returns `DomainError::Validation` describing the violated rule.
pub fn validate_todo_text(text: &str) -> Result<(), DomainError> {
    if text.trim().is_empty() {
        return Err(DomainError::Validation("todo must not be empty".to_owned()));
    }
    if text.chars().count() > MAX_TODO_LENGTH {
        return Err(DomainError::Validation(format!(
            "todo must be {MAX_TODO_LENGTH} characters or less"
        )));
    }
    Ok(())
}
