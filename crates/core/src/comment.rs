//! Free-text validation for comments and reports.

use crate::error::CoreError;

/// Maximum length for comment content (characters).
pub const MAX_COMMENT_LENGTH: usize = 5_000;

/// Maximum length for a report reason (characters).
pub const MAX_REASON_LENGTH: usize = 5_000;

fn validate_text(field: &str, text: &str, max: usize) -> Result<(), CoreError> {
    if text.trim().is_empty() {
        return Err(CoreError::Validation(format!("{field} must not be empty")));
    }
    let len = text.chars().count();
    if len > max {
        return Err(CoreError::Validation(format!(
            "{field} exceeds maximum length of {max} characters (got {len})"
        )));
    }
    Ok(())
}

pub fn validate_content(content: &str) -> Result<(), CoreError> {
    validate_text("Comment", content, MAX_COMMENT_LENGTH)
}

pub fn validate_reason(reason: &str) -> Result<(), CoreError> {
    validate_text("Report reason", reason, MAX_REASON_LENGTH)
}
