//! Project field validation.
//!
//! Rules applied by the API before a project is inserted or updated. The
//! database checks `ck_projects_target_positive` and `ck_projects_window`
//! back these up.

use rust_decimal::Decimal;

use crate::error::CoreError;
use crate::types::{Amount, Timestamp};

/// Maximum length for a project title (characters).
pub const MAX_TITLE_LENGTH: usize = 200;

/// Smallest accepted funding target.
pub const MIN_TARGET: i64 = 1;

/// `NUMERIC(12,2)`: at most 12 significant digits, 2 after the point.
pub const MAX_AMOUNT_DIGITS: u32 = 12;
pub const MAX_AMOUNT_SCALE: u32 = 2;

pub fn validate_title(title: &str) -> Result<(), CoreError> {
    let len = title.trim().chars().count();
    if len == 0 {
        return Err(CoreError::Validation("Title must not be empty".into()));
    }
    if len > MAX_TITLE_LENGTH {
        return Err(CoreError::Validation(format!(
            "Title exceeds maximum length of {MAX_TITLE_LENGTH} characters (got {len})"
        )));
    }
    Ok(())
}

pub fn validate_details(details: &str) -> Result<(), CoreError> {
    if details.trim().is_empty() {
        return Err(CoreError::Validation("Details must not be empty".into()));
    }
    Ok(())
}

/// Check that an amount fits `NUMERIC(12,2)`.
pub fn validate_amount_precision(field: &str, amount: Amount) -> Result<(), CoreError> {
    let normalized = amount.normalize();
    if normalized.scale() > MAX_AMOUNT_SCALE {
        return Err(CoreError::Validation(format!(
            "{field} must have at most {MAX_AMOUNT_SCALE} decimal places"
        )));
    }
    let integer_digits = normalized.trunc().abs().to_string().trim_start_matches('0').len() as u32;
    if integer_digits > MAX_AMOUNT_DIGITS - MAX_AMOUNT_SCALE {
        return Err(CoreError::Validation(format!(
            "{field} exceeds the maximum of {} integer digits",
            MAX_AMOUNT_DIGITS - MAX_AMOUNT_SCALE
        )));
    }
    Ok(())
}

pub fn validate_target(target: Amount) -> Result<(), CoreError> {
    if target < Decimal::from(MIN_TARGET) {
        return Err(CoreError::Validation(format!(
            "Total target must be at least {MIN_TARGET}"
        )));
    }
    validate_amount_precision("Total target", target)
}

/// The campaign must end strictly after it starts.
pub fn validate_window(start_time: Timestamp, end_time: Timestamp) -> Result<(), CoreError> {
    if end_time <= start_time {
        return Err(CoreError::Validation(
            "End time must be after start time".into(),
        ));
    }
    Ok(())
}

/// A new campaign may not start in the past.
pub fn validate_start_not_past(start_time: Timestamp, now: Timestamp) -> Result<(), CoreError> {
    if start_time < now {
        return Err(CoreError::Validation(
            "Start time cannot be in the past".into(),
        ));
    }
    Ok(())
}
