//! Rating value bounds.

use crate::error::CoreError;

pub const MIN_RATING: i16 = 1;
pub const MAX_RATING: i16 = 5;

pub fn validate_rating(value: i16) -> Result<(), CoreError> {
    if !(MIN_RATING..=MAX_RATING).contains(&value) {
        return Err(CoreError::Validation(format!(
            "Rating must be between {MIN_RATING} and {MAX_RATING} (got {value})"
        )));
    }
    Ok(())
}
