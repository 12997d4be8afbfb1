//! Donation amount validation.

use rust_decimal::Decimal;

use crate::error::CoreError;
use crate::project::validate_amount_precision;
use crate::types::Amount;

/// Donations must be strictly positive and fit `NUMERIC(12,2)`.
pub fn validate_amount(amount: Amount) -> Result<(), CoreError> {
    if amount <= Decimal::ZERO {
        return Err(CoreError::Validation(
            "Donation amount must be greater than zero".into(),
        ));
    }
    validate_amount_precision("Donation amount", amount)
}

/// Donations are only accepted while a project is not cancelled.
pub fn ensure_accepting(is_cancelled: bool) -> Result<(), CoreError> {
    if is_cancelled {
        return Err(CoreError::Conflict(
            "Project has been cancelled and no longer accepts donations".into(),
        ));
    }
    Ok(())
}
