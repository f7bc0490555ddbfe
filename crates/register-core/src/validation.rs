//! # Validation Module
//!
//! Business rule validation for cart mutations.
//!
//! Every check runs at the operation boundary, before any state changes, so
//! a rejected call leaves the aggregate exactly as it was. Values that
//! arrive via serde (a resumed snapshot, a UI payload) go through the same
//! functions as values built in-process.
//!
//! ## Usage
//! ```rust
//! use register_core::validation::{validate_payment_amount, validate_quantity};
//! use register_core::types::TransactionMode;
//! use register_core::money::Money;
//!
//! validate_payment_amount(Money::from_cents(500)).unwrap();
//! validate_quantity(3, TransactionMode::Sale).unwrap();
//! assert!(validate_quantity(-3, TransactionMode::Sale).is_err());
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{Discount, TransactionMode};
use crate::{MAX_LINE_QUANTITY, MAX_NOTES_LENGTH};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Discount Validators
// =============================================================================

/// Validates a discount's numeric range.
///
/// ## Rules
/// - Percentage: 0 to 10000 basis points (0% to 100%)
/// - Fixed: amount must be non-negative (zero is a valid "no-op" discount)
pub fn validate_discount(discount: &Discount) -> ValidationResult<()> {
    match discount {
        Discount::Percentage(bps) => {
            if *bps > 10_000 {
                return Err(ValidationError::OutOfRange {
                    field: "percentage discount".to_string(),
                    min: 0,
                    max: 10_000,
                });
            }
        }
        Discount::Fixed(amount) => {
            if amount.is_negative() {
                return Err(ValidationError::MustBeNonNegative {
                    field: "fixed discount".to_string(),
                });
            }
        }
    }

    Ok(())
}

// =============================================================================
// Quantity Validators
// =============================================================================

/// Validates a line quantity against the current transaction mode.
///
/// ## Rules
/// - Sign must match the mode: positive in sale, negative in return
/// - Zero is never valid
/// - Magnitude must not exceed MAX_LINE_QUANTITY (999)
///
/// A mismatched sign is rejected, never coerced.
pub fn validate_quantity(quantity: i64, mode: TransactionMode) -> ValidationResult<()> {
    if !mode.permits_quantity(quantity) {
        return Err(ValidationError::QuantitySignMismatch { mode, quantity });
    }

    if quantity.abs() > MAX_LINE_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: -MAX_LINE_QUANTITY,
            max: MAX_LINE_QUANTITY,
        });
    }

    Ok(())
}

// =============================================================================
// Payment Validators
// =============================================================================

/// Validates a payment amount.
///
/// ## Rules
/// - Must be strictly positive; zero or negative tenders are rejected.
///   Overpayment is allowed (the balance simply goes negative as change
///   due), so there is no upper bound here.
pub fn validate_payment_amount(amount: Money) -> ValidationResult<()> {
    if !amount.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: "payment amount".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// String Validators
// =============================================================================

/// Validates a line's free-text notes.
pub fn validate_notes(notes: &str) -> ValidationResult<()> {
    if notes.len() > MAX_NOTES_LENGTH {
        return Err(ValidationError::TooLong {
            field: "notes".to_string(),
            max: MAX_NOTES_LENGTH,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_discount() {
        assert!(validate_discount(&Discount::Percentage(0)).is_ok());
        assert!(validate_discount(&Discount::Percentage(10_000)).is_ok());
        assert!(validate_discount(&Discount::Percentage(10_001)).is_err());

        assert!(validate_discount(&Discount::Fixed(Money::zero())).is_ok());
        assert!(validate_discount(&Discount::Fixed(Money::from_cents(500))).is_ok());
        assert!(validate_discount(&Discount::Fixed(Money::from_cents(-1))).is_err());
    }

    #[test]
    fn test_validate_quantity_sale_mode() {
        assert!(validate_quantity(1, TransactionMode::Sale).is_ok());
        assert!(validate_quantity(999, TransactionMode::Sale).is_ok());

        assert!(validate_quantity(0, TransactionMode::Sale).is_err());
        assert!(validate_quantity(-1, TransactionMode::Sale).is_err());
        assert!(validate_quantity(1000, TransactionMode::Sale).is_err());
    }

    #[test]
    fn test_validate_quantity_return_mode() {
        assert!(validate_quantity(-1, TransactionMode::Return).is_ok());
        assert!(validate_quantity(-999, TransactionMode::Return).is_ok());

        assert!(validate_quantity(0, TransactionMode::Return).is_err());
        assert!(validate_quantity(1, TransactionMode::Return).is_err());
        assert!(validate_quantity(-1000, TransactionMode::Return).is_err());
    }

    #[test]
    fn test_validate_payment_amount() {
        assert!(validate_payment_amount(Money::from_cents(1)).is_ok());
        assert!(validate_payment_amount(Money::from_cents(4000)).is_ok());

        assert!(validate_payment_amount(Money::zero()).is_err());
        assert!(validate_payment_amount(Money::from_cents(-100)).is_err());
    }

    #[test]
    fn test_validate_notes() {
        assert!(validate_notes("").is_ok());
        assert!(validate_notes("extra shot, oat milk").is_ok());
        assert!(validate_notes(&"x".repeat(501)).is_err());
    }
}
