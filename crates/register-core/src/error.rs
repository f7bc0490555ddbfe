//! # Error Types
//!
//! Domain-specific error types for register-core.
//!
//! ## Error Taxonomy
//! ```text
//! ValidationError  - an operation's input broke a business rule; the cart
//!                    is left untouched and the error names the field/rule
//! CoreError        - wraps validation plus aggregate-level limits
//!
//! NOT errors: operating on an item or payment id that no longer exists is
//! a deliberate no-op, so a double-clicked "remove" is safe to retry.
//! Nothing in this crate is fatal; nothing panics.
//! ```

use thiserror::Error;

use crate::types::TransactionMode;

// =============================================================================
// Core Error
// =============================================================================

/// Aggregate-level errors.
///
/// These represent business rule violations; they should be caught and
/// translated to user-facing messages by the embedding layer.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Cart has reached the maximum number of distinct lines.
    #[error("Cart cannot have more than {max} lines")]
    CartTooLarge { max: usize },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised at the operation boundary, before any state changes.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// Value must be strictly positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must be zero or greater.
    #[error("{field} must not be negative")]
    MustBeNonNegative { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Quantity sign contradicts the transaction mode.
    ///
    /// A quantity must be positive in sale mode and negative in return
    /// mode; zero is never valid.
    #[error("quantity {quantity} is not valid in {mode:?} mode")]
    QuantitySignMismatch {
        mode: TransactionMode,
        quantity: i64,
    },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::CartTooLarge { max: 100 };
        assert_eq!(err.to_string(), "Cart cannot have more than 100 lines");

        let err = ValidationError::MustBePositive {
            field: "payment amount".to_string(),
        };
        assert_eq!(err.to_string(), "payment amount must be positive");

        let err = ValidationError::QuantitySignMismatch {
            mode: TransactionMode::Sale,
            quantity: -2,
        };
        assert_eq!(err.to_string(), "quantity -2 is not valid in Sale mode");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::MustBePositive {
            field: "payment amount".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
