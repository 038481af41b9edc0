//! # Error Types
//!
//! Domain-specific error types for ledger-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  ledger-core errors (this file)                                        │
//! │  ├── CoreError        - Business rule violations                       │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  ledger-db errors (separate crate)                                     │
//! │  └── LedgerError      - Store failures + wrapped core errors           │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → LedgerError → Caller              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (receipt, amounts, ids)
//! 3. Errors are enum variants, never String
//! 4. Skip-ahead is NOT here: it is a warning on a successful result,
//!    never an error

use thiserror::Error;

use crate::money::Money;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These errors represent business rule violations detected before any
/// ledger mutation. The storage layer guarantees that surfacing one of
/// these rolls back the whole operation.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The caller-supplied breakdown does not add up to the stated
    /// payment amount (beyond the one-cent epsilon).
    ///
    /// ## When This Occurs
    /// - Operator edits one breakdown line but not the total
    /// - Client-side rounding drifted more than a cent
    #[error("payment breakdown ({breakdown_total}) doesn't match total payment ({stated_amount})")]
    AllocationMismatch {
        stated_amount: Money,
        breakdown_total: Money,
    },

    /// A breakdown entry targets installments that do not belong to the
    /// stated course and registration.
    ///
    /// ## When This Occurs
    /// - Installment id from a different registration
    /// - Installment id from a different course of the same registration
    /// - Unknown installment id
    #[error("breakdown for course {course_id} references {missing} installment(s) outside this course/registration")]
    InvalidInstallmentReference { course_id: String, missing: usize },

    /// An undifferentiated (no-breakdown) payment would exceed the
    /// registration's outstanding due amount.
    ///
    /// ## Policy
    /// The strict variant is enforced uniformly on the legacy path:
    /// anything above the due amount is rejected. Breakdown payments are
    /// not subject to this cap.
    #[error("payment of {amount} exceeds outstanding due amount {due}")]
    OverpaymentRejected { amount: Money, due: Money },

    /// Schedule generation walked off the calendar (date overflow).
    #[error("installment due date out of range: {start} + {months} month(s)")]
    ScheduleOutOfRange {
        start: chrono::NaiveDate,
        months: u32,
    },

    /// Validation error (wraps ValidationError).
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when caller input doesn't meet requirements.
/// Used for early validation before business logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Invalid format (e.g., invalid UUID, malformed receipt number).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// A collection that must not be empty is empty.
    #[error("{field} must not be empty")]
    Empty { field: String },
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
        let err = CoreError::AllocationMismatch {
            stated_amount: Money::from_cents(400_000),
            breakdown_total: Money::from_cents(350_000),
        };
        assert_eq!(
            err.to_string(),
            "payment breakdown (3500.00) doesn't match total payment (4000.00)"
        );

        let err = CoreError::OverpaymentRejected {
            amount: Money::from_cents(900_000),
            due: Money::from_cents(800_000),
        };
        assert_eq!(
            err.to_string(),
            "payment of 9000.00 exceeds outstanding due amount 8000.00"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "receipt_no".to_string(),
        };
        assert_eq!(err.to_string(), "receipt_no is required");

        let err = ValidationError::MustBePositive {
            field: "payment amount".to_string(),
        };
        assert_eq!(err.to_string(), "payment amount must be positive");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Empty {
            field: "installment_ids".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
