//! # Validation Module
//!
//! Input validation utilities for the payment ledger.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Caller (whatever transport sits above this crate)            │
//! │  ├── Basic format checks, immediate user feedback                      │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE - input validation before business logic         │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Business rules (allocation.rs - ownership, sums, policy)     │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 4: Database (SQLite)                                            │
//! │  ├── NOT NULL / UNIQUE / foreign key constraints                       │
//! │                                                                         │
//! │  Defense in depth: Multiple layers catch different errors              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::MAX_INSTALLMENT_COUNT;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Monetary Validators
// =============================================================================

/// Validates a payment amount.
///
/// ## Rules
/// - Must be strictly positive
///
/// ## Example
/// ```rust
/// use ledger_core::money::Money;
/// use ledger_core::validation::validate_payment_amount;
///
/// assert!(validate_payment_amount(Money::from_cents(400_000)).is_ok());
/// assert!(validate_payment_amount(Money::zero()).is_err());
/// assert!(validate_payment_amount(Money::from_cents(-1)).is_err());
/// ```
pub fn validate_payment_amount(amount: Money) -> ValidationResult<()> {
    if !amount.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: "payment amount".to_string(),
        });
    }

    Ok(())
}

/// Validates an amount that may legitimately be zero (discounts, admission
/// fees, up-front payments).
pub fn validate_non_negative_amount(amount: Money, field: &str) -> ValidationResult<()> {
    if amount.is_negative() {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

// =============================================================================
// String Validators
// =============================================================================

/// Validates a registration or payment receipt number.
///
/// ## Rules
/// - Must not be empty
/// - Must be at most 40 characters
pub fn validate_receipt_no(receipt_no: &str) -> ValidationResult<()> {
    let receipt_no = receipt_no.trim();

    if receipt_no.is_empty() {
        return Err(ValidationError::Required {
            field: "receipt_no".to_string(),
        });
    }

    if receipt_no.len() > 40 {
        return Err(ValidationError::TooLong {
            field: "receipt_no".to_string(),
            max: 40,
        });
    }

    Ok(())
}

/// Validates a student phone number.
///
/// ## Rules
/// - Must not be empty
/// - Must be 6-20 characters of digits, `+`, `-`, or spaces
pub fn validate_phone_number(phone: &str) -> ValidationResult<()> {
    let phone = phone.trim();

    if phone.is_empty() {
        return Err(ValidationError::Required {
            field: "phone_number".to_string(),
        });
    }

    if phone.len() < 6 || phone.len() > 20 {
        return Err(ValidationError::OutOfRange {
            field: "phone_number length".to_string(),
            min: 6,
            max: 20,
        });
    }

    if !phone
        .chars()
        .all(|c| c.is_ascii_digit() || c == '+' || c == '-' || c == ' ')
    {
        return Err(ValidationError::InvalidFormat {
            field: "phone_number".to_string(),
            reason: "must contain only digits, '+', '-', and spaces".to_string(),
        });
    }

    Ok(())
}

/// Validates a student name.
pub fn validate_full_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "full_name".to_string(),
        });
    }

    if name.len() > 200 {
        return Err(ValidationError::TooLong {
            field: "full_name".to_string(),
            max: 200,
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a configured installment count.
///
/// ## Rules
/// - At least 1
/// - At most MAX_INSTALLMENT_COUNT (60)
pub fn validate_installment_count(count: i64) -> ValidationResult<()> {
    if count < 1 || count > MAX_INSTALLMENT_COUNT as i64 {
        return Err(ValidationError::OutOfRange {
            field: "installment_count".to_string(),
            min: 1,
            max: MAX_INSTALLMENT_COUNT as i64,
        });
    }

    Ok(())
}

// =============================================================================
// UUID Validators
// =============================================================================

/// Validates a UUID string format.
///
/// ## Example
/// ```rust
/// use ledger_core::validation::validate_uuid;
///
/// assert!(validate_uuid("550e8400-e29b-41d4-a716-446655440000").is_ok());
/// assert!(validate_uuid("not-a-uuid").is_err());
/// ```
pub fn validate_uuid(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "id".to_string(),
        });
    }

    uuid::Uuid::parse_str(id).map_err(|_| ValidationError::InvalidFormat {
        field: "id".to_string(),
        reason: "must be a valid UUID".to_string(),
    })?;

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_payment_amount() {
        assert!(validate_payment_amount(Money::from_cents(1)).is_ok());
        assert!(validate_payment_amount(Money::from_cents(400_000)).is_ok());

        assert!(validate_payment_amount(Money::zero()).is_err());
        assert!(validate_payment_amount(Money::from_cents(-100)).is_err());
    }

    #[test]
    fn test_validate_non_negative_amount() {
        assert!(validate_non_negative_amount(Money::zero(), "discount").is_ok());
        assert!(validate_non_negative_amount(Money::from_cents(100), "discount").is_ok());
        assert!(validate_non_negative_amount(Money::from_cents(-1), "discount").is_err());
    }

    #[test]
    fn test_validate_receipt_no() {
        assert!(validate_receipt_no("REG-2026-000017-a3f9").is_ok());
        assert!(validate_receipt_no("").is_err());
        assert!(validate_receipt_no("   ").is_err());
        assert!(validate_receipt_no(&"X".repeat(50)).is_err());
    }

    #[test]
    fn test_validate_phone_number() {
        assert!(validate_phone_number("+91 98765 43210").is_ok());
        assert!(validate_phone_number("9876543210").is_ok());

        assert!(validate_phone_number("").is_err());
        assert!(validate_phone_number("12345").is_err());
        assert!(validate_phone_number("call-me-maybe").is_err());
    }

    #[test]
    fn test_validate_installment_count() {
        assert!(validate_installment_count(1).is_ok());
        assert!(validate_installment_count(12).is_ok());
        assert!(validate_installment_count(60).is_ok());

        assert!(validate_installment_count(0).is_err());
        assert!(validate_installment_count(-3).is_err());
        assert!(validate_installment_count(61).is_err());
    }

    #[test]
    fn test_validate_uuid() {
        assert!(validate_uuid("550e8400-e29b-41d4-a716-446655440000").is_ok());
        assert!(validate_uuid("").is_err());
        assert!(validate_uuid("not-a-uuid").is_err());
    }
}
