//! # Registration Balance Recalculator
//!
//! Derives a registration's aggregate paid/due amounts and payment status.
//!
//! ## The One Equation
//! ```text
//! due_amount     = max(0, total_amount - discount_amount - paid_amount)
//! payment_status = COMPLETED  if due_amount == 0
//!                  PARTIAL    if paid_amount > 0
//!                  PENDING    otherwise
//! ```
//!
//! The storage layer persists the result of this computation inside the
//! SAME transaction as every payment-history insert and installment update;
//! the aggregate is never left stale relative to the rows beneath it.

use crate::money::Money;
use crate::types::PaymentStatus;

/// Recomputed aggregate state for a registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Balance {
    pub paid_amount: Money,
    pub due_amount: Money,
    pub payment_status: PaymentStatus,
}

/// Recomputes the balance from first principles.
///
/// Pure function of the registration's fixed totals and its cumulative
/// paid amount.
///
/// ## Example
/// ```rust
/// use ledger_core::balance::recompute;
/// use ledger_core::money::Money;
/// use ledger_core::types::PaymentStatus;
///
/// let b = recompute(
///     Money::from_cents(1_200_000),
///     Money::zero(),
///     Money::from_cents(400_000),
/// );
/// assert_eq!(b.due_amount, Money::from_cents(800_000));
/// assert_eq!(b.payment_status, PaymentStatus::Partial);
/// ```
pub fn recompute(total: Money, discount: Money, paid: Money) -> Balance {
    let due = (total - discount - paid).clamp_non_negative();

    let payment_status = if due.is_zero() {
        PaymentStatus::Completed
    } else if paid.is_positive() {
        PaymentStatus::Partial
    } else {
        PaymentStatus::Pending
    };

    Balance {
        paid_amount: paid,
        due_amount: due,
        payment_status,
    }
}

/// Incremental form: the balance after applying a payment delta on top of
/// the previously recorded paid amount.
///
/// `paid_new = paid_before + delta`; everything else follows [`recompute`].
/// The allocator uses this to know the post-commit state it is writing with
/// its atomic `paid_amount = paid_amount + ?` statement.
pub fn apply_delta(total: Money, discount: Money, paid_before: Money, delta: Money) -> Balance {
    recompute(total, discount, paid_before + delta)
}

// =============================================================================
// Unit Tests
// =============================================================================
