//! # Domain Types
//!
//! Core domain types used throughout the course payment ledger.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌──────────────────┐   ┌────────────────────┐   │
//! │  │  Registration   │   │CourseRegistration│   │ MonthlyInstallment │   │
//! │  │  ─────────────  │1─N│  ──────────────  │1─N│  ────────────────  │   │
//! │  │  id (UUID)      │   │  payment_plan    │   │  month_number      │   │
//! │  │  receipt_no     │   │  course_fee      │   │  due_date          │   │
//! │  │  paid / due     │   │  (immutable)     │   │  paid / status     │   │
//! │  └────────┬────────┘   └──────────────────┘   └─────────▲──────────┘   │
//! │           │1                                            │N             │
//! │           │N                                            │              │
//! │  ┌────────┴────────┐   ┌──────────────────────────┐     │              │
//! │  │ PaymentHistory  │1─N│ PaymentInstallmentMapping├─────┘              │
//! │  │  receipt_no     │   │  amount_applied          │                    │
//! │  │  (append-only)  │   └──────────────────────────┘                    │
//! │  └─────────────────┘                                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! Every entity has:
//! - `id`: UUID v4 - immutable, used for database relations
//! - Business ID: (receipt_no, phone_number, etc.) - human-readable

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;

// =============================================================================
// Payment Status (registration-level)
// =============================================================================

/// Aggregate payment state of a registration.
///
/// Derived, never set directly: `COMPLETED` iff the due amount is zero,
/// `PARTIAL` iff anything has been paid, else `PENDING`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "UPPERCASE"))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    /// Nothing has been paid yet.
    Pending,
    /// Something has been paid, something remains due.
    Partial,
    /// Fully settled (due amount is zero).
    Completed,
}

impl Default for PaymentStatus {
    fn default() -> Self {
        PaymentStatus::Pending
    }
}

// =============================================================================
// Installment Status
// =============================================================================

/// Persisted state of a single monthly installment.
///
/// ## Monotonic Transitions
/// ```text
/// PENDING ──► PARTIAL ──► PAID
///    └──────────────────────┘   (never reverses)
/// ```
///
/// `OVERDUE` is deliberately NOT a variant here: it is a display state
/// derived at read time (due date passed while still `PENDING`), see
/// [`crate::overdue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "UPPERCASE"))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InstallmentStatus {
    /// No payment applied yet.
    Pending,
    /// Paid amount is positive but below the installment amount.
    Partial,
    /// Paid amount reached the installment amount.
    Paid,
}

impl Default for InstallmentStatus {
    fn default() -> Self {
        InstallmentStatus::Pending
    }
}

impl InstallmentStatus {
    /// Status an installment lands in after its paid amount becomes
    /// `paid`, given its fixed `installment_amount`.
    ///
    /// Applying more money never regresses the status: once `paid` reaches
    /// the installment amount the result stays `Paid`.
    pub fn after_payment(paid: Money, installment_amount: Money) -> Self {
        if paid >= installment_amount {
            InstallmentStatus::Paid
        } else if paid.is_positive() {
            InstallmentStatus::Partial
        } else {
            InstallmentStatus::Pending
        }
    }
}

// =============================================================================
// Payment Plan
// =============================================================================

/// How a course fee is settled: up front, or in monthly installments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum PaymentPlan {
    /// Entire fee due at registration time.
    Full,
    /// Fee split into a fixed schedule of monthly installments.
    Monthly,
}

// =============================================================================
// Payment Method
// =============================================================================

/// How money changed hands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Physical cash payment.
    Cash,
    /// Card payment.
    Card,
    /// Direct bank transfer.
    BankTransfer,
    /// UPI transfer.
    Upi,
}

// =============================================================================
// Payment Type
// =============================================================================

/// Classification of a payment-history event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum PaymentType {
    /// Paid up front as part of registration.
    Initial,
    /// Paid later against the running balance / installment schedule.
    Installment,
}

// =============================================================================
// Student
// =============================================================================

/// A student. Identified for business purposes by phone number; a student
/// record lives only as long as at least one registration references it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Student {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Full display name.
    pub full_name: String,

    /// Phone number - business identifier, unique.
    pub phone_number: String,

    /// Contact email, if given.
    pub email: Option<String>,

    /// Date of birth, if given.
    pub date_of_birth: Option<NaiveDate>,

    /// Postal address, if given.
    pub address: Option<String>,

    /// When the student record was created.
    pub created_at: DateTime<Utc>,

    /// When the student record was last updated.
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Course
// =============================================================================

/// A course offering, read from the catalog at registration time only.
///
/// The engine never writes courses; the catalog is an external collaborator.
/// The one attribute the ledger consumes is `installment_count`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Course {
    pub id: String,
    pub name: String,
    /// Human-readable duration label ("6 months").
    pub duration: Option<String>,
    /// Number of monthly installments a `monthly`-plan enrollment is split
    /// into. Always ≥ 1.
    pub installment_count: i64,
    /// Whether the course is open for enrollment (soft delete).
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Registration
// =============================================================================

/// One enrollment transaction: the aggregate whose balance the Payment
/// Allocator and Balance Recalculator keep consistent.
///
/// ## Invariant
/// `due_amount == max(0, total_amount - discount_amount - paid_amount)`,
/// and `payment_status` follows the due/paid amounts (see
/// [`crate::balance`]). Mutated only inside payment transactions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Registration {
    pub id: String,
    /// Business receipt identifier, unique.
    pub receipt_no: String,
    pub student_id: String,
    pub total_amount_cents: i64,
    pub admission_fee_cents: i64,
    pub discount_amount_cents: i64,
    pub paid_amount_cents: i64,
    pub due_amount_cents: i64,
    pub payment_method: PaymentMethod,
    pub payment_status: PaymentStatus,
    pub registration_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Registration {
    /// Returns the total amount as Money.
    #[inline]
    pub fn total_amount(&self) -> Money {
        Money::from_cents(self.total_amount_cents)
    }

    /// Returns the discount amount as Money.
    #[inline]
    pub fn discount_amount(&self) -> Money {
        Money::from_cents(self.discount_amount_cents)
    }

    /// Returns the cumulative paid amount as Money.
    #[inline]
    pub fn paid_amount(&self) -> Money {
        Money::from_cents(self.paid_amount_cents)
    }

    /// Returns the outstanding due amount as Money.
    #[inline]
    pub fn due_amount(&self) -> Money {
        Money::from_cents(self.due_amount_cents)
    }
}

// =============================================================================
// Course Registration
// =============================================================================

/// Links a registration to a course with the agreed plan and fee.
/// Created once at registration time; immutable thereafter.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct CourseRegistration {
    pub id: String,
    pub registration_id: String,
    pub course_id: String,
    pub payment_plan: PaymentPlan,
    /// Fee agreed at enrollment time (frozen; later catalog changes do not
    /// affect it).
    pub course_fee_cents: i64,
    pub created_at: DateTime<Utc>,
}

impl CourseRegistration {
    /// Returns the agreed course fee as Money.
    #[inline]
    pub fn course_fee(&self) -> Money {
        Money::from_cents(self.course_fee_cents)
    }
}

// =============================================================================
// Monthly Installment
// =============================================================================

/// One row per (course-registration, month number), created as a batch at
/// registration time. Count is fixed at creation; rows are never added or
/// removed afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct MonthlyInstallment {
    pub id: String,
    pub registration_id: String,
    pub course_id: String,
    /// 1-based, sequential, no gaps.
    pub month_number: i64,
    /// Display label ("Month 3").
    pub month_name: String,
    pub due_date: NaiveDate,
    pub installment_amount_cents: i64,
    /// Always ≤ installment_amount_cents in well-formed data.
    pub paid_amount_cents: i64,
    pub payment_status: InstallmentStatus,
    /// Set only when the installment reaches `PAID`; never cleared.
    pub payment_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MonthlyInstallment {
    /// Returns the installment amount as Money.
    #[inline]
    pub fn installment_amount(&self) -> Money {
        Money::from_cents(self.installment_amount_cents)
    }

    /// Returns the amount paid so far as Money.
    #[inline]
    pub fn paid_amount(&self) -> Money {
        Money::from_cents(self.paid_amount_cents)
    }

    /// Amount still needed to reach `PAID`, clamped at zero.
    #[inline]
    pub fn remaining(&self) -> Money {
        (self.installment_amount() - self.paid_amount()).clamp_non_negative()
    }
}

// =============================================================================
// Payment History
// =============================================================================

/// Immutable audit record of a single payment event. Append-only; removed
/// only by a full registration cancellation cascade.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct PaymentHistory {
    pub id: String,
    pub registration_id: String,
    pub payment_amount_cents: i64,
    pub payment_method: PaymentMethod,
    pub payment_type: PaymentType,
    /// Business receipt identifier for this payment event, unique.
    pub receipt_no: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl PaymentHistory {
    /// Returns the payment amount as Money.
    #[inline]
    pub fn payment_amount(&self) -> Money {
        Money::from_cents(self.payment_amount_cents)
    }
}

// =============================================================================
// Payment Installment Mapping
// =============================================================================

/// Join record: how much of one payment event landed on one installment.
///
/// Exists only for payments that carried an explicit breakdown; legacy
/// (undifferentiated) payments produce no mapping rows. For a breakdown
/// payment the mapping amounts sum exactly to the payment amount.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct PaymentInstallmentMapping {
    pub id: String,
    pub payment_history_id: String,
    pub monthly_installment_id: String,
    pub amount_applied_cents: i64,
    pub created_at: DateTime<Utc>,
}

impl PaymentInstallmentMapping {
    /// Returns the applied amount as Money.
    #[inline]
    pub fn amount_applied(&self) -> Money {
        Money::from_cents(self.amount_applied_cents)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_installment_status_after_payment() {
        let due = Money::from_cents(400_000);

        assert_eq!(
            InstallmentStatus::after_payment(Money::zero(), due),
            InstallmentStatus::Pending
        );
        assert_eq!(
            InstallmentStatus::after_payment(Money::from_cents(100_000), due),
            InstallmentStatus::Partial
        );
        assert_eq!(
            InstallmentStatus::after_payment(due, due),
            InstallmentStatus::Paid
        );
        // Overshoot still reads as paid - status never regresses
        assert_eq!(
            InstallmentStatus::after_payment(Money::from_cents(500_000), due),
            InstallmentStatus::Paid
        );
    }

    #[test]
    fn test_installment_remaining_clamps() {
        let installment = MonthlyInstallment {
            id: "i1".into(),
            registration_id: "r1".into(),
            course_id: "c1".into(),
            month_number: 1,
            month_name: "Month 1".into(),
            due_date: NaiveDate::from_ymd_opt(2026, 1, 15).unwrap(),
            installment_amount_cents: 400_000,
            paid_amount_cents: 450_000,
            payment_status: InstallmentStatus::Paid,
            payment_date: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert_eq!(installment.remaining(), Money::zero());
    }

    #[test]
    fn test_status_defaults() {
        assert_eq!(PaymentStatus::default(), PaymentStatus::Pending);
        assert_eq!(InstallmentStatus::default(), InstallmentStatus::Pending);
    }

    #[test]
    fn test_status_serde_wire_format() {
        assert_eq!(
            serde_json::to_string(&PaymentStatus::Completed).unwrap(),
            "\"COMPLETED\""
        );
        assert_eq!(
            serde_json::to_string(&InstallmentStatus::Paid).unwrap(),
            "\"PAID\""
        );
        assert_eq!(
            serde_json::to_string(&PaymentPlan::Monthly).unwrap(),
            "\"monthly\""
        );
        assert_eq!(
            serde_json::to_string(&PaymentMethod::BankTransfer).unwrap(),
            "\"bank_transfer\""
        );
    }
}
