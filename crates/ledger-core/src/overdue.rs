//! # Overdue Derivation
//!
//! `OVERDUE` is a display state, not a stored one: an installment whose due
//! date has passed while it is still `PENDING`. It is recomputed on every
//! read and never written back to storage, so the persisted status machine
//! stays strictly PENDING → PARTIAL → PAID.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::{InstallmentStatus, MonthlyInstallment};

/// What a reader sees for an installment: the persisted status, or the
/// derived `OVERDUE` overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EffectiveStatus {
    Pending,
    Partial,
    Paid,
    /// Due date passed and still PENDING. Derived only.
    Overdue,
}

impl From<InstallmentStatus> for EffectiveStatus {
    fn from(status: InstallmentStatus) -> Self {
        match status {
            InstallmentStatus::Pending => EffectiveStatus::Pending,
            InstallmentStatus::Partial => EffectiveStatus::Partial,
            InstallmentStatus::Paid => EffectiveStatus::Paid,
        }
    }
}

/// Derives the effective status and days-overdue count for one installment
/// as of `today`.
///
/// Only `PENDING` rows can read as overdue; a `PARTIAL` installment past
/// its due date keeps reporting `PARTIAL`, matching the stored-state
/// semantics this engine inherited.
///
/// ## Example
/// ```rust
/// use chrono::NaiveDate;
/// use ledger_core::overdue::{derive_status, EffectiveStatus};
/// # use chrono::Utc;
/// # use ledger_core::types::{InstallmentStatus, MonthlyInstallment};
/// # let installment = MonthlyInstallment {
/// #     id: "i".into(), registration_id: "r".into(), course_id: "c".into(),
/// #     month_number: 1, month_name: "Month 1".into(),
/// #     due_date: NaiveDate::from_ymd_opt(2026, 1, 10).unwrap(),
/// #     installment_amount_cents: 100, paid_amount_cents: 0,
/// #     payment_status: InstallmentStatus::Pending, payment_date: None,
/// #     created_at: Utc::now(), updated_at: Utc::now(),
/// # };
///
/// let today = NaiveDate::from_ymd_opt(2026, 1, 15).unwrap();
/// let (status, days) = derive_status(&installment, today);
/// assert_eq!(status, EffectiveStatus::Overdue);
/// assert_eq!(days, 5);
/// ```
pub fn derive_status(installment: &MonthlyInstallment, today: NaiveDate) -> (EffectiveStatus, i64) {
    if installment.payment_status == InstallmentStatus::Pending && installment.due_date < today {
        let days_overdue = (today - installment.due_date).num_days();
        (EffectiveStatus::Overdue, days_overdue)
    } else {
        (installment.payment_status.into(), 0)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn installment(due: NaiveDate, status: InstallmentStatus) -> MonthlyInstallment {
        MonthlyInstallment {
            id: "i1".to_string(),
            registration_id: "r1".to_string(),
            course_id: "c1".to_string(),
            month_number: 1,
            month_name: "Month 1".to_string(),
            due_date: due,
            installment_amount_cents: 400_000,
            paid_amount_cents: 0,
            payment_status: status,
            payment_date: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_pending_past_due_is_overdue() {
        let row = installment(date(2026, 1, 10), InstallmentStatus::Pending);
        let (status, days) = derive_status(&row, date(2026, 1, 25));
        assert_eq!(status, EffectiveStatus::Overdue);
        assert_eq!(days, 15);
    }

    #[test]
    fn test_due_today_is_not_overdue() {
        let row = installment(date(2026, 1, 10), InstallmentStatus::Pending);
        let (status, days) = derive_status(&row, date(2026, 1, 10));
        assert_eq!(status, EffectiveStatus::Pending);
        assert_eq!(days, 0);
    }

    #[test]
    fn test_future_due_date_stays_pending() {
        let row = installment(date(2026, 3, 10), InstallmentStatus::Pending);
        let (status, days) = derive_status(&row, date(2026, 1, 10));
        assert_eq!(status, EffectiveStatus::Pending);
        assert_eq!(days, 0);
    }

    #[test]
    fn test_partial_past_due_stays_partial() {
        let row = installment(date(2026, 1, 10), InstallmentStatus::Partial);
        let (status, days) = derive_status(&row, date(2026, 2, 10));
        assert_eq!(status, EffectiveStatus::Partial);
        assert_eq!(days, 0);
    }

    #[test]
    fn test_paid_past_due_stays_paid() {
        let row = installment(date(2026, 1, 10), InstallmentStatus::Paid);
        let (status, _) = derive_status(&row, date(2026, 2, 10));
        assert_eq!(status, EffectiveStatus::Paid);
    }
}
