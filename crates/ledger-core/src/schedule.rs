//! # Installment Schedule Generator
//!
//! Given a course fee, a configured installment count, and a start date,
//! produces the ordered sequence of monthly dues for a course-registration.
//!
//! ## Where This Runs
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Registration transaction (ledger-db)                                  │
//! │                                                                         │
//! │  insert registration                                                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  for each monthly-plan course:                                         │
//! │       generate_schedule(fee, count, start)  ← THIS MODULE (pure)       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  insert one monthly_installments row per entry, all PENDING            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Invoked exactly once per monthly-plan course-registration. The generator
//! itself is stateless; at-most-once invocation is guaranteed by the
//! surrounding registration transaction, not here.

use chrono::{Months, NaiveDate};

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::MAX_INSTALLMENT_COUNT;

/// One generated installment, ready to be persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledInstallment {
    /// 1-based month number, sequential, no gaps.
    pub month_number: u32,
    /// Display label ("Month 3").
    pub month_name: String,
    pub due_date: NaiveDate,
    pub amount: Money,
}

/// Generates the installment schedule for one course enrollment.
///
/// ## Rules
/// - `amount = course_fee / installment_count`, plain equal division. The
///   integer remainder is NOT folded into the last installment; summing the
///   schedule can fall short of the fee by up to `count - 1` cents. This is
///   a documented simplification of the fee contract, not a bug.
/// - `due_date(n) = start_date + (n - 1) calendar months`, preserving the
///   day-of-month where the target month has it and clamping to the month's
///   last day otherwise (Jan 31 → Feb 28).
/// - Produces exactly `installment_count` entries, months `1..=count`.
///
/// ## Errors
/// - `installment_count == 0` or beyond [`MAX_INSTALLMENT_COUNT`]
/// - negative course fee
/// - due date arithmetic walking off the supported calendar range
///
/// ## Example
/// ```rust
/// use chrono::NaiveDate;
/// use ledger_core::money::Money;
/// use ledger_core::schedule::generate_schedule;
///
/// let start = NaiveDate::from_ymd_opt(2026, 1, 15).unwrap();
/// let schedule = generate_schedule(Money::from_cents(1_200_000), 3, start).unwrap();
///
/// assert_eq!(schedule.len(), 3);
/// assert_eq!(schedule[0].amount, Money::from_cents(400_000));
/// assert_eq!(schedule[2].due_date, NaiveDate::from_ymd_opt(2026, 3, 15).unwrap());
/// ```
pub fn generate_schedule(
    course_fee: Money,
    installment_count: u32,
    start_date: NaiveDate,
) -> CoreResult<Vec<ScheduledInstallment>> {
    if installment_count == 0 || installment_count > MAX_INSTALLMENT_COUNT {
        return Err(ValidationError::OutOfRange {
            field: "installment_count".to_string(),
            min: 1,
            max: MAX_INSTALLMENT_COUNT as i64,
        }
        .into());
    }

    if course_fee.is_negative() {
        return Err(ValidationError::MustBePositive {
            field: "course_fee".to_string(),
        }
        .into());
    }

    let amount = course_fee.split_evenly(installment_count);

    let mut schedule = Vec::with_capacity(installment_count as usize);
    for month_number in 1..=installment_count {
        let due_date = start_date
            .checked_add_months(Months::new(month_number - 1))
            .ok_or(CoreError::ScheduleOutOfRange {
                start: start_date,
                months: month_number - 1,
            })?;

        schedule.push(ScheduledInstallment {
            month_number,
            month_name: format!("Month {}", month_number),
            due_date,
            amount,
        });
    }

    Ok(schedule)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_three_equal_installments() {
        let schedule =
            generate_schedule(Money::from_cents(1_200_000), 3, date(2026, 1, 15)).unwrap();

        assert_eq!(schedule.len(), 3);
        for (i, entry) in schedule.iter().enumerate() {
            assert_eq!(entry.month_number as usize, i + 1);
            assert_eq!(entry.month_name, format!("Month {}", i + 1));
            assert_eq!(entry.amount, Money::from_cents(400_000));
        }
        assert_eq!(schedule[0].due_date, date(2026, 1, 15));
        assert_eq!(schedule[1].due_date, date(2026, 2, 15));
        assert_eq!(schedule[2].due_date, date(2026, 3, 15));
    }

    #[test]
    fn test_remainder_not_redistributed() {
        // 10000.00 over 3 months: each gets 3333.33, total 9999.99
        let schedule =
            generate_schedule(Money::from_cents(1_000_000), 3, date(2026, 1, 1)).unwrap();

        assert!(schedule.iter().all(|e| e.amount.cents() == 333_333));
        let total: Money = schedule.iter().map(|e| e.amount).sum();
        assert_eq!(total.cents(), 999_999);
    }

    #[test]
    fn test_day_of_month_clamped_at_month_end() {
        // Jan 31 has no counterpart in February
        let schedule =
            generate_schedule(Money::from_cents(300_000), 3, date(2026, 1, 31)).unwrap();

        assert_eq!(schedule[0].due_date, date(2026, 1, 31));
        assert_eq!(schedule[1].due_date, date(2026, 2, 28));
        assert_eq!(schedule[2].due_date, date(2026, 3, 31));
    }

    #[test]
    fn test_year_rollover() {
        let schedule =
            generate_schedule(Money::from_cents(1_200_000), 4, date(2025, 11, 10)).unwrap();

        assert_eq!(schedule[0].due_date, date(2025, 11, 10));
        assert_eq!(schedule[1].due_date, date(2025, 12, 10));
        assert_eq!(schedule[2].due_date, date(2026, 1, 10));
        assert_eq!(schedule[3].due_date, date(2026, 2, 10));
    }

    #[test]
    fn test_single_installment() {
        let schedule =
            generate_schedule(Money::from_cents(500_000), 1, date(2026, 6, 1)).unwrap();
        assert_eq!(schedule.len(), 1);
        assert_eq!(schedule[0].month_number, 1);
        assert_eq!(schedule[0].amount, Money::from_cents(500_000));
    }

    #[test]
    fn test_zero_count_rejected() {
        let err = generate_schedule(Money::from_cents(500_000), 0, date(2026, 6, 1));
        assert!(matches!(
            err,
            Err(CoreError::Validation(ValidationError::OutOfRange { .. }))
        ));
    }

    #[test]
    fn test_negative_fee_rejected() {
        let err = generate_schedule(Money::from_cents(-1), 3, date(2026, 6, 1));
        assert!(matches!(
            err,
            Err(CoreError::Validation(ValidationError::MustBePositive { .. }))
        ));
    }
}
