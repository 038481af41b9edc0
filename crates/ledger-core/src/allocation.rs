//! # Payment Allocation Rules
//!
//! Pure validation and planning for breakdown payments: the part of the
//! Payment Allocator that can be computed without touching storage.
//!
//! ## Division of Labor
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ledger-db::PaymentRepository::apply_payment                           │
//! │                                                                         │
//! │  1. fetch registration + its installments     (storage)                │
//! │  2. plan_allocation(...)                      ← THIS MODULE (pure)     │
//! │     ├── breakdown total == stated amount?     → AllocationMismatch     │
//! │     ├── every target owned by course + reg?   → InvalidInstallment…    │
//! │     ├── earlier unpaid months?                → warnings (non-fatal)   │
//! │     └── per-installment deltas                                         │
//! │  3. apply deltas + mappings + balance update  (storage, one txn)       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! All validation happens here, BEFORE the storage layer issues a single
//! mutating statement.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::{InstallmentStatus, MonthlyInstallment};

// =============================================================================
// Request Types
// =============================================================================

/// One caller-supplied breakdown entry: this much money, onto these
/// installments of this course.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BreakdownEntry {
    pub course_id: String,
    /// Targeted installment ids. Treated as a set; duplicates are ignored.
    pub installment_ids: Vec<String>,
    pub amount: Money,
}

// =============================================================================
// Plan Types
// =============================================================================

/// A skipped month discovered by the skip-ahead check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedMonth {
    pub month_number: i64,
    pub month_name: String,
}

/// Non-fatal warning: the breakdown pays a later month while earlier months
/// of the same course are still unpaid.
///
/// This models real-world "skip a month, pay later" behavior - the payment
/// still proceeds, the warning flags it for operator review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkipAheadWarning {
    pub course_id: String,
    pub course_name: String,
    pub months: Vec<SkippedMonth>,
}

impl fmt::Display for SkipAheadWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let months = self
            .months
            .iter()
            .map(|m| m.month_name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        write!(
            f,
            "WARNING: {} has unpaid previous months: {}",
            self.course_name, months
        )
    }
}

/// How much to add to one installment's paid amount.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallmentDelta {
    pub installment_id: String,
    pub amount: Money,
}

/// The fully validated outcome of planning a breakdown payment.
#[derive(Debug, Clone, Default)]
pub struct AllocationPlan {
    /// Per-installment increments, entry order then month order. The delta
    /// amounts sum exactly to the breakdown total.
    pub deltas: Vec<InstallmentDelta>,
    /// Skip-ahead warnings, one per offending course entry.
    pub warnings: Vec<SkipAheadWarning>,
}

// =============================================================================
// Planning
// =============================================================================

/// Validates a breakdown and plans the per-installment deltas.
///
/// ## Arguments
/// * `stated_amount` - the payment amount the caller claims to be paying
/// * `entries` - the breakdown across course/installment targets
/// * `installments` - ALL monthly installments of the registration being
///   paid (the ownership and skip-ahead checks run against this set)
/// * `course_names` - course id → display name, for warning messages
///
/// ## Rules (in validation order, nothing applied on failure)
/// 1. Every entry must target at least one installment and carry a
///    positive amount.
/// 2. The entry amounts must sum to `stated_amount` within one cent,
///    otherwise [`CoreError::AllocationMismatch`].
/// 3. Every targeted installment must exist under the entry's course for
///    this registration, otherwise [`CoreError::InvalidInstallmentReference`].
/// 4. For each entry, unpaid (`PENDING`) months earlier than the earliest
///    targeted month produce a [`SkipAheadWarning`] - non-fatal.
///
/// Each entry's amount is split across its targets in month order; the
/// integer-division remainder goes to the last (highest-month) target so
/// the deltas sum exactly to the entry amount.
pub fn plan_allocation(
    stated_amount: Money,
    entries: &[BreakdownEntry],
    installments: &[MonthlyInstallment],
    course_names: &HashMap<String, String>,
) -> CoreResult<AllocationPlan> {
    if entries.is_empty() {
        return Err(ValidationError::Empty {
            field: "breakdown".to_string(),
        }
        .into());
    }

    for entry in entries {
        if entry.installment_ids.is_empty() {
            return Err(ValidationError::Empty {
                field: "installment_ids".to_string(),
            }
            .into());
        }
        if !entry.amount.is_positive() {
            return Err(ValidationError::MustBePositive {
                field: "breakdown amount".to_string(),
            }
            .into());
        }
    }

    let breakdown_total: Money = entries.iter().map(|e| e.amount).sum();
    if !stated_amount.matches_within_epsilon(breakdown_total) {
        return Err(CoreError::AllocationMismatch {
            stated_amount,
            breakdown_total,
        });
    }

    let mut plan = AllocationPlan::default();

    for entry in entries {
        let ids: BTreeSet<&str> = entry.installment_ids.iter().map(String::as_str).collect();

        // Ownership check: every id must resolve inside (registration, course)
        let mut targets: Vec<&MonthlyInstallment> = installments
            .iter()
            .filter(|i| i.course_id == entry.course_id && ids.contains(i.id.as_str()))
            .collect();

        if targets.len() != ids.len() {
            return Err(CoreError::InvalidInstallmentReference {
                course_id: entry.course_id.clone(),
                missing: ids.len() - targets.len(),
            });
        }

        targets.sort_by_key(|i| i.month_number);

        // Skip-ahead check: PENDING months before the earliest target
        let min_month = targets[0].month_number;
        let skipped: Vec<SkippedMonth> = installments
            .iter()
            .filter(|i| {
                i.course_id == entry.course_id
                    && i.month_number < min_month
                    && i.payment_status == InstallmentStatus::Pending
            })
            .map(|i| SkippedMonth {
                month_number: i.month_number,
                month_name: i.month_name.clone(),
            })
            .collect();

        if !skipped.is_empty() {
            let course_name = course_names
                .get(&entry.course_id)
                .cloned()
                .unwrap_or_else(|| "Unknown Course".to_string());
            let mut months = skipped;
            months.sort_by_key(|m| m.month_number);
            plan.warnings.push(SkipAheadWarning {
                course_id: entry.course_id.clone(),
                course_name,
                months,
            });
        }

        // Split in month order, remainder to the last target
        let shares = entry.amount.split_exact(targets.len() as u32);
        plan.deltas.extend(
            targets
                .iter()
                .zip(shares)
                .map(|(installment, amount)| InstallmentDelta {
                    installment_id: installment.id.clone(),
                    amount,
                }),
        );
    }

    Ok(plan)
}

// =============================================================================
// Unit Tests
// =============================================================================
