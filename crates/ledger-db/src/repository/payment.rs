//! # Payment Repository - the Payment Allocator
//!
//! Applies an incoming payment to a registration: validates the optional
//! breakdown, writes the audit row, applies per-installment deltas, and
//! recomputes the registration balance - all inside ONE transaction.
//!
//! ## Allocation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      apply_payment()                                    │
//! │                                                                         │
//! │  validate amount > 0                                                   │
//! │  BEGIN                                                                 │
//! │    fetch registration by receipt ──────────── NotFound? → ROLLBACK     │
//! │    breakdown supplied?                                                 │
//! │    ├── yes: fetch installments + course names                          │
//! │    │        plan_allocation()  (ledger-core, pure)                     │
//! │    │        ├── sum mismatch? ─────────────── error → ROLLBACK         │
//! │    │        ├── foreign target? ───────────── error → ROLLBACK         │
//! │    │        └── skipped months? ───────────── warnings, continue       │
//! │    │        insert payment_history row                                 │
//! │    │        per delta: atomic UPDATE + mapping row                     │
//! │    └── no:  amount > due? ─────────────────── error → ROLLBACK         │
//! │             insert payment_history row                                 │
//! │    atomic registration balance UPDATE                                  │
//! │  COMMIT                                                                │
//! │                                                                         │
//! │  Either everything above committed, or nothing did.                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Concurrency
//! Increments are expressed IN SQL (`paid_amount_cents = paid_amount_cents
//! + ?`), never read-modify-write in engine memory, so two payments landing
//! on the same registration cannot lose each other's update. There is no
//! idempotency key: a timed-out `apply_payment` must not be blindly
//! retried by callers (duplicate payment risk).

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use std::collections::HashMap;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{LedgerError, LedgerResult};
use crate::receipts;
use ledger_core::allocation::{plan_allocation, BreakdownEntry, SkipAheadWarning};
use ledger_core::validation::{validate_payment_amount, validate_receipt_no};
use ledger_core::{
    CoreError, Money, MonthlyInstallment, PaymentMethod, PaymentType, Registration,
};

// =============================================================================
// Request / Response Types
// =============================================================================

/// An incoming payment against a registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentRequest {
    /// Receipt number of the registration being paid.
    pub registration_receipt_no: String,
    pub amount: Money,
    pub method: PaymentMethod,
    pub notes: Option<String>,
    /// Optional allocation across course/installment targets. `None` is
    /// the undifferentiated path: the amount lands on the registration's
    /// aggregate balance only.
    pub breakdown: Option<Vec<BreakdownEntry>>,
}

/// Result of a committed payment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentOutcome {
    /// Freshly minted receipt number for this payment event.
    pub payment_receipt_no: String,
    pub amount: Money,
    /// Skip-ahead warnings. Non-empty means the payment committed but paid
    /// a later month while earlier months of the same course were unpaid.
    pub warnings: Vec<SkipAheadWarning>,
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for payment application - the Payment Allocator.
#[derive(Debug, Clone)]
pub struct PaymentRepository {
    pool: SqlitePool,
}

impl PaymentRepository {
    /// Creates a new PaymentRepository.
    pub fn new(pool: SqlitePool) -> Self {
        PaymentRepository { pool }
    }

    /// Applies a payment to a registration.
    ///
    /// ## Paths
    /// - **Breakdown**: validates sums, ownership, and ordering via
    ///   ledger-core, then applies per-installment deltas with mapping
    ///   rows. Skip-ahead produces warnings, not errors.
    /// - **Undifferentiated** (no breakdown): amount lands on the
    ///   registration balance only. Policy: anything above the outstanding
    ///   due amount is rejected with `OverpaymentRejected`.
    ///
    /// ## Postconditions (all paths)
    /// Exactly one payment-history row with a fresh receipt number, and
    /// the registration's paid/due/status recalculated - in the same
    /// transaction as every installment write. On any error, no writes are
    /// visible.
    pub async fn apply_payment(&self, request: &PaymentRequest) -> LedgerResult<PaymentOutcome> {
        validate_receipt_no(&request.registration_receipt_no)?;
        validate_payment_amount(request.amount)?;

        let now = Utc::now();
        let payment_date = now.date_naive();
        let payment_receipt_no = receipts::payment_receipt_no();
        let payment_id = Uuid::new_v4().to_string();

        debug!(
            registration = %request.registration_receipt_no,
            amount = %request.amount,
            breakdown = request.breakdown.is_some(),
            "Applying payment"
        );

        let mut tx = self.pool.begin().await?;

        let registration: Option<Registration> = sqlx::query_as(
            r#"
            SELECT
                id, receipt_no, student_id,
                total_amount_cents, admission_fee_cents, discount_amount_cents,
                paid_amount_cents, due_amount_cents,
                payment_method, payment_status, registration_date,
                created_at, updated_at
            FROM registrations
            WHERE receipt_no = ?1
            "#,
        )
        .bind(&request.registration_receipt_no)
        .fetch_optional(&mut *tx)
        .await?;

        let registration = registration.ok_or_else(|| {
            LedgerError::not_found("Registration", &request.registration_receipt_no)
        })?;

        let warnings = match &request.breakdown {
            Some(entries) => {
                // Everything the pure planner needs: the registration's
                // installments and the course display names for warnings.
                let installments: Vec<MonthlyInstallment> = sqlx::query_as(
                    r#"
                    SELECT id, registration_id, course_id,
                           month_number, month_name, due_date,
                           installment_amount_cents, paid_amount_cents, payment_status,
                           payment_date, created_at, updated_at
                    FROM monthly_installments
                    WHERE registration_id = ?1
                    ORDER BY course_id, month_number
                    "#,
                )
                .bind(&registration.id)
                .fetch_all(&mut *tx)
                .await?;

                let course_names: HashMap<String, String> = sqlx::query_as::<_, (String, String)>(
                    r#"
                    SELECT DISTINCT c.id, c.name
                    FROM courses c
                    JOIN course_registrations cr ON cr.course_id = c.id
                    WHERE cr.registration_id = ?1
                    "#,
                )
                .bind(&registration.id)
                .fetch_all(&mut *tx)
                .await?
                .into_iter()
                .collect();

                let plan = plan_allocation(request.amount, entries, &installments, &course_names)
                    .map_err(LedgerError::from)?;

                self.insert_payment_row(
                    &mut tx,
                    &payment_id,
                    &registration.id,
                    request,
                    &payment_receipt_no,
                    now,
                )
                .await?;

                for delta in &plan.deltas {
                    // Single atomic statement: increment, derive status,
                    // stamp payment_date only on first reaching PAID.
                    sqlx::query(
                        r#"
                        UPDATE monthly_installments SET
                            paid_amount_cents = paid_amount_cents + ?1,
                            payment_status = CASE
                                WHEN paid_amount_cents + ?1 >= installment_amount_cents THEN 'PAID'
                                ELSE 'PARTIAL'
                            END,
                            payment_date = CASE
                                WHEN paid_amount_cents + ?1 >= installment_amount_cents
                                     AND payment_date IS NULL THEN ?2
                                ELSE payment_date
                            END,
                            updated_at = ?3
                        WHERE id = ?4
                        "#,
                    )
                    .bind(delta.amount.cents())
                    .bind(payment_date)
                    .bind(now)
                    .bind(&delta.installment_id)
                    .execute(&mut *tx)
                    .await?;

                    sqlx::query(
                        r#"
                        INSERT INTO payment_installment_mapping (
                            id, payment_history_id, monthly_installment_id,
                            amount_applied_cents, created_at
                        ) VALUES (?1, ?2, ?3, ?4, ?5)
                        "#,
                    )
                    .bind(Uuid::new_v4().to_string())
                    .bind(&payment_id)
                    .bind(&delta.installment_id)
                    .bind(delta.amount.cents())
                    .bind(now)
                    .execute(&mut *tx)
                    .await?;
                }

                plan.warnings
            }

            None => {
                // Undifferentiated path: strict overpayment policy
                if request.amount > registration.due_amount() {
                    return Err(CoreError::OverpaymentRejected {
                        amount: request.amount,
                        due: registration.due_amount(),
                    }
                    .into());
                }

                self.insert_payment_row(
                    &mut tx,
                    &payment_id,
                    &registration.id,
                    request,
                    &payment_receipt_no,
                    now,
                )
                .await?;

                Vec::new()
            }
        };

        // Registration balance recomputation - same transaction, single
        // atomic statement mirroring ledger_core::balance::apply_delta.
        sqlx::query(
            r#"
            UPDATE registrations SET
                paid_amount_cents = paid_amount_cents + ?1,
                due_amount_cents = MAX(
                    0,
                    total_amount_cents - discount_amount_cents - (paid_amount_cents + ?1)
                ),
                payment_status = CASE
                    WHEN total_amount_cents - discount_amount_cents - (paid_amount_cents + ?1) <= 0
                        THEN 'COMPLETED'
                    ELSE 'PARTIAL'
                END,
                updated_at = ?2
            WHERE id = ?3
            "#,
        )
        .bind(request.amount.cents())
        .bind(now)
        .bind(&registration.id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        for warning in &warnings {
            warn!(registration = %request.registration_receipt_no, "{}", warning);
        }

        info!(
            registration = %request.registration_receipt_no,
            payment_receipt_no = %payment_receipt_no,
            amount = %request.amount,
            warnings = warnings.len(),
            "Payment applied"
        );

        Ok(PaymentOutcome {
            payment_receipt_no,
            amount: request.amount,
            warnings,
        })
    }

    /// Appends the single audit row every payment path produces.
    async fn insert_payment_row(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
        payment_id: &str,
        registration_id: &str,
        request: &PaymentRequest,
        receipt_no: &str,
        now: chrono::DateTime<Utc>,
    ) -> LedgerResult<()> {
        sqlx::query(
            r#"
            INSERT INTO payment_history (
                id, registration_id, payment_amount_cents,
                payment_method, payment_type, receipt_no, notes, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(payment_id)
        .bind(registration_id)
        .bind(request.amount.cents())
        .bind(request.method)
        .bind(PaymentType::Installment)
        .bind(receipt_no)
        .bind(&request.notes)
        .bind(now)
        .execute(&mut **tx)
        .await?;

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use crate::repository::registration::{
        CourseSelection, NewRegistration, NewStudent, RegistrationDetail,
    };
    use ledger_core::{Course, InstallmentStatus, PaymentPlan, PaymentStatus};

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    /// Seeds one student with one 3-month course registration:
    /// total 12000.00, no discount, installments of 4000.00 each.
    async fn seed_three_month_registration(db: &Database) -> RegistrationDetail {
        let registrations = db.registrations();
        registrations
            .insert_course(&Course {
                id: "course-1".to_string(),
                name: "Rust Fundamentals".to_string(),
                duration: Some("3 months".to_string()),
                installment_count: 3,
                is_active: true,
                created_at: Utc::now(),
            })
            .await
            .unwrap();

        let created = registrations
            .create(&NewRegistration {
                student: NewStudent {
                    full_name: "Asha Verma".to_string(),
                    phone_number: "9876543210".to_string(),
                    email: None,
                    date_of_birth: None,
                    address: None,
                },
                courses: vec![CourseSelection {
                    course_id: "course-1".to_string(),
                    payment_plan: PaymentPlan::Monthly,
                    course_fee: Money::from_cents(1_200_000),
                }],
                total_amount: Money::from_cents(1_200_000),
                admission_fee: Money::zero(),
                discount_amount: Money::zero(),
                initial_payment: Money::zero(),
                payment_method: PaymentMethod::Cash,
            })
            .await
            .unwrap();

        registrations.get_detail(&created.receipt_no).await.unwrap()
    }

    fn breakdown_for(detail: &RegistrationDetail, months: &[i64], cents: i64) -> Vec<BreakdownEntry> {
        let ids = detail
            .installments
            .iter()
            .filter(|i| months.contains(&i.month_number))
            .map(|i| i.id.clone())
            .collect();
        vec![BreakdownEntry {
            course_id: "course-1".to_string(),
            installment_ids: ids,
            amount: Money::from_cents(cents),
        }]
    }

    async fn snapshot(db: &Database) -> (i64, i64, i64, i64) {
        let history: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM payment_history")
            .fetch_one(db.pool())
            .await
            .unwrap();
        let mappings: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM payment_installment_mapping")
            .fetch_one(db.pool())
            .await
            .unwrap();
        let paid: i64 = sqlx::query_scalar("SELECT COALESCE(SUM(paid_amount_cents), 0) FROM registrations")
            .fetch_one(db.pool())
            .await
            .unwrap();
        let installment_paid: i64 =
            sqlx::query_scalar("SELECT COALESCE(SUM(paid_amount_cents), 0) FROM monthly_installments")
                .fetch_one(db.pool())
                .await
                .unwrap();
        (history, mappings, paid, installment_paid)
    }

    #[tokio::test]
    async fn test_pay_first_installment_exactly() {
        let db = test_db().await;
        let detail = seed_three_month_registration(&db).await;
        let receipt = detail.registration.receipt_no.clone();

        let outcome = db
            .payments()
            .apply_payment(&PaymentRequest {
                registration_receipt_no: receipt.clone(),
                amount: Money::from_cents(400_000),
                method: PaymentMethod::Cash,
                notes: None,
                breakdown: Some(breakdown_for(&detail, &[1], 400_000)),
            })
            .await
            .unwrap();

        assert!(outcome.warnings.is_empty());
        assert!(outcome.payment_receipt_no.starts_with("PMT-"));

        let after = db.registrations().get_detail(&receipt).await.unwrap();
        assert_eq!(after.registration.paid_amount_cents, 400_000);
        assert_eq!(after.registration.due_amount_cents, 800_000);
        assert_eq!(after.registration.payment_status, PaymentStatus::Partial);

        let month1 = &after.installments[0];
        assert_eq!(month1.payment_status, InstallmentStatus::Paid);
        assert_eq!(month1.paid_amount_cents, 400_000);
        assert!(month1.payment_date.is_some());

        assert_eq!(after.installments[1].payment_status, InstallmentStatus::Pending);
        assert_eq!(after.installments[2].payment_status, InstallmentStatus::Pending);
    }

    #[tokio::test]
    async fn test_skip_ahead_warns_and_commits() {
        let db = test_db().await;
        let detail = seed_three_month_registration(&db).await;
        let receipt = detail.registration.receipt_no.clone();

        // Settle month 1 first
        db.payments()
            .apply_payment(&PaymentRequest {
                registration_receipt_no: receipt.clone(),
                amount: Money::from_cents(400_000),
                method: PaymentMethod::Cash,
                notes: None,
                breakdown: Some(breakdown_for(&detail, &[1], 400_000)),
            })
            .await
            .unwrap();

        // Now pay month 3, skipping month 2
        let outcome = db
            .payments()
            .apply_payment(&PaymentRequest {
                registration_receipt_no: receipt.clone(),
                amount: Money::from_cents(400_000),
                method: PaymentMethod::Upi,
                notes: None,
                breakdown: Some(breakdown_for(&detail, &[3], 400_000)),
            })
            .await
            .unwrap();

        assert_eq!(outcome.warnings.len(), 1);
        let warning = &outcome.warnings[0];
        assert_eq!(warning.course_name, "Rust Fundamentals");
        assert_eq!(warning.months.len(), 1);
        assert_eq!(warning.months[0].month_number, 2);

        // The payment committed despite the warning
        let after = db.registrations().get_detail(&receipt).await.unwrap();
        assert_eq!(after.installments[2].payment_status, InstallmentStatus::Paid);
        assert_eq!(after.installments[1].payment_status, InstallmentStatus::Pending);
        assert_eq!(after.registration.paid_amount_cents, 800_000);
        assert_eq!(after.registration.due_amount_cents, 400_000);
    }

    #[tokio::test]
    async fn test_mismatched_breakdown_writes_nothing() {
        let db = test_db().await;
        let detail = seed_three_month_registration(&db).await;
        let receipt = detail.registration.receipt_no.clone();
        let before = snapshot(&db).await;

        // Stated 4000.00 but breakdown carries 3500.00 - beyond epsilon
        let err = db
            .payments()
            .apply_payment(&PaymentRequest {
                registration_receipt_no: receipt.clone(),
                amount: Money::from_cents(400_000),
                method: PaymentMethod::Cash,
                notes: None,
                breakdown: Some(breakdown_for(&detail, &[1], 350_000)),
            })
            .await;

        assert!(matches!(
            err,
            Err(LedgerError::Core(CoreError::AllocationMismatch { .. }))
        ));
        assert_eq!(snapshot(&db).await, before);
    }

    #[tokio::test]
    async fn test_foreign_installment_reference_writes_nothing() {
        let db = test_db().await;
        let detail = seed_three_month_registration(&db).await;
        let receipt = detail.registration.receipt_no.clone();
        let before = snapshot(&db).await;

        let err = db
            .payments()
            .apply_payment(&PaymentRequest {
                registration_receipt_no: receipt,
                amount: Money::from_cents(400_000),
                method: PaymentMethod::Cash,
                notes: None,
                breakdown: Some(vec![BreakdownEntry {
                    course_id: "course-1".to_string(),
                    installment_ids: vec!["not-an-installment".to_string()],
                    amount: Money::from_cents(400_000),
                }]),
            })
            .await;

        assert!(matches!(
            err,
            Err(LedgerError::Core(CoreError::InvalidInstallmentReference { .. }))
        ));
        assert_eq!(snapshot(&db).await, before);
    }

    #[tokio::test]
    async fn test_partial_installment_payment_then_top_up() {
        let db = test_db().await;
        let detail = seed_three_month_registration(&db).await;
        let receipt = detail.registration.receipt_no.clone();

        db.payments()
            .apply_payment(&PaymentRequest {
                registration_receipt_no: receipt.clone(),
                amount: Money::from_cents(150_000),
                method: PaymentMethod::Cash,
                notes: None,
                breakdown: Some(breakdown_for(&detail, &[1], 150_000)),
            })
            .await
            .unwrap();

        let mid = db.registrations().get_detail(&receipt).await.unwrap();
        assert_eq!(mid.installments[0].payment_status, InstallmentStatus::Partial);
        assert_eq!(mid.installments[0].paid_amount_cents, 150_000);
        assert!(mid.installments[0].payment_date.is_none());

        db.payments()
            .apply_payment(&PaymentRequest {
                registration_receipt_no: receipt.clone(),
                amount: Money::from_cents(250_000),
                method: PaymentMethod::Cash,
                notes: None,
                breakdown: Some(breakdown_for(&detail, &[1], 250_000)),
            })
            .await
            .unwrap();

        let after = db.registrations().get_detail(&receipt).await.unwrap();
        assert_eq!(after.installments[0].payment_status, InstallmentStatus::Paid);
        assert_eq!(after.installments[0].paid_amount_cents, 400_000);
        assert!(after.installments[0].payment_date.is_some());
    }

    #[tokio::test]
    async fn test_paid_installment_never_regresses() {
        let db = test_db().await;
        let detail = seed_three_month_registration(&db).await;
        let receipt = detail.registration.receipt_no.clone();

        db.payments()
            .apply_payment(&PaymentRequest {
                registration_receipt_no: receipt.clone(),
                amount: Money::from_cents(400_000),
                method: PaymentMethod::Cash,
                notes: None,
                breakdown: Some(breakdown_for(&detail, &[1], 400_000)),
            })
            .await
            .unwrap();

        let paid_on = db
            .registrations()
            .get_detail(&receipt)
            .await
            .unwrap()
            .installments[0]
            .payment_date;

        // More money onto an already-PAID installment
        db.payments()
            .apply_payment(&PaymentRequest {
                registration_receipt_no: receipt.clone(),
                amount: Money::from_cents(100_000),
                method: PaymentMethod::Cash,
                notes: None,
                breakdown: Some(breakdown_for(&detail, &[1], 100_000)),
            })
            .await
            .unwrap();

        let after = db.registrations().get_detail(&receipt).await.unwrap();
        assert_eq!(after.installments[0].payment_status, InstallmentStatus::Paid);
        assert_eq!(after.installments[0].paid_amount_cents, 500_000);
        // payment_date is stamped once and never overwritten
        assert_eq!(after.installments[0].payment_date, paid_on);
    }

    #[tokio::test]
    async fn test_breakdown_split_mappings_sum_to_amount() {
        let db = test_db().await;
        let detail = seed_three_month_registration(&db).await;
        let receipt = detail.registration.receipt_no.clone();

        // 1000.01 over three installments: 333.33 / 333.33 / 333.35
        db.payments()
            .apply_payment(&PaymentRequest {
                registration_receipt_no: receipt.clone(),
                amount: Money::from_cents(100_001),
                method: PaymentMethod::BankTransfer,
                notes: Some("quarter advance".to_string()),
                breakdown: Some(breakdown_for(&detail, &[1, 2, 3], 100_001)),
            })
            .await
            .unwrap();

        let mapped: i64 = sqlx::query_scalar(
            "SELECT COALESCE(SUM(amount_applied_cents), 0) FROM payment_installment_mapping",
        )
        .fetch_one(db.pool())
        .await
        .unwrap();
        assert_eq!(mapped, 100_001);

        let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM payment_installment_mapping")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(rows, 3);
    }

    #[tokio::test]
    async fn test_legacy_payment_updates_balance_only() {
        let db = test_db().await;
        let detail = seed_three_month_registration(&db).await;
        let receipt = detail.registration.receipt_no.clone();

        let outcome = db
            .payments()
            .apply_payment(&PaymentRequest {
                registration_receipt_no: receipt.clone(),
                amount: Money::from_cents(500_000),
                method: PaymentMethod::Card,
                notes: None,
                breakdown: None,
            })
            .await
            .unwrap();

        assert!(outcome.warnings.is_empty());

        let after = db.registrations().get_detail(&receipt).await.unwrap();
        assert_eq!(after.registration.paid_amount_cents, 500_000);
        assert_eq!(after.registration.due_amount_cents, 700_000);
        // No installment-level effects on the undifferentiated path
        assert!(after
            .installments
            .iter()
            .all(|i| i.payment_status == InstallmentStatus::Pending && i.paid_amount_cents == 0));

        let mappings: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM payment_installment_mapping")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(mappings, 0);
    }

    #[tokio::test]
    async fn test_legacy_overpayment_rejected() {
        let db = test_db().await;
        let detail = seed_three_month_registration(&db).await;
        let receipt = detail.registration.receipt_no.clone();
        let before = snapshot(&db).await;

        let err = db
            .payments()
            .apply_payment(&PaymentRequest {
                registration_receipt_no: receipt.clone(),
                amount: Money::from_cents(1_200_001),
                method: PaymentMethod::Cash,
                notes: None,
                breakdown: None,
            })
            .await;

        assert!(matches!(
            err,
            Err(LedgerError::Core(CoreError::OverpaymentRejected { .. }))
        ));
        assert_eq!(snapshot(&db).await, before);

        // Paying exactly the due amount completes the registration
        db.payments()
            .apply_payment(&PaymentRequest {
                registration_receipt_no: receipt.clone(),
                amount: Money::from_cents(1_200_000),
                method: PaymentMethod::Cash,
                notes: None,
                breakdown: None,
            })
            .await
            .unwrap();

        let after = db.registrations().get_detail(&receipt).await.unwrap();
        assert_eq!(after.registration.due_amount_cents, 0);
        assert_eq!(after.registration.payment_status, PaymentStatus::Completed);
    }

    #[tokio::test]
    async fn test_full_schedule_completes_registration() {
        let db = test_db().await;
        let detail = seed_three_month_registration(&db).await;
        let receipt = detail.registration.receipt_no.clone();

        for month in 1..=3 {
            db.payments()
                .apply_payment(&PaymentRequest {
                    registration_receipt_no: receipt.clone(),
                    amount: Money::from_cents(400_000),
                    method: PaymentMethod::Cash,
                    notes: None,
                    breakdown: Some(breakdown_for(&detail, &[month], 400_000)),
                })
                .await
                .unwrap();
        }

        let after = db.registrations().get_detail(&receipt).await.unwrap();
        assert_eq!(after.registration.paid_amount_cents, 1_200_000);
        assert_eq!(after.registration.due_amount_cents, 0);
        assert_eq!(after.registration.payment_status, PaymentStatus::Completed);
        assert!(after
            .installments
            .iter()
            .all(|i| i.payment_status == InstallmentStatus::Paid));
    }

    #[tokio::test]
    async fn test_unknown_registration_not_found() {
        let db = test_db().await;
        let err = db
            .payments()
            .apply_payment(&PaymentRequest {
                registration_receipt_no: "REG-2026-000000-none".to_string(),
                amount: Money::from_cents(100),
                method: PaymentMethod::Cash,
                notes: None,
                breakdown: None,
            })
            .await;
        assert!(matches!(err, Err(LedgerError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_non_positive_amount_rejected_before_any_io() {
        let db = test_db().await;
        for cents in [0, -100] {
            let err = db
                .payments()
                .apply_payment(&PaymentRequest {
                    registration_receipt_no: "REG-2026-000001-aaaa".to_string(),
                    amount: Money::from_cents(cents),
                    method: PaymentMethod::Cash,
                    notes: None,
                    breakdown: None,
                })
                .await;
            assert!(matches!(err, Err(LedgerError::Validation(_))));
        }
    }
}
