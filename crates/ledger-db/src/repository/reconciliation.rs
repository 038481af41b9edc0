//! # Reconciliation Query Service
//!
//! Read-side views over the ledger: per-course installment status with
//! overdue derivation, and the payment audit trail.
//!
//! ## Overdue Is Derived, Never Stored
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  installment_status("REG-…")                                           │
//! │                                                                         │
//! │  SELECT installments + course names  (persisted PENDING/PARTIAL/PAID)  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  derive_status(row, today)   ← ledger-core, pure, re-run every read    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  PENDING + due date passed  →  effective OVERDUE, days_overdue = n     │
//! │  anything else              →  persisted status unchanged              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Both views are plain reads: no transaction, freely retryable.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{LedgerError, LedgerResult};
use ledger_core::overdue::derive_status;
use ledger_core::{EffectiveStatus, InstallmentStatus, PaymentMethod, PaymentType};

// =============================================================================
// View Types
// =============================================================================

/// One installment as a reader sees it: persisted fields plus the derived
/// effective status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstallmentStatusView {
    pub installment_id: String,
    pub month_number: i64,
    pub month_name: String,
    pub due_date: NaiveDate,
    pub installment_amount_cents: i64,
    pub paid_amount_cents: i64,
    /// The stored status - never OVERDUE.
    pub stored_status: InstallmentStatus,
    /// The display status - OVERDUE when due date passed while PENDING.
    pub effective_status: EffectiveStatus,
    /// Days past due; zero unless `effective_status` is OVERDUE.
    pub days_overdue: i64,
    pub payment_date: Option<NaiveDate>,
}

/// A registration's installments for one course, month order preserved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseInstallmentStatus {
    pub course_id: String,
    pub course_name: String,
    pub duration: Option<String>,
    pub installments: Vec<InstallmentStatusView>,
}

/// One payment-history entry with the identity context a statement needs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentRecord {
    pub payment_id: String,
    pub receipt_no: String,
    pub registration_receipt_no: String,
    pub full_name: String,
    pub phone_number: String,
    pub payment_amount_cents: i64,
    pub payment_method: PaymentMethod,
    pub payment_type: PaymentType,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Row Types (private)
// =============================================================================

/// Flat join row feeding the grouped installment view.
#[derive(Debug, sqlx::FromRow)]
struct InstallmentJoinRow {
    id: String,
    registration_id: String,
    course_id: String,
    month_number: i64,
    month_name: String,
    due_date: NaiveDate,
    installment_amount_cents: i64,
    paid_amount_cents: i64,
    payment_status: InstallmentStatus,
    payment_date: Option<NaiveDate>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    course_name: String,
    duration: Option<String>,
}

#[derive(Debug, sqlx::FromRow)]
struct PaymentJoinRow {
    id: String,
    receipt_no: String,
    registration_receipt_no: String,
    full_name: String,
    phone_number: String,
    payment_amount_cents: i64,
    payment_method: PaymentMethod,
    payment_type: PaymentType,
    notes: Option<String>,
    created_at: DateTime<Utc>,
}

// =============================================================================
// Repository
// =============================================================================

/// Read-only repository for reconciliation views.
#[derive(Debug, Clone)]
pub struct ReconciliationRepository {
    pool: SqlitePool,
}

impl ReconciliationRepository {
    /// Creates a new ReconciliationRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ReconciliationRepository { pool }
    }

    /// Per-course installment status for a registration, with OVERDUE and
    /// days-overdue derived against today's date on every call.
    ///
    /// Grouping: by course (course-name order), month order within each
    /// group.
    pub async fn installment_status(
        &self,
        receipt_no: &str,
    ) -> LedgerResult<Vec<CourseInstallmentStatus>> {
        self.installment_status_as_of(receipt_no, Utc::now().date_naive())
            .await
    }

    /// [`Self::installment_status`] against an explicit "today", so the
    /// derivation stays deterministic under test.
    pub async fn installment_status_as_of(
        &self,
        receipt_no: &str,
        today: NaiveDate,
    ) -> LedgerResult<Vec<CourseInstallmentStatus>> {
        debug!(receipt_no = %receipt_no, "Reading installment status");

        let registration_id: Option<String> =
            sqlx::query_scalar("SELECT id FROM registrations WHERE receipt_no = ?1")
                .bind(receipt_no)
                .fetch_optional(&self.pool)
                .await?;

        let registration_id =
            registration_id.ok_or_else(|| LedgerError::not_found("Registration", receipt_no))?;

        let rows: Vec<InstallmentJoinRow> = sqlx::query_as(
            r#"
            SELECT
                mi.id, mi.registration_id, mi.course_id,
                mi.month_number, mi.month_name, mi.due_date,
                mi.installment_amount_cents, mi.paid_amount_cents, mi.payment_status,
                mi.payment_date, mi.created_at, mi.updated_at,
                c.name AS course_name,
                c.duration
            FROM monthly_installments mi
            JOIN courses c ON mi.course_id = c.id
            WHERE mi.registration_id = ?1
            ORDER BY c.name, mi.course_id, mi.month_number
            "#,
        )
        .bind(&registration_id)
        .fetch_all(&self.pool)
        .await?;

        // Group by course, preserving the query's course-name ordering
        let mut courses: Vec<CourseInstallmentStatus> = Vec::new();
        for row in rows {
            let installment = row.to_installment();
            let (effective_status, days_overdue) = derive_status(&installment, today);

            let view = InstallmentStatusView {
                installment_id: installment.id,
                month_number: installment.month_number,
                month_name: installment.month_name,
                due_date: installment.due_date,
                installment_amount_cents: installment.installment_amount_cents,
                paid_amount_cents: installment.paid_amount_cents,
                stored_status: installment.payment_status,
                effective_status,
                days_overdue,
                payment_date: installment.payment_date,
            };

            match courses.last_mut() {
                Some(group) if group.course_id == row.course_id => {
                    group.installments.push(view);
                }
                _ => courses.push(CourseInstallmentStatus {
                    course_id: row.course_id,
                    course_name: row.course_name,
                    duration: row.duration,
                    installments: vec![view],
                }),
            }
        }

        Ok(courses)
    }

    /// Payment audit trail for a registration, newest first, with the
    /// student's identity attached.
    pub async fn payment_history(&self, receipt_no: &str) -> LedgerResult<Vec<PaymentRecord>> {
        debug!(receipt_no = %receipt_no, "Reading payment history");

        let exists: Option<String> =
            sqlx::query_scalar("SELECT id FROM registrations WHERE receipt_no = ?1")
                .bind(receipt_no)
                .fetch_optional(&self.pool)
                .await?;

        if exists.is_none() {
            return Err(LedgerError::not_found("Registration", receipt_no));
        }

        let rows: Vec<PaymentJoinRow> = sqlx::query_as(
            r#"
            SELECT
                ph.id, ph.receipt_no,
                r.receipt_no AS registration_receipt_no,
                s.full_name, s.phone_number,
                ph.payment_amount_cents, ph.payment_method, ph.payment_type,
                ph.notes, ph.created_at
            FROM payment_history ph
            JOIN registrations r ON ph.registration_id = r.id
            JOIN students s ON r.student_id = s.id
            WHERE r.receipt_no = ?1
            ORDER BY ph.created_at DESC, ph.receipt_no DESC
            "#,
        )
        .bind(receipt_no)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| PaymentRecord {
                payment_id: row.id,
                receipt_no: row.receipt_no,
                registration_receipt_no: row.registration_receipt_no,
                full_name: row.full_name,
                phone_number: row.phone_number,
                payment_amount_cents: row.payment_amount_cents,
                payment_method: row.payment_method,
                payment_type: row.payment_type,
                notes: row.notes,
                created_at: row.created_at,
            })
            .collect())
    }
}

impl InstallmentJoinRow {
    fn to_installment(&self) -> ledger_core::MonthlyInstallment {
        ledger_core::MonthlyInstallment {
            id: self.id.clone(),
            registration_id: self.registration_id.clone(),
            course_id: self.course_id.clone(),
            month_number: self.month_number,
            month_name: self.month_name.clone(),
            due_date: self.due_date,
            installment_amount_cents: self.installment_amount_cents,
            paid_amount_cents: self.paid_amount_cents,
            payment_status: self.payment_status,
            payment_date: self.payment_date,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use crate::repository::payment::PaymentRequest;
    use crate::repository::registration::{CourseSelection, NewRegistration, NewStudent};
    use chrono::Months;
    use ledger_core::allocation::BreakdownEntry;
    use ledger_core::{Course, Money, PaymentPlan};

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    async fn seed_two_course_registration(db: &Database) -> String {
        let repo = db.registrations();
        for (id, name, months) in [
            ("course-a", "Advanced Rust", 2i64),
            ("course-b", "Beginner Python", 3i64),
        ] {
            repo.insert_course(&Course {
                id: id.to_string(),
                name: name.to_string(),
                duration: Some(format!("{} months", months)),
                installment_count: months,
                is_active: true,
                created_at: Utc::now(),
            })
            .await
            .unwrap();
        }

        repo.create(&NewRegistration {
            student: NewStudent {
                full_name: "Ravi Kumar".to_string(),
                phone_number: "9000000001".to_string(),
                email: None,
                date_of_birth: None,
                address: None,
            },
            courses: vec![
                CourseSelection {
                    course_id: "course-a".to_string(),
                    payment_plan: PaymentPlan::Monthly,
                    course_fee: Money::from_cents(800_000),
                },
                CourseSelection {
                    course_id: "course-b".to_string(),
                    payment_plan: PaymentPlan::Monthly,
                    course_fee: Money::from_cents(600_000),
                },
            ],
            total_amount: Money::from_cents(1_400_000),
            admission_fee: Money::zero(),
            discount_amount: Money::zero(),
            initial_payment: Money::zero(),
            payment_method: ledger_core::PaymentMethod::Cash,
        })
        .await
        .unwrap()
        .receipt_no
    }

    #[tokio::test]
    async fn test_groups_by_course_in_month_order() {
        let db = test_db().await;
        let receipt = seed_two_course_registration(&db).await;

        let status = db
            .reconciliation()
            .installment_status(&receipt)
            .await
            .unwrap();

        assert_eq!(status.len(), 2);
        // Course-name ordering
        assert_eq!(status[0].course_name, "Advanced Rust");
        assert_eq!(status[1].course_name, "Beginner Python");
        assert_eq!(status[0].installments.len(), 2);
        assert_eq!(status[1].installments.len(), 3);
        for group in &status {
            let months: Vec<i64> = group.installments.iter().map(|i| i.month_number).collect();
            let mut sorted = months.clone();
            sorted.sort_unstable();
            assert_eq!(months, sorted);
        }
    }

    #[tokio::test]
    async fn test_overdue_derivation() {
        let db = test_db().await;
        let receipt = seed_two_course_registration(&db).await;

        let today = Utc::now().date_naive();

        // As of registration day, nothing is overdue (month 1 due today)
        let status = db
            .reconciliation()
            .installment_status_as_of(&receipt, today)
            .await
            .unwrap();
        assert!(status
            .iter()
            .flat_map(|g| &g.installments)
            .all(|i| i.effective_status == EffectiveStatus::Pending && i.days_overdue == 0));

        // Ten days after the second month's due date: months 1 and 2 overdue
        let later = today.checked_add_months(Months::new(1)).unwrap() + chrono::Days::new(10);
        let status = db
            .reconciliation()
            .installment_status_as_of(&receipt, later)
            .await
            .unwrap();

        let first_course = &status[0];
        assert_eq!(
            first_course.installments[0].effective_status,
            EffectiveStatus::Overdue
        );
        assert!(first_course.installments[0].days_overdue > 30);
        assert_eq!(
            first_course.installments[1].effective_status,
            EffectiveStatus::Overdue
        );
        assert_eq!(first_course.installments[1].days_overdue, 10);

        // Stored status is untouched by the derivation
        assert!(status
            .iter()
            .flat_map(|g| &g.installments)
            .all(|i| i.stored_status == InstallmentStatus::Pending));
    }

    #[tokio::test]
    async fn test_paid_installment_not_overdue() {
        let db = test_db().await;
        let receipt = seed_two_course_registration(&db).await;

        let detail = db.registrations().get_detail(&receipt).await.unwrap();
        let month1 = detail
            .installments
            .iter()
            .find(|i| i.course_id == "course-a" && i.month_number == 1)
            .unwrap();

        db.payments()
            .apply_payment(&PaymentRequest {
                registration_receipt_no: receipt.clone(),
                amount: month1.installment_amount(),
                method: ledger_core::PaymentMethod::Cash,
                notes: None,
                breakdown: Some(vec![BreakdownEntry {
                    course_id: "course-a".to_string(),
                    installment_ids: vec![month1.id.clone()],
                    amount: month1.installment_amount(),
                }]),
            })
            .await
            .unwrap();

        let far_future = Utc::now().date_naive() + chrono::Days::new(365);
        let status = db
            .reconciliation()
            .installment_status_as_of(&receipt, far_future)
            .await
            .unwrap();

        let course_a = status.iter().find(|g| g.course_id == "course-a").unwrap();
        assert_eq!(
            course_a.installments[0].effective_status,
            EffectiveStatus::Paid
        );
        assert_eq!(course_a.installments[0].days_overdue, 0);
        assert_eq!(
            course_a.installments[1].effective_status,
            EffectiveStatus::Overdue
        );
    }

    #[tokio::test]
    async fn test_payment_history_newest_first_with_identity() {
        let db = test_db().await;
        let receipt = seed_two_course_registration(&db).await;

        for cents in [100_000i64, 200_000] {
            db.payments()
                .apply_payment(&PaymentRequest {
                    registration_receipt_no: receipt.clone(),
                    amount: Money::from_cents(cents),
                    method: ledger_core::PaymentMethod::Upi,
                    notes: Some("monthly dues".to_string()),
                    breakdown: None,
                })
                .await
                .unwrap();
        }

        let history = db.reconciliation().payment_history(&receipt).await.unwrap();
        assert_eq!(history.len(), 2);
        assert!(history[0].created_at >= history[1].created_at);
        for record in &history {
            assert_eq!(record.registration_receipt_no, receipt);
            assert_eq!(record.full_name, "Ravi Kumar");
            assert_eq!(record.phone_number, "9000000001");
            assert_eq!(record.payment_type, PaymentType::Installment);
        }
    }

    #[tokio::test]
    async fn test_views_serialize_with_wire_statuses() {
        let db = test_db().await;
        let receipt = seed_two_course_registration(&db).await;

        let status = db
            .reconciliation()
            .installment_status_as_of(&receipt, Utc::now().date_naive())
            .await
            .unwrap();

        let json = serde_json::to_value(&status).unwrap();
        let first = &json[0]["installments"][0];
        assert_eq!(first["stored_status"], "PENDING");
        assert_eq!(first["effective_status"], "PENDING");
        assert_eq!(first["month_name"], "Month 1");
    }

    #[tokio::test]
    async fn test_unknown_receipt_not_found() {
        let db = test_db().await;

        let err = db.reconciliation().installment_status("REG-none").await;
        assert!(matches!(err, Err(LedgerError::NotFound { .. })));

        let err = db.reconciliation().payment_history("REG-none").await;
        assert!(matches!(err, Err(LedgerError::NotFound { .. })));
    }
}
