//! # Registration Repository
//!
//! Registration lifecycle: transactional creation (with installment
//! schedule fan-out), detail reads, and the cascading cancellation.
//!
//! ## Creation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                  Registration Transaction                               │
//! │                                                                         │
//! │  BEGIN                                                                 │
//! │    1. upsert student by phone number                                   │
//! │    2. insert registration (balance derived via ledger-core)            │
//! │    3. for each selected course:                                        │
//! │         insert course_registrations row                                │
//! │         monthly plan? → generate_schedule() → insert installments      │
//! │    4. up-front amount paid? → append 'initial' payment_history row     │
//! │  COMMIT                                                                │
//! │                                                                         │
//! │  Any failure rolls the whole thing back - a registration either        │
//! │  exists with its complete schedule or not at all. This is also what    │
//! │  makes the schedule generator at-most-once per course-registration.    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Cancellation Flow
//! Deletes in dependency order (mappings → payment history → course
//! registrations → installments → registration), then garbage-collects the
//! student record if no sibling registrations remain. Irreversible, atomic.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{LedgerError, LedgerResult};
use crate::receipts;
use ledger_core::balance;
use ledger_core::schedule::generate_schedule;
use ledger_core::validation::{
    validate_full_name, validate_installment_count, validate_non_negative_amount,
    validate_phone_number, validate_receipt_no,
};
use ledger_core::{
    Course, CourseRegistration, Money, MonthlyInstallment, PaymentMethod, PaymentPlan,
    PaymentType, Registration, Student, ValidationError,
};

// =============================================================================
// Request / Response Types
// =============================================================================

/// Student identity as supplied at registration time. Matched against an
/// existing record by phone number; identity fields overwrite on match.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewStudent {
    pub full_name: String,
    pub phone_number: String,
    pub email: Option<String>,
    pub date_of_birth: Option<chrono::NaiveDate>,
    pub address: Option<String>,
}

/// One course picked during registration, with the agreed plan and fee.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseSelection {
    pub course_id: String,
    pub payment_plan: PaymentPlan,
    pub course_fee: Money,
}

/// Everything needed to create a registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewRegistration {
    pub student: NewStudent,
    pub courses: Vec<CourseSelection>,
    pub total_amount: Money,
    pub admission_fee: Money,
    pub discount_amount: Money,
    /// Amount paid up front; zero is fine.
    pub initial_payment: Money,
    pub payment_method: PaymentMethod,
}

/// Result of a successful registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistrationCreated {
    pub registration_id: String,
    pub receipt_no: String,
}

/// Result of a cancellation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancellationOutcome {
    pub receipt_no: String,
    /// Whether the owning student record was also removed (no sibling
    /// registrations remained).
    pub deleted_student: bool,
}

/// A registration with its student, course links, and installment rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistrationDetail {
    pub registration: Registration,
    pub student: Student,
    pub courses: Vec<CourseRegistration>,
    pub installments: Vec<MonthlyInstallment>,
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for registration lifecycle operations.
#[derive(Debug, Clone)]
pub struct RegistrationRepository {
    pool: SqlitePool,
}

impl RegistrationRepository {
    /// Creates a new RegistrationRepository.
    pub fn new(pool: SqlitePool) -> Self {
        RegistrationRepository { pool }
    }

    /// Creates a registration with its complete installment schedule, in
    /// one transaction.
    ///
    /// ## Arguments
    /// * `new` - student identity, course selections, and amounts
    ///
    /// ## Returns
    /// The created registration's id and receipt number.
    ///
    /// ## Errors
    /// - `Validation` on malformed input (empty name/phone, negative
    ///   amounts, no courses)
    /// - `NotFound` when a selected course id is not in the catalog
    pub async fn create(&self, new: &NewRegistration) -> LedgerResult<RegistrationCreated> {
        validate_full_name(&new.student.full_name)?;
        validate_phone_number(&new.student.phone_number)?;
        validate_non_negative_amount(new.total_amount, "total_amount")?;
        validate_non_negative_amount(new.admission_fee, "admission_fee")?;
        validate_non_negative_amount(new.discount_amount, "discount_amount")?;
        validate_non_negative_amount(new.initial_payment, "initial_payment")?;
        if new.courses.is_empty() {
            return Err(ValidationError::Empty {
                field: "courses".to_string(),
            }
            .into());
        }

        let now = Utc::now();
        let registration_date = now.date_naive();
        let receipt_no = receipts::registration_receipt_no();
        let registration_id = Uuid::new_v4().to_string();

        let opening =
            balance::recompute(new.total_amount, new.discount_amount, new.initial_payment);

        let mut tx = self.pool.begin().await?;

        // 1. Upsert student by phone number
        let student_id: Option<String> =
            sqlx::query_scalar("SELECT id FROM students WHERE phone_number = ?1")
                .bind(&new.student.phone_number)
                .fetch_optional(&mut *tx)
                .await?;

        let student_id = match student_id {
            Some(id) => {
                sqlx::query(
                    r#"
                    UPDATE students SET
                        full_name = ?1,
                        email = ?2,
                        date_of_birth = ?3,
                        address = ?4,
                        updated_at = ?5
                    WHERE id = ?6
                    "#,
                )
                .bind(&new.student.full_name)
                .bind(&new.student.email)
                .bind(new.student.date_of_birth)
                .bind(&new.student.address)
                .bind(now)
                .bind(&id)
                .execute(&mut *tx)
                .await?;
                id
            }
            None => {
                let id = Uuid::new_v4().to_string();
                sqlx::query(
                    r#"
                    INSERT INTO students (
                        id, full_name, phone_number, email, date_of_birth, address,
                        created_at, updated_at
                    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)
                    "#,
                )
                .bind(&id)
                .bind(&new.student.full_name)
                .bind(&new.student.phone_number)
                .bind(&new.student.email)
                .bind(new.student.date_of_birth)
                .bind(&new.student.address)
                .bind(now)
                .execute(&mut *tx)
                .await?;
                id
            }
        };

        // 2. Insert the registration with its opening balance
        debug!(id = %registration_id, receipt_no = %receipt_no, "Creating registration");

        sqlx::query(
            r#"
            INSERT INTO registrations (
                id, receipt_no, student_id,
                total_amount_cents, admission_fee_cents, discount_amount_cents,
                paid_amount_cents, due_amount_cents,
                payment_method, payment_status, registration_date,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?12)
            "#,
        )
        .bind(&registration_id)
        .bind(&receipt_no)
        .bind(&student_id)
        .bind(new.total_amount.cents())
        .bind(new.admission_fee.cents())
        .bind(new.discount_amount.cents())
        .bind(opening.paid_amount.cents())
        .bind(opening.due_amount.cents())
        .bind(new.payment_method)
        .bind(opening.payment_status)
        .bind(registration_date)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        // 3. Course links + installment schedules
        for selection in &new.courses {
            let course: Option<Course> = sqlx::query_as(
                r#"
                SELECT id, name, duration, installment_count, is_active, created_at
                FROM courses
                WHERE id = ?1
                "#,
            )
            .bind(&selection.course_id)
            .fetch_optional(&mut *tx)
            .await?;

            let course = course
                .ok_or_else(|| LedgerError::not_found("Course", &selection.course_id))?;

            sqlx::query(
                r#"
                INSERT INTO course_registrations (
                    id, registration_id, course_id, payment_plan, course_fee_cents,
                    created_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                "#,
            )
            .bind(Uuid::new_v4().to_string())
            .bind(&registration_id)
            .bind(&selection.course_id)
            .bind(selection.payment_plan)
            .bind(selection.course_fee.cents())
            .bind(now)
            .execute(&mut *tx)
            .await?;

            if selection.payment_plan == PaymentPlan::Monthly {
                validate_installment_count(course.installment_count)?;

                let schedule = generate_schedule(
                    selection.course_fee,
                    course.installment_count as u32,
                    registration_date,
                )
                .map_err(LedgerError::from)?;

                for entry in schedule {
                    sqlx::query(
                        r#"
                        INSERT INTO monthly_installments (
                            id, registration_id, course_id,
                            month_number, month_name, due_date,
                            installment_amount_cents, paid_amount_cents, payment_status,
                            payment_date, created_at, updated_at
                        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 0, 'PENDING', NULL, ?8, ?8)
                        "#,
                    )
                    .bind(Uuid::new_v4().to_string())
                    .bind(&registration_id)
                    .bind(&selection.course_id)
                    .bind(entry.month_number as i64)
                    .bind(&entry.month_name)
                    .bind(entry.due_date)
                    .bind(entry.amount.cents())
                    .bind(now)
                    .execute(&mut *tx)
                    .await?;
                }
            }
        }

        // 4. Record the up-front payment in the audit trail
        if new.initial_payment.is_positive() {
            sqlx::query(
                r#"
                INSERT INTO payment_history (
                    id, registration_id, payment_amount_cents,
                    payment_method, payment_type, receipt_no, notes, created_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                "#,
            )
            .bind(Uuid::new_v4().to_string())
            .bind(&registration_id)
            .bind(new.initial_payment.cents())
            .bind(new.payment_method)
            .bind(PaymentType::Initial)
            .bind(&receipt_no)
            .bind("Initial payment during registration")
            .bind(now)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        info!(
            registration_id = %registration_id,
            receipt_no = %receipt_no,
            courses = new.courses.len(),
            "Registration created"
        );

        Ok(RegistrationCreated {
            registration_id,
            receipt_no,
        })
    }

    /// Gets a registration by receipt number.
    pub async fn get_by_receipt(&self, receipt_no: &str) -> LedgerResult<Option<Registration>> {
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
        .bind(receipt_no)
        .fetch_optional(&self.pool)
        .await?;

        Ok(registration)
    }

    /// Gets a registration with its student, course links, and installments.
    pub async fn get_detail(&self, receipt_no: &str) -> LedgerResult<RegistrationDetail> {
        let registration = self
            .get_by_receipt(receipt_no)
            .await?
            .ok_or_else(|| LedgerError::not_found("Registration", receipt_no))?;

        let student: Student = sqlx::query_as(
            r#"
            SELECT id, full_name, phone_number, email, date_of_birth, address,
                   created_at, updated_at
            FROM students
            WHERE id = ?1
            "#,
        )
        .bind(&registration.student_id)
        .fetch_one(&self.pool)
        .await?;

        let courses: Vec<CourseRegistration> = sqlx::query_as(
            r#"
            SELECT id, registration_id, course_id, payment_plan, course_fee_cents,
                   created_at
            FROM course_registrations
            WHERE registration_id = ?1
            ORDER BY created_at
            "#,
        )
        .bind(&registration.id)
        .fetch_all(&self.pool)
        .await?;

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
        .fetch_all(&self.pool)
        .await?;

        Ok(RegistrationDetail {
            registration,
            student,
            courses,
            installments,
        })
    }

    /// Cancels a registration: deletes every dependent row in dependency
    /// order, then the registration itself, then the student record if no
    /// sibling registrations remain. Irreversible; fully atomic.
    ///
    /// ## Returns
    /// Whether the student record was also removed, for caller
    /// notification purposes.
    pub async fn cancel(&self, receipt_no: &str) -> LedgerResult<CancellationOutcome> {
        validate_receipt_no(receipt_no)?;

        let mut tx = self.pool.begin().await?;

        let target: Option<(String, String)> =
            sqlx::query_as("SELECT id, student_id FROM registrations WHERE receipt_no = ?1")
                .bind(receipt_no)
                .fetch_optional(&mut *tx)
                .await?;

        let (registration_id, student_id) =
            target.ok_or_else(|| LedgerError::not_found("Registration", receipt_no))?;

        debug!(registration_id = %registration_id, receipt_no = %receipt_no, "Cancelling registration");

        // Dependency order: mappings → history → course links → installments → registration
        sqlx::query(
            r#"
            DELETE FROM payment_installment_mapping
            WHERE payment_history_id IN (
                SELECT id FROM payment_history WHERE registration_id = ?1
            )
            "#,
        )
        .bind(&registration_id)
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM payment_history WHERE registration_id = ?1")
            .bind(&registration_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM course_registrations WHERE registration_id = ?1")
            .bind(&registration_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM monthly_installments WHERE registration_id = ?1")
            .bind(&registration_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM registrations WHERE id = ?1")
            .bind(&registration_id)
            .execute(&mut *tx)
            .await?;

        // Student garbage collection: only when no sibling registrations remain
        let siblings: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM registrations WHERE student_id = ?1")
                .bind(&student_id)
                .fetch_one(&mut *tx)
                .await?;

        let deleted_student = siblings == 0;
        if deleted_student {
            sqlx::query("DELETE FROM students WHERE id = ?1")
                .bind(&student_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        info!(
            receipt_no = %receipt_no,
            deleted_student,
            "Registration cancelled"
        );

        Ok(CancellationOutcome {
            receipt_no: receipt_no.to_string(),
            deleted_student,
        })
    }

    /// Inserts a course row.
    ///
    /// The catalog proper is an external collaborator; this exists for the
    /// seed binary and tests, which need courses on the ground before a
    /// registration can reference them.
    pub async fn insert_course(&self, course: &Course) -> LedgerResult<()> {
        sqlx::query(
            r#"
            INSERT INTO courses (id, name, duration, installment_count, is_active, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&course.id)
        .bind(&course.name)
        .bind(&course.duration)
        .bind(course.installment_count)
        .bind(course.is_active)
        .bind(course.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
