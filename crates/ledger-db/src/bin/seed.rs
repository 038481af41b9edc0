//! # Seed Data Generator
//!
//! Populates the database with demo courses and a worked registration for
//! development, then walks a payment through the allocator end to end.
//!
//! ## Usage
//! ```bash
//! # Seed the default database file
//! cargo run -p ledger-db --bin seed
//!
//! # Specify database path
//! cargo run -p ledger-db --bin seed -- --db ./data/ledger.db
//! ```
//!
//! ## What Gets Created
//! - A small course catalog (monthly installment plans of varying length)
//! - One registration with a 3-month schedule
//! - An exact month-1 payment, then a skip-ahead month-3 payment so the
//!   warning path is visible in the logs

use chrono::Utc;
use std::env;
use uuid::Uuid;

use ledger_core::allocation::BreakdownEntry;
use ledger_core::{Course, Money, PaymentMethod, PaymentPlan};
use ledger_db::{
    CourseSelection, Database, DbConfig, NewRegistration, NewStudent, PaymentRequest,
};

/// Demo course catalog: (name, duration label, installment count, fee cents)
const COURSES: &[(&str, &str, i64, i64)] = &[
    ("Rust Fundamentals", "3 months", 3, 1_200_000),
    ("Systems Programming", "6 months", 6, 2_400_000),
    ("Web Development", "12 months", 12, 3_600_000),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();
    let mut db_path = String::from("./ledger_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Course Ledger Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./ledger_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Course Ledger Seed Data Generator");
    println!("====================================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM registrations")
        .fetch_one(db.pool())
        .await?;
    if existing > 0 {
        println!("⚠ Database already has {} registrations", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    // Course catalog
    let registrations = db.registrations();
    let mut course_ids = Vec::new();
    for (name, duration, installment_count, _fee) in COURSES {
        let course = Course {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            duration: Some(duration.to_string()),
            installment_count: *installment_count,
            is_active: true,
            created_at: Utc::now(),
        };
        registrations.insert_course(&course).await?;
        course_ids.push(course.id);
    }
    println!("✓ Seeded {} courses", COURSES.len());

    // One registration on the 3-month course
    let created = registrations
        .create(&NewRegistration {
            student: NewStudent {
                full_name: "Asha Verma".to_string(),
                phone_number: "9876543210".to_string(),
                email: Some("asha@example.com".to_string()),
                date_of_birth: None,
                address: Some("12 MG Road, Pune".to_string()),
            },
            courses: vec![CourseSelection {
                course_id: course_ids[0].clone(),
                payment_plan: PaymentPlan::Monthly,
                course_fee: Money::from_cents(COURSES[0].3),
            }],
            total_amount: Money::from_cents(COURSES[0].3),
            admission_fee: Money::from_cents(50_000),
            discount_amount: Money::zero(),
            initial_payment: Money::zero(),
            payment_method: PaymentMethod::Cash,
        })
        .await?;
    println!("✓ Registration created: {}", created.receipt_no);

    let detail = registrations.get_detail(&created.receipt_no).await?;
    println!(
        "  {} installments of {} each",
        detail.installments.len(),
        detail.installments[0].installment_amount()
    );

    // Month 1, paid exactly
    let payments = db.payments();
    let month1 = &detail.installments[0];
    let outcome = payments
        .apply_payment(&PaymentRequest {
            registration_receipt_no: created.receipt_no.clone(),
            amount: month1.installment_amount(),
            method: PaymentMethod::Upi,
            notes: Some("first month".to_string()),
            breakdown: Some(vec![BreakdownEntry {
                course_id: month1.course_id.clone(),
                installment_ids: vec![month1.id.clone()],
                amount: month1.installment_amount(),
            }]),
        })
        .await?;
    println!("✓ Month 1 paid: {}", outcome.payment_receipt_no);

    // Month 3 while month 2 is unpaid - exercises the skip-ahead warning
    let month3 = &detail.installments[2];
    let outcome = payments
        .apply_payment(&PaymentRequest {
            registration_receipt_no: created.receipt_no.clone(),
            amount: month3.installment_amount(),
            method: PaymentMethod::Upi,
            notes: Some("paying ahead".to_string()),
            breakdown: Some(vec![BreakdownEntry {
                course_id: month3.course_id.clone(),
                installment_ids: vec![month3.id.clone()],
                amount: month3.installment_amount(),
            }]),
        })
        .await?;
    println!("✓ Month 3 paid: {}", outcome.payment_receipt_no);
    for warning in &outcome.warnings {
        println!("  {}", warning);
    }

    // Final state
    let status = db.reconciliation().installment_status(&created.receipt_no).await?;
    println!();
    for group in &status {
        println!("{} ({:?})", group.course_name, group.duration);
        for installment in &group.installments {
            println!(
                "  {}  due {}  {:?}",
                installment.month_name, installment.due_date, installment.effective_status
            );
        }
    }

    println!();
    println!("✓ Seed complete!");

    Ok(())
}
