//! # ledger-db: Database Layer for the Course Payment Ledger
//!
//! This crate provides database access for the installment reconciliation
//! engine. It uses SQLite for storage with sqlx for async operations, and
//! owns every transaction boundary in the system.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Course Ledger Data Flow                             │
//! │                                                                         │
//! │  Caller (apply_payment / installment_status / cancel)                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     ledger-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌────────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories  │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │                │    │  (embedded)  │  │   │
//! │  │   │               │    │ Registration   │    │              │  │   │
//! │  │   │ SqlitePool    │◄───│ Payment        │    │ 001_init.sql │  │   │
//! │  │   │ WAL + FKs     │    │ Reconciliation │    │              │  │   │
//! │  │   └───────────────┘    └────────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  │   Pure rules come from ledger-core; this crate adds storage,    │   │
//! │  │   transactions, and atomic increment statements.                │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite Database (ledger.db)                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - The outward error taxonomy
//! - [`receipts`] - Receipt number generation
//! - [`repository`] - Repository implementations
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ledger_db::{Database, DbConfig};
//!
//! // Create database with default config (runs migrations)
//! let db = Database::new(DbConfig::new("path/to/ledger.db")).await?;
//!
//! // Apply a payment
//! let outcome = db.payments().apply_payment(request).await?;
//! for warning in &outcome.warnings {
//!     println!("{warning}");
//! }
//!
//! // Read-side views
//! let status = db.reconciliation().installment_status(&receipt).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod receipts;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{LedgerError, LedgerResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::payment::{PaymentOutcome, PaymentRepository, PaymentRequest};
pub use repository::reconciliation::{
    CourseInstallmentStatus, InstallmentStatusView, PaymentRecord, ReconciliationRepository,
};
pub use repository::registration::{
    CancellationOutcome, CourseSelection, NewRegistration, NewStudent, RegistrationCreated,
    RegistrationDetail, RegistrationRepository,
};
