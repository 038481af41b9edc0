//! # Repository Module
//!
//! Database repository implementations for the course payment ledger.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern Explained                         │
//! │                                                                         │
//! │  The Repository pattern abstracts database access behind a clean API.  │
//! │                                                                         │
//! │  Caller                                                                │
//! │       │                                                                 │
//! │       │  db.payments().apply_payment(request)                          │
//! │       │  ↓                                                              │
//! │       ▼                                                                 │
//! │  PaymentRepository                                                     │
//! │  └── apply_payment(&self, request)                                     │
//! │       │                                                                 │
//! │       │  BEGIN … validate … UPDATE/INSERT … COMMIT                     │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! │                                                                         │
//! │  Benefits:                                                              │
//! │  • Transaction boundaries live in exactly one place                    │
//! │  • SQL is isolated per aggregate                                       │
//! │  • Pure rules (ledger-core) stay testable without a database           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`registration::RegistrationRepository`] - Registration lifecycle:
//!   transactional create with schedule fan-out, detail reads, cascading
//!   cancellation
//! - [`payment::PaymentRepository`] - The Payment Allocator
//! - [`reconciliation::ReconciliationRepository`] - Read-only status and
//!   history views

pub mod payment;
pub mod reconciliation;
pub mod registration;
