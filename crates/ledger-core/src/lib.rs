//! # ledger-core: Pure Business Logic for the Course Payment Ledger
//!
//! This crate is the **heart** of the installment reconciliation engine.
//! It contains all business logic as pure functions with zero I/O
//! dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                   Course Ledger Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Caller (transport layer, out of scope)          │   │
//! │  │    apply_payment, installment_status, cancel, …                 │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ ledger-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │  ┌──────────┐ ┌──────────┐ ┌──────────┐ ┌──────────────────┐  │   │
//! │  │  │  types   │ │  money   │ │ schedule │ │    allocation    │  │   │
//! │  │  │  enums   │ │  Money   │ │ due-date │ │ sums, ownership, │  │   │
//! │  │  │  rows    │ │  splits  │ │  fan-out │ │   skip-ahead     │  │   │
//! │  │  └──────────┘ └──────────┘ └──────────┘ └──────────────────┘  │   │
//! │  │  ┌──────────┐ ┌──────────┐ ┌──────────────────────────────┐   │   │
//! │  │  │ balance  │ │ overdue  │ │         validation           │   │   │
//! │  │  └──────────┘ └──────────┘ └──────────────────────────────┘   │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO CLOCK READS • PURE FUNCTIONS       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 ledger-db (Database Layer)                      │   │
//! │  │        SQLite queries, transactions, repositories               │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Registration, MonthlyInstallment, etc.)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`schedule`] - Installment Schedule Generator
//! - [`allocation`] - Breakdown validation and allocation planning
//! - [`balance`] - Registration Balance Recalculator
//! - [`overdue`] - Read-time OVERDUE derivation
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input =
//!    same output. Even "today" is a parameter, never a clock read.
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in cents (i64) to avoid
//!    float errors; the breakdown epsilon of 0.01 becomes exactly one cent
//! 4. **Explicit Errors**: All errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use chrono::NaiveDate;
//! use ledger_core::money::Money;
//! use ledger_core::schedule::generate_schedule;
//!
//! let start = NaiveDate::from_ymd_opt(2026, 1, 15).unwrap();
//! let schedule = generate_schedule(Money::from_cents(1_200_000), 3, start).unwrap();
//!
//! assert_eq!(schedule.len(), 3);
//! assert_eq!(schedule[1].due_date, NaiveDate::from_ymd_opt(2026, 2, 15).unwrap());
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod allocation;
pub mod balance;
pub mod error;
pub mod money;
pub mod overdue;
pub mod schedule;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use ledger_core::Money` instead of
// `use ledger_core::money::Money`

pub use allocation::{AllocationPlan, BreakdownEntry, InstallmentDelta, SkipAheadWarning};
pub use balance::Balance;
pub use error::{CoreError, ValidationError};
pub use money::Money;
pub use overdue::EffectiveStatus;
pub use schedule::ScheduledInstallment;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum installment count a course may be configured with.
///
/// ## Business Reason
/// Five years of monthly dues is beyond any offered course; anything above
/// this is a data-entry mistake, not a plan.
pub const MAX_INSTALLMENT_COUNT: u32 = 60;
