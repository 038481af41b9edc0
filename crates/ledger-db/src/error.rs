//! # Ledger Error Types
//!
//! The outward error taxonomy of the reconciliation engine.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  SQLite Error (sqlx::Error)         ledger-core (CoreError)            │
//! │       │                                  │                              │
//! │       ▼                                  ▼                              │
//! │  LedgerError (this module) ← One stable classification for callers     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Caller maps to its own transport framing (out of scope here)          │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every repository operation validates before mutating; any error raised
//! inside a transaction rolls the whole transaction back, so callers never
//! observe partial ledger state alongside one of these errors.

use thiserror::Error;

use ledger_core::{CoreError, ValidationError};

/// Reconciliation engine errors.
///
/// Business-rule violations arrive wrapped from ledger-core; the rest
/// classify storage-level failures with enough context for debugging and
/// caller retry decisions.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Entity not found.
    ///
    /// ## When This Occurs
    /// - Unknown registration receipt
    /// - Unknown course id at registration time
    /// - Cancellation target already deleted
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Input validation failure (non-positive amount, malformed receipt,
    /// bad installment count, …). Raised before any statement runs.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Business rule violation from the allocation core: breakdown/amount
    /// mismatch, foreign installment references, overpayment on the
    /// undifferentiated path.
    #[error(transparent)]
    Core(CoreError),

    /// Store-detected write conflict (SQLITE_BUSY / locked). The operation
    /// was rolled back; reads may be retried freely, payment application
    /// must NOT be blindly retried (no idempotency key - duplicate payment
    /// risk).
    #[error("write conflict, operation rolled back: {0}")]
    Conflict(String),

    /// Unique constraint violation.
    #[error("duplicate {field}: '{value}' already exists")]
    UniqueViolation { field: String, value: String },

    /// Foreign key constraint violation.
    #[error("foreign key violation: {message}")]
    ForeignKeyViolation { message: String },

    /// Database connection failed.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed.
    #[error("migration failed: {0}")]
    MigrationFailed(String),

    /// Query execution failed.
    #[error("query failed: {0}")]
    QueryFailed(String),

    /// Transaction begin/commit failed.
    #[error("transaction failed: {0}")]
    TransactionFailed(String),

    /// Pool exhausted (all connections in use).
    #[error("connection pool exhausted")]
    PoolExhausted,

    /// Internal storage error.
    #[error("internal ledger error: {0}")]
    Internal(String),
}

impl LedgerError {
    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        LedgerError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }
}

/// `CoreError::Validation` flattens into `LedgerError::Validation` so the
/// caller-facing classification does not depend on which layer caught the
/// bad input first.
impl From<CoreError> for LedgerError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(v) => LedgerError::Validation(v),
            other => LedgerError::Core(other),
        }
    }
}

/// Convert sqlx errors to LedgerError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::RowNotFound    → LedgerError::NotFound
/// sqlx::Error::Database       → Analyze message for constraint/conflict
/// sqlx::Error::PoolTimedOut   → LedgerError::PoolExhausted
/// Other                       → LedgerError::Internal
/// ```
impl From<sqlx::Error> for LedgerError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => LedgerError::NotFound {
                entity: "Record".to_string(),
                id: "unknown".to_string(),
            },

            sqlx::Error::Database(db_err) => {
                let msg = db_err.message();

                // SQLite constraint/conflict messages:
                // UNIQUE constraint: "UNIQUE constraint failed: <table>.<column>"
                // FK constraint: "FOREIGN KEY constraint failed"
                // Busy/locked: "database is locked" (SQLITE_BUSY)
                if msg.contains("UNIQUE constraint failed") {
                    let field = msg
                        .split("UNIQUE constraint failed: ")
                        .nth(1)
                        .unwrap_or("unknown")
                        .to_string();
                    LedgerError::UniqueViolation {
                        field,
                        value: "unknown".to_string(),
                    }
                } else if msg.contains("FOREIGN KEY constraint failed") {
                    LedgerError::ForeignKeyViolation {
                        message: msg.to_string(),
                    }
                } else if msg.contains("database is locked") || msg.contains("database table is locked") {
                    LedgerError::Conflict(msg.to_string())
                } else {
                    LedgerError::QueryFailed(msg.to_string())
                }
            }

            sqlx::Error::PoolTimedOut => LedgerError::PoolExhausted,

            sqlx::Error::PoolClosed => LedgerError::ConnectionFailed("pool is closed".to_string()),

            _ => LedgerError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for LedgerError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        LedgerError::MigrationFailed(err.to_string())
    }
}

/// Result type for ledger operations.
pub type LedgerResult<T> = Result<T, LedgerError>;

// =============================================================================
// Unit Tests
// =============================================================================
