//! # Receipt Number Generation
//!
//! Business receipt identifiers for registrations and payment events.
//!
//! ## Format
//! ```text
//! REG-2026-000017-a3f9      PMT-202608-000018-b2c4
//! │    │    │      │         │   │      │      │
//! │    │    │      └ random  │   │      │      └ random suffix
//! │    │    └ sequence       │   │      └ sequence
//! │    └ year                │   └ year + zero-padded month
//! └ prefix                   └ prefix
//! ```
//!
//! ## Uniqueness
//! The low-order fragment is a process-wide monotonic counter plus a
//! UUID-derived random suffix. Two concurrent requests can never mint the
//! same counter value, and the suffix keeps identifiers unique across
//! process restarts - unlike a sub-second timestamp fragment, which
//! collides under concurrent load. The UNIQUE index on the receipt columns
//! remains the final arbiter either way.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use uuid::Uuid;

/// Process-wide receipt sequence. Shared by both receipt kinds; gaps are
/// fine, reuse is not.
static RECEIPT_SEQ: AtomicU64 = AtomicU64::new(1);

/// Generates a registration receipt number: `REG-<year>-<seq>-<suffix>`.
pub fn registration_receipt_no() -> String {
    let now = Utc::now();
    format!(
        "REG-{}-{:06}-{}",
        now.format("%Y"),
        next_seq(),
        random_suffix()
    )
}

/// Generates a payment receipt number: `PMT-<year><month>-<seq>-<suffix>`.
pub fn payment_receipt_no() -> String {
    let now = Utc::now();
    format!(
        "PMT-{}-{:06}-{}",
        now.format("%Y%m"),
        next_seq(),
        random_suffix()
    )
}

fn next_seq() -> u64 {
    RECEIPT_SEQ.fetch_add(1, Ordering::Relaxed) % 1_000_000
}

fn random_suffix() -> String {
    Uuid::new_v4().simple().to_string()[..4].to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_registration_receipt_shape() {
        let receipt = registration_receipt_no();
        let parts: Vec<&str> = receipt.split('-').collect();

        assert_eq!(parts.len(), 4);
        assert_eq!(parts[0], "REG");
        assert_eq!(parts[1].len(), 4); // year
        assert_eq!(parts[2].len(), 6); // zero-padded sequence
        assert_eq!(parts[3].len(), 4); // random suffix
    }

    #[test]
    fn test_payment_receipt_shape() {
        let receipt = payment_receipt_no();
        let parts: Vec<&str> = receipt.split('-').collect();

        assert_eq!(parts.len(), 4);
        assert_eq!(parts[0], "PMT");
        assert_eq!(parts[1].len(), 6); // YYYYMM
        assert_eq!(parts[2].len(), 6);
        assert_eq!(parts[3].len(), 4);
    }

    #[test]
    fn test_receipts_are_unique_in_a_burst() {
        let receipts: HashSet<String> = (0..1000).map(|_| payment_receipt_no()).collect();
        assert_eq!(receipts.len(), 1000);
    }
}
