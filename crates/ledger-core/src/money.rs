//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  In an installment ledger:                                              │
//! │    12000.00 / 12 months = fine, but 10000.00 / 3 = 3333.33…            │
//! │    Summing twelve float installments drifts off the course fee         │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    1000000 cents / 3 = 333333 cents (×3 = 999999 cents)                │
//! │    We KNOW we lost 1 cent, and handle it explicitly                    │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use ledger_core::money::Money;
//!
//! // Create from cents (preferred)
//! let fee = Money::from_cents(1_200_000); // 12000.00
//!
//! // Equal division across installments (remainder dropped)
//! let per_month = fee.split_evenly(3);
//! assert_eq!(per_month.cents(), 400_000);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Sub, SubAssign};

/// Tolerance for comparing a caller-supplied breakdown total against the
/// stated payment amount: 0.01 currency units, i.e. one cent.
pub const EPSILON_CENTS: i64 = 1;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in the smallest currency unit (cents).
///
/// ## Design Decisions
/// - **i64 (signed)**: Allows negative deltas when computing differences
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Derives**: Full serde support for JSON serialization
///
/// ## Where Money Flows
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Course.fee ──► ScheduleGenerator ──► MonthlyInstallment.amount        │
/// │                                                                         │
/// │  PaymentRequest.amount ──► Allocator ──► per-installment deltas        │
/// │                                     └──► Registration.paid / .due      │
/// │                                                                         │
/// │  EVERY monetary value in the system flows through this type            │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use ledger_core::money::Money;
    ///
    /// let amount = Money::from_cents(400_000); // 4000.00
    /// assert_eq!(amount.cents(), 400_000);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from major and minor units.
    ///
    /// ## Example
    /// ```rust
    /// use ledger_core::money::Money;
    ///
    /// let amount = Money::from_major_minor(4000, 50); // 4000.50
    /// assert_eq!(amount.cents(), 400_050);
    /// ```
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * 100 - minor)
        } else {
            Money(major * 100 + minor)
        }
    }

    /// Returns the value in cents (smallest currency unit).
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit portion.
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn minor(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns the absolute value.
    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Returns the larger of `self` and `other`.
    #[inline]
    pub const fn max(self, other: Self) -> Self {
        if self.0 >= other.0 {
            self
        } else {
            other
        }
    }

    /// Clamps a possibly-negative value at zero.
    ///
    /// Used for due-amount arithmetic: a registration can never owe a
    /// negative amount, so `due = max(0, total - discount - paid)`.
    #[inline]
    pub const fn clamp_non_negative(self) -> Self {
        if self.0 < 0 {
            Money(0)
        } else {
            self
        }
    }

    /// Checks whether `self` and `other` differ by at most [`EPSILON_CENTS`].
    ///
    /// ## Example
    /// ```rust
    /// use ledger_core::money::Money;
    ///
    /// let stated = Money::from_cents(400_000);
    /// let summed = Money::from_cents(400_001);
    /// assert!(stated.matches_within_epsilon(summed));
    /// assert!(!stated.matches_within_epsilon(Money::from_cents(400_002)));
    /// ```
    #[inline]
    pub const fn matches_within_epsilon(&self, other: Money) -> bool {
        (self.0 - other.0).abs() <= EPSILON_CENTS
    }

    /// Divides evenly across `parts`, discarding the remainder.
    ///
    /// ## Precision Loss Is Intentional
    /// `10000.00 / 3 = 3333.33` per part; the leftover cent is NOT
    /// redistributed. Schedule generation uses this deliberately: the final
    /// installment is not specially adjusted. Where exactness is required
    /// (mapping rows that must sum to a payment), use [`Money::split_exact`].
    ///
    /// ## Panics
    /// Debug-asserts that `parts > 0`; callers validate installment counts
    /// before division.
    #[inline]
    pub const fn split_evenly(&self, parts: u32) -> Self {
        debug_assert!(parts > 0);
        Money(self.0 / parts as i64)
    }

    /// Splits into `parts` shares that sum EXACTLY to `self`.
    ///
    /// Each share is the even division; the integer-division remainder is
    /// added to the final share.
    ///
    /// ## Example
    /// ```rust
    /// use ledger_core::money::Money;
    ///
    /// let shares = Money::from_cents(100).split_exact(3);
    /// assert_eq!(shares, vec![
    ///     Money::from_cents(33),
    ///     Money::from_cents(33),
    ///     Money::from_cents(34),
    /// ]);
    /// ```
    pub fn split_exact(&self, parts: u32) -> Vec<Money> {
        debug_assert!(parts > 0);
        let parts = parts as i64;
        let base = self.0 / parts;
        let remainder = self.0 - base * parts;

        let mut shares = vec![Money(base); parts as usize];
        if let Some(last) = shares.last_mut() {
            *last = Money(base + remainder);
        }
        shares
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display implementation shows money in a human-readable format.
///
/// ## Note
/// This is for logs and error messages. Receipt formatting belongs to the
/// (out of scope) presentation layer.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.major().abs(), self.minor())
    }
}

/// Default money is zero.
impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

/// Addition of two Money values.
impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

/// Addition assignment (+=).
impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

/// Subtraction of two Money values.
impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

/// Subtraction assignment (-=).
impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

/// Summing an iterator of Money values.
impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
