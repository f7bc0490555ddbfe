//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! Floating point:  0.1 + 0.2 = 0.30000000000000004
//! Integer cents:   10 + 20 = 30
//! ```
//! Discount and tax composition multiplies and divides repeatedly; keeping
//! every value in integer minor units means the only place precision can be
//! lost is an explicit rounding step, never a silent drift.
//!
//! ## Rounding Policy
//! Every percentage application (a discount amount, a tax amount) rounds to
//! the nearest cent, ties to even, *before* the result participates in the
//! next computation. This is the canonical policy for the whole engine.
//!
//! ## Usage
//! ```rust
//! use register_core::money::Money;
//!
//! // Create from cents (preferred)
//! let price = Money::from_cents(1099); // $10.99
//!
//! // Arithmetic operations
//! let doubled = price * 2;                        // $21.98
//! let total = price + Money::from_cents(500);     // $15.99
//!
//! // NEVER do this:
//! // let bad = Money::from_float(10.99); // NO SUCH METHOD EXISTS!
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};
use ts_rs::TS;

use crate::types::TaxRate;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (cents for USD).
///
/// - **i64 (signed)**: return-mode lines, refunds, and change-due balances
///   are all negative values
/// - **Single field tuple struct**: zero-cost abstraction over i64
/// - Conversion to a decimal display form happens only at the UI boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use register_core::money::Money;
    ///
    /// let price = Money::from_cents(1099); // Represents $10.99
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from major and minor units (dollars and cents).
    ///
    /// For negative amounts, only the major unit should be negative:
    /// `from_major_minor(-5, 50)` = -$5.50, not -$4.50.
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

    /// Returns the major unit (dollars) portion.
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit (cents) portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
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

    /// Returns the given fraction of this amount, in basis points, rounded
    /// to the nearest cent with ties going to the even cent.
    ///
    /// ## Bankers Rounding (Round Half to Even)
    /// ```text
    /// Standard rounding sends every 0.5 up, a systematic bias:
    ///   0.5 -> 1, 1.5 -> 2, 2.5 -> 3, 3.5 -> 4
    /// Half-to-even alternates, so the bias cancels:
    ///   0.5 -> 0, 1.5 -> 2, 2.5 -> 2, 3.5 -> 4
    /// ```
    ///
    /// The sign of the result follows the sign of the base amount, so a
    /// percentage discount on a return-mode (negative) subtotal is itself
    /// negative.
    ///
    /// ## Example
    /// ```rust
    /// use register_core::money::Money;
    ///
    /// let subtotal = Money::from_cents(3998);       // $39.98
    /// assert_eq!(subtotal.fraction_bps(1000).cents(), 400); // 10% -> $4.00
    ///
    /// // Tie case: 0.5 cents rounds to the even neighbour
    /// assert_eq!(Money::from_cents(25).fraction_bps(1000).cents(), 2);  // 2.5 -> 2
    /// assert_eq!(Money::from_cents(35).fraction_bps(1000).cents(), 4);  // 3.5 -> 4
    /// ```
    pub fn fraction_bps(&self, bps: u32) -> Money {
        // i128 intermediate prevents overflow on large amounts
        Money(div_round_half_even(self.0 as i128 * bps as i128, 10_000))
    }

    /// Calculates tax on this amount at the given rate.
    ///
    /// ## Example
    /// ```rust
    /// use register_core::money::Money;
    /// use register_core::types::TaxRate;
    ///
    /// let base = Money::from_cents(3598);  // $35.98
    /// let rate = TaxRate::from_bps(800);   // 8%
    ///
    /// // $35.98 x 8% = $2.8784 -> $2.88
    /// assert_eq!(base.calculate_tax(rate).cents(), 288);
    /// ```
    #[inline]
    pub fn calculate_tax(&self, rate: TaxRate) -> Money {
        self.fraction_bps(rate.bps())
    }

    /// Multiplies money by a quantity.
    ///
    /// Quantity is signed: return-mode lines carry negative quantities and
    /// produce negative line totals.
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

/// Divides with round-half-to-even, correct for negative numerators.
///
/// `denominator` must be positive.
fn div_round_half_even(numerator: i128, denominator: i128) -> i64 {
    let quotient = numerator / denominator;
    let remainder = numerator % denominator;
    let twice = remainder.abs() * 2;
    let bump = twice > denominator || (twice == denominator && quotient.abs() % 2 == 1);
    let rounded = if !bump {
        quotient
    } else if numerator < 0 {
        quotient - 1
    } else {
        quotient + 1
    };
    rounded as i64
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Human-readable format for debugging and receipts.
///
/// Frontend formatting owns actual UI display to handle localization.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}${}.{:02}",
            sign,
            self.dollars().abs(),
            self.cents_part()
        )
    }
}

/// Default money is zero.
impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Neg for Money {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Money(-self.0)
    }
}

/// Multiplication by integer (for quantity calculations).
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
