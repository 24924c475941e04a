//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  Shipping on 0.4 kg × 3 at 10/kg in floating point:                     │
//! │    0.4 * 3 * 10 = 12.000000000000002  ❌ WRONG!                         │
//! │                                                                         │
//! │  OUR SOLUTION: Integer minor units + integer grams                      │
//! │    400 g × 3 × 1000 minor/kg / 1000 = 1200 minor units (12.00)         │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use mercato_core::money::Money;
//!
//! let price = Money::from_major(90);        // 90.00
//! let line = price.multiply_quantity(2);    // Some(180.00)
//! let total = line.and_then(|l| l.checked_add(Money::from_cents(800)));
//! assert_eq!(total, Some(Money::from_cents(18_800)));
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (cents, piasters, ...).
///
/// Single-currency by construction: there is no currency tag, the
/// application decides how to label amounts when rendering them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from minor units.
    ///
    /// ## Example
    /// ```rust
    /// use mercato_core::money::Money;
    ///
    /// let price = Money::from_cents(2999); // 29.99
    /// assert_eq!(price.cents(), 2999);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from whole major units.
    ///
    /// ## Example
    /// ```rust
    /// use mercato_core::money::Money;
    ///
    /// assert_eq!(Money::from_major(90).cents(), 9000);
    /// ```
    #[inline]
    pub const fn from_major(major: i64) -> Self {
        Money(major * 100)
    }

    /// Creates a Money value from major and minor units.
    ///
    /// For negative amounts only the major unit carries the sign:
    /// `from_major_minor(-5, 50)` is -5.50.
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * 100 - minor)
        } else {
            Money(major * 100 + minor)
        }
    }

    /// Returns the value in minor units.
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
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies money by a quantity, or `None` if the product does not
    /// fit in an `i64`.
    ///
    /// ## Example
    /// ```rust
    /// use mercato_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(2999);
    /// assert_eq!(unit_price.multiply_quantity(2), Some(Money::from_cents(5998)));
    /// assert_eq!(unit_price.multiply_quantity(i64::MAX), None);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Option<Self> {
        match self.0.checked_mul(qty) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    /// Addition that returns `None` on overflow.
    #[inline]
    pub const fn checked_add(self, other: Money) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    /// Sums `amounts`, or `None` as soon as the running total overflows.
    pub fn checked_sum<I>(amounts: I) -> Option<Self>
    where
        I: IntoIterator<Item = Money>,
    {
        amounts.into_iter().try_fold(Money::zero(), Money::checked_add)
    }

    /// Subtraction that refuses to go below zero.
    ///
    /// Returns `None` when `other` is negative or larger than `self`; used
    /// for balance debits where either would break the balance invariant.
    #[inline]
    pub const fn checked_sub_non_negative(&self, other: Money) -> Option<Money> {
        if other.0 < 0 || other.0 > self.0 {
            None
        } else {
            Some(Money(self.0 - other.0))
        }
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Plain decimal rendering (`188.00`, `-5.50`).
///
/// Currency labels are the application's business.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.major().abs(), self.cents_part())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(2999);
        assert_eq!(money.cents(), 2999);
        assert_eq!(money.major(), 29);
        assert_eq!(money.cents_part(), 99);
    }

    #[test]
    fn test_from_major_minor() {
        assert_eq!(Money::from_major_minor(10, 99).cents(), 1099);
        assert_eq!(Money::from_major_minor(-5, 50).cents(), -550);
        assert_eq!(Money::from_major(400).cents(), 40_000);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(18_800).to_string(), "188.00");
        assert_eq!(Money::from_cents(500).to_string(), "5.00");
        assert_eq!(Money::from_cents(-550).to_string(), "-5.50");
        assert_eq!(Money::zero().to_string(), "0.00");
    }

    #[test]
    fn test_checked_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!(a.checked_add(b), Some(Money::from_cents(1500)));
        assert_eq!(a.multiply_quantity(3), Some(Money::from_cents(3000)));
        assert_eq!(Money::from_cents(i64::MAX).checked_add(Money::from_cents(1)), None);
        assert_eq!(Money::from_cents(2499).multiply_quantity(i64::MAX / 1000), None);
    }

    #[test]
    fn test_checked_sum() {
        let total = Money::checked_sum([100, 250, 50].into_iter().map(Money::from_cents));
        assert_eq!(total, Some(Money::from_cents(400)));
        assert_eq!(Money::checked_sum(Vec::<Money>::new()), Some(Money::zero()));

        let huge = [Money::from_cents(i64::MAX), Money::from_cents(1)];
        assert_eq!(Money::checked_sum(huge), None);
    }

    #[test]
    fn test_checked_sub_non_negative() {
        let balance = Money::from_major(100);
        assert_eq!(
            balance.checked_sub_non_negative(Money::from_major(40)),
            Some(Money::from_major(60))
        );
        assert_eq!(
            balance.checked_sub_non_negative(Money::from_major(100)),
            Some(Money::zero())
        );
        assert_eq!(balance.checked_sub_non_negative(Money::from_major(300)), None);
        assert_eq!(balance.checked_sub_non_negative(Money::from_cents(-1)), None);
    }

    #[test]
    fn test_zero_and_checks() {
        let zero = Money::zero();
        assert!(zero.is_zero());
        assert!(!zero.is_negative());
        assert!(Money::from_cents(-100).is_negative());
    }
}
