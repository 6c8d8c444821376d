//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  PRICES ARRIVE AS WHOLE CURRENCY UNITS                                  │
//! │                                                                         │
//! │  The backend stores Rp25.000 as 25000, never as 25000.0 or 250.00      │
//! │                                                                         │
//! │  Tax at 10% on Rp55.000 = 5500   exact                                  │
//! │  Tax at 10% on Rp5     = 0.5    → must be ROUNDED to a whole unit      │
//! │                                                                         │
//! │  Every amount in the cart is an i64 count of the smallest unit.        │
//! │  The only fractional step is tax, and it is rounded exactly once.      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use kasir_core::money::Money;
//!
//! let price = Money::from_minor(25000);
//! let line = price.multiply_quantity(2);
//! assert_eq!(line.minor(), 50000);
//! assert_eq!((line + Money::from_minor(500)).minor(), 50500);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub};
use ts_rs::TS;

use crate::types::TaxRate;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit.
///
/// ## Where Money is Used
/// ```text
/// Product.price ──► CartLine.unit_price ──► CartLine::line_total()
///                                                  │
///                                                  ▼
///               OrderSummary { subtotal ──► tax ──► total }
///                                                  │
///                                                  ▼
///                          Settlement { tendered, change }
/// ```
///
/// Arithmetic saturates at the `i64` bounds instead of wrapping.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, TS,
)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from the smallest currency unit.
    ///
    /// ```rust
    /// use kasir_core::money::Money;
    ///
    /// let price = Money::from_minor(15000);
    /// assert_eq!(price.minor(), 15000);
    /// ```
    #[inline]
    pub const fn from_minor(amount: i64) -> Self {
        Money(amount)
    }

    /// Returns the value in the smallest currency unit.
    #[inline]
    pub const fn minor(&self) -> i64 {
        self.0
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

    /// Calculates tax on this amount, rounding half up to a whole unit.
    ///
    /// ## Rounding
    /// ```text
    /// ┌─────────────────────────────────────────────────────────────────────┐
    /// │  ROUND HALF UP                                                      │
    /// │                                                                     │
    /// │  subtotal × bps / 10000, then:                                      │
    /// │    0.4 → 0     0.5 → 1     1.5 → 2     2.5 → 3                      │
    /// │                                                                     │
    /// │  Integer form: (subtotal × bps + 5000) / 10000                      │
    /// │  Done in i128 so subtotal × bps cannot overflow.                    │
    /// └─────────────────────────────────────────────────────────────────────┘
    /// ```
    ///
    /// Amounts in the cart are never negative. For a negative amount the
    /// rounding is applied to the magnitude, so tax stays symmetric.
    ///
    /// ```rust
    /// use kasir_core::money::Money;
    /// use kasir_core::types::TaxRate;
    ///
    /// let rate = TaxRate::from_bps(1000); // 10%
    /// assert_eq!(Money::from_minor(55000).calculate_tax(rate).minor(), 5500);
    /// assert_eq!(Money::from_minor(5).calculate_tax(rate).minor(), 1);
    /// assert_eq!(Money::from_minor(4).calculate_tax(rate).minor(), 0);
    /// ```
    pub fn calculate_tax(&self, rate: TaxRate) -> Money {
        let magnitude = (self.0 as i128).abs();
        let tax = (magnitude * rate.bps() as i128 + 5000) / 10000;
        let tax = if self.0 < 0 { -tax } else { tax };
        Money(clamp_i128(tax))
    }

    /// Multiplies money by a quantity, saturating at the `i64` bounds.
    ///
    /// ```rust
    /// use kasir_core::money::Money;
    ///
    /// let unit_price = Money::from_minor(10000);
    /// assert_eq!(unit_price.multiply_quantity(3).minor(), 30000);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0.saturating_mul(qty))
    }

    /// Returns `self - due`, or `None` when `due` is larger.
    ///
    /// Used for change: `tendered.checked_change(total)`.
    pub fn checked_change(&self, due: Money) -> Option<Money> {
        if self.0 < due.0 {
            None
        } else {
            Some(Money(self.0.saturating_sub(due.0)))
        }
    }
}

fn clamp_i128(value: i128) -> i64 {
    value.clamp(i64::MIN as i128, i64::MAX as i128) as i64
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Plain integer amount. Symbols and grouping belong to the caller's locale.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0.saturating_sub(other.0))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
