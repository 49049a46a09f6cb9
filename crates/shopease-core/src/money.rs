//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  With floating point prices:                                            │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  A day of sales summed as floats drifts by fractions of a paisa,       │
//! │  and profit = total - cost stops being exact.                          │
//! │                                                                         │
//! │  OUR SOLUTION: Integer minor units (paisa)                             │
//! │    Rs 12.50 is stored as 1250, and every sum is exact                  │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use shopease_core::money::Money;
//!
//! // Create from minor units (preferred)
//! let price = Money::from_minor(1250); // Rs 12.50
//!
//! // Operator input is parsed exactly, no float step
//! let typed: Money = "12.50".parse().unwrap();
//! assert_eq!(typed, price);
//!
//! // Arithmetic operations
//! let doubled = price * 2;                        // Rs 25.00
//! let total = price + Money::from_minor(500);     // Rs 17.50
//! # let _ = (doubled, total);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;

/// Minor units per major unit (100 paisa to the rupee).
pub const MINOR_PER_MAJOR: i64 = 100;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit.
///
/// Serializes as a bare JSON integer, so the persisted document stores
/// `"sell_price": 1250` for Rs 12.50.
///
/// ## Where Money is Used
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Product.sell_price ──► CartLine.price ──► CartLine.line_total          │
/// │  Product.cost_price ──► CartLine.cost  ──► CartLine.line_cost           │
/// │                                                                         │
/// │  Cart.total - Cart.cost ──► Sale.profit ──► FinanceStats.gross_profit  │
/// │                                                                         │
/// │  Employee.salary ──► FinanceStats.total_salaries ──► net_profit        │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from minor units.
    ///
    /// ## Example
    /// ```rust
    /// use shopease_core::money::Money;
    ///
    /// let price = Money::from_minor(1099);
    /// assert_eq!(price.minor_units(), 1099);
    /// ```
    #[inline]
    pub const fn from_minor(minor: i64) -> Self {
        Money(minor)
    }

    /// Creates a Money value from major and minor units.
    ///
    /// For negative amounts only the major unit carries the sign:
    /// `from_major_minor(-5, 50)` is -5.50, not -4.50.
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * MINOR_PER_MAJOR - minor)
        } else {
            Money(major * MINOR_PER_MAJOR + minor)
        }
    }

    /// Returns the value in minor units.
    #[inline]
    pub const fn minor_units(&self) -> i64 {
        self.0
    }

    /// Returns the major unit portion.
    ///
    /// ## Example
    /// ```rust
    /// use shopease_core::money::Money;
    ///
    /// assert_eq!(Money::from_minor(1099).major(), 10);
    /// assert_eq!(Money::from_minor(-550).major(), -5);
    /// ```
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / MINOR_PER_MAJOR
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn minor_part(&self) -> i64 {
        (self.0 % MINOR_PER_MAJOR).abs()
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

    /// Multiplies money by a quantity.
    ///
    /// ## Example
    /// ```rust
    /// use shopease_core::money::Money;
    ///
    /// let unit_price = Money::from_minor(800); // 8.00
    /// let line_total = unit_price.multiply_quantity(3);
    /// assert_eq!(line_total.minor_units(), 2400); // 24.00
    /// ```
    ///
    /// ## User Workflow
    /// ```text
    /// Product: Black T-Shirt 8.00
    /// Quantity: 3
    ///      │
    ///      ▼
    /// multiply_quantity(3) ← THIS FUNCTION
    ///      │
    ///      ▼
    /// Line Total: 24.00
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0.saturating_mul(qty))
    }

    /// `self × qty`, or `None` if the result does not fit in an i64.
    #[inline]
    pub const fn checked_mul_quantity(&self, qty: i64) -> Option<Self> {
        match self.0.checked_mul(qty) {
            Some(minor) => Some(Money(minor)),
            None => None,
        }
    }

    #[inline]
    pub const fn checked_add(&self, other: Money) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(minor) => Some(Money(minor)),
            None => None,
        }
    }

    #[inline]
    pub const fn checked_sub(&self, other: Money) -> Option<Self> {
        match self.0.checked_sub(other.0) {
            Some(minor) => Some(Money(minor)),
            None => None,
        }
    }
}

// =============================================================================
// Parsing
// =============================================================================

/// Parses a decimal amount such as `"12.50"`, `"12.5"`, `"12"` or `"-3.25"`.
///
/// Digits are accumulated as integers, so the value is exact. More than two
/// fractional digits is rejected rather than rounded.
impl FromStr for Money {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| ValidationError::InvalidFormat {
            field: "amount".to_string(),
            reason: reason.to_string(),
        };

        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Required {
                field: "amount".to_string(),
            });
        }

        let (negative, digits) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed),
        };

        let (major_str, minor_str) = match digits.split_once('.') {
            Some((major, minor)) => (major, minor),
            None => (digits, ""),
        };

        if major_str.is_empty() && minor_str.is_empty() {
            return Err(invalid("no digits"));
        }
        if !major_str.chars().all(|c| c.is_ascii_digit())
            || !minor_str.chars().all(|c| c.is_ascii_digit())
        {
            return Err(invalid("only digits and one decimal point are allowed"));
        }
        if minor_str.len() > 2 {
            return Err(invalid("at most two decimal places"));
        }

        let major: i64 = if major_str.is_empty() {
            0
        } else {
            major_str.parse().map_err(|_| invalid("amount too large"))?
        };
        let minor: i64 = match minor_str.len() {
            0 => 0,
            1 => minor_str.parse::<i64>().map_err(|_| invalid("bad fraction"))? * 10,
            _ => minor_str.parse().map_err(|_| invalid("bad fraction"))?,
        };

        let total = major
            .checked_mul(MINOR_PER_MAJOR)
            .and_then(|m| m.checked_add(minor))
            .ok_or_else(|| invalid("amount too large"))?;

        Ok(Money(if negative { -total } else { total }))
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================
//
// The operators saturate at the i64 bounds. Report totals use them; cart
// and stock paths that must reject overflow use the checked_* methods.

/// Plain decimal rendering without a currency symbol.
///
/// The CLI adds the configured symbol via `format_currency`.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.major().abs(), self.minor_part())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
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

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_sub(other.0);
    }
}

/// Multiplication by quantity.
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        self.multiply_quantity(qty)
    }
}

/// Summing an iterator of Money (report totals).
impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
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
