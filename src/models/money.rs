//! Fixed-point currency amounts
//!
//! Every amount in a ledger is a whole number of cents. Splits, balances and
//! settlement transfers are computed on the integer so a group's totals
//! always reconcile to the cent.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};
use std::str::FromStr;
use thiserror::Error;

const CENTS_PER_UNIT: i64 = 100;

/// A signed amount of money, in cents
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

/// Reasons an amount typed by a user can't be read
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoneyParseError {
    #[error("Invalid money format: {0}")]
    InvalidFormat(String),

    #[error("Amount has more than two decimal places: {0}")]
    TooPrecise(String),
}

impl Money {
    /// Smallest non-zero amount; rounding residue in splits is handed out in these
    pub const ONE_CENT: Money = Money(1);

    /// ```
    /// use tally::models::Money;
    /// assert_eq!(Money::from_cents(3334).to_string(), "$33.34");
    /// ```
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    pub const fn zero() -> Self {
        Self(0)
    }

    pub const fn cents(&self) -> i64 {
        self.0
    }

    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Owed money, when read as a balance
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Owing money, when read as a balance
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    pub const fn abs(&self) -> Self {
        Self(self.0.abs())
    }

    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }

    /// Read an amount such as "12", "12.5", "$12.50" or "-0.75"
    ///
    /// Fractions of a cent are refused; a split can't be fairer than its input.
    pub fn parse(input: &str) -> Result<Self, MoneyParseError> {
        let text = input.trim();
        let invalid = || MoneyParseError::InvalidFormat(text.to_string());

        let (sign, rest) = match text.strip_prefix('-') {
            Some(rest) => (-1, rest),
            None => (1, text),
        };
        let rest = rest.strip_prefix('$').unwrap_or(rest);
        let (whole, fraction) = rest.split_once('.').unwrap_or((rest, ""));

        let digits_only = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
        let nothing = whole.is_empty() && fraction.is_empty();
        if nothing || !digits_only(whole) || !digits_only(fraction) {
            return Err(invalid());
        }
        if fraction.len() > 2 {
            return Err(MoneyParseError::TooPrecise(text.to_string()));
        }

        let whole: i64 = match whole {
            "" => 0,
            w => w.parse().map_err(|_| invalid())?,
        };
        // "5" in "1.5" means fifty cents
        let fraction: i64 = format!("{:0<2}", fraction).parse().map_err(|_| invalid())?;

        whole
            .checked_mul(CENTS_PER_UNIT)
            .and_then(|c| c.checked_add(fraction))
            .map(|c| Self(sign * c))
            .ok_or_else(invalid)
    }

    /// Render as `-$12.05` style text with the given symbol
    pub fn format_with_symbol(&self, symbol: &str) -> String {
        let sign = if self.is_negative() { "-" } else { "" };
        let cents = self.0.unsigned_abs();
        let per_unit = CENTS_PER_UNIT.unsigned_abs();
        format!("{}{}{}.{:02}", sign, symbol, cents / per_unit, cents % per_unit)
    }

    /// Plain decimal rendering without a symbol ("-12.05"), used by exports
    pub fn to_decimal_string(&self) -> String {
        self.format_with_symbol("")
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_with_symbol("$"))
    }
}

impl FromStr for Money {
    type Err = MoneyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

macro_rules! cents_op {
    ($trait:ident, $method:ident, $assign_trait:ident, $assign_method:ident, $op:tt) => {
        impl $trait for Money {
            type Output = Money;

            fn $method(self, rhs: Money) -> Money {
                Money(self.0 $op rhs.0)
            }
        }

        impl $assign_trait for Money {
            fn $assign_method(&mut self, rhs: Money) {
                *self = *self $op rhs;
            }
        }
    };
}

cents_op!(Add, add, AddAssign, add_assign, +);
cents_op!(Sub, sub, SubAssign, sub_assign, -);

impl Neg for Money {
    type Output = Money;

    fn neg(self) -> Money {
        Money(-self.0)
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        Money(iter.map(|m| m.0).sum())
    }
}

impl<'a> std::iter::Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Money {
        iter.copied().sum()
    }
}
