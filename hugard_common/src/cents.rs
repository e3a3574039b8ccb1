use std::{
    fmt::Display,
    iter::Sum,
    ops::{Add, AddAssign, Sub},
};

use serde::{Deserialize, Serialize};
use sqlx::Type;
use thiserror::Error;

pub const CURRENCY_CODE: &str = "USD";
/// The smallest charge the issuer will accept.
pub const MINIMUM_CHARGE: Cents = Cents(100);

//--------------------------------------       Cents        ---------------------------------------------------------
/// A monetary amount in hundredths of the reference currency unit.
///
/// The ledger is currency-agnostic, but in practice every amount is in US dollars, so `Cents(500)` is displayed as
/// `$5.00`.
#[derive(Debug, Clone, Copy, Default, Type, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[sqlx(transparent)]
pub struct Cents(i64);

// Arithmetic on the inner value. Overflow follows the usual i64 rules.
macro_rules! cents_op {
    ($($op_trait:ident::$op_fn:ident),+ ; $($assign_trait:ident::$assign_fn:ident),+) => {
        $(impl $op_trait for Cents {
            type Output = Cents;

            fn $op_fn(self, rhs: Cents) -> Cents {
                Cents(self.0.$op_fn(rhs.0))
            }
        })+
        $(impl $assign_trait for Cents {
            fn $assign_fn(&mut self, rhs: Cents) {
                self.0.$assign_fn(rhs.0);
            }
        })+
    };
}

cents_op!(Add::add, Sub::sub; AddAssign::add_assign);

impl Sum for Cents {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

#[derive(Debug, Clone, Error)]
#[error("Value cannot be represented in cents: {0}")]
pub struct CentsConversionError(pub String);

impl From<i64> for Cents {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl Display for Cents {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{sign}${}", self.to_decimal_string().trim_start_matches('-'))
    }
}

impl Cents {
    pub fn value(&self) -> i64 {
        self.0
    }

    /// Plain two-decimal representation, without a currency symbol, e.g. `12.35`. This is the format the payment
    /// provider expects for prices.
    pub fn to_decimal_string(&self) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        format!("{sign}{}.{:02}", abs / 100, abs % 100)
    }

    /// Divides the amount evenly into `parts`, rounding half away from zero. Returns `None` when `parts` is zero.
    pub fn checked_average(&self, parts: usize) -> Option<Self> {
        if parts == 0 {
            return None;
        }
        let parts = i64::try_from(parts).ok()?;
        let quotient = self.0 / parts;
        let remainder = self.0 % parts;
        let adjust = if remainder.abs() * 2 >= parts { self.0.signum() } else { 0 };
        Some(Self(quotient + adjust))
    }
}
