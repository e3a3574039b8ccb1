use std::{fmt::Display, str::FromStr};

use hugard_common::{Cents, CentsConversionError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Amounts with more decimal places than this are rejected outright rather than rounded.
const MAX_FRACTION_DIGITS: usize = 18;

#[derive(Debug, Clone, Error)]
#[error("'{input}' is not a valid amount. {reason}")]
pub struct AmountParseError {
    input: String,
    reason: String,
}

impl AmountParseError {
    fn new(input: &str, reason: &str) -> Self {
        Self { input: input.to_string(), reason: reason.to_string() }
    }
}

//--------------------------------------   RequestedAmount    ---------------------------------------------------------
/// An untrusted, arbitrary-precision decimal amount, exactly as the requester supplied it.
///
/// The value is held as `mantissa / 10^scale`, so no precision is lost before the issuer normalizes it. Thousands
/// separators and a leading `$` are accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawAmount")]
pub struct RequestedAmount {
    negative: bool,
    mantissa: u128,
    scale: usize,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawAmount {
    Text(String),
    Number(f64),
}

impl TryFrom<RawAmount> for RequestedAmount {
    type Error = AmountParseError;

    fn try_from(value: RawAmount) -> Result<Self, Self::Error> {
        match value {
            RawAmount::Text(s) => s.parse(),
            RawAmount::Number(n) => Self::try_from(n),
        }
    }
}

impl FromStr for RequestedAmount {
    type Err = AmountParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut text = s.trim();
        let mut negative = false;
        if let Some(rest) = text.strip_prefix('-') {
            negative = true;
            text = rest;
        } else if let Some(rest) = text.strip_prefix('+') {
            text = rest;
        }
        let text = text.strip_prefix('$').unwrap_or(text).replace(',', "");
        let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), ""));
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(AmountParseError::new(s, "No digits were found"));
        }
        let all_digits = |part: &str| part.chars().all(|c| c.is_ascii_digit());
        if !all_digits(int_part) || !all_digits(frac_part) {
            return Err(AmountParseError::new(s, "Only digits and a single decimal point are allowed"));
        }
        let frac_part = frac_part.trim_end_matches('0');
        if frac_part.len() > MAX_FRACTION_DIGITS {
            return Err(AmountParseError::new(s, "Too many decimal places"));
        }
        let mut mantissa = 0u128;
        for c in int_part.chars().chain(frac_part.chars()) {
            let digit = u128::from(c.to_digit(10).unwrap_or_default());
            mantissa = mantissa
                .checked_mul(10)
                .and_then(|m| m.checked_add(digit))
                .ok_or_else(|| AmountParseError::new(s, "The amount is too large"))?;
        }
        Ok(Self { negative, mantissa, scale: frac_part.len() })
    }
}

impl TryFrom<f64> for RequestedAmount {
    type Error = AmountParseError;

    /// Uses the shortest decimal representation that round-trips to the same float, so `1.005_f64` is treated as
    /// the decimal `1.005`.
    fn try_from(value: f64) -> Result<Self, Self::Error> {
        if !value.is_finite() {
            return Err(AmountParseError::new(&value.to_string(), "The amount must be a finite number"));
        }
        format!("{value}").parse()
    }
}

impl Display for RequestedAmount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sign = if self.negative { "-" } else { "" };
        let digits = format!("{:0>width$}", self.mantissa, width = self.scale + 1);
        let (int_part, frac_part) = digits.split_at(digits.len() - self.scale);
        if frac_part.is_empty() {
            write!(f, "{sign}{int_part}")
        } else {
            write!(f, "{sign}{int_part}.{frac_part}")
        }
    }
}

impl RequestedAmount {
    /// The absolute value rounded to whole cents, with ties rounded up (`1.005` becomes `1.01`).
    pub fn round_to_cents(&self) -> Result<Cents, CentsConversionError> {
        let cents = if self.scale <= 2 {
            self.mantissa.checked_mul(10u128.pow(2 - self.scale as u32))
        } else {
            let divisor = 10u128.pow(self.scale as u32 - 2);
            let (quotient, remainder) = (self.mantissa / divisor, self.mantissa % divisor);
            Some(if remainder * 2 >= divisor { quotient + 1 } else { quotient })
        };
        cents
            .and_then(|c| i64::try_from(c).ok())
            .map(Cents::from)
            .ok_or_else(|| CentsConversionError(format!("{self} is too large")))
    }

    /// Exact comparison of the absolute value against `threshold`, before any rounding.
    pub fn is_below(&self, threshold: Cents) -> bool {
        let threshold = u128::try_from(threshold.value()).unwrap_or_default();
        let scaled_threshold = threshold * 10u128.pow(self.scale as u32);
        self.mantissa.checked_mul(100).map_or(false, |scaled_amount| scaled_amount < scaled_threshold)
    }
}

//--------------------------------------   PayableReference   ---------------------------------------------------------
/// What a payer needs to complete a payment: the hosted payment page, which is also the payload of the scannable code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayableReference {
    pub invoice_ref: String,
    pub amount: Cents,
    pub payment_url: String,
}

impl PayableReference {
    pub fn qr_payload(&self) -> &str {
        self.payment_url.as_str()
    }
}
