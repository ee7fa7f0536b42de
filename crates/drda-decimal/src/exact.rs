//! Arbitrary-precision decimal values.
//!
//! `rust_decimal::Decimal` tops out at 28 digits, while DRDA packed decimals
//! go up to 31, so decoded values are held as an unscaled `BigInt` plus a
//! scale. Conversions to and from `Decimal` are provided for callers that
//! stay within its range.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use num_bigint::{BigInt, Sign};
use num_traits::{Signed, ToPrimitive, Zero};
use rust_decimal::Decimal;

use crate::error::DecimalError;
use crate::Result;

/// `10^exp` as a `BigInt`.
fn pow10(exp: u32) -> BigInt {
    BigInt::from(10u32).pow(exp)
}

/// A signed decimal `unscaled × 10^-scale`.
///
/// Equality and ordering compare numeric values, so `1.5 == 1.50`.
#[derive(Debug, Clone)]
pub struct ExactDecimal {
    unscaled: BigInt,
    scale: u32,
}

impl ExactDecimal {
    /// Create a value from its unscaled integer and scale.
    pub fn new(unscaled: BigInt, scale: u32) -> Self {
        Self { unscaled, scale }
    }

    /// Create a value from an `i64` unscaled integer.
    pub fn from_i64(unscaled: i64, scale: u32) -> Self {
        Self::new(BigInt::from(unscaled), scale)
    }

    /// The unscaled integer.
    pub fn unscaled(&self) -> &BigInt {
        &self.unscaled
    }

    /// Number of fractional digits.
    pub fn scale(&self) -> u32 {
        self.scale
    }

    /// True if the value is strictly below zero.
    pub fn is_negative(&self) -> bool {
        self.unscaled.sign() == Sign::Minus
    }

    /// True if the value is zero at any scale.
    pub fn is_zero(&self) -> bool {
        self.unscaled.is_zero()
    }

    /// Decimal digits of the unscaled magnitude. Zero has one digit.
    pub fn precision(&self) -> usize {
        self.unscaled.magnitude().to_string().len()
    }

    /// Digits left of the decimal point; zero or negative for pure fractions.
    pub fn whole_digits(&self) -> i64 {
        self.precision() as i64 - i64::from(self.scale)
    }

    /// Absolute value at the same scale.
    pub fn abs(&self) -> Self {
        Self::new(self.unscaled.abs(), self.scale)
    }

    /// Integer part, truncated toward zero.
    pub fn trunc(&self) -> BigInt {
        if self.scale == 0 {
            return self.unscaled.clone();
        }
        if self.whole_digits() <= 0 {
            return BigInt::zero();
        }
        &self.unscaled / pow10(self.scale)
    }

    /// Nearest `f64`, correctly rounded.
    pub fn to_f64(&self) -> f64 {
        // Display output is always a valid float literal.
        self.to_string().parse().unwrap_or(f64::NAN)
    }

    fn rescaled(&self, scale: u32) -> BigInt {
        debug_assert!(scale >= self.scale);
        if scale == self.scale {
            self.unscaled.clone()
        } else {
            &self.unscaled * pow10(scale - self.scale)
        }
    }
}

impl fmt::Display for ExactDecimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.unscaled.magnitude().to_string();
        if self.is_negative() {
            f.write_str("-")?;
        }
        if self.scale == 0 {
            return f.write_str(&digits);
        }
        let scale = self.scale as usize;
        let padded = format!("{:0>width$}", digits, width = scale + 1);
        let (int_part, frac_part) = padded.split_at(padded.len() - scale);
        write!(f, "{}.{}", int_part, frac_part)
    }
}

impl FromStr for ExactDecimal {
    type Err = DecimalError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || DecimalError::InvalidLiteral {
            literal: s.to_string(),
        };

        let (negative, body) = match s.as_bytes().first() {
            Some(b'-') => (true, &s[1..]),
            Some(b'+') => (false, &s[1..]),
            _ => (false, s),
        };
        let (int_part, frac_part) = match body.split_once('.') {
            Some((i, f)) => (i, f),
            None => (body, ""),
        };
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(invalid());
        }
        if !int_part.bytes().chain(frac_part.bytes()).all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }

        let digits = format!("{}{}", int_part, frac_part);
        let magnitude = BigInt::parse_bytes(digits.as_bytes(), 10).ok_or_else(invalid)?;
        let unscaled = if negative { -magnitude } else { magnitude };
        let scale = u32::try_from(frac_part.len()).map_err(|_| invalid())?;
        Ok(Self::new(unscaled, scale))
    }
}

impl PartialEq for ExactDecimal {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ExactDecimal {}

impl PartialOrd for ExactDecimal {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ExactDecimal {
    fn cmp(&self, other: &Self) -> Ordering {
        // Minus < NoSign < Plus
        match self.unscaled.sign().cmp(&other.unscaled.sign()) {
            Ordering::Equal => {}
            unequal => return unequal,
        }
        if self.scale == other.scale {
            return self.unscaled.cmp(&other.unscaled);
        }
        if self.is_zero() {
            return Ordering::Equal;
        }
        // Rescaling is only needed when both have the same number of whole
        // digits, which bounds the scale difference by the digit counts.
        let by_magnitude = self.whole_digits().cmp(&other.whole_digits());
        if by_magnitude != Ordering::Equal {
            return if self.is_negative() {
                by_magnitude.reverse()
            } else {
                by_magnitude
            };
        }
        let scale = self.scale.max(other.scale);
        self.rescaled(scale).cmp(&other.rescaled(scale))
    }
}

impl From<Decimal> for ExactDecimal {
    fn from(value: Decimal) -> Self {
        Self::new(BigInt::from(value.mantissa()), value.scale())
    }
}

impl From<i64> for ExactDecimal {
    fn from(value: i64) -> Self {
        Self::from_i64(value, 0)
    }
}

impl TryFrom<&ExactDecimal> for Decimal {
    type Error = DecimalError;

    fn try_from(value: &ExactDecimal) -> Result<Decimal> {
        let unrepresentable = || DecimalError::Unrepresentable {
            value: value.to_string(),
        };
        let mantissa = value.unscaled.to_i128().ok_or_else(unrepresentable)?;
        Decimal::try_from_i128_with_scale(mantissa, value.scale).map_err(|_| unrepresentable())
    }
}

impl std::ops::Neg for ExactDecimal {
    type Output = ExactDecimal;

    fn neg(self) -> ExactDecimal {
        ExactDecimal::new(-self.unscaled, self.scale)
    }
}
