//! Packed decimal decoding.
//!
//! Up to 18 digits the whole value is accumulated in a `u64`. Wider values
//! are read as 9-digit chunks from the least significant end and combined
//! either exactly (into a `BigInt`) or by weighted `f64` summation.
//!
//! The unchecked decoders trust the caller to supply `precision/2 + 1` bytes
//! at `offset` and panic on a short slice. The `_checked` variants verify the
//! buffer length first.

use num_bigint::{BigInt, Sign};
use num_traits::ToPrimitive;

use crate::descriptor::DecimalDescriptor;
use crate::error::DecimalError;
use crate::exact::ExactDecimal;
use crate::magnitude::Magnitude;
use crate::nybble::{self, CHUNK_DIGITS};
use crate::Result;

/// Widest precision decoded through a single `u64`.
pub const MAX_LONG_PRECISION: u32 = 18;

static POW10_F64: [f64; 32] = [
    1e0, 1e1, 1e2, 1e3, 1e4, 1e5, 1e6, 1e7, 1e8, 1e9, 1e10, 1e11, 1e12, 1e13, 1e14, 1e15,
    1e16, 1e17, 1e18, 1e19, 1e20, 1e21, 1e22, 1e23, 1e24, 1e25, 1e26, 1e27, 1e28, 1e29, 1e30,
    1e31,
];

static NEG_POW10_F64: [f64; 32] = [
    1e0, 1e-1, 1e-2, 1e-3, 1e-4, 1e-5, 1e-6, 1e-7, 1e-8, 1e-9, 1e-10, 1e-11, 1e-12, 1e-13,
    1e-14, 1e-15, 1e-16, 1e-17, 1e-18, 1e-19, 1e-20, 1e-21, 1e-22, 1e-23, 1e-24, 1e-25, 1e-26,
    1e-27, 1e-28, 1e-29, 1e-30, 1e-31,
];

/// `10^exp` for `-31 <= exp <= 31`.
fn pow10_f64(exp: i32) -> f64 {
    if exp >= 0 {
        POW10_F64[exp as usize]
    } else {
        NEG_POW10_F64[exp.unsigned_abs() as usize]
    }
}

/// Signed value of all digit nybbles; only valid up to 18 digits.
fn decode_i64(buffer: &[u8], offset: usize, len: usize, negative: bool) -> i64 {
    let value = nybble::nybbles_to_u64(buffer, offset, 0, len * 2 - 1) as i64;
    if negative {
        value.wrapping_neg()
    } else {
        value
    }
}

/// Decode a packed decimal without losing precision.
///
/// # Errors
/// `DigitCapacityExceeded` for `precision > 31`, `InvalidDescriptor` for
/// `precision == 0` or `scale > precision`.
///
/// # Panics
/// If `buffer` holds fewer than `precision/2 + 1` bytes from `offset`.
pub fn decode_exact(
    buffer: &[u8],
    offset: usize,
    precision: u32,
    scale: u32,
) -> Result<ExactDecimal> {
    let len = DecimalDescriptor::new(precision, scale)?.encoded_len();
    let negative = nybble::is_negative(buffer, offset, len);

    if precision <= MAX_LONG_PRECISION {
        let value = decode_i64(buffer, offset, len, negative);
        return Ok(ExactDecimal::from_i64(value, scale));
    }

    let chunks = nybble::digit_chunks(buffer, offset, len);
    let magnitude = Magnitude::from_chunks(&chunks).into_biguint();
    let sign = if negative { Sign::Minus } else { Sign::Plus };
    Ok(ExactDecimal::new(BigInt::from_biguint(sign, magnitude), scale))
}

/// Decode a packed decimal to an `f64`.
///
/// Wide values are summed chunk by chunk, low chunk first:
/// `lo / 10^s + c1 · 10^(9-s) + c2 · 10^(18-s) + …`. The result can differ
/// from the correctly rounded value in the last bit.
///
/// # Panics
/// If `buffer` holds fewer than `precision/2 + 1` bytes from `offset`.
pub fn decode_double(buffer: &[u8], offset: usize, precision: u32, scale: u32) -> Result<f64> {
    let len = DecimalDescriptor::new(precision, scale)?.encoded_len();
    let negative = nybble::is_negative(buffer, offset, len);
    let scale = scale as i32;

    if precision <= MAX_LONG_PRECISION {
        let value = decode_i64(buffer, offset, len, negative);
        return Ok(value as f64 / pow10_f64(scale));
    }

    let chunks = nybble::digit_chunks(buffer, offset, len);
    let mut sum = f64::from(chunks[0]) / pow10_f64(scale);
    for (i, &chunk) in chunks.iter().enumerate().skip(1) {
        let exp = (i * CHUNK_DIGITS) as i32 - scale;
        sum += f64::from(chunk) * pow10_f64(exp);
    }
    Ok(if negative { -sum } else { sum })
}

/// Decode the integer part of a packed decimal, truncating toward zero.
///
/// # Errors
/// `ArithmeticOverflow` if the integer part does not fit an `i64`.
///
/// # Panics
/// If `buffer` holds fewer than `precision/2 + 1` bytes from `offset`.
pub fn decode_long(buffer: &[u8], offset: usize, precision: u32, scale: u32) -> Result<i64> {
    let descriptor = DecimalDescriptor::new(precision, scale)?;

    if descriptor.whole_digits() <= MAX_LONG_PRECISION {
        let len = descriptor.encoded_len();
        let negative = nybble::is_negative(buffer, offset, len);
        // Fraction nybbles are never read.
        let whole = len * 2 - 1 - scale as usize;
        let value = nybble::nybbles_to_u64(buffer, offset, 0, whole) as i64;
        return Ok(if negative { value.wrapping_neg() } else { value });
    }

    let exact = decode_exact(buffer, offset, precision, scale)?;
    exact
        .trunc()
        .to_i64()
        .ok_or_else(|| DecimalError::ArithmeticOverflow {
            value: exact.to_string(),
        })
}

/// [`decode_exact`] with a buffer length check.
pub fn decode_exact_checked(
    buffer: &[u8],
    offset: usize,
    precision: u32,
    scale: u32,
) -> Result<ExactDecimal> {
    DecimalDescriptor::new(precision, scale)?.ensure_available(buffer.len(), offset)?;
    decode_exact(buffer, offset, precision, scale)
}

/// [`decode_double`] with a buffer length check.
pub fn decode_double_checked(
    buffer: &[u8],
    offset: usize,
    precision: u32,
    scale: u32,
) -> Result<f64> {
    DecimalDescriptor::new(precision, scale)?.ensure_available(buffer.len(), offset)?;
    decode_double(buffer, offset, precision, scale)
}

/// [`decode_long`] with a buffer length check.
pub fn decode_long_checked(
    buffer: &[u8],
    offset: usize,
    precision: u32,
    scale: u32,
) -> Result<i64> {
    DecimalDescriptor::new(precision, scale)?.ensure_available(buffer.len(), offset)?;
    decode_long(buffer, offset, precision, scale)
}
