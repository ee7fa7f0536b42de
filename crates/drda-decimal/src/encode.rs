//! Packed decimal encoding.
//!
//! The value's digits are aligned to the declared scale (excess fraction
//! digits dropped, missing ones zero-filled), right-justified into the
//! declared precision, and followed by a `0xC`/`0xD` sign nybble.
//!
//! Example: -123.45 as DECIMAL(7,2)
//! - Digits: 0 0 1 2 3 4 5, sign D
//! - Binary: 0x00 0x12 0x34 0x5D (4 bytes)

use crate::descriptor::{DecimalDescriptor, MAX_PRECISION};
use crate::error::DecimalError;
use crate::exact::ExactDecimal;
use crate::nybble::{NEGATIVE_SIGN, POSITIVE_SIGN};
use crate::Result;

/// Encode `value` as DECIMAL(`precision`, `scale`) at `buffer[offset..]`.
///
/// Fraction digits beyond `scale` are truncated, never rounded. The sign
/// nybble follows the sign of `value`, so a negative value whose digits are
/// all truncated away still encodes as `0xD`.
///
/// Returns the number of bytes written, always `precision/2 + 1`.
///
/// # Errors
/// - `DigitCapacityExceeded` if `precision` or the value's own digit count
///   is above 31.
/// - `InvalidDescriptor` for `precision == 0` or `scale > precision`.
/// - `NumericOverflow` if the whole-number digits exceed `precision - scale`.
///
/// # Panics
/// If `buffer` holds fewer than `precision/2 + 1` bytes from `offset`.
pub fn encode(
    buffer: &mut [u8],
    offset: usize,
    value: &ExactDecimal,
    precision: u32,
    scale: u32,
) -> Result<usize> {
    let descriptor = DecimalDescriptor::new(precision, scale)?;
    let digits = aligned_digits(value, &descriptor)?;

    let len = descriptor.encoded_len();
    let nybble_count = len * 2;
    let mut nybbles = vec![0u8; nybble_count];
    nybbles[nybble_count - 1 - digits.len()..nybble_count - 1].copy_from_slice(&digits);
    nybbles[nybble_count - 1] = if value.is_negative() {
        NEGATIVE_SIGN
    } else {
        POSITIVE_SIGN
    };

    let target = &mut buffer[offset..offset + len];
    for (byte, pair) in target.iter_mut().zip(nybbles.chunks_exact(2)) {
        *byte = (pair[0] << 4) | pair[1];
    }
    Ok(len)
}

/// [`encode`] with a buffer length check.
pub fn encode_checked(
    buffer: &mut [u8],
    offset: usize,
    value: &ExactDecimal,
    precision: u32,
    scale: u32,
) -> Result<usize> {
    DecimalDescriptor::new(precision, scale)?.ensure_available(buffer.len(), offset)?;
    encode(buffer, offset, value, precision, scale)
}

/// Encode `value` into a freshly allocated buffer.
pub fn encode_to_vec(value: &ExactDecimal, precision: u32, scale: u32) -> Result<Vec<u8>> {
    let descriptor = DecimalDescriptor::new(precision, scale)?;
    let mut buffer = vec![0u8; descriptor.encoded_len()];
    encode(&mut buffer, 0, value, precision, scale)?;
    Ok(buffer)
}

/// Digit values of `|value|` rescaled to the target scale.
///
/// The result never has more than `precision` digits.
fn aligned_digits(value: &ExactDecimal, target: &DecimalDescriptor) -> Result<Vec<u8>> {
    let text = value.unscaled().magnitude().to_string();
    if text.len() > MAX_PRECISION as usize {
        return Err(DecimalError::DigitCapacityExceeded { digits: text.len() });
    }

    let whole_digits = value.whole_digits();
    if whole_digits > 0 && !value.is_zero() && whole_digits > i64::from(target.whole_digits()) {
        return Err(DecimalError::NumericOverflow {
            value: value.to_string(),
            precision: target.precision,
            scale: target.scale,
        });
    }

    let mut digits: Vec<u8> = text.bytes().map(|b| b - b'0').collect();
    let source_scale = value.scale() as usize;
    let target_scale = target.scale as usize;
    if source_scale >= target_scale {
        let dropped = source_scale - target_scale;
        if dropped > 0 {
            tracing::trace!(
                value = %value,
                dropped_digits = dropped,
                target_scale,
                "truncating excess fraction digits"
            );
        }
        digits.truncate(digits.len().saturating_sub(dropped));
    } else {
        digits.resize(digits.len() + (target_scale - source_scale), 0);
    }

    // Only the leading zero of a zero value can spill past the precision.
    let precision = target.precision as usize;
    if digits.len() > precision {
        digits.drain(..digits.len() - precision);
    }
    Ok(digits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::decode_exact;

    fn dec(s: &str) -> ExactDecimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_encode_example() {
        let mut buf = [0u8; 4];
        let written = encode(&mut buf, 0, &dec("-123.45"), 7, 2).unwrap();
        assert_eq!(written, 4);
        assert_eq!(buf, [0x00, 0x12, 0x34, 0x5D]);
    }

    #[test]
    fn test_encode_positive_odd_and_even() {
        assert_eq!(encode_to_vec(&dec("12345"), 5, 0).unwrap(), vec![0x12, 0x34, 0x5C]);
        assert_eq!(
            encode_to_vec(&dec("123456"), 6, 0).unwrap(),
            vec![0x01, 0x23, 0x45, 0x6C]
        );
        assert_eq!(encode_to_vec(&dec("5"), 1, 0).unwrap(), vec![0x5C]);
    }

    #[test]
    fn test_encode_truncates_fraction() {
        let packed = encode_to_vec(&dec("1.239"), 5, 2).unwrap();
        assert_eq!(packed, vec![0x00, 0x12, 0x3C]);
        assert_eq!(decode_exact(&packed, 0, 5, 2).unwrap(), dec("1.23"));

        let packed = encode_to_vec(&dec("-9.999"), 3, 0).unwrap();
        assert_eq!(packed, vec![0x00, 0x9D]);
    }

    #[test]
    fn test_encode_pads_fraction() {
        assert_eq!(encode_to_vec(&dec("1.5"), 5, 3).unwrap(), vec![0x01, 0x50, 0x0C]);
        assert_eq!(encode_to_vec(&dec("0.5"), 3, 3).unwrap(), vec![0x50, 0x0C]);
        assert_eq!(encode_to_vec(&dec("7"), 4, 2).unwrap(), vec![0x00, 0x70, 0x0C]);
    }

    #[test]
    fn test_encode_zero() {
        assert_eq!(encode_to_vec(&dec("0"), 3, 0).unwrap(), vec![0x00, 0x0C]);
        assert_eq!(encode_to_vec(&dec("0"), 3, 3).unwrap(), vec![0x00, 0x0C]);
        assert_eq!(encode_to_vec(&dec("-0.00"), 2, 1).unwrap(), vec![0x00, 0x0C]);
    }

    #[test]
    fn test_encode_negative_truncated_to_zero_keeps_sign() {
        assert_eq!(encode_to_vec(&dec("-0.001"), 3, 2).unwrap(), vec![0x00, 0x0D]);
    }

    #[test]
    fn test_encode_overflow_boundary() {
        assert_eq!(
            encode_to_vec(&dec("999.99"), 5, 2).unwrap(),
            vec![0x99, 0x99, 0x9C]
        );
        assert_eq!(
            encode_to_vec(&dec("1000.00"), 5, 2),
            Err(DecimalError::NumericOverflow {
                value: "1000.00".to_string(),
                precision: 5,
                scale: 2
            })
        );
        // Fraction width does not help an oversized integer part.
        assert!(matches!(
            encode_to_vec(&dec("1000"), 5, 2),
            Err(DecimalError::NumericOverflow { .. })
        ));
        assert!(encode_to_vec(&dec("0.00001"), 1, 1).is_ok());
    }

    #[test]
    fn test_encode_capacity_ceiling() {
        let mut buf = [0u8; 17];
        assert_eq!(
            encode(&mut buf, 0, &dec("1"), 32, 0),
            Err(DecimalError::DigitCapacityExceeded { digits: 32 })
        );

        let wide = dec(&"1".repeat(32));
        assert_eq!(
            encode(&mut buf, 0, &wide, 31, 0),
            Err(DecimalError::DigitCapacityExceeded { digits: 32 })
        );
    }

    #[test]
    fn test_encode_invalid_scale() {
        assert!(matches!(
            encode_to_vec(&dec("1"), 3, 4),
            Err(DecimalError::InvalidDescriptor { .. })
        ));
    }

    #[test]
    fn test_encode_at_offset() {
        let mut buf = [0xEEu8; 6];
        let written = encode(&mut buf, 1, &dec("42.1"), 4, 1).unwrap();
        assert_eq!(written, 3);
        assert_eq!(buf, [0xEE, 0x00, 0x42, 0x1C, 0xEE, 0xEE]);
    }

    #[test]
    fn test_encode_wide() {
        let value = dec("-1234567890123456789012.345678901");
        let packed = encode_to_vec(&value, 31, 9).unwrap();
        assert_eq!(packed.len(), 16);
        assert_eq!(packed[0], 0x12);
        assert_eq!(packed[15], 0x1D);
        assert_eq!(decode_exact(&packed, 0, 31, 9).unwrap(), value);
    }

    #[test]
    fn test_encode_checked() {
        let mut buf = [0u8; 3];
        assert_eq!(
            encode_checked(&mut buf, 0, &dec("-123.45"), 7, 2),
            Err(DecimalError::BufferTooShort {
                needed: 4,
                available: 3
            })
        );
        assert_eq!(buf, [0, 0, 0]);
        assert_eq!(encode_checked(&mut buf, 0, &dec("12.345"), 5, 3), Ok(3));
        assert_eq!(buf, [0x12, 0x34, 0x5C]);
    }
}
