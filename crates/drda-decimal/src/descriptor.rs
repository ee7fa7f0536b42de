//! Declared precision and scale of a packed decimal column.
//!
//! DRDA never encodes precision or scale inside the packed bytes; both come
//! from column metadata. In FD:OCA descriptors the two are carried together
//! in a single 16-bit length word:
//!
//! ```text
//! bits 15..8   precision
//! bits  7..0   scale
//! ```

use serde::{Deserialize, Serialize};

use crate::error::DecimalError;
use crate::exact::ExactDecimal;
use crate::Result;

/// Largest precision a packed decimal may declare.
pub const MAX_PRECISION: u32 = 31;

/// Byte length of a packed decimal with the given precision.
///
/// `precision` digits plus one sign nybble, two nybbles per byte.
pub const fn encoded_len(precision: u32) -> usize {
    (precision / 2 + 1) as usize
}

/// Declared precision and scale of a DECIMAL/NUMERIC value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DecimalDescriptor {
    /// Total number of decimal digits.
    pub precision: u32,
    /// Number of fractional digits.
    pub scale: u32,
}

impl DecimalDescriptor {
    /// Create a validated descriptor.
    pub fn new(precision: u32, scale: u32) -> Result<Self> {
        let descriptor = Self { precision, scale };
        descriptor.validate()?;
        Ok(descriptor)
    }

    /// Smallest descriptor that holds `value` without losing digits.
    ///
    /// Parameters sent without column metadata take their precision and
    /// scale from the data: `-0.001` becomes `DECIMAL(3, 3)` and zero
    /// becomes `DECIMAL(1, 0)`.
    pub fn for_value(value: &ExactDecimal) -> Result<Self> {
        let digits = u32::try_from(value.precision()).unwrap_or(u32::MAX);
        Self::new(digits.max(value.scale()), value.scale())
    }

    /// Check `1 <= precision <= 31` and `scale <= precision`.
    ///
    /// Descriptors built through serde or struct literals are not validated
    /// until they are used, so every codec entry point calls this.
    pub fn validate(&self) -> Result<()> {
        if self.precision > MAX_PRECISION {
            return Err(DecimalError::DigitCapacityExceeded {
                digits: self.precision as usize,
            });
        }
        if self.precision == 0 || self.scale > self.precision {
            return Err(DecimalError::InvalidDescriptor {
                precision: self.precision,
                scale: self.scale,
            });
        }
        Ok(())
    }

    /// Decode the FD:OCA length word (precision high byte, scale low byte).
    pub fn from_fdoca_length(length: u16) -> Result<Self> {
        Self::new(u32::from(length >> 8), u32::from(length & 0xFF))
    }

    /// FD:OCA length word for this descriptor.
    pub fn fdoca_length(&self) -> u16 {
        ((self.precision as u16) << 8) | (self.scale as u16 & 0xFF)
    }

    /// Bytes occupied on the wire.
    pub fn encoded_len(&self) -> usize {
        encoded_len(self.precision)
    }

    /// Fail with `BufferTooShort` unless `offset + encoded_len()` fits.
    pub fn ensure_available(&self, buffer_len: usize, offset: usize) -> Result<()> {
        let needed = self.encoded_len();
        let available = buffer_len.saturating_sub(offset);
        if available < needed {
            return Err(DecimalError::BufferTooShort { needed, available });
        }
        Ok(())
    }

    /// Digits available left of the decimal point.
    pub fn whole_digits(&self) -> u32 {
        self.precision.saturating_sub(self.scale)
    }
}

impl std::fmt::Display for DecimalDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "DECIMAL({}, {})", self.precision, self.scale)
    }
}
