//! Sequential packed decimal access inside a larger data stream.
//!
//! Row data (QRYDTA) and parameter data (SQLDTA) lay values out back to
//! back, so decimals are consumed and produced with a cursor rather than
//! explicit offsets. Unlike the free functions, the reader checks bounds.

use bytes::{BufMut, Bytes, BytesMut};

use crate::decode::{decode_double, decode_exact, decode_long};
use crate::descriptor::DecimalDescriptor;
use crate::encode::encode;
use crate::exact::ExactDecimal;
use crate::Result;

/// Reads packed decimals from a byte slice, advancing past each one.
#[derive(Debug, Clone)]
pub struct PackedDecimalReader<'a> {
    buffer: &'a [u8],
    position: usize,
}

impl<'a> PackedDecimalReader<'a> {
    /// Start reading at the beginning of `buffer`.
    pub fn new(buffer: &'a [u8]) -> Self {
        Self {
            buffer,
            position: 0,
        }
    }

    /// Current offset into the buffer.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Bytes left after the current position.
    pub fn remaining(&self) -> usize {
        self.buffer.len().saturating_sub(self.position)
    }

    /// Read an exact decimal.
    pub fn read_exact(&mut self, descriptor: &DecimalDescriptor) -> Result<ExactDecimal> {
        self.read_with(descriptor, decode_exact)
    }

    /// Read a decimal as `f64`.
    pub fn read_double(&mut self, descriptor: &DecimalDescriptor) -> Result<f64> {
        self.read_with(descriptor, decode_double)
    }

    /// Read the integer part of a decimal.
    pub fn read_long(&mut self, descriptor: &DecimalDescriptor) -> Result<i64> {
        self.read_with(descriptor, decode_long)
    }

    /// Step over a decimal without decoding it.
    pub fn skip(&mut self, descriptor: &DecimalDescriptor) -> Result<()> {
        self.read_with(descriptor, |_, _, _, _| Ok(()))
    }

    /// The position only moves when `decode` succeeds.
    fn read_with<T>(
        &mut self,
        descriptor: &DecimalDescriptor,
        decode: impl FnOnce(&[u8], usize, u32, u32) -> Result<T>,
    ) -> Result<T> {
        let decoded = descriptor
            .validate()
            .and_then(|()| descriptor.ensure_available(self.buffer.len(), self.position))
            .and_then(|()| {
                decode(
                    self.buffer,
                    self.position,
                    descriptor.precision,
                    descriptor.scale,
                )
            });
        match decoded {
            Ok(value) => {
                self.position += descriptor.encoded_len();
                Ok(value)
            }
            Err(e) => {
                tracing::debug!(
                    position = self.position,
                    remaining = self.remaining(),
                    %descriptor,
                    error = %e,
                    "packed decimal read rejected"
                );
                Err(e)
            }
        }
    }
}

/// Appends packed decimals to a growable buffer.
#[derive(Debug, Default)]
pub struct PackedDecimalWriter {
    buffer: BytesMut,
}

impl PackedDecimalWriter {
    /// Create a writer over an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a writer with room for `capacity` bytes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: BytesMut::with_capacity(capacity),
        }
    }

    /// Append `value` encoded per `descriptor`.
    ///
    /// On error the buffer is left exactly as it was.
    pub fn write(&mut self, value: &ExactDecimal, descriptor: &DecimalDescriptor) -> Result<usize> {
        descriptor.validate()?;
        let start = self.buffer.len();
        self.buffer.put_bytes(0, descriptor.encoded_len());

        match encode(
            &mut self.buffer[..],
            start,
            value,
            descriptor.precision,
            descriptor.scale,
        ) {
            Ok(written) => Ok(written),
            Err(e) => {
                self.buffer.truncate(start);
                tracing::debug!(
                    value = %value,
                    %descriptor,
                    error = %e,
                    "packed decimal write rejected"
                );
                Err(e)
            }
        }
    }

    /// Append `value` with a descriptor derived from the value itself.
    ///
    /// Returns the descriptor used, which callers send as the parameter's
    /// FD:OCA length word.
    pub fn write_inferred(&mut self, value: &ExactDecimal) -> Result<DecimalDescriptor> {
        let descriptor = DecimalDescriptor::for_value(value).map_err(|e| {
            tracing::debug!(value = %value, error = %e, "packed decimal write rejected");
            e
        })?;
        self.write(value, &descriptor)?;
        Ok(descriptor)
    }

    /// Append an integer encoded per `descriptor`.
    pub fn write_i64(&mut self, value: i64, descriptor: &DecimalDescriptor) -> Result<usize> {
        self.write(&ExactDecimal::from(value), descriptor)
    }

    /// Number of bytes written.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// True if nothing has been written.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Bytes written so far.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    /// Take the underlying buffer.
    pub fn into_inner(self) -> BytesMut {
        self.buffer
    }

    /// Take the written bytes as immutable `Bytes`.
    pub fn freeze(self) -> Bytes {
        self.buffer.freeze()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DecimalError;

    fn dec(s: &str) -> ExactDecimal {
        s.parse().unwrap()
    }

    fn desc(precision: u32, scale: u32) -> DecimalDescriptor {
        DecimalDescriptor::new(precision, scale).unwrap()
    }

    #[test]
    fn test_reader_sequence() {
        // DECIMAL(7,2) -123.45, DECIMAL(5,0) 12345, DECIMAL(3,1) 99.9
        let data = [0x00, 0x12, 0x34, 0x5D, 0x12, 0x34, 0x5C, 0x99, 0x9C];
        let mut reader = PackedDecimalReader::new(&data);

        assert_eq!(reader.read_exact(&desc(7, 2)).unwrap(), dec("-123.45"));
        assert_eq!(reader.position(), 4);
        assert_eq!(reader.read_long(&desc(5, 0)).unwrap(), 12345);
        assert_eq!(reader.read_double(&desc(3, 1)).unwrap(), 99.9);
        assert_eq!(reader.remaining(), 0);
    }

    #[test]
    fn test_reader_short_buffer() {
        let data = [0x00, 0x12, 0x34];
        let mut reader = PackedDecimalReader::new(&data);
        assert_eq!(
            reader.read_exact(&desc(7, 2)),
            Err(DecimalError::BufferTooShort {
                needed: 4,
                available: 3
            })
        );
        assert_eq!(reader.position(), 0);
    }

    #[test]
    fn test_reader_invalid_descriptor() {
        let data = [0u8; 32];
        let mut reader = PackedDecimalReader::new(&data);
        let bad = DecimalDescriptor {
            precision: 33,
            scale: 0,
        };
        assert_eq!(
            reader.read_long(&bad),
            Err(DecimalError::DigitCapacityExceeded { digits: 33 })
        );
        assert_eq!(reader.position(), 0);
    }

    #[test]
    fn test_reader_overflow_does_not_advance() {
        let mut data = vec![0x99u8; 9];
        data.push(0x9C);
        let mut reader = PackedDecimalReader::new(&data);
        assert!(matches!(
            reader.read_long(&desc(19, 0)),
            Err(DecimalError::ArithmeticOverflow { .. })
        ));
        assert_eq!(reader.position(), 0);
        reader.skip(&desc(19, 0)).unwrap();
        assert_eq!(reader.position(), 10);
    }

    #[test]
    fn test_reader_decode_error_then_other_target() {
        // 1234567890123456789012.5 as DECIMAL(23,1): too wide for i64
        let data = [
            0x12, 0x34, 0x56, 0x78, 0x90, 0x12, 0x34, 0x56, 0x78, 0x90, 0x12, 0x5D,
        ];
        let column = desc(23, 1);
        let mut reader = PackedDecimalReader::new(&data);
        assert!(matches!(
            reader.read_long(&column),
            Err(DecimalError::ArithmeticOverflow { .. })
        ));
        assert_eq!(reader.position(), 0);
        assert_eq!(reader.remaining(), 12);
        assert_eq!(
            reader.read_exact(&column).unwrap(),
            dec("-1234567890123456789012.5")
        );
        assert_eq!(reader.remaining(), 0);
    }

    #[test]
    fn test_write_inferred() {
        let mut writer = PackedDecimalWriter::new();
        assert_eq!(writer.write_inferred(&dec("-0.001")).unwrap(), desc(3, 3));
        assert_eq!(writer.write_inferred(&dec("123.45")).unwrap(), desc(5, 2));
        assert_eq!(writer.as_bytes(), &[0x00, 0x1D, 0x12, 0x34, 0x5C]);

        assert_eq!(
            writer.write_inferred(&dec(&"9".repeat(32))),
            Err(DecimalError::DigitCapacityExceeded { digits: 32 })
        );
        assert_eq!(writer.len(), 5);
    }

    #[test]
    fn test_writer_appends() {
        let mut writer = PackedDecimalWriter::with_capacity(16);
        assert!(writer.is_empty());
        assert_eq!(writer.write(&dec("-123.45"), &desc(7, 2)).unwrap(), 4);
        assert_eq!(writer.write_i64(12345, &desc(5, 0)).unwrap(), 3);
        assert_eq!(writer.len(), 7);
        assert_eq!(
            writer.as_bytes(),
            &[0x00, 0x12, 0x34, 0x5D, 0x12, 0x34, 0x5C]
        );
        let frozen = writer.freeze();
        assert_eq!(frozen.len(), 7);
    }

    #[test]
    fn test_writer_rolls_back_on_error() {
        let mut writer = PackedDecimalWriter::new();
        writer.write_i64(7, &desc(1, 0)).unwrap();
        assert!(matches!(
            writer.write(&dec("1000"), &desc(5, 2)),
            Err(DecimalError::NumericOverflow { .. })
        ));
        assert_eq!(&writer.into_inner()[..], &[0x7C]);
    }

    #[test]
    fn test_writer_reader_pair() {
        let columns = [desc(31, 10), desc(18, 0), desc(9, 9)];
        let values = [
            dec("-123456789012345678901.2345678901"),
            dec("999999999999999999"),
            dec("0.000000001"),
        ];

        let mut writer = PackedDecimalWriter::new();
        for (value, column) in values.iter().zip(&columns) {
            writer.write(value, column).unwrap();
        }
        let bytes = writer.freeze();

        let mut reader = PackedDecimalReader::new(&bytes);
        for (value, column) in values.iter().zip(&columns) {
            assert_eq!(&reader.read_exact(column).unwrap(), value);
        }
        assert_eq!(reader.remaining(), 0);
    }
}
