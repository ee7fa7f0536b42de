//! Packed decimal (BCD) codec for the DRDA wire protocol.
//!
//! DECIMAL and NUMERIC values travel between DRDA clients and servers as
//! packed decimals: two digits per byte, a trailing sign nybble, and a width
//! fixed by the column's declared precision. Scale is not on the wire; it
//! comes from column metadata.
//!
//! # Features
//!
//! - **Exact decode**: up to 31 digits into [`ExactDecimal`] (`BigInt` + scale)
//! - **Double decode**: chunked `f64` summation for the floating-point getters
//! - **Long decode**: integer part only, truncating toward zero
//! - **Encode**: truncating/zero-padding to the declared scale, overflow checked
//! - **Streams**: cursor-style reader and `BytesMut` writer for row data
//!
//! # Example
//!
//! ```rust
//! use drda_decimal::{decode_exact, encode_to_vec, ExactDecimal};
//!
//! let value: ExactDecimal = "-123.45".parse().unwrap();
//! let packed = encode_to_vec(&value, 7, 2).unwrap();
//! assert_eq!(packed, [0x00, 0x12, 0x34, 0x5D]);
//!
//! let decoded = decode_exact(&packed, 0, 7, 2).unwrap();
//! assert_eq!(decoded, value);
//! ```

pub mod decode;
pub mod descriptor;
pub mod encode;
pub mod error;
pub mod exact;
pub mod magnitude;
pub mod nybble;
pub mod stream;

// Re-export commonly used types at crate root
pub use decode::{
    decode_double, decode_double_checked, decode_exact, decode_exact_checked, decode_long,
    decode_long_checked,
};
pub use descriptor::{encoded_len, DecimalDescriptor, MAX_PRECISION};
pub use encode::{encode, encode_checked, encode_to_vec};
pub use error::DecimalError;
pub use exact::ExactDecimal;
pub use stream::{PackedDecimalReader, PackedDecimalWriter};

/// Result type for packed decimal operations.
pub type Result<T> = std::result::Result<T, DecimalError>;
