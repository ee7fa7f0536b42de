//! Packed decimal codec error types.

use miette::Diagnostic;
use thiserror::Error;

/// Errors produced while encoding or decoding packed decimals.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum DecimalError {
    /// More digits than the 31-digit packed decimal limit.
    #[error("packed decimal may only be up to 31 digits, got {digits}")]
    #[diagnostic(code(drda_decimal::digit_capacity_exceeded))]
    DigitCapacityExceeded {
        /// Requested or observed digit count.
        digits: usize,
    },

    /// The whole-number part does not fit the declared column width.
    #[error("overflow occurred during numeric data type conversion of \"{value}\" to DECIMAL({precision}, {scale})")]
    #[diagnostic(code(drda_decimal::numeric_overflow))]
    NumericOverflow {
        /// The offending value, rendered in plain notation.
        value: String,
        /// Declared precision of the target.
        precision: u32,
        /// Declared scale of the target.
        scale: u32,
    },

    /// Integer part of a decoded value does not fit in an `i64`.
    #[error("integer part of {value} does not fit in a 64-bit integer")]
    #[diagnostic(code(drda_decimal::arithmetic_overflow))]
    ArithmeticOverflow {
        /// The decoded value.
        value: String,
    },

    /// Precision is zero or scale exceeds precision.
    #[error("invalid decimal descriptor: precision {precision}, scale {scale}")]
    #[diagnostic(code(drda_decimal::invalid_descriptor))]
    InvalidDescriptor {
        /// Declared precision.
        precision: u32,
        /// Declared scale.
        scale: u32,
    },

    /// Buffer ends before the encoded value does.
    #[error("buffer too short: need {needed} bytes, {available} available")]
    #[diagnostic(code(drda_decimal::buffer_too_short))]
    BufferTooShort {
        /// Bytes required from the offset.
        needed: usize,
        /// Bytes available from the offset.
        available: usize,
    },

    /// Value cannot be represented by `rust_decimal::Decimal`.
    #[error("{value} cannot be represented as a 96-bit decimal")]
    #[diagnostic(code(drda_decimal::unrepresentable))]
    Unrepresentable {
        /// The value that did not fit.
        value: String,
    },

    /// Text that is not a plain decimal literal.
    #[error("invalid decimal literal '{literal}'")]
    #[diagnostic(code(drda_decimal::invalid_literal))]
    InvalidLiteral {
        /// The rejected input.
        literal: String,
    },
}

impl DecimalError {
    /// SQLSTATE a DRDA server reports for the same condition, if any.
    pub fn sql_state(&self) -> Option<&'static str> {
        match self {
            DecimalError::NumericOverflow { .. } | DecimalError::ArithmeticOverflow { .. } => {
                Some("22003")
            }
            DecimalError::DigitCapacityExceeded { .. } => Some("42820"),
            _ => None,
        }
    }
}
