//! # Value Codec
//!
//! Converts between the internal 4-state vector and every external value
//! format a callback can ask for.
//!
//! ```text
//!                    value_getters::vec4_get_value
//!   ┌──────────┐  ───────────────────────────────────▶  ┌─────────────────┐
//!   │ Vector4  │                                         │   ValueRecord   │
//!   │ (0/1/x/z)│  ◀───────────────────────────────────   │ (format+payload)│
//!   └──────────┘     value_setters::vec4_from_value      └─────────────────┘
//! ```
//!
//! The width is always passed in separately: some objects report a logical
//! width that differs from the storage they hand over.

mod radix;
mod value_getters;
mod value_setters;

pub use value_getters::{decode, vec4_get_value};
pub use value_setters::{encode, vec4_from_value};

use crate::vector4::{Bit4, BitVector};

/// Reads bit `idx`, treating positions past the end of storage as X.
#[inline]
pub(crate) fn bit_at<V: BitVector + ?Sized>(bits: &V, idx: usize) -> Bit4 {
    if idx < bits.size() {
        bits.value(idx)
    } else {
        Bit4::X
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CodecError {
    /// A character that is not a digit of the string's radix.
    #[error("unsupported digit {ch:?} in {format} value")]
    BadDigit { ch: char, format: &'static str },

    /// Decimal text that is neither a (signed) number nor a lone x/z.
    #[error("invalid decimal value {0:?}")]
    BadDecimal(String),

    #[error("real value {0} cannot be stored in a vector")]
    NonFiniteReal(f64),

    /// The payload does not carry data for the record's format.
    #[error("payload does not match format {format}")]
    PayloadMismatch { format: &'static str },

    #[error("format {0} cannot be written")]
    UnsupportedFormat(&'static str),
}
