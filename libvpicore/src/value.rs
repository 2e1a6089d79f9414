use std::fmt;

use smallvec::SmallVec;

use crate::vpi_user::{Scalar, ValueFormat};

/// One packed 32-bit word: per bit `(a, b)` is `00→0, 10→1, 11→X, 01→Z`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct VecVal {
    pub aval: u32,
    pub bval: u32,
}

pub type VecVals = SmallVec<[VecVal; 4]>;

/// Data half of a value record.
#[derive(Clone, Debug, PartialEq, Default)]
pub enum Payload {
    /// Nothing produced yet, or nothing to produce (`Suppress`).
    #[default]
    Empty,
    /// Binary, octal, decimal and hex strings.
    Text(String),
    Scalar(Scalar),
    Integer(i32),
    Real(f64),
    Vector(VecVals),
    /// `vpiStringVal`: raw bytes, not necessarily UTF-8.
    Bytes(Vec<u8>),
}

/// A value record: the format the caller asked for, and the matching payload.
///
/// For reads the caller builds the record with [`ValueRecord::request`] and the
/// object fills `payload` in that exact format. For writes the caller builds a
/// complete record with one of the constructors.
#[derive(Clone, Debug, PartialEq)]
pub struct ValueRecord {
    pub format: ValueFormat,
    pub payload: Payload,
}

impl ValueRecord {
    pub fn request(format: ValueFormat) -> Self {
        Self {
            format,
            payload: Payload::Empty,
        }
    }

    pub fn suppressed() -> Self {
        Self::request(ValueFormat::Suppress)
    }

    pub fn bin_str(text: impl Into<String>) -> Self {
        Self::text(ValueFormat::BinStr, text)
    }

    pub fn oct_str(text: impl Into<String>) -> Self {
        Self::text(ValueFormat::OctStr, text)
    }

    pub fn dec_str(text: impl Into<String>) -> Self {
        Self::text(ValueFormat::DecStr, text)
    }

    pub fn hex_str(text: impl Into<String>) -> Self {
        Self::text(ValueFormat::HexStr, text)
    }

    fn text(format: ValueFormat, text: impl Into<String>) -> Self {
        Self {
            format,
            payload: Payload::Text(text.into()),
        }
    }

    pub fn int(value: i32) -> Self {
        Self {
            format: ValueFormat::Int,
            payload: Payload::Integer(value),
        }
    }

    pub fn real(value: f64) -> Self {
        Self {
            format: ValueFormat::Real,
            payload: Payload::Real(value),
        }
    }

    pub fn scalar(value: Scalar) -> Self {
        Self {
            format: ValueFormat::Scalar,
            payload: Payload::Scalar(value),
        }
    }

    pub fn vector(words: impl IntoIterator<Item = VecVal>) -> Self {
        Self {
            format: ValueFormat::Vector,
            payload: Payload::Vector(words.into_iter().collect()),
        }
    }

    pub fn string(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            format: ValueFormat::String,
            payload: Payload::Bytes(bytes.into()),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match &self.payload {
            Payload::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i32> {
        match self.payload {
            Payload::Integer(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_real(&self) -> Option<f64> {
        match self.payload {
            Payload::Real(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_scalar(&self) -> Option<Scalar> {
        match self.payload {
            Payload::Scalar(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_vector(&self) -> Option<&[VecVal]> {
        match &self.payload {
            Payload::Vector(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match &self.payload {
            Payload::Bytes(v) => Some(v),
            _ => None,
        }
    }
}

/// Trace rendering of a produced value.
impl fmt::Display for ValueRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.format, &self.payload) {
            (ValueFormat::Suppress, _) => write!(f, "<suppress>"),
            (ValueFormat::BinStr, Payload::Text(s)) => write!(f, "binstr={}", s),
            (ValueFormat::OctStr, Payload::Text(s)) => write!(f, "octstr={}", s),
            (ValueFormat::DecStr, Payload::Text(s)) => write!(f, "decstr={}", s),
            (ValueFormat::HexStr, Payload::Text(s)) => write!(f, "hexstr={}", s),
            (_, Payload::Integer(v)) => write!(f, "int={}", v),
            (_, Payload::Real(v)) => write!(f, "real={}", v),
            (_, Payload::Scalar(v)) => write!(f, "scalar={:?}", v),
            (_, Payload::Bytes(b)) => write!(f, "string=\"{}\"", String::from_utf8_lossy(b)),
            (_, Payload::Vector(words)) => {
                write!(f, "vector=[")?;
                for (i, w) in words.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{:08x}/{:08x}", w.aval, w.bval)?;
                }
                write!(f, "]")
            }
            (format, _) => write!(f, "<{}>=?", format.name()),
        }
    }
}
