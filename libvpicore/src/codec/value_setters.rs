use num_bigint::BigInt;
use num_traits::FromPrimitive;

use super::CodecError;
use super::radix::{bigint_to_vec4, radix_str_to_vec4};
use crate::value::{Payload, ValueRecord};
use crate::vector4::{Bit4, BitVector, Vector4};
use crate::vpi_user::{Scalar, ValueFormat};

/// Build a `width`-bit vector from a complete value record.
pub fn encode(record: &ValueRecord, width: usize) -> Result<Vector4, CodecError> {
    let format = record.format;
    let mismatch = || CodecError::PayloadMismatch {
        format: format.name(),
    };

    match (format, &record.payload) {
        (ValueFormat::BinStr, Payload::Text(s)) => radix_str_to_vec4(s, width, 1, format.name()),
        (ValueFormat::OctStr, Payload::Text(s)) => radix_str_to_vec4(s, width, 3, format.name()),
        (ValueFormat::HexStr, Payload::Text(s)) => radix_str_to_vec4(s, width, 4, format.name()),
        (ValueFormat::DecStr, Payload::Text(s)) => decimal_to_vec4(s, width),
        (ValueFormat::Scalar, Payload::Scalar(s)) => {
            let mut val = Vector4::new(width, Bit4::Zero);
            if width > 0 {
                val.set_bit(
                    0,
                    match s {
                        Scalar::Zero => Bit4::Zero,
                        Scalar::One => Bit4::One,
                        Scalar::X => Bit4::X,
                        Scalar::Z => Bit4::Z,
                    },
                );
            }
            Ok(val)
        }
        (ValueFormat::Int, Payload::Integer(v)) => {
            let wide = *v as i64;
            let mut val = Vector4::new(width, Bit4::Zero);
            for idx in 0..width {
                val.set_bit(idx, Bit4::from_bool((wide >> idx.min(63)) & 1 == 1));
            }
            Ok(val)
        }
        (ValueFormat::Vector, Payload::Vector(words)) => {
            let mut val = Vector4::new(width, Bit4::Zero);
            for idx in 0..width {
                let (w, s) = (idx / 32, idx % 32);
                let word = words.get(w).copied().unwrap_or_default();
                let bit = match ((word.aval >> s) & 1, (word.bval >> s) & 1) {
                    (0, 0) => Bit4::Zero,
                    (1, 0) => Bit4::One,
                    (1, 1) => Bit4::X,
                    _ => Bit4::Z,
                };
                val.set_bit(idx, bit);
            }
            Ok(val)
        }
        (ValueFormat::Real, Payload::Real(v)) => {
            let rounded = BigInt::from_f64(v.round()).ok_or(CodecError::NonFiniteReal(*v))?;
            Ok(bigint_to_vec4(&rounded, width))
        }
        (ValueFormat::String, Payload::Bytes(bytes)) => {
            let mut val = Vector4::new(width, Bit4::Zero);
            for idx in 0..width {
                let from_end = idx / 8;
                if from_end >= bytes.len() {
                    break;
                }
                let byte = bytes[bytes.len() - 1 - from_end];
                val.set_bit(idx, Bit4::from_bool((byte >> (idx % 8)) & 1 == 1));
            }
            Ok(val)
        }
        (
            ValueFormat::Strength | ValueFormat::Time | ValueFormat::ObjType | ValueFormat::Suppress,
            _,
        ) => Err(CodecError::UnsupportedFormat(format.name())),
        _ => Err(mismatch()),
    }
}

/// Encode `record` and copy it into `target`. On error `target` is untouched.
pub fn vec4_from_value<V: BitVector + ?Sized>(
    record: &ValueRecord,
    target: &mut V,
    width: usize,
) -> Result<(), CodecError> {
    let val = encode(record, width)?;
    for idx in 0..width.min(target.size()) {
        target.set_bit(idx, val.value(idx));
    }
    Ok(())
}

fn decimal_to_vec4(text: &str, width: usize) -> Result<Vector4, CodecError> {
    let trimmed = text.trim();
    match trimmed {
        "x" | "X" => return Ok(Vector4::new(width, Bit4::X)),
        "z" | "Z" => return Ok(Vector4::new(width, Bit4::Z)),
        _ => {}
    }

    let (negative, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(CodecError::BadDecimal(text.to_string()));
    }

    let magnitude = BigInt::parse_bytes(digits.as_bytes(), 10)
        .ok_or_else(|| CodecError::BadDecimal(text.to_string()))?;
    let value = if negative { -magnitude } else { magnitude };
    Ok(bigint_to_vec4(&value, width))
}

#[cfg(test)]
mod tests {
    use rand::Rng;

    use super::*;
    use crate::codec::decode;
    use crate::value::VecVal;

    fn random_vec4(rng: &mut impl Rng, width: usize, defined_only: bool) -> Vector4 {
        let mut v = Vector4::new(width, Bit4::Zero);
        for idx in 0..width {
            let code: u8 = if defined_only {
                rng.random_range(0..2)
            } else {
                rng.random_range(0..4)
            };
            v.set_bit(idx, Bit4::try_from(code).unwrap());
        }
        v
    }

    #[test]
    fn test_bin_str_round_trip_random() {
        let mut rng = rand::rng();
        for width in 1..=256 {
            let v = random_vec4(&mut rng, width, false);
            let mut record = ValueRecord::request(ValueFormat::BinStr);
            record.payload = decode(&v, width, false, ValueFormat::BinStr);
            assert_eq!(encode(&record, width).unwrap(), v, "width {}", width);
        }
    }

    #[test]
    fn test_oct_hex_round_trip_defined() {
        let mut rng = rand::rng();
        for width in [1, 3, 4, 7, 31, 32, 33, 64, 100, 256] {
            let v = random_vec4(&mut rng, width, true);
            for format in [ValueFormat::OctStr, ValueFormat::HexStr] {
                let mut record = ValueRecord::request(format);
                record.payload = decode(&v, width, false, format);
                assert_eq!(encode(&record, width).unwrap(), v, "{} width {}", format.name(), width);
            }
        }
    }

    #[test]
    fn test_uniform_unknown_digits() {
        for (fill, digit) in [(Bit4::X, 'x'), (Bit4::Z, 'z')] {
            let v = Vector4::new(10, fill);
            let Payload::Text(oct) = decode(&v, 10, false, ValueFormat::OctStr) else {
                panic!("expected text");
            };
            assert!(oct.chars().all(|c| c == digit));
            assert_eq!(oct.len(), 4);
        }
    }

    #[test]
    fn test_string_pads_from_leading_digit() {
        let v = encode(&ValueRecord::hex_str("x1"), 12).unwrap();
        assert_eq!(v.to_string(), "xxxxxxxx0001");
        let v = encode(&ValueRecord::bin_str("11"), 4).unwrap();
        assert_eq!(v.to_string(), "0011");
        // Extra digits on the left are dropped.
        let v = encode(&ValueRecord::hex_str("fff"), 4).unwrap();
        assert_eq!(v.to_string(), "1111");
    }

    #[test]
    fn test_bad_digit() {
        assert_eq!(
            encode(&ValueRecord::oct_str("19"), 6),
            Err(CodecError::BadDigit {
                ch: '9',
                format: "vpiOctStrVal"
            })
        );
    }

    #[test]
    fn test_decimal_encode() {
        assert_eq!(encode(&ValueRecord::dec_str("10"), 4).unwrap().to_string(), "1010");
        assert_eq!(encode(&ValueRecord::dec_str("-6"), 4).unwrap().to_string(), "1010");
        assert_eq!(encode(&ValueRecord::dec_str("17"), 4).unwrap().to_string(), "0001");
        assert_eq!(encode(&ValueRecord::dec_str("z"), 3).unwrap().to_string(), "zzz");
        assert!(matches!(
            encode(&ValueRecord::dec_str("-"), 4),
            Err(CodecError::BadDecimal(_))
        ));
        assert!(matches!(
            encode(&ValueRecord::dec_str("1x"), 4),
            Err(CodecError::BadDecimal(_))
        ));
    }

    #[test]
    fn test_int_and_real_encode() {
        assert_eq!(encode(&ValueRecord::int(-1), 40).unwrap().to_string(), "1".repeat(40));
        assert_eq!(encode(&ValueRecord::int(5), 4).unwrap().to_string(), "0101");
        assert_eq!(encode(&ValueRecord::real(2.6), 4).unwrap().to_string(), "0011");
        assert_eq!(encode(&ValueRecord::real(-2.0), 4).unwrap().to_string(), "1110");
        assert_eq!(
            encode(&ValueRecord::real(f64::INFINITY), 4),
            Err(CodecError::NonFiniteReal(f64::INFINITY))
        );
    }

    #[test]
    fn test_vector_and_bytes_encode() {
        let words = [VecVal { aval: 0b1010, bval: 0b1100 }];
        let v = encode(&ValueRecord::vector(words), 36).unwrap();
        assert_eq!(v.to_string(), format!("{}xz10", "0".repeat(32)));

        let v = encode(&ValueRecord::string(b"Hi".to_vec()), 20).unwrap();
        assert_eq!(v.to_string(), "00000100100001101001");
    }

    #[test]
    fn test_unsupported_and_mismatched() {
        assert_eq!(
            encode(&ValueRecord::suppressed(), 4),
            Err(CodecError::UnsupportedFormat("vpiSuppressVal"))
        );
        let record = ValueRecord {
            format: ValueFormat::Int,
            payload: Payload::Text("1".into()),
        };
        assert_eq!(
            encode(&record, 4),
            Err(CodecError::PayloadMismatch { format: "vpiIntVal" })
        );
    }

    #[test]
    fn test_failed_put_leaves_target() {
        let mut target = Vector4::from_bin_str("1010").unwrap();
        assert!(vec4_from_value(&ValueRecord::bin_str("1q"), &mut target, 4).is_err());
        assert_eq!(target.to_string(), "1010");
        vec4_from_value(&ValueRecord::bin_str("0110"), &mut target, 4).unwrap();
        assert_eq!(target.to_string(), "0110");
    }
}
