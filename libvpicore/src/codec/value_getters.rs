use num_traits::ToPrimitive;

use super::bit_at;
use super::radix::{Unknowns, classify_unknowns, vec4_to_bigint, vec4_to_radix_str};
use crate::value::{Payload, ValueRecord, VecVal, VecVals};
use crate::vector4::{Bit4, BitVector};
use crate::vpi_user::{Scalar, ValueFormat};

/// Produce the payload for `format` from the first `width` bits of `bits`.
///
/// Panics (after logging) on `Scalar` with a width other than 1 and on any
/// format without a decode rule (`Strength`, `Time`, `ObjType`, `Suppress`).
pub fn decode<V: BitVector + ?Sized>(
    bits: &V,
    width: usize,
    signed: bool,
    format: ValueFormat,
) -> Payload {
    match format {
        ValueFormat::BinStr => Payload::Text(
            (0..width)
                .rev()
                .map(|idx| bit_at(bits, idx).to_char())
                .collect(),
        ),
        ValueFormat::OctStr => Payload::Text(vec4_to_radix_str(bits, width, 3)),
        ValueFormat::HexStr => Payload::Text(vec4_to_radix_str(bits, width, 4)),
        ValueFormat::DecStr => Payload::Text(decimal_str(bits, width, signed)),
        ValueFormat::Scalar => {
            if width != 1 {
                crate::contract_violation!("scalar value requested from a {}-bit object", width);
            }
            Payload::Scalar(match bit_at(bits, 0) {
                Bit4::Zero => Scalar::Zero,
                Bit4::One => Scalar::One,
                Bit4::X => Scalar::X,
                Bit4::Z => Scalar::Z,
            })
        }
        ValueFormat::Int => Payload::Integer(pack_int(bits, signed)),
        ValueFormat::Vector => Payload::Vector(pack_vector(bits, width)),
        ValueFormat::String => Payload::Bytes(pack_bytes(bits, width)),
        ValueFormat::Real => {
            Payload::Real(vec4_to_bigint(bits, width, signed).to_f64().unwrap_or(f64::NAN))
        }
        other => crate::contract_violation!("format {} not implemented", other.name()),
    }
}

/// Fill `record.payload` in the format the caller put in `record.format`.
#[inline]
pub fn vec4_get_value<V: BitVector + ?Sized>(
    bits: &V,
    width: usize,
    signed: bool,
    record: &mut ValueRecord,
) {
    record.payload = decode(bits, width, signed, record.format);
}

fn decimal_str<V: BitVector + ?Sized>(bits: &V, width: usize, signed: bool) -> String {
    match classify_unknowns(bits, width) {
        Unknowns::AllX => "x".to_string(),
        Unknowns::AllZ => "z".to_string(),
        Unknowns::SomeX => "X".to_string(),
        Unknowns::SomeZ => "Z".to_string(),
        Unknowns::None => vec4_to_bigint(bits, width, signed).to_string(),
    }
}

/// Packs into 32 bits. The pad past the vector's own size comes from its top
/// bit, so a narrow signed vector sign-extends.
fn pack_int<V: BitVector + ?Sized>(bits: &V, signed: bool) -> i32 {
    let size = bits.size();
    let pad = if signed && size > 0 {
        bits.value(size - 1)
    } else {
        Bit4::Zero
    };

    let mut val = 0u32;
    for idx in 0..32 {
        let bit = if idx < size { bits.value(idx) } else { pad };
        if bit == Bit4::One {
            val |= 1 << idx;
        }
    }
    val as i32
}

fn pack_vector<V: BitVector + ?Sized>(bits: &V, width: usize) -> VecVals {
    let nwords = width.div_ceil(32).max(1);
    let mut words: VecVals = smallvec::smallvec![VecVal::default(); nwords];

    for idx in 0..width {
        let (w, s) = (idx / 32, idx % 32);
        let (a, b) = match bit_at(bits, idx) {
            Bit4::Zero => (0u32, 0u32),
            Bit4::One => (1, 0),
            Bit4::X => (1, 1),
            Bit4::Z => (0, 1),
        };
        words[w].aval |= a << s;
        words[w].bval |= b << s;
    }
    words
}

/// MSB-first bytes. The leading group holds the `width % 8` top bits. Zero
/// bytes are dropped.
fn pack_bytes<V: BitVector + ?Sized>(bits: &V, width: usize) -> Vec<u8> {
    let mut out = Vec::with_capacity(width.div_ceil(8));

    let mut hi = width;
    while hi > 0 {
        let lo = if hi % 8 != 0 { hi - hi % 8 } else { hi - 8 };
        let mut byte = 0u8;
        for idx in lo..hi {
            if bit_at(bits, idx) == Bit4::One {
                byte |= 1 << (idx - lo);
            }
        }
        if byte != 0 {
            out.push(byte);
        }
        hi = lo;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector4::Vector4;

    fn bits(text: &str) -> Vector4 {
        Vector4::from_bin_str(text).unwrap()
    }

    fn text(payload: Payload) -> String {
        match payload {
            Payload::Text(s) => s,
            other => panic!("expected text, got {:?}", other),
        }
    }

    #[test]
    fn test_decimal_signed_and_unsigned() {
        let v = bits("1010");
        assert_eq!(text(decode(&v, 4, false, ValueFormat::DecStr)), "10");
        assert_eq!(text(decode(&v, 4, true, ValueFormat::DecStr)), "-6");
    }

    #[test]
    fn test_decimal_unknowns() {
        assert_eq!(text(decode(&bits("xxxx"), 4, false, ValueFormat::DecStr)), "x");
        assert_eq!(text(decode(&bits("zzzz"), 4, false, ValueFormat::DecStr)), "z");
        assert_eq!(text(decode(&bits("1zx0"), 4, false, ValueFormat::DecStr)), "X");
        assert_eq!(text(decode(&bits("1z00"), 4, false, ValueFormat::DecStr)), "Z");
    }

    #[test]
    fn test_decimal_wide() {
        let mut v = Vector4::new(100, Bit4::Zero);
        v.set_bit(99, Bit4::One);
        assert_eq!(
            text(decode(&v, 100, false, ValueFormat::DecStr)),
            "633825300114114700748351602688"
        );
    }

    #[test]
    fn test_octal_and_hex_groups() {
        let v = bits("1111101");
        assert_eq!(text(decode(&v, 7, false, ValueFormat::OctStr)), "175");
        assert_eq!(text(decode(&v, 7, false, ValueFormat::HexStr)), "7d");

        let v = bits("xxxxzzzz10x1");
        assert_eq!(text(decode(&v, 12, false, ValueFormat::HexStr)), "xzX");
        assert_eq!(text(decode(&v, 12, false, ValueFormat::OctStr)), "xXZX");

        let v = bits("zz01");
        assert_eq!(text(decode(&v, 4, false, ValueFormat::HexStr)), "Z");
    }

    #[test]
    fn test_partial_top_group_is_uniform() {
        // Only one bit lives in the top octal digit.
        let v = bits("x101");
        assert_eq!(text(decode(&v, 4, false, ValueFormat::OctStr)), "x5");
    }

    #[test]
    fn test_int_sign_pad() {
        let v = bits("1111");
        assert_eq!(decode(&v, 4, false, ValueFormat::Int), Payload::Integer(15));
        assert_eq!(decode(&v, 4, true, ValueFormat::Int), Payload::Integer(-1));
        // X/Z bits pack as 0.
        assert_eq!(decode(&bits("1x1z"), 4, false, ValueFormat::Int), Payload::Integer(10));
    }

    #[test]
    fn test_vector_33_bits() {
        for (bit, a, b) in [
            (Bit4::Zero, 0, 0),
            (Bit4::One, 1, 0),
            (Bit4::X, 1, 1),
            (Bit4::Z, 0, 1),
        ] {
            let mut v = Vector4::new(33, Bit4::Zero);
            v.set_bit(32, bit);
            let Payload::Vector(words) = decode(&v, 33, false, ValueFormat::Vector) else {
                panic!("expected a vector payload");
            };
            assert_eq!(words.len(), 2);
            assert_eq!(words[1], VecVal { aval: a, bval: b });
            assert_eq!(words[0], VecVal::default());
        }
    }

    #[test]
    fn test_string_bytes() {
        // "Hi" with an embedded zero byte.
        let v = bits("010010000000000001101001");
        assert_eq!(
            decode(&v, 24, false, ValueFormat::String),
            Payload::Bytes(b"Hi".to_vec())
        );

        let v = bits("10100001001101001");
        assert_eq!(
            decode(&v, 17, false, ValueFormat::String),
            Payload::Bytes(vec![0x01, 0x42, 0x69])
        );
    }

    #[test]
    fn test_scalar_and_real() {
        assert_eq!(decode(&bits("x"), 1, false, ValueFormat::Scalar), Payload::Scalar(Scalar::X));
        assert_eq!(decode(&bits("z"), 1, false, ValueFormat::Scalar), Payload::Scalar(Scalar::Z));
        assert_eq!(decode(&bits("1010"), 4, true, ValueFormat::Real), Payload::Real(-6.0));
        assert_eq!(decode(&bits("1x10"), 4, false, ValueFormat::Real), Payload::Real(10.0));
    }

    #[test]
    #[should_panic(expected = "scalar value requested")]
    fn test_scalar_on_vector_panics() {
        decode(&bits("10"), 2, false, ValueFormat::Scalar);
    }

    #[test]
    #[should_panic(expected = "not implemented")]
    fn test_suppress_has_no_decode_rule() {
        decode(&bits("10"), 2, false, ValueFormat::Suppress);
    }
}
