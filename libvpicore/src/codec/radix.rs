use num_bigint::{BigInt, BigUint, Sign};

use super::{CodecError, bit_at};
use crate::vector4::{Bit4, BitVector, Vector4};

const DIGITS: &[u8; 16] = b"0123456789abcdef";

/// MSB-first digit string with `group` bits per digit (1, 3 or 4).
///
/// A digit whose bits are all X prints `x`, all Z prints `z`. A digit that
/// mixes unknown and known bits prints `X` if any bit is X, otherwise `Z`.
pub(super) fn vec4_to_radix_str<V: BitVector + ?Sized>(
    bits: &V,
    width: usize,
    group: usize,
) -> String {
    let ndigits = width.div_ceil(group);
    let mut out = vec![b'0'; ndigits];

    for digit in 0..ndigits {
        let lo = digit * group;
        let hi = (lo + group).min(width);

        let (mut val, mut xs, mut zs) = (0usize, 0usize, 0usize);
        for idx in lo..hi {
            match bit_at(bits, idx) {
                Bit4::Zero => {}
                Bit4::One => val |= 1 << (idx - lo),
                Bit4::X => xs += 1,
                Bit4::Z => zs += 1,
            }
        }

        let count = hi - lo;
        out[ndigits - 1 - digit] = if xs == count {
            b'x'
        } else if zs == count {
            b'z'
        } else if xs > 0 {
            b'X'
        } else if zs > 0 {
            b'Z'
        } else {
            DIGITS[val]
        };
    }

    // Only ASCII was written.
    String::from_utf8(out).unwrap_or_default()
}

/// Inverse of [`vec4_to_radix_str`]. Digits are consumed from the right; bits
/// past the left end of the text are padded with x/z when the text starts with
/// x/z, otherwise with 0.
pub(super) fn radix_str_to_vec4(
    text: &str,
    width: usize,
    group: usize,
    format: &'static str,
) -> Result<Vector4, CodecError> {
    let digits = text.as_bytes();
    let radix = 1u32 << group;

    let pad = match digits.first() {
        Some(b'x' | b'X') => Bit4::X,
        Some(b'z' | b'Z') => Bit4::Z,
        _ => Bit4::Zero,
    };

    let mut val = Vector4::new(width, Bit4::Zero);
    for idx in 0..width {
        let str_off = idx / group;
        let bit_off = idx % group;

        if str_off >= digits.len() {
            val.set_bit(idx, pad);
            continue;
        }

        let ch = digits[digits.len() - str_off - 1] as char;
        let bit = match ch {
            'x' | 'X' => Bit4::X,
            'z' | 'Z' => Bit4::Z,
            _ => match ch.to_digit(radix) {
                Some(d) => Bit4::from_bool((d >> bit_off) & 1 == 1),
                None => return Err(CodecError::BadDigit { ch, format }),
            },
        };
        val.set_bit(idx, bit);
    }

    Ok(val)
}

/// Classification of the unknown bits of a vector, used by the decimal form.
pub(super) enum Unknowns {
    None,
    AllX,
    AllZ,
    SomeX,
    SomeZ,
}

pub(super) fn classify_unknowns<V: BitVector + ?Sized>(bits: &V, width: usize) -> Unknowns {
    let (mut xs, mut zs) = (0, 0);
    for idx in 0..width {
        match bit_at(bits, idx) {
            Bit4::X => xs += 1,
            Bit4::Z => zs += 1,
            _ => {}
        }
    }

    match (xs, zs) {
        (0, 0) => Unknowns::None,
        (x, _) if x == width => Unknowns::AllX,
        (_, z) if z == width => Unknowns::AllZ,
        (x, _) if x > 0 => Unknowns::SomeX,
        _ => Unknowns::SomeZ,
    }
}

/// Integer value of the first `width` bits. X and Z count as 0. With `signed`
/// the top bit is the two's complement sign.
pub(super) fn vec4_to_bigint<V: BitVector + ?Sized>(bits: &V, width: usize, signed: bool) -> BigInt {
    let mut words = vec![0u32; crate::utils::cover_with_32(width)];
    for idx in 0..width {
        if bit_at(bits, idx) == Bit4::One {
            words[idx / 32] |= 1 << (idx % 32);
        }
    }

    let magnitude = BigInt::from_biguint(Sign::Plus, BigUint::new(words));
    if signed && width > 0 && bit_at(bits, width - 1) == Bit4::One {
        magnitude - (BigInt::from(1) << width)
    } else {
        magnitude
    }
}

/// Writes `value` modulo 2^width into a fresh vector (two's complement for
/// negative values).
pub(super) fn bigint_to_vec4(value: &BigInt, width: usize) -> Vector4 {
    let modulus = BigInt::from(1) << width;
    let wrapped = ((value % &modulus) + &modulus) % &modulus;
    let (_, magnitude) = wrapped.into_parts();

    let mut val = Vector4::new(width, Bit4::Zero);
    for idx in 0..width {
        if magnitude.bit(idx as u64) {
            val.set_bit(idx, Bit4::One);
        }
    }
    val
}
