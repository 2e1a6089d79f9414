use std::fmt;

use num_enum::{IntoPrimitive, TryFromPrimitive};
use smallvec::SmallVec;

/// One 4-state bit. The discriminants index `"01xz"`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum Bit4 {
    Zero = 0,
    One = 1,
    X = 2,
    Z = 3,
}

impl Bit4 {
    #[inline]
    pub fn to_char(self) -> char {
        b"01xz"[self as usize] as char
    }

    #[inline]
    pub fn from_bool(b: bool) -> Self {
        if b { Bit4::One } else { Bit4::Zero }
    }
}

/// The read/write contract the codec needs from a 4-state vector.
pub trait BitVector {
    fn size(&self) -> usize;
    fn value(&self, idx: usize) -> Bit4;
    fn set_bit(&mut self, idx: usize, bit: Bit4);
}

/// Plain 4-state vector stored as two bit planes, the same `(a, b)` split the
/// packed vector format uses.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct Vector4 {
    size: usize,
    abits: SmallVec<[u64; 2]>,
    bbits: SmallVec<[u64; 2]>,
}

impl Vector4 {
    /// A vector of `size` bits, all set to `init`.
    pub fn new(size: usize, init: Bit4) -> Self {
        let words = size.div_ceil(64);
        let (a, b) = match init {
            Bit4::Zero => (0u64, 0u64),
            Bit4::One => (u64::MAX, 0),
            Bit4::X => (u64::MAX, u64::MAX),
            Bit4::Z => (0, u64::MAX),
        };
        let mut vec = Self {
            size,
            abits: SmallVec::from_elem(a, words),
            bbits: SmallVec::from_elem(b, words),
        };
        vec.mask_tail();
        vec
    }

    /// Parse an MSB-first `01xz` string. Returns `None` on any other character.
    pub fn from_bin_str(text: &str) -> Option<Self> {
        let mut vec = Vector4::new(text.len(), Bit4::Zero);
        for (idx, ch) in text.bytes().rev().enumerate() {
            let bit = match ch {
                b'0' => Bit4::Zero,
                b'1' => Bit4::One,
                b'x' | b'X' => Bit4::X,
                b'z' | b'Z' => Bit4::Z,
                _ => return None,
            };
            vec.set_bit(idx, bit);
        }
        Some(vec)
    }

    fn mask_tail(&mut self) {
        let rem = self.size % 64;
        if rem != 0 {
            let mask = (1u64 << rem) - 1;
            if let Some(a) = self.abits.last_mut() {
                *a &= mask;
            }
            if let Some(b) = self.bbits.last_mut() {
                *b &= mask;
            }
        }
    }
}

impl BitVector for Vector4 {
    #[inline]
    fn size(&self) -> usize {
        self.size
    }

    #[inline]
    fn value(&self, idx: usize) -> Bit4 {
        assert!(idx < self.size, "bit {} out of range for width {}", idx, self.size);
        let (w, s) = (idx / 64, idx % 64);
        let a = (self.abits[w] >> s) & 1;
        let b = (self.bbits[w] >> s) & 1;
        match (a, b) {
            (0, 0) => Bit4::Zero,
            (1, 0) => Bit4::One,
            (1, 1) => Bit4::X,
            _ => Bit4::Z,
        }
    }

    #[inline]
    fn set_bit(&mut self, idx: usize, bit: Bit4) {
        assert!(idx < self.size, "bit {} out of range for width {}", idx, self.size);
        let (w, s) = (idx / 64, idx % 64);
        let (a, b) = match bit {
            Bit4::Zero => (0u64, 0u64),
            Bit4::One => (1, 0),
            Bit4::X => (1, 1),
            Bit4::Z => (0, 1),
        };
        self.abits[w] = (self.abits[w] & !(1u64 << s)) | (a << s);
        self.bbits[w] = (self.bbits[w] & !(1u64 << s)) | (b << s);
    }
}

impl fmt::Display for Vector4 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for idx in (0..self.size).rev() {
            write!(f, "{}", self.value(idx).to_char())?;
        }
        Ok(())
    }
}

impl fmt::Debug for Vector4 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Vector4({}'b{})", self.size, self)
    }
}
