//! Permanent string storage for object names.
//!
//! Strings are copied into fixed-size chunks and never freed for the life of
//! the interner. `intern_name` adds a lossy dedup table in front of that: a hit
//! hands back the earlier copy, a miss (or a collision) stores a fresh copy and
//! takes over the bucket. Earlier copies stay valid, they just stop being found.

use std::fmt;

pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;
const HASH_SIZE: usize = 4096;

/// Stable reference to an interned string.
///
/// Two symbols compare equal only if they point at the same stored copy, which
/// is what identity comparison of dedup'd names relies on.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Symbol {
    chunk: u32,
    offset: u32,
    len: u32,
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({}:{}+{})", self.chunk, self.offset, self.len)
    }
}

pub struct StringInterner {
    chunks: Vec<String>,
    chunk_size: usize,
    buckets: Box<[Option<Symbol>]>,
}

impl Default for StringInterner {
    fn default() -> Self {
        Self::new()
    }
}

impl StringInterner {
    pub fn new() -> Self {
        Self::with_chunk_size(DEFAULT_CHUNK_SIZE)
    }

    pub fn with_chunk_size(chunk_size: usize) -> Self {
        assert!(chunk_size > 0, "string chunk size must be non-zero");
        Self {
            chunks: vec![String::with_capacity(chunk_size)],
            chunk_size,
            buckets: vec![None; HASH_SIZE].into_boxed_slice(),
        }
    }

    /// Copy `text` into the arena. Never dedups.
    pub fn intern(&mut self, text: &str) -> Symbol {
        let len = text.len();
        if len > self.chunk_size {
            crate::contract_violation!(
                "interned string of {} bytes exceeds the {} byte chunk size",
                len,
                self.chunk_size
            );
        }

        let fill = self.chunks.last().map_or(self.chunk_size, String::len);
        if len > self.chunk_size - fill {
            #[cfg(feature = "debug")]
            log::debug!("[StringInterner::intern] new chunk #{}", self.chunks.len());

            self.chunks.push(String::with_capacity(self.chunk_size));
        }

        let chunk = self.chunks.len() - 1;
        let buf = &mut self.chunks[chunk];
        let offset = buf.len();
        buf.push_str(text);

        Symbol {
            chunk: to_u32(chunk, "chunk index"),
            offset: to_u32(offset, "chunk offset"),
            len: to_u32(len, "string length"),
        }
    }

    /// Dedup'd intern used for object names.
    pub fn intern_name(&mut self, text: &str) -> Symbol {
        let bucket = hash_string(text) as usize % HASH_SIZE;
        if let Some(sym) = self.buckets[bucket] {
            if self.resolve(sym) == text {
                return sym;
            }
        }

        let sym = self.intern(text);
        self.buckets[bucket] = Some(sym);
        sym
    }

    pub fn resolve(&self, sym: Symbol) -> &str {
        let start = sym.offset as usize;
        &self.chunks[sym.chunk as usize][start..start + sym.len as usize]
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }
}

fn hash_string(text: &str) -> u32 {
    text.bytes()
        .fold(0u32, |h, ch| (h << 4) ^ (h >> 28) ^ ch as u32)
}

fn to_u32(value: usize, what: &str) -> u32 {
    match u32::try_from(value) {
        Ok(v) => v,
        Err(_) => crate::contract_violation!("interner {} {} does not fit in 32 bits", what, value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[should_panic(expected = "does not fit in 32 bits")]
    fn test_symbol_field_overflow() {
        to_u32(u32::MAX as usize + 1, "chunk offset");
    }

    #[test]
    fn test_intern_name_dedups() {
        let mut strings = StringInterner::new();
        let a = strings.intern_name("clk");
        let b = strings.intern_name("clk");
        assert_eq!(a, b);
        assert_eq!(strings.resolve(a), "clk");
    }

    #[test]
    fn test_plain_intern_never_dedups() {
        let mut strings = StringInterner::new();
        let a = strings.intern("clk");
        let b = strings.intern("clk");
        assert_ne!(a, b);
        assert_eq!(strings.resolve(a), strings.resolve(b));
    }

    #[test]
    fn test_colliding_names_stay_distinct() {
        // "abq" and "aca" land in the same bucket.
        assert_eq!(
            hash_string("abq") as usize % HASH_SIZE,
            hash_string("aca") as usize % HASH_SIZE
        );

        let mut strings = StringInterner::new();
        let abq = strings.intern_name("abq");
        let aca = strings.intern_name("aca");
        assert_ne!(abq, aca);
        assert_eq!(strings.resolve(abq), "abq");
        assert_eq!(strings.resolve(aca), "aca");

        // The bucket now belongs to "aca": "abq" gets a fresh, still correct copy.
        let abq_again = strings.intern_name("abq");
        assert_ne!(abq, abq_again);
        assert_eq!(strings.resolve(abq_again), "abq");
        assert_eq!(strings.resolve(abq), "abq");
    }

    #[test]
    fn test_chunk_rollover_keeps_old_strings() {
        let mut strings = StringInterner::with_chunk_size(8);
        let first = strings.intern("abcde");
        let second = strings.intern("fghij");
        assert_eq!(strings.chunk_count(), 2);
        assert_eq!(strings.resolve(first), "abcde");
        assert_eq!(strings.resolve(second), "fghij");

        let exact = strings.intern("klm");
        assert_eq!(strings.chunk_count(), 2);
        assert_eq!(strings.resolve(exact), "klm");
    }

    #[test]
    #[should_panic(expected = "exceeds")]
    fn test_oversized_string_is_fatal() {
        let mut strings = StringInterner::with_chunk_size(4);
        strings.intern("too long");
    }
}
