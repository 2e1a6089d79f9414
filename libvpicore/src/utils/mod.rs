mod idpool;
mod interner;

pub use idpool::IDPool;
pub use interner::{DEFAULT_CHUNK_SIZE, StringInterner, Symbol};

/// Number of 32-bit words needed for `size` bits.
pub const fn cover_with_32(size: usize) -> usize {
    size.div_ceil(32)
}

/// `10^exp` as an `f64`, for time-scale conversions.
#[inline]
pub fn pow10(exp: i32) -> f64 {
    10f64.powi(exp)
}

/// Reads a boolean switch from the environment: `1` or `true` enable it.
pub fn env_flag(name: &str) -> Option<bool> {
    std::env::var(name).ok().map(|v| v == "1" || v == "true")
}
