//! Deterministic pseudo-random values derived from string keys.
//!
//! The value for a key is fixed forever: SHA-256 over the UTF-8 bytes of the key, the first six
//! hexadecimal digits of the digest (its first three bytes, big-endian) read as an unsigned
//! 24-bit integer, divided by `0xFFFFFF`. The result therefore lies in `[0.0, 1.0]`.
//!
//! Key construction belongs to the caller; see [`crate::context`] for the formats used by the
//! causal-context streams. Changing any key string changes every value derived from it.

use sha2::{Digest, Sha256};

/// Largest 24-bit value, the divisor that maps the digest prefix into `[0, 1]`.
pub const MAX_24_BIT: u32 = 0xFF_FFFF;

/// Returns the leading 24 bits of `SHA-256(key)` as an integer.
pub fn digest_prefix(key: &str) -> u32 {
    let digest = Sha256::digest(key.as_bytes());
    u32::from_be_bytes([0, digest[0], digest[1], digest[2]])
}

/// Derives a stable value in `[0.0, 1.0]` from `key`.
pub fn derive(key: &str) -> f64 {
    f64::from(digest_prefix(key)) / f64::from(MAX_24_BIT)
}
