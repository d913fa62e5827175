//! ## Element hashers
//! Map element bytes to a uniformly distributed integer of a fixed width `W`.
//!
//! The sketch takes the low `P` bits of a hash as register index and the
//! remaining `W - P` bits for rank estimation, so every bit of the output
//! must be independent of the others. Both provided hashers are
//! non-cryptographic, deterministic for a fixed seed, and total over any input.
//!
//! - [`Murmur3`]: MurmurHash3 x86 32-bit, `W = 32`.
//! - [`WyHash64`]: wyhash, `W = 64`.
//! - [`HashFunction`]: one of the above, selected at runtime.

use std::io::Cursor;

use enum_dispatch::enum_dispatch;

/// Hash function used by the sketch to turn elements into integers.
#[enum_dispatch]
pub trait ElementHasher {
    /// Hash `bytes`. Only the lowest `width()` bits of the result are significant.
    fn hash_bytes(&self, bytes: &[u8]) -> u64;

    /// Number of significant bits produced by `hash_bytes`.
    fn width(&self) -> u32;
}

/// MurmurHash3 x86 32-bit hasher
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Murmur3 {
    seed: u32,
}

impl Murmur3 {
    pub fn with_seed(seed: u32) -> Self {
        Self { seed }
    }
}

impl ElementHasher for Murmur3 {
    #[inline]
    fn hash_bytes(&self, bytes: &[u8]) -> u64 {
        // Reading from an in-memory cursor never fails.
        let hash = murmur3::murmur3_32(&mut Cursor::new(bytes), self.seed).unwrap_or_default();
        u64::from(hash)
    }

    #[inline]
    fn width(&self) -> u32 {
        32
    }
}

/// wyhash 64-bit hasher
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WyHash64 {
    seed: u64,
}

impl WyHash64 {
    pub fn with_seed(seed: u64) -> Self {
        Self { seed }
    }
}

impl ElementHasher for WyHash64 {
    #[inline]
    fn hash_bytes(&self, bytes: &[u8]) -> u64 {
        wyhash::wyhash(bytes, self.seed)
    }

    #[inline]
    fn width(&self) -> u32 {
        64
    }
}

/// Hashers supported by runtime configuration
#[enum_dispatch(ElementHasher)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashFunction {
    Murmur3(Murmur3),
    WyHash64(WyHash64),
}

impl Default for HashFunction {
    fn default() -> Self {
        HashFunction::Murmur3(Murmur3::default())
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use test_case::test_case;

    // Reference values of MurmurHash3 x86_32 with seed 0.
    #[test_case(b"" => 0; "empty input")]
    #[test_case(b"a" => 0x3c2569b2; "single byte")]
    #[test_case(b"hello" => 0x248bfa47; "short string")]
    fn test_murmur3_reference_values(input: &[u8]) -> u64 {
        Murmur3::default().hash_bytes(input)
    }

    #[test]
    fn test_murmur3_fits_width() {
        let hasher = Murmur3::with_seed(42);
        for i in 0..10_000u32 {
            let h = hasher.hash_bytes(&i.to_le_bytes());
            assert!(h < 1 << hasher.width());
        }
    }

    #[test]
    fn test_deterministic() {
        let functions = [
            HashFunction::from(Murmur3::with_seed(7)),
            HashFunction::from(WyHash64::with_seed(7)),
        ];
        for f in functions {
            assert_eq!(f.hash_bytes(b"10.0.0.1"), f.hash_bytes(b"10.0.0.1"));
            assert_ne!(f.hash_bytes(b"10.0.0.1"), f.hash_bytes(b"10.0.0.2"));
        }
    }

    #[test]
    fn test_seed_changes_output() {
        assert_ne!(
            WyHash64::with_seed(1).hash_bytes(b"item"),
            WyHash64::with_seed(2).hash_bytes(b"item")
        );
        assert_ne!(
            Murmur3::with_seed(1).hash_bytes(b"item"),
            Murmur3::with_seed(2).hash_bytes(b"item")
        );
    }

    #[test]
    fn test_dispatch_matches_inner_hasher() {
        let inner = WyHash64::with_seed(3);
        let f = HashFunction::from(inner);
        assert_eq!(f.width(), 64);
        assert_eq!(f.hash_bytes(b"x"), inner.hash_bytes(b"x"));
        assert_eq!(HashFunction::default().width(), 32);
    }

    #[test]
    fn test_low_bits_uniform() {
        // Low 4 bits select one of 16 buckets; each should get roughly 1/16 of the hashes.
        for f in [HashFunction::default(), WyHash64::default().into()] {
            let mut buckets = [0usize; 16];
            for i in 0..16_000 {
                buckets[(f.hash_bytes(i.to_string().as_bytes()) & 15) as usize] += 1;
            }
            for count in buckets {
                assert!((800..1200).contains(&count), "bucket count {count}");
            }
        }
    }
}
