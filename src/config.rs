//! Sketch configuration: precision, hash function and seed.
//!
//! With the `with_serde` feature the configuration can be read from a file,
//! any omitted field falls back to its default:
//!
//! ```json
//! { "precision": 12, "hasher": "wyhash", "seed": 42 }
//! ```

use crate::error::ConfigurationError;
use crate::hasher::{HashFunction, Murmur3, WyHash64};
use crate::hyperloglog::HyperLogLog;

/// Default precision: 16384 registers, 0.81% expected error
pub const DEFAULT_PRECISION: u8 = 14;

/// Hash algorithms selectable by configuration
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "with_serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "with_serde", serde(rename_all = "lowercase"))]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum HashAlgorithm {
    /// MurmurHash3 x86 32-bit
    #[default]
    Murmur3,
    /// wyhash 64-bit
    #[cfg_attr(feature = "cli", value(name = "wyhash"))]
    WyHash,
}

impl HashAlgorithm {
    /// Largest seed accepted by the hash function
    pub fn max_seed(self) -> u64 {
        match self {
            HashAlgorithm::Murmur3 => u64::from(u32::MAX),
            HashAlgorithm::WyHash => u64::MAX,
        }
    }

    /// Instantiate hash function with given seed
    pub fn with_seed(self, seed: u64) -> Result<HashFunction, ConfigurationError> {
        let max = self.max_seed();
        match self {
            HashAlgorithm::Murmur3 => u32::try_from(seed)
                .map(|seed| Murmur3::with_seed(seed).into())
                .map_err(|_| ConfigurationError::SeedOutOfRange { seed, max }),
            HashAlgorithm::WyHash => Ok(WyHash64::with_seed(seed).into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "with_serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "with_serde", serde(default, deny_unknown_fields))]
pub struct SketchConfig {
    /// Number of register index bits, in [4..18] range
    pub precision: u8,
    pub hasher: HashAlgorithm,
    /// Hash seed, Murmur3 accepts seeds up to `u32::MAX` only
    pub seed: u64,
}

impl Default for SketchConfig {
    fn default() -> Self {
        Self {
            precision: DEFAULT_PRECISION,
            hasher: HashAlgorithm::default(),
            seed: 0,
        }
    }
}

impl SketchConfig {
    /// Validate configuration and create an empty sketch
    pub fn build(&self) -> Result<HyperLogLog<HashFunction>, ConfigurationError> {
        HyperLogLog::with_hasher(self.precision, self.hasher.with_seed(self.seed)?)
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::hasher::ElementHasher;
    use test_case::test_case;

    #[test]
    fn test_default_build() {
        let sketch = SketchConfig::default().build().unwrap();
        assert_eq!(sketch.precision(), DEFAULT_PRECISION);
        assert_eq!(sketch.register_count(), 16384);
        assert_eq!(*sketch.hasher(), HashFunction::default());
    }

    #[test_case(HashAlgorithm::Murmur3 => 32)]
    #[test_case(HashAlgorithm::WyHash => 64)]
    fn test_hasher_width(hasher: HashAlgorithm) -> u32 {
        let config = SketchConfig {
            hasher,
            ..SketchConfig::default()
        };
        config.build().unwrap().hasher().width()
    }

    #[test]
    fn test_invalid_precision() {
        let config = SketchConfig {
            precision: 2,
            ..SketchConfig::default()
        };
        assert!(matches!(
            config.build(),
            Err(ConfigurationError::PrecisionOutOfRange { precision: 2, .. })
        ));
    }

    #[test]
    fn test_seed_is_applied() {
        let config = SketchConfig {
            seed: 7,
            ..SketchConfig::default()
        };
        let sketch = config.build().unwrap();
        assert_eq!(*sketch.hasher(), HashFunction::from(Murmur3::with_seed(7)));
    }

    #[test_case(HashAlgorithm::Murmur3, u64::from(u32::MAX) => true; "murmur3 max seed")]
    #[test_case(HashAlgorithm::Murmur3, 1 << 32 => false; "murmur3 seed overflow")]
    #[test_case(HashAlgorithm::WyHash, u64::MAX => true; "wyhash max seed")]
    fn test_seed_range(hasher: HashAlgorithm, seed: u64) -> bool {
        let config = SketchConfig {
            hasher,
            seed,
            ..SketchConfig::default()
        };
        match config.build() {
            Ok(_) => true,
            Err(e) => {
                assert_eq!(
                    e,
                    ConfigurationError::SeedOutOfRange {
                        seed,
                        max: u64::from(u32::MAX)
                    }
                );
                false
            }
        }
    }

    #[cfg(feature = "with_serde")]
    #[test_case("{}" => Some(SketchConfig::default()); "empty object")]
    #[test_case(r#"{"precision": 10}"# => Some(SketchConfig { precision: 10, ..SketchConfig::default() }); "precision only")]
    #[test_case(r#"{"precision": 12, "hasher": "wyhash", "seed": 42}"# => Some(SketchConfig { precision: 12, hasher: HashAlgorithm::WyHash, seed: 42 }); "all fields")]
    #[test_case(r#"{"hasher": "sha256"}"# => None; "unknown hasher")]
    #[test_case(r#"{"precision": 300}"# => None; "precision overflow")]
    #[test_case(r#"{"registers": 12}"# => None; "unknown field")]
    fn test_deserialize(json: &str) -> Option<SketchConfig> {
        serde_json::from_str(json).ok()
    }
}
