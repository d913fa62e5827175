//! Error types returned by sketch construction and the log comparison tooling.

use thiserror::Error;

/// Invalid sketch configuration, reported by sketch constructors.
///
/// Construction either succeeds with a fully initialized sketch or fails with
/// this error before any register is allocated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("precision {precision} is outside of supported range [{min}..={max}]")]
    PrecisionOutOfRange { precision: u8, min: u8, max: u8 },

    #[error("precision {precision} leaves no rank bits in a {width}-bit hash")]
    PrecisionExceedsHashWidth { precision: u8, width: u32 },

    #[error("{width}-bit hash ranks do not fit into a register byte")]
    RankOverflow { width: u32 },

    #[error("seed {seed} exceeds the {max} maximum of the selected hasher")]
    SeedOutOfRange { seed: u64, max: u64 },
}

/// Top level error of the crate.
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration file: {0}")]
    ConfigFile(String),

    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
