//! `cardinality-sketch` estimates the number of distinct elements in a stream or dataset,
//! e.g. distinct client addresses in access logs, using a fixed amount of memory.
//!
//! The estimator is a HyperLogLog sketch with `2^P` byte registers and small range
//! (linear counting) correction. Expected relative error is `1.04 / sqrt(2^P)` up to
//! `2.5 * 2^P` distinct elements; above that the raw estimator under-counts by about
//! 6.7% for `P` in [7..16].
//!
//! ```
//! use cardinality_sketch::{HashFunction, HyperLogLog};
//!
//! let mut sketch = HyperLogLog::<HashFunction>::new(10).unwrap();
//! for i in 0..1000 {
//!     sketch.add(&i.to_string());
//! }
//! let estimate = sketch.count();
//! assert!((950.0..=1050.0).contains(&estimate));
//! ```
pub mod atomic;
pub mod config;
pub mod error;
pub mod exact;
pub mod hasher;
pub mod hyperloglog;
#[cfg(feature = "cli")]
pub mod report;
#[cfg(feature = "cli")]
pub mod source;

pub use atomic::AtomicHyperLogLog;
pub use config::{HashAlgorithm, SketchConfig};
pub use error::{ConfigurationError, Error};
pub use hasher::{ElementHasher, HashFunction, Murmur3, WyHash64};
pub use hyperloglog::HyperLogLog;
