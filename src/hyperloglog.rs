//! ## HyperLogLog sketch
//! Estimates the number of distinct elements using `M = 2^P` byte registers.
//!
//! [Original HyperLogLog paper](https://algo.inria.fr/flajolet/Publications/FlFuGaMe07.pdf)
//!
//! Hash layout for a `W`-bit hash:
//! - 0..P bits     - register index
//! - P..W bits     - rank source, rank is the 1-based position of the first set bit
//!   counting from bit `W - 1` downwards, or `W` if all of them are zero.
//!
//! Estimation:
//! - raw estimate `E = alpha * M^2 / sum(2^-register)`
//! - if `E <= 2.5 * M` and some registers are still zero, linear counting
//!   `M * ln(M / zeros)` is returned instead.
//! - no large range correction is applied, so estimates approaching the hash
//!   space saturation point (`2^W / 30`) are biased.
//! - `alpha` is 0.673 for every `P <= 16`, while the unbiased constant for
//!   `P >= 7` is about 0.7213. Above the linear counting range the raw estimate
//!   under-counts by about `1 - 0.673 / 0.7213`, i.e. 6.7%.
//!
//! Expected error in the linear counting range (`E <= 2.5 * M`) is `1.04 / sqrt(M)`:
//!   P = 10: 3.25%
//!   P = 12: 1.62%
//!   P = 14: 0.81%
//!   P = 18: 0.20%

use std::fmt::{Debug, Formatter};
use std::mem::{size_of, size_of_val};

use tracing::debug;

use crate::error::ConfigurationError;
use crate::hasher::{ElementHasher, HashFunction};

/// Minimum supported precision
pub const MIN_PRECISION: u8 = 4;
/// Maximum supported precision
pub const MAX_PRECISION: u8 = 18;
/// Number of distinct register values: ranks are bounded by the 64-bit hash width.
const RANK_VALUES: usize = 65;

/// HyperLogLog sketch owning its registers.
///
/// Single owner: `add` takes `&mut self`, so sharing between threads requires
/// external locking. See [`crate::atomic::AtomicHyperLogLog`] for lock-free ingestion.
#[derive(Clone, PartialEq)]
pub struct HyperLogLog<H: ElementHasher = HashFunction> {
    precision: u8,
    alpha: f64,
    registers: Vec<u8>,
    hasher: H,
}

impl<H: ElementHasher + Default> HyperLogLog<H> {
    /// Creates new sketch with `2^precision` registers and default hasher
    pub fn new(precision: u8) -> Result<Self, ConfigurationError> {
        Self::with_hasher(precision, H::default())
    }
}

impl<H: ElementHasher> HyperLogLog<H> {
    /// Creates new sketch with `2^precision` registers using given `hasher`
    pub fn with_hasher(precision: u8, hasher: H) -> Result<Self, ConfigurationError> {
        validate(precision, hasher.width())?;
        let m = 1usize << precision;
        debug!(precision, registers = m, width = hasher.width(), "creating sketch");

        Ok(Self {
            precision,
            alpha: alpha(precision),
            registers: vec![0; m],
            hasher,
        })
    }

    /// Insert element into the sketch
    #[inline]
    pub fn add<E: AsRef<[u8]> + ?Sized>(&mut self, element: &E) {
        let hash = self.hasher.hash_bytes(element.as_ref());
        self.add_hash(hash);
    }

    /// Insert already computed hash into the sketch.
    /// Bits above the hasher's width are ignored.
    #[inline]
    pub fn add_hash(&mut self, hash: u64) {
        let (idx, rank) = decode_hash(hash, self.precision, self.hasher.width());
        let register = &mut self.registers[idx];
        if rank > *register {
            *register = rank;
        }
    }

    /// Return cardinality estimate
    #[inline]
    pub fn count(&self) -> f64 {
        estimate(self.registers.iter().copied(), self.alpha)
    }

    /// Return raw HyperLogLog estimate without small range correction
    pub fn raw_estimate(&self) -> f64 {
        let histogram = histogram(self.registers.iter().copied());
        raw_estimate(&histogram, self.registers.len(), self.alpha)
    }

    /// Return whether no element was inserted yet
    pub fn is_empty(&self) -> bool {
        self.registers.iter().all(|&r| r == 0)
    }

    pub fn precision(&self) -> u8 {
        self.precision
    }

    /// Number of registers `2^precision`
    pub fn register_count(&self) -> usize {
        self.registers.len()
    }

    pub fn registers(&self) -> &[u8] {
        &self.registers
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn hasher(&self) -> &H {
        &self.hasher
    }

    /// Expected relative standard error `1.04 / sqrt(M)`.
    /// Holds in the linear counting range only, see the module documentation
    /// for the raw estimator bias at `P >= 7`.
    pub fn relative_error(&self) -> f64 {
        relative_error(self.precision)
    }

    /// Return memory size of the sketch
    pub fn size_of(&self) -> usize {
        size_of::<Self>() + size_of_val(self.registers.as_slice())
    }

    /// Build sketch around registers copied out of another representation
    pub(crate) fn from_parts(precision: u8, alpha: f64, registers: Vec<u8>, hasher: H) -> Self {
        Self {
            precision,
            alpha,
            registers,
            hasher,
        }
    }
}

impl<H: ElementHasher, E: AsRef<[u8]>> Extend<E> for HyperLogLog<H> {
    fn extend<I: IntoIterator<Item = E>>(&mut self, iter: I) {
        for element in iter {
            self.add(&element);
        }
    }
}

impl<H: ElementHasher> Debug for HyperLogLog<H> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{{ precision: {}, estimate: {:.2}, size: {} }}",
            self.precision,
            self.count(),
            self.size_of()
        )
    }
}

/// Check that `precision` is supported for a hash of `width` bits
pub(crate) fn validate(precision: u8, width: u32) -> Result<(), ConfigurationError> {
    if !(MIN_PRECISION..=MAX_PRECISION).contains(&precision) {
        return Err(ConfigurationError::PrecisionOutOfRange {
            precision,
            min: MIN_PRECISION,
            max: MAX_PRECISION,
        });
    }
    if width > 64 {
        return Err(ConfigurationError::RankOverflow { width });
    }
    if u32::from(precision) >= width {
        return Err(ConfigurationError::PrecisionExceedsHashWidth { precision, width });
    }
    Ok(())
}

/// Parameter for bias correction
#[inline]
pub(crate) fn alpha(precision: u8) -> f64 {
    match precision {
        0..=16 => 0.673,
        32 => 0.697,
        p => 0.7213 / (1.0 + 1.079 / ((1u64 << p) as f64)),
    }
}

/// Expected relative standard error for given precision,
/// valid while the estimate stays within `2.5 * 2^precision`
pub fn relative_error(precision: u8) -> f64 {
    1.04 / ((1u64 << precision) as f64).sqrt()
}

/// Split `W`-bit hash into register index and rank
#[inline]
pub(crate) fn decode_hash(hash: u64, precision: u8, width: u32) -> (usize, u8) {
    let hash = if width < 64 { hash & ((1 << width) - 1) } else { hash };
    let idx = (hash & ((1 << precision) - 1)) as usize;
    let rank = rank(hash >> precision, width - u32::from(precision), width);
    (idx, rank)
}

/// Position of the first set bit in the `bits` wide value `w`, counting from its top bit.
/// Zero value has rank `width`.
#[inline]
pub(crate) fn rank(w: u64, bits: u32, width: u32) -> u8 {
    if w == 0 {
        return width as u8;
    }
    (w.leading_zeros() - (64 - bits) + 1) as u8
}

/// Count registers per value
#[inline]
fn histogram(registers: impl Iterator<Item = u8>) -> [u32; RANK_VALUES] {
    let mut histogram = [0u32; RANK_VALUES];
    for r in registers {
        histogram[usize::from(r)] += 1;
    }
    histogram
}

/// Raw estimate from the register histogram.
///
/// The harmonic sum is accumulated from the highest rank down so that the
/// smallest terms are added first.
#[inline]
fn raw_estimate(histogram: &[u32; RANK_VALUES], m: usize, alpha: f64) -> f64 {
    let sum = histogram
        .iter()
        .enumerate()
        .rev()
        .filter(|(_, count)| **count > 0)
        .fold(0.0, |sum, (rank, &count)| {
            sum + f64::from(count) * 2f64.powi(-(rank as i32))
        });
    let m = m as f64;
    alpha * m * m / sum
}

/// Estimate cardinality from register values
pub(crate) fn estimate(registers: impl ExactSizeIterator<Item = u8>, alpha: f64) -> f64 {
    let m = registers.len();
    let histogram = histogram(registers);
    let estimate = raw_estimate(&histogram, m, alpha);

    if estimate <= 2.5 * m as f64 {
        let zeros = histogram[0];
        if zeros > 0 {
            let m = m as f64;
            return m * (m / f64::from(zeros)).ln();
        }
    }

    estimate
}
