//! ## Atomic HyperLogLog
//! HyperLogLog sketch which can be shared between threads without locking.
//!
//! Ingestion only ever raises a single register to the maximum of its current
//! value and the new rank, so every update is one `fetch_max` on an `AtomicU8`.
//! Updates of different elements are independent and need no ordering between
//! each other, hence all register accesses use `Ordering::Relaxed`.
//!
//! `count` observes each register at some point during the call: an estimate
//! taken concurrently with ingestion reflects a subset of the in-flight updates.

use std::fmt::{Debug, Formatter};
use std::sync::atomic::{AtomicU8, Ordering};

use tracing::debug;

use crate::error::ConfigurationError;
use crate::hasher::{ElementHasher, HashFunction};
use crate::hyperloglog::{alpha, decode_hash, estimate, validate, HyperLogLog};

pub struct AtomicHyperLogLog<H: ElementHasher = HashFunction> {
    precision: u8,
    alpha: f64,
    registers: Box<[AtomicU8]>,
    hasher: H,
}

impl<H: ElementHasher + Default> AtomicHyperLogLog<H> {
    /// Creates new sketch with `2^precision` registers and default hasher
    pub fn new(precision: u8) -> Result<Self, ConfigurationError> {
        Self::with_hasher(precision, H::default())
    }
}

impl<H: ElementHasher> AtomicHyperLogLog<H> {
    /// Creates new sketch with `2^precision` registers using given `hasher`
    pub fn with_hasher(precision: u8, hasher: H) -> Result<Self, ConfigurationError> {
        validate(precision, hasher.width())?;
        let m = 1usize << precision;
        debug!(precision, registers = m, width = hasher.width(), "creating atomic sketch");

        Ok(Self {
            precision,
            alpha: alpha(precision),
            registers: (0..m).map(|_| AtomicU8::new(0)).collect(),
            hasher,
        })
    }

    /// Insert element into the sketch
    #[inline]
    pub fn add<E: AsRef<[u8]> + ?Sized>(&self, element: &E) {
        let hash = self.hasher.hash_bytes(element.as_ref());
        self.add_hash(hash);
    }

    /// Insert already computed hash into the sketch
    #[inline]
    pub fn add_hash(&self, hash: u64) {
        let (idx, rank) = decode_hash(hash, self.precision, self.hasher.width());
        self.registers[idx].fetch_max(rank, Ordering::Relaxed);
    }

    /// Return cardinality estimate
    pub fn count(&self) -> f64 {
        estimate(self.load_registers(), self.alpha)
    }

    pub fn precision(&self) -> u8 {
        self.precision
    }

    /// Number of registers `2^precision`
    pub fn register_count(&self) -> usize {
        self.registers.len()
    }

    /// Copy current register values into a single owner sketch
    pub fn snapshot(&self) -> HyperLogLog<H>
    where
        H: Clone,
    {
        HyperLogLog::from_parts(
            self.precision,
            self.alpha,
            self.load_registers().collect(),
            self.hasher.clone(),
        )
    }

    #[inline]
    fn load_registers(&self) -> impl ExactSizeIterator<Item = u8> + '_ {
        self.registers.iter().map(|r| r.load(Ordering::Relaxed))
    }
}

impl<H: ElementHasher + Clone> From<HyperLogLog<H>> for AtomicHyperLogLog<H> {
    fn from(sketch: HyperLogLog<H>) -> Self {
        Self {
            precision: sketch.precision(),
            alpha: sketch.alpha(),
            registers: sketch.registers().iter().map(|&r| AtomicU8::new(r)).collect(),
            hasher: sketch.hasher().clone(),
        }
    }
}

impl<H: ElementHasher> Debug for AtomicHyperLogLog<H> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{{ precision: {}, estimate: {:.2} }}",
            self.precision,
            self.count()
        )
    }
}
