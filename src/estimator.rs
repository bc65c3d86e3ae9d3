//! Cardinality estimator allows to estimate number of distinct 64-bit values
//! in the stream and is defined with runtime precision parameter `b`:
//! - `b`: precision in [4..16] range, which defines number of low bits
//!   used as HyperLogLog register index, giving `m = 2^b` registers.
//!
//! Values passed to [`CardinalityEstimator::update`] are expected to be already
//! hashed into roughly uniform 64-bit values by the caller.
//!
//! # Data-structure design rationale
//!
//! ## Bounded memory
//! Registers are stored as a boxed `u8` slice allocated once at construction,
//! so memory never grows with the number of distinct values:
//! - b = 4: 16 bytes of registers
//! - b = 12: 4096 bytes of registers
//! - b = 16: 65536 bytes of registers
//!
//! The largest rank a register can hold is `65 - b` (all rank bits are zero),
//! which always fits into `u8`.
//!
//! ## Value layout
//! - 0..b bits     - register index `j`
//! - b..63 bits    - rank region, the register stores the 1-indexed position
//!   of its first set bit counting from the most significant bit
//!
//! ## Accuracy
//! Expected relative error is `1.04 / sqrt(m)`:
//!   b = 4: 1.04 / sqrt(2^4) = 26%
//!   b = 10: 1.04 / sqrt(2^10) = 3.25%
//!   b = 12: 1.04 / sqrt(2^12) = 1.62%
//!   b = 16: 1.04 / sqrt(2^16) = 0.41%
//!
//! # Estimate corrections
//! Raw harmonic mean estimate is corrected in three ranges:
//! - small range (`E <= 2.5 * m`): linear counting over empty registers
//! - large range (`E > 2^32 / 30`): 32-bit hash space saturation correction
//! - mid range: raw estimate as is
//!
//! The large range correction keeps the `2^32` constant of the original
//! 32-bit HyperLogLog formulation even though 64-bit values are accepted.
//! Raw estimates at `2^32` or above therefore produce `inf` or `NaN`.
//!
//! [Original HyperLogLog paper](https://algo.inria.fr/flajolet/Publications/FlFuGaMe07.pdf)

use std::collections::BTreeMap;
use std::fmt::{Debug, Formatter};
use std::mem::{size_of, size_of_val};

use crate::error::InvalidPrecisionError;

/// Smallest supported precision
pub const MIN_PRECISION: u8 = 4;
/// Largest supported precision
pub const MAX_PRECISION: u8 = 16;
/// Precision used by `CardinalityEstimator::default()`
pub const DEFAULT_PRECISION: u8 = 12;

/// Size of the 32-bit hash space used by the large range correction.
const HASH_SPACE: f64 = 4_294_967_296.0;

/// Correction range selected by `estimate` for a raw estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Range {
    Small,
    Mid,
    Large,
}

/// HyperLogLog estimator over pre-hashed `u64` values.
#[derive(Clone, PartialEq, Eq)]
pub struct CardinalityEstimator {
    /// Number of low bits used as register index
    precision: u8,
    /// Number of registers, `2^precision`
    m: usize,
    /// Register ranks, never resized after construction
    registers: Box<[u8]>,
}

impl CardinalityEstimator {
    /// Creates new instance of `CardinalityEstimator` with `2^precision` zeroed registers.
    ///
    /// Returns [`InvalidPrecisionError`] when `precision` is not in
    /// `[MIN_PRECISION..=MAX_PRECISION]`.
    pub fn new(precision: u8) -> Result<Self, InvalidPrecisionError> {
        if !(MIN_PRECISION..=MAX_PRECISION).contains(&precision) {
            tracing::debug!(precision, "rejected estimator precision");
            return Err(InvalidPrecisionError { precision });
        }
        let estimator = Self::zeroed(precision);
        tracing::trace!(precision, registers = estimator.m, "created estimator");
        Ok(estimator)
    }

    /// Allocate zeroed registers for an already validated `precision`.
    fn zeroed(precision: u8) -> Self {
        let m = 1usize << precision;
        Self {
            precision,
            m,
            registers: vec![0u8; m].into_boxed_slice(),
        }
    }

    /// Insert pre-hashed value into `CardinalityEstimator`
    #[inline]
    pub fn update(&mut self, value: u64) {
        let (idx, rank) = self.decode(value);
        let register = &mut self.registers[idx];
        if rank > *register {
            *register = rank;
        }
    }

    /// Return register index and rank of the given value
    #[inline]
    fn decode(&self, value: u64) -> (usize, u8) {
        let idx = (value & ((1u64 << self.precision) - 1)) as usize;
        // `value >> precision` has at least `precision` leading zeros, so this never underflows
        let rank = (value >> self.precision).leading_zeros() - u32::from(self.precision) + 1;
        (idx, rank as u8)
    }

    /// Return corrected cardinality estimate
    pub fn estimate(&self) -> f64 {
        let raw = self.raw_estimate();
        let (range, estimate) = self.correct(raw);
        tracing::trace!(raw, estimate, range = ?range, "estimated cardinality");
        estimate
    }

    /// Apply small or large range correction to `raw` estimate
    fn correct(&self, raw: f64) -> (Range, f64) {
        let m = self.m as f64;
        if raw <= 2.5 * m {
            let zeros = self.num_zeros();
            if zeros != 0 {
                (Range::Small, m * (m / zeros as f64).ln())
            } else {
                (Range::Small, raw)
            }
        } else if raw > HASH_SPACE / 30.0 {
            (Range::Large, -HASH_SPACE * (-raw / HASH_SPACE).ln_1p())
        } else {
            (Range::Mid, raw)
        }
    }

    /// Return uncorrected harmonic mean estimate `alpha * m^2 / sum(2^-register)`
    pub fn raw_estimate(&self) -> f64 {
        let m = self.m as f64;
        let sum: f64 = self
            .registers
            .iter()
            .map(|&rank| 2f64.powi(-i32::from(rank)))
            .sum();
        alpha(self.m) * m * m / sum
    }

    /// Return bias correction constant for this estimator's number of registers
    #[inline]
    pub fn alpha(&self) -> f64 {
        alpha(self.m)
    }

    /// Return number of registers which were never updated
    pub fn num_zeros(&self) -> usize {
        self.registers.iter().filter(|&&rank| rank == 0).count()
    }

    /// Return map of register value to the number of registers holding it.
    ///
    /// The map is built on every call and owned by the caller; counts always sum up to `m`.
    pub fn histogram(&self) -> BTreeMap<u8, usize> {
        let mut histogram = BTreeMap::new();
        for &rank in self.registers.iter() {
            *histogram.entry(rank).or_insert(0) += 1;
        }
        histogram
    }

    /// Return precision `b` the estimator was created with
    #[inline]
    pub fn precision(&self) -> u8 {
        self.precision
    }

    /// Return number of registers `m = 2^b`
    #[inline]
    pub fn num_registers(&self) -> usize {
        self.m
    }

    /// Return theoretical relative standard error `1.04 / sqrt(m)`
    pub fn standard_error(&self) -> f64 {
        1.04 / (self.m as f64).sqrt()
    }

    /// Return memory size of `CardinalityEstimator`
    pub fn size_of(&self) -> usize {
        size_of::<Self>() + size_of_val(&*self.registers)
    }
}

impl Default for CardinalityEstimator {
    fn default() -> Self {
        Self::zeroed(DEFAULT_PRECISION)
    }
}

impl Extend<u64> for CardinalityEstimator {
    fn extend<I: IntoIterator<Item = u64>>(&mut self, iter: I) {
        iter.into_iter().for_each(|value| self.update(value));
    }
}

impl Debug for CardinalityEstimator {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{{ precision: {}, estimate: {:.2}, size: {} }}",
            self.precision,
            self.estimate(),
            self.size_of()
        )
    }
}

/// Parameter for bias correction
#[inline]
fn alpha(m: usize) -> f64 {
    match m {
        16 => 0.673,
        32 => 0.697,
        64 => 0.709,
        _ => 0.7213 / (1.0 + 1.079 / (m as f64)),
    }
}
