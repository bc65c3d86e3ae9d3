//! `hyperloglog-estimator` is a Rust crate designed to estimate the number of distinct 64-bit values in a stream.
//!
//! This library uses HyperLogLog with a fixed register array sized by precision `b`, so memory does not grow
//! with the number of distinct values. Values are expected to be hashed by the caller.
//!
//! ```
//! use hyperloglog_estimator::CardinalityEstimator;
//!
//! let mut estimator = CardinalityEstimator::new(12).unwrap();
//! for i in 0..1000u64 {
//!     estimator.update(i.wrapping_mul(0x9e37_79b9_7f4a_7c15));
//! }
//! assert!(estimator.estimate() > 0.0);
//! ```
mod error;
pub mod estimator;

pub use error::InvalidPrecisionError;
pub use estimator::{CardinalityEstimator, DEFAULT_PRECISION, MAX_PRECISION, MIN_PRECISION};
