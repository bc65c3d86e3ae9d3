//! Errors returned by `CardinalityEstimator` construction.

use thiserror::Error;

use crate::estimator::{MAX_PRECISION, MIN_PRECISION};

/// Returned when an estimator is requested with a precision outside
/// `[MIN_PRECISION..=MAX_PRECISION]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("precision {precision} is out of range [{MIN_PRECISION}..={MAX_PRECISION}]")]
pub struct InvalidPrecisionError {
    /// The rejected precision.
    pub precision: u8,
}
