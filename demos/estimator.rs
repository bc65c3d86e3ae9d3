use hyperloglog_estimator::{CardinalityEstimator, InvalidPrecisionError};
use wyhash::wyhash;

fn main() -> Result<(), InvalidPrecisionError> {
    let mut estimator = CardinalityEstimator::new(12)?;
    for i in 0u64..10_000 {
        estimator.update(wyhash(&i.to_le_bytes(), 0));
    }
    println!("estimate = {:.0}", estimator.estimate());
    println!("raw estimate = {:.0}", estimator.raw_estimate());
    println!("empty registers = {}", estimator.num_zeros());

    // re-inserting the same values doesn't change the estimate
    for i in 0u64..10_000 {
        estimator.update(wyhash(&i.to_le_bytes(), 0));
    }
    println!("estimate after duplicates = {:.0}", estimator.estimate());

    for (rank, count) in estimator.histogram() {
        println!("rank {:>2}: {} registers", rank, count);
    }

    if let Err(e) = CardinalityEstimator::new(20) {
        println!("error: {}", e);
    }

    Ok(())
}
