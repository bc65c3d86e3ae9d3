#![no_main]

use hyperloglog_estimator::{CardinalityEstimator, MAX_PRECISION, MIN_PRECISION};
use libfuzzer_sys::fuzz_target;
use wyhash::wyhash;

fuzz_target!(|data: &[u8]| {
    let Some((&first, rest)) = data.split_first() else {
        return;
    };

    let precision = MIN_PRECISION + first % (MAX_PRECISION - MIN_PRECISION + 1);
    let mut estimator = CardinalityEstimator::new(precision).unwrap();
    let m = estimator.num_registers();

    // raw chunks exercise arbitrary bit patterns, hashed chunks exercise uniform values
    for chunk in rest.chunks(8) {
        let mut bytes = [0u8; 8];
        bytes[..chunk.len()].copy_from_slice(chunk);
        let zeros = estimator.num_zeros();

        estimator.update(u64::from_le_bytes(bytes));
        estimator.update(wyhash(chunk, 0));

        assert!(estimator.num_zeros() <= zeros);
        assert!(estimator.num_zeros() + 2 >= zeros);
        assert_eq!(estimator.histogram().values().sum::<usize>(), m);
        assert!(estimator.raw_estimate() > 0.0);
    }

    if estimator.num_zeros() == m {
        assert_eq!(estimator.estimate(), 0.0);
    }
});
