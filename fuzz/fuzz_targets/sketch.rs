#![no_main]

use cardinality_sketch::{AtomicHyperLogLog, HashFunction, HyperLogLog};
use libfuzzer_sys::fuzz_target;
use wyhash::wyhash;

fuzz_target!(|data: &[u8]| {
    if data.is_empty() {
        return;
    }

    let precision = 4 + (wyhash(data, 0) % 15) as u8;
    let mut sketch = HyperLogLog::<HashFunction>::new(precision).unwrap();
    let shared = AtomicHyperLogLog::<HashFunction>::new(precision).unwrap();
    let mut previous = sketch.registers().to_vec();

    for chunk in data.chunks(4) {
        sketch.add(chunk);
        shared.add(chunk);
        assert!(sketch.count() > 0.0);
        assert!(sketch.count().is_finite());
        for (old, new) in previous.iter().zip(sketch.registers()) {
            assert!(new >= old);
        }
        previous.copy_from_slice(sketch.registers());
    }

    assert_eq!(shared.snapshot(), sketch);
});
