use std::thread;

use cardinality_sketch::{AtomicHyperLogLog, HashFunction, HyperLogLog, WyHash64};

fn main() {
    let mut sketch = HyperLogLog::<HashFunction>::new(12).unwrap();
    for i in 0..10 {
        sketch.add(&i.to_string());
    }
    println!("sketch estimate = {:.2}", sketch.count());

    for i in 0..100_000 {
        sketch.add(&format!("10.{}.{}.{}", i / 65536, (i / 256) % 256, i % 256));
    }
    println!(
        "sketch estimate = {:.2} (expected error {:.2}%)",
        sketch.count(),
        100.0 * sketch.relative_error()
    );

    let shared = AtomicHyperLogLog::with_hasher(14, WyHash64::with_seed(42)).unwrap();
    thread::scope(|s| {
        for t in 0..4 {
            let shared = &shared;
            s.spawn(move || {
                for i in 0..25_000u64 {
                    shared.add(&(t * 25_000 + i).to_le_bytes());
                }
            });
        }
    });
    println!("shared estimate = {:.2}", shared.count());
}
