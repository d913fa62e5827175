#![no_main]

use cardinality_sketch::SketchConfig;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(config) = serde_json::from_slice::<SketchConfig>(data) {
        if let Ok(mut sketch) = config.build() {
            sketch.add(data);
            assert!(sketch.count() > 0.0);
        }
    }
});
