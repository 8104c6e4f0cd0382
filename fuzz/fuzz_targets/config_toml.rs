#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        if let Ok(args) = route_metrics::fuzzing::apply_config_from_toml(input) {
            if let Some(percentiles) = args.percentiles.as_ref() {
                debug_assert!(!percentiles.values().is_empty());
                for value in percentiles.values() {
                    debug_assert!((0.0..=1.0).contains(value));
                }
            }
        }
    }
});
