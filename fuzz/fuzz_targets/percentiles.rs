#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        if let Ok(percentiles) = route_metrics::fuzzing::parse_percentiles_input(input) {
            let sorted = [1_u64, 2, 3, 5, 8, 13, 21];
            for value in percentiles.compute(&sorted) {
                debug_assert!(value.is_some());
            }
        }
        let _ = route_metrics::fuzzing::parse_bool_input(input);
        let _ = route_metrics::fuzzing::parse_output_input(input);
    }
});
