#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        if let Ok(record) = route_metrics::processor::parse_record(input) {
            if let route_metrics::processor::RecordKind::Metrics(entry) = record.kind {
                let signature = entry.signature();
                if let Some(key) = route_metrics::processor::RouteKey::parse(&signature) {
                    debug_assert_eq!(key.method, entry.method);
                }
            }
        }
    }
});
