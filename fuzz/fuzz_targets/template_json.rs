#![no_main]

use libfuzzer_sys::fuzz_target;
use route_metrics::processor::RunMetrics;

fuzz_target!(|data: &[u8]| {
    let Ok(document) = serde_json::from_slice::<serde_json::Value>(data) else {
        return;
    };
    if let Ok(template) = route_metrics::template::Template::from_value(&document) {
        let mut metrics = RunMetrics::default();
        metrics.record("GET http://localhost:80/".to_owned(), 200, 10);
        metrics.record("POST https://localhost:443/items/1".to_owned(), 201, 20);
        metrics.record("not a signature".to_owned(), 500, 30);
        let buckets = template.bucketize(&metrics);
        debug_assert!(buckets.iter().map(|bucket| bucket.times.sample_count()).sum::<usize>() >= 3);
    }
});
