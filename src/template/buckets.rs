use std::collections::BTreeMap;

use crate::processor::{RouteKey, RunMetrics, StatusTimes};

use super::Template;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BucketOrigin {
    /// Named by a template rule.
    Template,
    /// A route no rule matched, named after its signature.
    Raw,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bucket {
    pub name: String,
    pub origin: BucketOrigin,
    pub times: StatusTimes,
}

impl Template {
    /// Regroups a run's routes into buckets.
    ///
    /// Template buckets come first, in template order, and only when they
    /// received samples. Unmatched routes follow in ascending signature
    /// order.
    #[must_use]
    pub fn bucketize(&self, metrics: &RunMetrics) -> Vec<Bucket> {
        let mut named: Vec<Option<StatusTimes>> = vec![None; self.bucket_names.len()];
        let mut raw: BTreeMap<&str, StatusTimes> = BTreeMap::new();

        for (signature, times) in metrics.iter() {
            let mut matched = false;
            if let Some(key) = RouteKey::parse(signature) {
                for rule in self.rules.iter().filter(|rule| rule.matches(&key)) {
                    if let Some(slot) = named.get_mut(rule.bucket()) {
                        slot.get_or_insert_with(StatusTimes::default).merge(times);
                        matched = true;
                    }
                }
            }
            if !matched {
                raw.entry(signature).or_default().merge(times);
            }
        }

        let template_buckets = self
            .bucket_names
            .iter()
            .zip(named)
            .filter_map(|(name, times)| {
                times.map(|times| Bucket {
                    name: name.clone(),
                    origin: BucketOrigin::Template,
                    times,
                })
            });
        let raw_buckets = raw.into_iter().map(|(signature, times)| Bucket {
            name: signature.to_owned(),
            origin: BucketOrigin::Raw,
            times,
        });
        template_buckets.chain(raw_buckets).collect()
    }
}
