use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::record::{HeaderEntry, PatchEntry};

/// Elapsed-time samples of one route, grouped by response status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusTimes(BTreeMap<u16, Vec<u64>>);

impl StatusTimes {
    pub fn push(&mut self, status: u16, elapsed_us: u64) {
        self.0.entry(status).or_default().push(elapsed_us);
    }

    /// Appends every sample of `other`, status by status.
    pub fn merge(&mut self, other: &Self) {
        for (status, times) in &other.0 {
            self.0.entry(*status).or_default().extend_from_slice(times);
        }
    }

    #[must_use]
    pub fn get(&self, status: u16) -> Option<&[u64]> {
        self.0.get(&status).map(Vec::as_slice)
    }

    /// Status groups in ascending status order.
    pub fn iter(&self) -> impl Iterator<Item = (u16, &[u64])> {
        self.0.iter().map(|(status, times)| (*status, times.as_slice()))
    }

    #[must_use]
    pub fn sample_count(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }
}

/// Route signature to status-grouped samples for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunMetrics(BTreeMap<String, StatusTimes>);

impl RunMetrics {
    pub fn record(&mut self, signature: String, status: u16, elapsed_us: u64) {
        self.0.entry(signature).or_default().push(status, elapsed_us);
    }

    #[must_use]
    pub fn get(&self, signature: &str) -> Option<&StatusTimes> {
        self.0.get(signature)
    }

    /// Routes in ascending signature order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &StatusTimes)> {
        self.0.iter().map(|(signature, times)| (signature.as_str(), times))
    }

    #[must_use]
    pub fn route_count(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn sample_count(&self) -> usize {
        self.0.values().map(StatusTimes::sample_count).sum()
    }
}

impl FromIterator<(String, StatusTimes)> for RunMetrics {
    fn from_iter<T: IntoIterator<Item = (String, StatusTimes)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeaderRecord {
    pub ts: u64,
    pub entry: HeaderEntry,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatchRecord {
    pub ts: u64,
    pub entry: PatchEntry,
}

/// A record whose `type` is not one the processor understands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnknownRecord {
    pub ts: u64,
    #[serde(rename = "type")]
    pub kind: String,
    pub entry: Value,
}

/// Aggregated state of one monitoring session, from its header record to
/// the next header or the end of the log.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub header: HeaderRecord,
    pub metrics: RunMetrics,
    pub patches: Vec<PatchRecord>,
    pub unknown: Vec<UnknownRecord>,
    pub first_timestamp: u64,
    pub last_timestamp: Option<u64>,
    pub first_line: u64,
    pub last_line: Option<u64>,
}

impl RunSummary {
    #[must_use]
    pub fn new(header: HeaderRecord, first_line: u64) -> Self {
        Self {
            first_timestamp: header.ts,
            header,
            metrics: RunMetrics::default(),
            patches: Vec::new(),
            unknown: Vec::new(),
            last_timestamp: None,
            first_line,
            last_line: None,
        }
    }

    /// Adds a patch event unless an identical payload is already present.
    pub fn add_patch(&mut self, patch: PatchRecord) {
        if self
            .patches
            .iter()
            .all(|existing| existing.entry != patch.entry)
        {
            self.patches.push(patch);
        }
    }

    pub(super) const fn finalize(&mut self, last_timestamp: u64, last_line: u64) {
        self.last_timestamp = Some(last_timestamp);
        self.last_line = Some(last_line);
    }

    #[must_use]
    pub const fn is_finalized(&self) -> bool {
        self.last_line.is_some()
    }
}

/// Rejected lines, keyed by rejection message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordErrors(BTreeMap<String, Vec<u64>>);

impl RecordErrors {
    pub fn record(&mut self, message: String, line: u64) {
        self.0.entry(message).or_default().push(line);
    }

    /// Line numbers rejected with `message`, ascending.
    #[must_use]
    pub fn lines(&self, message: &str) -> Option<&[u64]> {
        self.0.get(message).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[u64])> {
        self.0
            .iter()
            .map(|(message, lines)| (message.as_str(), lines.as_slice()))
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
