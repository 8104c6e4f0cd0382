use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ReportError;
use crate::processor::{
    HeaderRecord, PatchRecord, RouteKey, RunMetrics, RunSummary, StatusTimes, UnknownRecord,
};

use super::{ReportContext, ReportSinks, Reporter, write_flushed};

/// Serialized form of one run. Metrics are listed as
/// `[signature, {status: [elapsed_us]}]` pairs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummaryDocument {
    pub header: HeaderRecord,
    pub metrics: Vec<(String, StatusTimes)>,
    pub patches: Vec<PatchRecord>,
    pub unknown: Vec<UnknownRecord>,
    pub first_timestamp: u64,
    pub last_timestamp: Option<u64>,
    pub first_line: u64,
    pub last_line: Option<u64>,
    pub meta: RunMeta,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunMeta {
    /// Method and path for every signature that parses as an http(s) route.
    pub key_to_properties: BTreeMap<String, RouteKey>,
}

impl RunSummaryDocument {
    #[must_use]
    pub fn from_summary(run: &RunSummary) -> Self {
        let key_to_properties = run
            .metrics
            .iter()
            .filter_map(|(signature, _)| {
                RouteKey::parse(signature).map(|key| (signature.to_owned(), key))
            })
            .collect();
        Self {
            header: run.header.clone(),
            metrics: run
                .metrics
                .iter()
                .map(|(signature, times)| (signature.to_owned(), times.clone()))
                .collect(),
            patches: run.patches.clone(),
            unknown: run.unknown.clone(),
            first_timestamp: run.first_timestamp,
            last_timestamp: run.last_timestamp,
            first_line: run.first_line,
            last_line: run.last_line,
            meta: RunMeta { key_to_properties },
        }
    }

    /// Rebuilds the signature to status to samples mapping.
    #[must_use]
    pub fn to_metrics(&self) -> RunMetrics {
        self.metrics.iter().cloned().collect()
    }
}

/// Structured reporter: the whole run collection as one pretty-printed JSON
/// array. Samples stay in microseconds.
pub struct JsonReporter;

#[async_trait]
impl Reporter for JsonReporter {
    fn name(&self) -> &'static str {
        "json"
    }

    async fn report(
        &self,
        context: &ReportContext<'_>,
        sinks: &mut ReportSinks<'_>,
    ) -> Result<(), ReportError> {
        let documents: Vec<RunSummaryDocument> = context
            .runs
            .iter()
            .map(RunSummaryDocument::from_summary)
            .collect();
        let mut json = serde_json::to_vec_pretty(&documents)
            .map_err(|err| ReportError::Serialize { source: err })?;
        json.push(b'\n');
        write_flushed(sinks.report, &json, "json report").await
    }
}
