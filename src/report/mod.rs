//! Report rendering.
//!
//! Reporters consume finalized runs read-only and write to a report sink.
//! Informational banners go to a separate console sink so they can be
//! routed apart from the report itself.
mod csv;
mod json;
mod options;


use async_trait::async_trait;
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::error::ReportError;
use crate::processor::RunSummary;
use crate::stats::{Percentiles, TimeUnit};
use crate::template::Template;

pub use csv::CsvReporter;
pub use json::{JsonReporter, RunMeta, RunSummaryDocument};
pub use options::{ReportOptions, ReporterKind};

/// Everything a reporter may render.
pub struct ReportContext<'ctx> {
    pub runs: &'ctx [RunSummary],
    pub source_name: &'ctx str,
    pub lines_read: u64,
    pub bytes_read: u64,
    pub time_unit: TimeUnit,
    pub percentiles: &'ctx Percentiles,
    pub template: Option<&'ctx Template>,
}

pub struct ReportSinks<'sink> {
    pub report: &'sink mut (dyn AsyncWrite + Unpin + Send),
    pub console: &'sink mut (dyn AsyncWrite + Unpin + Send),
}

#[async_trait]
pub trait Reporter: Send + Sync {
    fn name(&self) -> &'static str;

    /// Renders every run in `context`.
    ///
    /// # Errors
    ///
    /// Returns an error when a sink cannot be written or flushed.
    async fn report(
        &self,
        context: &ReportContext<'_>,
        sinks: &mut ReportSinks<'_>,
    ) -> Result<(), ReportError>;
}

pub(crate) async fn write_flushed(
    sink: &mut (dyn AsyncWrite + Unpin + Send),
    bytes: &[u8],
    context: &'static str,
) -> Result<(), ReportError> {
    sink.write_all(bytes)
        .await
        .map_err(|err| ReportError::Write {
            context,
            source: err,
        })?;
    sink.flush().await.map_err(|err| ReportError::Write {
        context,
        source: err,
    })
}
