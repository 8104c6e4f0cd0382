//! Run segmentation and per-route aggregation.
//!
//! A log holds one or more runs. Each run starts at a `header` record and
//! ends at the next `header` or at the end of the input. Lines in between
//! are classified and folded into the open run; malformed lines are tallied
//! and skipped.
mod record;
mod route;
mod summary;


use std::path::Path;

use tokio::io::AsyncRead;
use tracing::{debug, info, warn};

use crate::error::{AppResult, ProcessError, RecordError};
use crate::reader::{LineReader, ReadEvent};
use crate::report::{ReportContext, ReportOptions, ReportSinks};
use crate::template::Template;

pub use record::{
    HeaderEntry, LogRecord, MetricsEntry, PatchEntry, RecordKind, parse_record,
};
pub use route::{RouteKey, route_signature};
pub use summary::{
    HeaderRecord, PatchRecord, RecordErrors, RunMetrics, RunSummary, StatusTimes, UnknownRecord,
};

enum RunState {
    AwaitingHeader,
    InRun(Box<RunSummary>),
}

pub struct LogProcessor {
    source_name: String,
    state: RunState,
    runs: Vec<RunSummary>,
    lines_read: u64,
    bytes_read: u64,
    last_timestamp: Option<u64>,
    errors: RecordErrors,
}

impl LogProcessor {
    /// `source_name` is only used for display in reports.
    #[must_use]
    pub fn new(source_name: impl Into<String>) -> Self {
        Self {
            source_name: source_name.into(),
            state: RunState::AwaitingHeader,
            runs: Vec::new(),
            lines_read: 0,
            bytes_read: 0,
            last_timestamp: None,
            errors: RecordErrors::default(),
        }
    }

    /// Opens `path` and processes it to the end.
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be opened or read.
    pub async fn process_file(&mut self, path: &Path) -> Result<usize, ProcessError> {
        let mut reader = LineReader::open(path).await?;
        self.process_lines(&mut reader).await
    }

    /// Reads `source` to the end and returns the number of completed runs.
    ///
    /// # Errors
    ///
    /// Returns an error when reading the source fails. Malformed lines are
    /// not errors; see [`LogProcessor::record_errors`].
    pub async fn process<R>(&mut self, source: R) -> Result<usize, ProcessError>
    where
        R: AsyncRead + Unpin,
    {
        let mut reader = LineReader::new(source);
        self.process_lines(&mut reader).await
    }

    /// Drives an existing reader to its end marker.
    ///
    /// # Errors
    ///
    /// Returns an error when reading the source fails.
    pub async fn process_lines<R>(&mut self, reader: &mut LineReader<R>) -> Result<usize, ProcessError>
    where
        R: AsyncRead + Unpin,
    {
        loop {
            match reader.next_event().await? {
                ReadEvent::Line(line) => self.process_line(&line),
                ReadEvent::End => break,
            }
        }
        self.finalize_open_run(false);
        self.bytes_read = self.bytes_read.saturating_add(reader.bytes_read());

        info!(
            "Read {} run(s) from {} lines ({} bytes) in {}",
            self.runs.len(),
            self.lines_read,
            self.bytes_read,
            self.source_name
        );
        for (message, lines) in self.errors.iter() {
            warn!("{} line(s) rejected: {} (lines {:?})", lines.len(), message, lines);
        }
        Ok(self.runs.len())
    }

    /// Classifies one line and folds it into the current state.
    pub fn process_line(&mut self, line: &str) {
        self.lines_read = self.lines_read.saturating_add(1);
        let line_number = self.lines_read;

        let record = match parse_record(line) {
            Ok(record) => record,
            Err(err) => {
                self.errors.record(err.to_string(), line_number);
                return;
            }
        };

        let ts = record.ts;
        match record.kind {
            RecordKind::Header(entry) => self.start_run(
                HeaderRecord {
                    ts,
                    entry: *entry,
                },
                line_number,
            ),
            RecordKind::Metrics(entry) => self.with_open_run(ts, line_number, |run| {
                run.metrics
                    .record(entry.signature(), entry.status_code, entry.et);
            }),
            RecordKind::Patch(entry) => self.with_open_run(ts, line_number, |run| {
                run.add_patch(PatchRecord { ts, entry });
            }),
            RecordKind::Other { kind, entry } => self.with_open_run(ts, line_number, |run| {
                run.unknown.push(UnknownRecord { ts, kind, entry });
            }),
        }
    }

    fn start_run(&mut self, header: HeaderRecord, line_number: u64) {
        self.finalize_open_run(true);
        debug!("Run started at line {} (ts {})", line_number, header.ts);
        self.last_timestamp = Some(header.ts);
        self.state = RunState::InRun(Box::new(RunSummary::new(header, line_number)));
    }

    fn with_open_run<F>(&mut self, ts: u64, line_number: u64, apply: F)
    where
        F: FnOnce(&mut RunSummary),
    {
        match &mut self.state {
            RunState::InRun(run) => {
                apply(run);
                self.last_timestamp = Some(ts);
            }
            RunState::AwaitingHeader => {
                self.errors
                    .record(RecordError::BeforeHeader.to_string(), line_number);
            }
        }
    }

    /// Closes the open run, if any. A run closed by a new header ends on the
    /// line before that header.
    fn finalize_open_run(&mut self, by_new_header: bool) {
        let RunState::InRun(mut run) = std::mem::replace(&mut self.state, RunState::AwaitingHeader)
        else {
            return;
        };
        let last_line = if by_new_header {
            self.lines_read.saturating_sub(1)
        } else {
            self.lines_read
        };
        let last_timestamp = self.last_timestamp.unwrap_or(run.first_timestamp);
        run.finalize(last_timestamp, last_line);
        debug!(
            "Run finalized: lines {}-{}, {} samples across {} routes",
            run.first_line,
            last_line,
            run.metrics.sample_count(),
            run.metrics.route_count()
        );
        self.runs.push(*run);
    }

    /// Renders the finalized runs with the configured reporter.
    ///
    /// The template, when configured, is loaded here; a load failure fails
    /// this call but leaves the aggregated runs intact.
    ///
    /// # Errors
    ///
    /// Returns an error when the template cannot be loaded or the report
    /// cannot be written.
    pub async fn summarize(
        &self,
        options: &ReportOptions,
        sinks: &mut ReportSinks<'_>,
    ) -> AppResult<()> {
        let template = match options.template.as_deref() {
            Some(path) => Some(Template::load(path)?),
            None => None,
        };
        let context = ReportContext {
            runs: &self.runs,
            source_name: &self.source_name,
            lines_read: self.lines_read,
            bytes_read: self.bytes_read,
            time_unit: options.time_unit,
            percentiles: &options.percentiles,
            template: template.as_ref(),
        };
        let reporter = options.reporter.build();
        debug!("Rendering {} run(s) with the {} reporter", self.runs.len(), reporter.name());
        reporter.report(&context, sinks).await?;
        Ok(())
    }

    #[must_use]
    pub fn runs(&self) -> &[RunSummary] {
        &self.runs
    }

    #[must_use]
    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    #[must_use]
    pub const fn lines_read(&self) -> u64 {
        self.lines_read
    }

    #[must_use]
    pub const fn bytes_read(&self) -> u64 {
        self.bytes_read
    }

    #[must_use]
    pub const fn record_errors(&self) -> &RecordErrors {
        &self.errors
    }
}
