use std::fmt::Write as _;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};

use crate::error::ReportError;
use crate::processor::{RunSummary, StatusTimes};
use crate::stats::GroupStats;

use super::{ReportContext, ReportSinks, Reporter, write_flushed};

/// Patch names with this prefix are the HTTP instrumentation itself.
const HTTP_PATCH_PREFIX: &str = "http";

/// Tabular reporter: one header line per run, then one line per
/// (route-or-bucket, status) group.
pub struct CsvReporter;

#[async_trait]
impl Reporter for CsvReporter {
    fn name(&self) -> &'static str {
        "csv"
    }

    async fn report(
        &self,
        context: &ReportContext<'_>,
        sinks: &mut ReportSinks<'_>,
    ) -> Result<(), ReportError> {
        let overall = overall_banner(context)?;
        write_flushed(sinks.console, overall.as_bytes(), "console banner").await?;

        let header = format!(
            "route, status, n, mean, stddev, percentiles: {}\n",
            context.percentiles
        );
        for run in context.runs {
            let banner = run_banner(run)?;
            write_flushed(sinks.console, banner.as_bytes(), "console banner").await?;

            let mut output = header.clone();
            match context.template {
                Some(template) => {
                    for bucket in template.bucketize(&run.metrics) {
                        write_rows(&mut output, &bucket.name, &bucket.times, context)?;
                    }
                }
                None => {
                    for (signature, times) in run.metrics.iter() {
                        write_rows(&mut output, signature, times, context)?;
                    }
                }
            }
            output.push('\n');
            write_flushed(sinks.report, output.as_bytes(), "csv report").await?;
        }
        Ok(())
    }
}

fn overall_banner(context: &ReportContext<'_>) -> Result<String, ReportError> {
    let count = context.runs.len();
    let noun = if count == 1 { "summary" } else { "summaries" };
    let mut banner = String::new();
    writeln!(
        banner,
        "[[read {} {} from {} lines ({} bytes) in {}]]\n",
        count, noun, context.lines_read, context.bytes_read, context.source_name
    )
    .map_err(|err| ReportError::Format { source: err })?;
    Ok(banner)
}

fn run_banner(run: &RunSummary) -> Result<String, ReportError> {
    let mut banner = String::new();
    let start = iso_timestamp(run.first_timestamp);
    let end = iso_timestamp(run.last_timestamp.unwrap_or(run.first_timestamp));
    writeln!(banner, "[start {}, end {}]", start, end)
        .map_err(|err| ReportError::Format { source: err })?;
    writeln!(
        banner,
        "[total time measurements {} across {} routes]",
        run.metrics.sample_count(),
        run.metrics.route_count()
    )
    .map_err(|err| ReportError::Format { source: err })?;
    if let Some(patch) = run
        .patches
        .iter()
        .find(|patch| !patch.entry.name.starts_with(HTTP_PATCH_PREFIX))
    {
        writeln!(banner, "[{} loaded]", patch.entry.name)
            .map_err(|err| ReportError::Format { source: err })?;
    }
    Ok(banner)
}

fn write_rows(
    output: &mut String,
    name: &str,
    times: &StatusTimes,
    context: &ReportContext<'_>,
) -> Result<(), ReportError> {
    for (status, samples) in times.iter() {
        let group = GroupStats::compute(samples, context.time_unit, context.percentiles);
        write!(
            output,
            "{},{},{},{:.2},{:.2}",
            name, status, group.stats.count, group.stats.mean, group.stats.stddev
        )
        .map_err(|err| ReportError::Format { source: err })?;
        for value in &group.percentiles {
            let written = match value {
                Some(value) => write!(output, ",{}", value),
                None => output.write_char(','),
            };
            written.map_err(|err| ReportError::Format { source: err })?;
        }
        output.push('\n');
    }
    Ok(())
}

/// Milliseconds since the epoch as `YYYY-MM-DDTHH:MM:SS.sssZ`; values
/// outside chrono's range are printed as-is.
fn iso_timestamp(ts: u64) -> String {
    i64::try_from(ts)
        .ok()
        .and_then(DateTime::<Utc>::from_timestamp_millis)
        .map_or_else(
            || ts.to_string(),
            |time| time.to_rfc3339_opts(SecondsFormat::Millis, true),
        )
}
