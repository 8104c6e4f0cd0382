use std::path::PathBuf;

use clap::Parser;

use crate::stats::{Percentiles, TimeUnit};

use super::parsers::{parse_bool_env, parse_percentiles};

/// Log file read when none is given.
pub const DEFAULT_LOG_FILE: &str = "route-metrics.log";
pub const DEFAULT_REPORTER: &str = "csv";
/// File descriptor 1, standard output.
pub const DEFAULT_OUTPUT: &str = "1";

#[derive(Debug, Parser, Clone)]
#[clap(
    version,
    about = "Offline analyzer for HTTP route-metrics logs - segments runs, aggregates per-route latency, and renders CSV or JSON percentile summaries."
)]
pub struct ProcessorArgs {
    /// Route-metrics log to analyze
    #[arg(default_value = DEFAULT_LOG_FILE)]
    pub file: PathBuf,

    /// Reporter to render with (csv or json). Unknown names fall back to csv.
    #[arg(long, short = 'r', env = "CSI_RM_REPORTER", default_value = DEFAULT_REPORTER)]
    pub reporter: String,

    /// Report destination: a file descriptor (1 = stdout, 2 = stderr) or a file path
    #[arg(long, short = 'o', env = "CSI_RM_OUTPUT", default_value = DEFAULT_OUTPUT)]
    pub output: String,

    /// Bucket template (JSON/TOML) grouping routes under named buckets
    #[arg(long, short = 't', env = "CSI_RM_TEMPLATE")]
    pub template: Option<PathBuf>,

    /// Report elapsed times in microseconds (true) or milliseconds (false). Overrides --time-unit.
    #[arg(
        long,
        env = "CSI_RM_MICROSECONDS",
        value_parser = parse_bool_env,
        num_args = 0..=1,
        default_missing_value = "true"
    )]
    pub microseconds: Option<bool>,

    /// Unit for elapsed times in the tabular report
    #[arg(long = "time-unit", value_enum, default_value_t = TimeUnit::Micros)]
    pub time_unit: TimeUnit,

    /// Comma-separated percentile fractions (e.g. 0.5,0.9,0.99)
    #[arg(long, value_parser = parse_percentiles)]
    pub percentiles: Option<Percentiles>,

    /// Enable verbose logging (sets log level to debug unless overridden by ROUTE_METRICS_LOG/RUST_LOG)
    #[arg(long, short = 'v')]
    pub verbose: bool,

    /// Path to config file (TOML/JSON). Defaults to ./route-metrics.toml or ./route-metrics.json if present.
    #[arg(long)]
    pub config: Option<PathBuf>,
}
