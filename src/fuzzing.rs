use std::path::Path;

use clap::{ArgMatches, CommandFactory, FromArgMatches};

use crate::args::{ProcessorArgs, parse_bool_env};
use crate::config::types::ConfigFile;
use crate::config::{OutputTarget, apply_config};
use crate::error::{AppError, AppResult, ConfigError, ProcessError, ValidationError};
use crate::processor::LogProcessor;
use crate::reader::{LineReader, ReadEvent};
use crate::stats::Percentiles;

thread_local! {
    static BASE_MATCHES: ArgMatches = ProcessorArgs::command().get_matches_from(["route-metrics"]);
}

/// Parses a comma-separated percentile list.
///
/// # Errors
///
/// Returns an error when a value is not a fraction in `[0, 1]`.
pub fn parse_percentiles_input(input: &str) -> Result<Percentiles, ValidationError> {
    input.parse()
}

/// Parses a boolean the way `CSI_RM_MICROSECONDS` is read.
///
/// # Errors
///
/// Returns an error when the value is not a recognized boolean.
pub fn parse_bool_input(input: &str) -> AppResult<bool> {
    parse_bool_env(input)
}

/// Parses an output target (`1`, `2`, or a path).
///
/// # Errors
///
/// Returns an error for unsupported descriptors.
pub fn parse_output_input(input: &str) -> Result<OutputTarget, ConfigError> {
    OutputTarget::parse(input)
}

/// Parses TOML config and applies it to default arguments.
///
/// # Errors
///
/// Returns an error when parsing or validation fails.
pub fn apply_config_from_toml(input: &str) -> AppResult<ProcessorArgs> {
    let config: ConfigFile = toml::from_str(input).map_err(|err| {
        AppError::config(ConfigError::ParseToml {
            path: Path::new("<fuzz>").to_path_buf(),
            source: err,
        })
    })?;
    apply_config_to_defaults(config)
}

/// Parses JSON config and applies it to default arguments.
///
/// # Errors
///
/// Returns an error when parsing or validation fails.
pub fn apply_config_from_json(input: &[u8]) -> AppResult<ProcessorArgs> {
    let config: ConfigFile = serde_json::from_slice(input)?;
    apply_config_to_defaults(config)
}

/// Reads `input` with the given chunk size and returns the lines and byte
/// total.
///
/// # Errors
///
/// Returns an error when reading fails.
pub async fn read_lines_chunked(
    input: &[u8],
    chunk_size: usize,
) -> Result<(Vec<String>, u64), ProcessError> {
    let mut reader = LineReader::with_chunk_size(input, chunk_size);
    let mut lines = Vec::new();
    while let ReadEvent::Line(line) = reader.next_event().await? {
        lines.push(line);
    }
    Ok((lines, reader.bytes_read()))
}

/// Aggregates `input` as a complete log.
///
/// # Errors
///
/// Returns an error when reading fails.
pub async fn process_log_input(input: &[u8]) -> Result<LogProcessor, ProcessError> {
    let mut processor = LogProcessor::new("<fuzz>");
    processor.process(input).await?;
    Ok(processor)
}

fn apply_config_to_defaults(config: ConfigFile) -> AppResult<ProcessorArgs> {
    BASE_MATCHES.with(|matches| {
        let mut args = ProcessorArgs::from_arg_matches(matches)?;
        apply_config(&mut args, matches, config)?;
        Ok(args)
    })
}
