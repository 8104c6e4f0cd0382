use clap::ArgMatches;
use clap::parser::ValueSource;

use crate::args::ProcessorArgs;
use crate::error::{AppError, AppResult, ConfigError};
use crate::stats::Percentiles;

use super::types::ConfigFile;

/// Applies config-file values to arguments the user did not set on the
/// command line or through a `CSI_RM_*` variable.
///
/// # Errors
///
/// Returns an error when a config value is invalid.
pub fn apply_config(
    args: &mut ProcessorArgs,
    matches: &ArgMatches,
    config: ConfigFile,
) -> AppResult<()> {
    if !is_explicit(matches, "reporter")
        && let Some(reporter) = config.reporter
    {
        args.reporter = reporter;
    }

    if !is_explicit(matches, "output")
        && let Some(output) = config.output
    {
        args.output = output.into_target();
    }

    if !is_explicit(matches, "template")
        && let Some(template) = config.template
    {
        args.template = Some(template);
    }

    if !is_explicit(matches, "time_unit")
        && let Some(time_unit) = config.time_unit
    {
        args.time_unit = time_unit;
    }

    if !is_explicit(matches, "microseconds")
        && let Some(microseconds) = config.microseconds
    {
        args.microseconds = Some(microseconds);
    }

    if !is_explicit(matches, "percentiles")
        && let Some(values) = config.percentiles
    {
        let percentiles = Percentiles::new(values)
            .map_err(|err| AppError::config(ConfigError::InvalidPercentiles { source: err }))?;
        args.percentiles = Some(percentiles);
    }

    Ok(())
}

fn is_explicit(matches: &ArgMatches, name: &str) -> bool {
    matches!(
        matches.value_source(name),
        Some(ValueSource::CommandLine | ValueSource::EnvVariable)
    )
}
