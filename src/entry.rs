use clap::{ArgMatches, CommandFactory, FromArgMatches};
use tracing::debug;

use crate::args::ProcessorArgs;
use crate::config::{apply_config, load_config, resolve};
use crate::error::AppResult;
use crate::processor::LogProcessor;
use crate::report::ReportSinks;

pub(crate) fn run() -> AppResult<()> {
    let (args, matches) = parse_args()?;

    crate::logger::init_logging(args.verbose);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(run_async(args, &matches))
}

fn parse_args() -> AppResult<(ProcessorArgs, ArgMatches)> {
    let matches = ProcessorArgs::command().get_matches();
    let args = ProcessorArgs::from_arg_matches(&matches)?;
    Ok((args, matches))
}

async fn run_async(mut args: ProcessorArgs, matches: &ArgMatches) -> AppResult<()> {
    if let Some(config) = load_config(args.config.as_deref())? {
        apply_config(&mut args, matches, config)?;
    }

    let env_names = std::env::vars_os().filter_map(|(name, _)| name.into_string().ok());
    let (options, diagnostics) = resolve(args, env_names)?;
    diagnostics.log();
    debug!(
        "Processing {} with the {} reporter ({})",
        options.file.display(),
        options.report.reporter.as_str(),
        options.report.time_unit.as_str()
    );

    let mut processor = LogProcessor::new(options.file.display().to_string());
    processor.process_file(&options.file).await?;

    let mut report = options.output.open().await?;
    let mut console = tokio::io::stdout();
    let mut sinks = ReportSinks {
        report: report.as_mut(),
        console: &mut console,
    };
    processor.summarize(&options.report, &mut sinks).await
}
