use std::path::PathBuf;

use tokio::io::AsyncWrite;
use tracing::warn;

use crate::args::ProcessorArgs;
use crate::error::ConfigError;
use crate::report::{ReportOptions, ReporterKind};
use crate::stats::TimeUnit;

/// Prefix shared by every environment variable the processor reads.
pub const ENV_PREFIX: &str = "CSI_RM_";
const KNOWN_ENV_KEYS: [&str; 4] = ["REPORTER", "OUTPUT", "TEMPLATE", "MICROSECONDS"];
const STDOUT_FD: u32 = 1;
const STDERR_FD: u32 = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    Stdout,
    Stderr,
    File(PathBuf),
}

impl OutputTarget {
    /// An all-digit value is a file descriptor; anything else is a path.
    ///
    /// # Errors
    ///
    /// Returns an error for descriptors other than 1 and 2.
    pub fn parse(value: &str) -> Result<Self, ConfigError> {
        let value = value.trim();
        if value.is_empty() {
            return Ok(Self::Stdout);
        }
        if !value.bytes().all(|byte| byte.is_ascii_digit()) {
            return Ok(Self::File(PathBuf::from(value)));
        }
        match value.parse::<u32>().unwrap_or(u32::MAX) {
            STDOUT_FD => Ok(Self::Stdout),
            STDERR_FD => Ok(Self::Stderr),
            fd => Err(ConfigError::UnsupportedOutputFd { fd }),
        }
    }

    /// Opens the target for writing, creating or truncating a file target.
    ///
    /// # Errors
    ///
    /// Returns an error when a file target cannot be created.
    pub async fn open(&self) -> Result<Box<dyn AsyncWrite + Unpin + Send>, ConfigError> {
        match self {
            Self::Stdout => Ok(Box::new(tokio::io::stdout())),
            Self::Stderr => Ok(Box::new(tokio::io::stderr())),
            Self::File(path) => {
                let file = tokio::fs::File::create(path).await.map_err(|err| {
                    ConfigError::OpenOutput {
                        target: path.display().to_string(),
                        source: err,
                    }
                })?;
                Ok(Box::new(tokio::io::BufWriter::new(file)))
            }
        }
    }
}

/// Non-fatal configuration problems, reported before processing starts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigDiagnostics {
    pub unknown: Vec<String>,
    pub invalid: Vec<String>,
}

impl ConfigDiagnostics {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.unknown.is_empty() && self.invalid.is_empty()
    }

    pub fn log(&self) {
        for name in &self.unknown {
            warn!("Unknown config variable {}", name);
        }
        for entry in &self.invalid {
            warn!("Invalid config value {}", entry);
        }
    }
}

/// Fully resolved settings for one processing pass.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessorOptions {
    pub file: PathBuf,
    pub output: OutputTarget,
    pub report: ReportOptions,
}

/// Turns parsed arguments into options. `env_names` are the names of the
/// process environment variables; unknown `CSI_RM_*` names become
/// diagnostics.
///
/// # Errors
///
/// Returns an error when the output target is unusable.
pub fn resolve<I>(
    args: ProcessorArgs,
    env_names: I,
) -> Result<(ProcessorOptions, ConfigDiagnostics), ConfigError>
where
    I: IntoIterator<Item = String>,
{
    let mut diagnostics = ConfigDiagnostics::default();
    for name in env_names {
        if let Some(key) = name.strip_prefix(ENV_PREFIX)
            && !KNOWN_ENV_KEYS.contains(&key)
        {
            diagnostics.unknown.push(name);
        }
    }
    diagnostics.unknown.sort();

    let reporter = ReporterKind::lookup(&args.reporter).unwrap_or_else(|| {
        diagnostics.invalid.push(format!(
            "{}REPORTER={} (falling back to {})",
            ENV_PREFIX,
            args.reporter,
            ReporterKind::Csv.as_str()
        ));
        ReporterKind::Csv
    });
    let time_unit = args
        .microseconds
        .map_or(args.time_unit, TimeUnit::from_microseconds_flag);

    let options = ProcessorOptions {
        file: args.file,
        output: OutputTarget::parse(&args.output)?,
        report: ReportOptions {
            reporter,
            time_unit,
            percentiles: args.percentiles.unwrap_or_default(),
            template: args.template,
        },
    };
    Ok((options, diagnostics))
}
