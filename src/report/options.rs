use std::path::PathBuf;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::stats::{Percentiles, TimeUnit};

use super::{CsvReporter, JsonReporter, Reporter};

#[derive(Debug, Clone, Copy, Default, ValueEnum, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ReporterKind {
    /// One line per route and status with summary statistics.
    #[default]
    Csv,
    /// The run summaries as a single JSON document.
    Json,
}

impl ReporterKind {
    pub const ALL: [Self; 2] = [Self::Csv, Self::Json];

    /// Registry lookup by name. Returns `None` for names no reporter
    /// registers under.
    #[must_use]
    pub fn lookup(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL.into_iter().find(|kind| kind.as_str() == name)
    }

    #[must_use]
    pub fn build(self) -> Box<dyn Reporter> {
        match self {
            Self::Csv => Box::new(CsvReporter),
            Self::Json => Box::new(JsonReporter),
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }
}

/// Options for one reporting pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportOptions {
    pub reporter: ReporterKind,
    pub time_unit: TimeUnit,
    pub percentiles: Percentiles,
    pub template: Option<PathBuf>,
}
