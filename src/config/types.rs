use std::path::PathBuf;

use serde::Deserialize;

use crate::stats::TimeUnit;

/// Settings read from `route-metrics.toml` / `route-metrics.json`.
#[derive(Debug, Default, Deserialize)]
pub struct ConfigFile {
    pub reporter: Option<String>,
    pub output: Option<OutputValue>,
    pub template: Option<PathBuf>,
    pub time_unit: Option<TimeUnit>,
    pub microseconds: Option<bool>,
    pub percentiles: Option<Vec<f64>>,
}

/// Output may be written as a descriptor number or a path string.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum OutputValue {
    Fd(u32),
    Target(String),
}

impl OutputValue {
    #[must_use]
    pub fn into_target(self) -> String {
        match self {
            Self::Fd(fd) => fd.to_string(),
            Self::Target(target) => target,
        }
    }
}
