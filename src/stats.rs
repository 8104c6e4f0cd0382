//! Sample statistics for elapsed-time groups.
use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Percentiles reported when none are configured.
pub const DEFAULT_PERCENTILES: [f64; 5] = [0.50, 0.70, 0.80, 0.90, 0.95];
/// Microseconds per millisecond.
const US_PER_MS: u64 = 1_000;
/// Rounding offset for microsecond to millisecond conversion.
const US_ROUNDING: u64 = 500;

/// Unit in which elapsed times are displayed. Samples are always recorded
/// in microseconds.
#[derive(Debug, Clone, Copy, Default, ValueEnum, Deserialize, Serialize, PartialEq, Eq)]
pub enum TimeUnit {
    #[default]
    #[value(name = "us")]
    #[serde(rename = "us")]
    Micros,
    #[value(name = "ms")]
    #[serde(rename = "ms")]
    Millis,
}

impl TimeUnit {
    #[must_use]
    pub const fn from_microseconds_flag(microseconds: bool) -> Self {
        if microseconds {
            Self::Micros
        } else {
            Self::Millis
        }
    }

    /// Returns converted copies of `samples`; the input is left untouched.
    #[must_use]
    pub fn convert(self, samples: &[u64]) -> Vec<u64> {
        match self {
            Self::Micros => samples.to_vec(),
            Self::Millis => samples
                .iter()
                .map(|value| {
                    value
                        .saturating_add(US_ROUNDING)
                        .checked_div(US_PER_MS)
                        .unwrap_or(0)
                })
                .collect(),
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Micros => "us",
            Self::Millis => "ms",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleStats {
    pub count: usize,
    pub mean: f64,
    pub stddev: f64,
}

impl SampleStats {
    /// Count, arithmetic mean and population standard deviation.
    #[must_use]
    pub fn from_samples(samples: &[u64]) -> Self {
        let count = samples.len();
        if count == 0 {
            return Self {
                count,
                mean: 0.0,
                stddev: 0.0,
            };
        }
        let n = count as f64;
        let total: f64 = samples.iter().map(|value| *value as f64).sum();
        let mean = total / n;
        let variance = samples
            .iter()
            .map(|value| {
                let diff = *value as f64 - mean;
                diff * diff
            })
            .sum::<f64>()
            / n;
        Self {
            count,
            mean,
            stddev: variance.sqrt(),
        }
    }
}

/// Nearest-rank percentile over samples already sorted ascending.
///
/// `p == 0` returns the minimum; otherwise the element at
/// `ceil(len * p) - 1` is returned.
#[must_use]
pub fn percentile(sorted: &[u64], p: f64) -> Option<u64> {
    if p <= 0.0 {
        return sorted.first().copied();
    }
    let rank = (sorted.len() as f64 * p).ceil() as usize;
    let index = rank.saturating_sub(1).min(sorted.len().saturating_sub(1));
    sorted.get(index).copied()
}

/// Validated set of percentile fractions, each within `[0, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Percentiles(Vec<f64>);

impl Default for Percentiles {
    fn default() -> Self {
        Self(DEFAULT_PERCENTILES.to_vec())
    }
}

impl Percentiles {
    /// # Errors
    ///
    /// Returns an error when the list is empty or a value lies outside `[0, 1]`.
    pub fn new(values: Vec<f64>) -> Result<Self, ValidationError> {
        if values.is_empty() {
            return Err(ValidationError::PercentilesEmpty);
        }
        if let Some(bad) = values
            .iter()
            .find(|value| !value.is_finite() || **value < 0.0 || **value > 1.0)
        {
            return Err(ValidationError::PercentileOutOfRange {
                value: bad.to_string(),
            });
        }
        Ok(Self(values))
    }

    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.0
    }

    /// Percentile values of `sorted`, in configured order.
    #[must_use]
    pub fn compute(&self, sorted: &[u64]) -> Vec<Option<u64>> {
        self.0.iter().map(|p| percentile(sorted, *p)).collect()
    }
}

impl fmt::Display for Percentiles {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .0
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        f.write_str(&joined)
    }
}

impl FromStr for Percentiles {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut values = Vec::new();
        for part in s.split(',').map(str::trim).filter(|part| !part.is_empty()) {
            let value = part
                .parse::<f64>()
                .map_err(|err| ValidationError::InvalidPercentile {
                    value: part.to_owned(),
                    source: err,
                })?;
            values.push(value);
        }
        Self::new(values)
    }
}

/// Statistics for one (route-or-bucket, status) group.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupStats {
    pub stats: SampleStats,
    pub percentiles: Vec<Option<u64>>,
}

impl GroupStats {
    /// Converts `samples` to `unit`, sorts the copy, and computes the summary.
    #[must_use]
    pub fn compute(samples: &[u64], unit: TimeUnit, percentiles: &Percentiles) -> Self {
        let mut values = unit.convert(samples);
        values.sort_unstable();
        Self {
            stats: SampleStats::from_samples(&values),
            percentiles: percentiles.compute(&values),
        }
    }
}
