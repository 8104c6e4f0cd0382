use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Invalid boolean '{value}'. Expected true/false, yes/no, on/off, or 1/0.")]
    InvalidBoolean { value: String },
    #[error("Percentiles must not be empty.")]
    PercentilesEmpty,
    #[error("Invalid percentile '{value}': {source}")]
    InvalidPercentile {
        value: String,
        #[source]
        source: std::num::ParseFloatError,
    },
    #[error("Percentile '{value}' must be between 0 and 1.")]
    PercentileOutOfRange { value: String },
    #[cfg(test)]
    #[error("Test expectation failed: {message}")]
    TestExpectation { message: &'static str },
    #[cfg(test)]
    #[error("Test expectation failed: {message}: {value}")]
    TestExpectationValue {
        message: &'static str,
        value: String,
    },
}
