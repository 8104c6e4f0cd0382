use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Failed to write {context}: {source}")]
    Write {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to format report line: {source}")]
    Format {
        #[source]
        source: std::fmt::Error,
    },
    #[error("Failed to serialize run summaries: {source}")]
    Serialize {
        #[source]
        source: serde_json::Error,
    },
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
