use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Failed to read template '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse JSON template '{path}': {source}")]
    ParseJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Failed to parse TOML template '{path}': {source}")]
    ParseToml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("Unsupported template extension '{ext}'. Use .json or .toml.")]
    UnsupportedExtension { ext: String },
    #[error("Template file must have .json or .toml extension.")]
    MissingExtension,
    #[error("Template must be an object.")]
    NotAnObject,
    #[error("Unknown template version {version}.")]
    UnknownVersion { version: String },
    #[error("Template routes must be an array.")]
    RoutesNotArray,
    #[error("Template route {index} must be an object.")]
    RouteNotObject { index: usize },
    #[error("Template routes must have a name and method property (route {index}).")]
    MissingNameOrMethod { index: usize },
    #[error("Route {name} must have either pattern or regex.")]
    PatternRegexExclusive { name: String },
    #[error("Route {name} has an invalid regex: {source}")]
    InvalidRegex {
        name: String,
        #[source]
        source: regex::Error,
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
