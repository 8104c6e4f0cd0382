use thiserror::Error;

use super::{ConfigError, ProcessError, ReportError, TemplateError, ValidationError};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
    #[error("CLI error: {source}")]
    Clap {
        #[from]
        source: clap::Error,
    },
    #[error("JSON error: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Processing error: {0}")]
    Process(#[from] ProcessError),
    #[error("Template error: {0}")]
    Template(#[from] TemplateError),
    #[error("Report error: {0}")]
    Report(#[from] ReportError),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn validation<E>(error: E) -> Self
    where
        E: Into<ValidationError>,
    {
        error.into().into()
    }

    pub fn config<E>(error: E) -> Self
    where
        E: Into<ConfigError>,
    {
        error.into().into()
    }

    pub fn process<E>(error: E) -> Self
    where
        E: Into<ProcessError>,
    {
        error.into().into()
    }

    pub fn template<E>(error: E) -> Self
    where
        E: Into<TemplateError>,
    {
        error.into().into()
    }

    pub fn report<E>(error: E) -> Self
    where
        E: Into<ReportError>,
    {
        error.into().into()
    }
}
