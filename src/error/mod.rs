mod app;
mod config;
mod process;
mod record;
mod report;
mod template;
mod validation;

#[cfg(test)]
mod test_support;

pub use app::{AppError, AppResult};
pub use config::ConfigError;
pub use process::ProcessError;
pub use record::RecordError;
pub use report::ReportError;
pub use template::TemplateError;
pub use validation::ValidationError;
