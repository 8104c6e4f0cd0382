//! Configuration loading and resolution.
mod apply;
mod loader;
mod resolve;
pub mod types;


pub use apply::apply_config;
pub use loader::load_config;
pub use resolve::{ConfigDiagnostics, ENV_PREFIX, OutputTarget, ProcessorOptions, resolve};

#[cfg(test)]
pub(crate) use loader::load_config_file;
