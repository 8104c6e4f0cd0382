//! CLI argument types and parsing helpers.
mod cli;
pub(crate) mod parsers;

#[cfg(test)]
mod test_support;

pub use cli::{DEFAULT_LOG_FILE, DEFAULT_OUTPUT, DEFAULT_REPORTER, ProcessorArgs};

#[cfg(feature = "fuzzing")]
pub(crate) use parsers::parse_bool_env;
#[cfg(test)]
pub(crate) use test_support::parse_test_args;
