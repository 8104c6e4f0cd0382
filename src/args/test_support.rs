use clap::Parser;

use crate::error::{AppError, AppResult};

use super::ProcessorArgs;

pub(crate) fn parse_test_args<I, T>(args: I) -> AppResult<ProcessorArgs>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    ProcessorArgs::try_parse_from(args).map_err(AppError::from)
}
