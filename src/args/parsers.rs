use crate::error::{AppError, AppResult, ValidationError};
use crate::stats::Percentiles;

pub(crate) fn parse_bool_env(s: &str) -> AppResult<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" | "on" => Ok(true),
        "0" | "false" | "no" | "n" | "off" => Ok(false),
        _ => Err(AppError::validation(ValidationError::InvalidBoolean {
            value: s.to_owned(),
        })),
    }
}

pub(crate) fn parse_percentiles(s: &str) -> Result<Percentiles, ValidationError> {
    s.parse::<Percentiles>()
}
