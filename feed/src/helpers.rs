use std::{fmt::Display, str::FromStr};

use tracing::debug;

use crate::error::ConfigError;

/// Parses `value` when present, otherwise falls back to `default`.
/// A present but unparsable value is an error rather than a silent default.
pub fn parse_or_default<T>(
    var_name: &'static str,
    value: Option<String>,
    default: T,
) -> Result<T, ConfigError>
where
    T: Display + FromStr,
    <T as FromStr>::Err: Display,
{
    match value {
        Some(val) => {
            let parsed = T::from_str(val.trim());
            parsed.map_err(|error| ConfigError::InvalidValue {
                var: var_name,
                value: val,
                reason: error.to_string(),
            })
        }
        None => {
            debug!(var = var_name, default = %default, "env var not set, using default");
            Ok(default)
        }
    }
}
