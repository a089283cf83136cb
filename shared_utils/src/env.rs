use std::{env::VarError, fmt::Display, str::FromStr};

use thiserror::Error;

/// Errors raised while reading an environment override.
#[derive(Debug, Error)]
pub enum EnvVarError {
    /// The variable is set but its value could not be parsed into the target type.
    #[error("Invalid value {value:?} for environment variable {name}: {reason}")]
    Invalid {
        name: String,
        value: String,
        reason: String,
    },

    /// The variable is set but is not valid unicode.
    #[error("Environment variable {0} is not valid unicode")]
    NotUnicode(String),
}

/// Reads an optional, typed override from the environment.
///
/// Returns `Ok(None)` when the variable is unset or blank, so callers can keep
/// their configured value. Surrounding whitespace is trimmed before parsing.
///
/// # Arguments
/// * `name` - The name of the environment variable to read.
pub fn env_override<T>(name: &str) -> Result<Option<T>, EnvVarError>
where
    T: FromStr,
    T::Err: Display,
{
    let raw = match std::env::var(name) {
        Ok(raw) => raw,
        Err(VarError::NotPresent) => return Ok(None),
        Err(VarError::NotUnicode(_)) => return Err(EnvVarError::NotUnicode(name.to_string())),
    };

    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    trimmed
        .parse::<T>()
        .map(Some)
        .map_err(|e| EnvVarError::Invalid {
            name: name.to_string(),
            value: raw.clone(),
            reason: e.to_string(),
        })
}
