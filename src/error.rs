//! Configuration parse errors.

use thiserror::Error;

/// Raised when a supplied override value cannot be parsed as its declared
/// type. Fatal to startup of the owning process: a misconfigured node must
/// not proceed, so there is no recovery path. Absent overrides never produce
/// this error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot parse {field}: {reason} (got {value:?})")]
pub struct ConfigParseError {
    /// Wire-contract name of the offending field.
    pub field: &'static str,
    /// The supplied value, verbatim.
    pub value: String,
    /// What was expected instead.
    pub reason: String,
}

impl ConfigParseError {
    pub fn new(field: &'static str, value: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field,
            value: value.into(),
            reason: reason.into(),
        }
    }

    pub fn bad_integer(field: &'static str, value: &str) -> Self {
        Self::new(field, value, "expected a positive integer")
    }
}

/// Result type for configuration resolution.
pub type ConfigResult<T> = std::result::Result<T, ConfigParseError>;
