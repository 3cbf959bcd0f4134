//! Errors raised while turning command-line flags into a query.
//!
//! Predicates never fail once built; every error here comes from flag
//! parsing or predicate construction.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum QueryError {
    /// Flag name is not in the registry
    #[error("Unknown flag: {flag}")]
    UnknownFlag { flag: String },

    /// Flag was the last token, or was followed by another flag
    #[error("Missing argument value for flag: {flag}")]
    MissingValue { flag: String },

    /// A bare token appeared where a `--flag` was expected
    #[error("Unexpected argument '{token}': flags must start with '--' and be followed by a value")]
    UnexpectedArgument { token: String },

    /// Value could not be parsed into what the flag expects
    #[error("Invalid value '{value}' for flag {flag}: {reason}")]
    InvalidValue {
        flag: String,
        value: String,
        reason: String,
    },

    /// Two mode flags (top-N, insights) in one invocation
    #[error("Conflicting flags: {first} and {second} cannot be used together")]
    ConflictingModes { first: String, second: String },

    /// A single-use flag such as --output was repeated
    #[error("Flag {flag} was given more than once")]
    DuplicateFlag { flag: String },
}

impl QueryError {
    pub(crate) fn invalid(flag: &str, value: &str, reason: impl Into<String>) -> Self {
        QueryError::InvalidValue {
            flag: flag.to_string(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, QueryError>;
