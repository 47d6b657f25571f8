//! Activity engine errors.

use mc_core::CoreError;
use mc_elements::ElementError;
use thiserror::Error;

/// Result type for activity operations.
pub type ActivityResult<T> = Result<T, ActivityError>;

/// Errors raised while loading reference data or resolving inputs.
///
/// Missing solutes, missing solvents and unknown elements are not errors:
/// the formalisms return NaN for them.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ActivityError {
    /// Malformed `a/T+b` coefficient expression.
    #[error("Invalid coefficient expression '{text}': {what}")]
    Expression { text: String, what: String },

    /// Reference table could not be read or decoded.
    #[error("Reference table error: {message}")]
    Table { message: String },

    /// Invalid argument.
    #[error("Invalid argument: {what}")]
    InvalidArg { what: String },

    #[error(transparent)]
    Element(#[from] ElementError),
}

impl From<ActivityError> for CoreError {
    fn from(err: ActivityError) -> Self {
        match err {
            ActivityError::Expression { text, what } => CoreError::Parse {
                what: format!("coefficient '{text}': {what}"),
            },
            ActivityError::Table { message } => CoreError::MissingData { what: message },
            ActivityError::InvalidArg { what } => CoreError::InvalidArg { what },
            ActivityError::Element(e) => e.into(),
        }
    }
}
