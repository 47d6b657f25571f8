//! Element and composition errors.

use mc_core::CoreError;
use thiserror::Error;

/// Result type for element operations.
pub type ElementResult<T> = Result<T, ElementError>;

/// Errors raised while parsing compositions or loading element tables.
///
/// Unknown element symbols are not errors: they produce an `Element` whose
/// properties are NaN.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ElementError {
    /// Malformed alloy formula.
    #[error("Invalid formula '{formula}': {what}")]
    Formula { formula: String, what: String },

    /// Non-physical values (negative or non-finite fractions).
    #[error("Non-physical value for {what}")]
    NonPhysical { what: &'static str },

    /// Invalid argument.
    #[error("Invalid argument: {what}")]
    InvalidArg { what: String },

    /// Element table could not be read or decoded.
    #[error("Element table error: {message}")]
    Table { message: String },
}

impl From<ElementError> for CoreError {
    fn from(err: ElementError) -> Self {
        match err {
            ElementError::Formula { formula, what } => CoreError::Parse {
                what: format!("formula '{formula}': {what}"),
            },
            ElementError::NonPhysical { what } => CoreError::Invariant {
                what: format!("Non-physical composition value: {what}"),
            },
            ElementError::InvalidArg { what } => CoreError::InvalidArg { what },
            ElementError::Table { message } => CoreError::MissingData { what: message },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ElementError::Formula {
            formula: "fe2".into(),
            what: "expected element symbol".into(),
        };
        assert!(err.to_string().contains("fe2"));
    }

    #[test]
    fn error_to_core_error() {
        let err = ElementError::NonPhysical {
            what: "negative coefficient",
        };
        let core: CoreError = err.into();
        assert!(matches!(core, CoreError::Invariant { .. }));
    }
}
