//! Thermodynamic database errors.

use mc_core::CoreError;
use thiserror::Error;

/// Result type for database operations.
pub type TdbResult<T> = Result<T, TdbError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TdbError {
    /// Database file could not be read.
    #[error("Cannot read {path}: {message}")]
    Io { path: String, message: String },

    /// Malformed statement or expression.
    #[error("Syntax error in '{statement}': {what}")]
    Syntax { statement: String, what: String },

    /// A function references a name the database does not define.
    #[error("Function '{name}' referenced by '{referenced_by}' is not defined")]
    DanglingReference { name: String, referenced_by: String },

    /// Function references form a cycle.
    #[error("Function references form a cycle through '{name}'")]
    Cycle { name: String },

    /// Lookup of a function that is not loaded.
    #[error("Unknown function '{name}'")]
    UnknownFunction { name: String },

    /// Neither a liquid nor a solid description exists for the element.
    #[error("No fusion data for {element}: {what}")]
    NoFusionData { element: String, what: String },
}

impl From<TdbError> for CoreError {
    fn from(err: TdbError) -> Self {
        let message = err.to_string();
        match err {
            TdbError::Io { path, message } => CoreError::MissingData {
                what: format!("{path}: {message}"),
            },
            TdbError::Syntax { statement, what } => CoreError::Parse {
                what: format!("{statement}: {what}"),
            },
            TdbError::DanglingReference { .. } | TdbError::Cycle { .. } => {
                CoreError::Invariant { what: message }
            }
            TdbError::UnknownFunction { .. } | TdbError::NoFusionData { .. } => {
                CoreError::MissingData { what: message }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = TdbError::Cycle { name: "GA".into() };
        assert!(err.to_string().contains("GA"));
    }

    #[test]
    fn error_to_core_error() {
        let err = TdbError::UnknownFunction { name: "GHSERXX".into() };
        let core: CoreError = err.into();
        assert!(matches!(core, CoreError::MissingData { .. }));
    }
}
