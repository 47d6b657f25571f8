use thiserror::Error;

pub type CoreResult<T> = Result<T, CoreError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    #[error("Non-finite numeric value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: String },

    #[error("Parse error: {what}")]
    Parse { what: String },

    #[error("Missing data: {what}")]
    MissingData { what: String },

    #[error("Invariant violated: {what}")]
    Invariant { what: String },
}
