//! CLI errors.

use mc_activity::ActivityError;
use mc_elements::ElementError;
use mc_liquidus::LiquidusError;
use mc_tdb::TdbError;
use thiserror::Error;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Cannot read {path}: {message}")]
    Io { path: String, message: String },

    #[error("Invalid job file: {0}")]
    Job(String),

    #[error("Invalid argument: {0}")]
    InvalidArg(String),

    #[error("Output encoding failed: {0}")]
    Output(#[from] serde_json::Error),

    #[error(transparent)]
    Element(#[from] ElementError),

    #[error(transparent)]
    Activity(#[from] ActivityError),

    #[error(transparent)]
    Database(#[from] TdbError),

    #[error(transparent)]
    Liquidus(#[from] LiquidusError),
}
