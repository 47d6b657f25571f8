//! Liquidus solver errors.

use mc_core::CoreError;
use mc_tdb::TdbError;
use thiserror::Error;

/// Marker carried by [`LiquidusError::NeedsFusionEnthalpy`] so front ends can
/// ask the user for a value instead of reporting a failure.
pub const NEEDS_FUSION_ENTHALPY: &str = "NEEDS_FUSION_ENTHALPY";

pub type SolveResult<T> = Result<T, LiquidusError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LiquidusError {
    /// Neither an override nor a database supplies ΔH_f of the solvent.
    #[error("NEEDS_FUSION_ENTHALPY: no fusion enthalpy for {solvent}")]
    NeedsFusionEnthalpy { solvent: String },

    /// Melting point unknown and not given.
    #[error("No melting point for {solvent}")]
    MissingMeltingPoint { solvent: String },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: String },

    #[error(transparent)]
    Database(#[from] TdbError),
}

impl LiquidusError {
    pub fn needs_fusion_enthalpy(&self) -> bool {
        matches!(self, LiquidusError::NeedsFusionEnthalpy { .. })
    }
}

impl From<LiquidusError> for CoreError {
    fn from(err: LiquidusError) -> Self {
        let message = err.to_string();
        match err {
            LiquidusError::NeedsFusionEnthalpy { .. } | LiquidusError::MissingMeltingPoint { .. } => {
                CoreError::MissingData { what: message }
            }
            LiquidusError::InvalidArg { what } => CoreError::InvalidArg { what },
            LiquidusError::Database(e) => e.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinel_is_in_the_message() {
        let err = LiquidusError::NeedsFusionEnthalpy { solvent: "Fe".into() };
        assert!(err.to_string().starts_with(NEEDS_FUSION_ENTHALPY));
        assert!(err.needs_fusion_enthalpy());
        let core: CoreError = err.into();
        assert!(matches!(core, CoreError::MissingData { .. }));
    }

    #[test]
    fn database_errors_pass_through() {
        let err: LiquidusError = TdbError::Cycle { name: "GA".into() }.into();
        assert!(!err.needs_fusion_enthalpy());
        assert!(err.to_string().contains("GA"));
    }
}
