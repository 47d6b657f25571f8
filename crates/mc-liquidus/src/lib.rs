//! mc-liquidus: liquidus temperatures from the Schröder–van Laar relation.
//!
//! The solvent's activity in the melt comes from the activity engine; its
//! fusion enthalpy from a user override or a thermodynamic database. Each
//! requested formalism is solved independently (in parallel) and judged by
//! the solvent activity a solid of the same composition would have.
//!
//! ```
//! use mc_activity::{ActivityCoefficientEngine, Formalism};
//! use mc_elements::Composition;
//! use mc_liquidus::{FusionOverride, LiquidusSolver};
//! use mc_miedema::{GeoModel, ModelOptions};
//!
//! let engine = ActivityCoefficientEngine::builtin(ModelOptions::default(), GeoModel::Uem1);
//! let solver = LiquidusSolver::new(&engine);
//! let fusion = FusionOverride { tm_k: Some(1811.0), enthalpy: Some(13800.0) };
//! let result = solver
//!     .solve_all(&Composition::pure("Fe"), "Fe", &Formalism::ALL, fusion)
//!     .unwrap();
//! assert_eq!(result.get(Formalism::Pelton).unwrap().t_liquidus_k, 1811.0);
//! ```

pub mod error;
pub mod root;
pub mod solver;

pub use error::{LiquidusError, NEEDS_FUSION_ENTHALPY, SolveResult};
pub use root::{RootConfig, RootMethod, RootResult, SchroederVanLaar};
pub use solver::{
    EngineActivity, FormalismLiquidus, FusionData, FusionOverride, FusionSource, LiquidusResult, LiquidusSolver,
    PURE_SOLVENT_FRACTION, SolventActivity, Verdict, solve_formalism, solve_formalisms,
};
