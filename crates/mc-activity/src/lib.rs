//! mc-activity: activity coefficients of multicomponent melts.
//!
//! Provides:
//! - `ActivityCoefficientEngine`: solute and solvent ln γ under the Wagner,
//!   Pelton (Darken quadratic) and Elliott formalisms
//! - `CoefficientSet`: ln γ°, ε and ρ of one solvent's solutes and the
//!   formalism expansions over them, including the Gibbs–Duhem solvent term
//! - `ReferenceTable`: literature coefficients in the `a/T+b` grammar with
//!   mass-to-mole conversion and reverse-key lookup
//!
//! # Example
//!
//! ```
//! use mc_activity::{ActivityCoefficientEngine, Formalism};
//! use mc_elements::Composition;
//! use mc_miedema::{Conditions, GeoModel, ModelOptions};
//!
//! let engine = ActivityCoefficientEngine::builtin(ModelOptions::default(), GeoModel::Uem1);
//! let comp = Composition::with_solvent("Fe", "Si0.02").unwrap();
//! let ln_gamma = engine.ln_gamma(Formalism::Pelton, &comp, "Si", "Fe", &Conditions::liquid(1873.0));
//! assert!(ln_gamma.is_finite());
//! ```

pub mod coefficients;
pub mod engine;
pub mod error;
pub mod formalism;
pub mod reference;

pub use coefficients::CoefficientSet;
pub use engine::{ActivityCoefficientEngine, InteractionCoefficients};
pub use error::{ActivityError, ActivityResult};
pub use formalism::{ActivityOptions, Formalism, SolventMode};
pub use reference::{Basis, CoefficientExpr, DilutionKind, DilutionRef, InteractionRef, RefTemperature, ReferenceTable};
