//! mc-miedema: Miedema binary interactions and geometric extrapolation.
//!
//! Provides:
//! - `PairInteractionModel`: binary interaction energy f(A,B), interaction and
//!   dilution heats, mixing energy with the volume-in-alloy fixed point,
//!   elastic strain energy, and the memoized similarity metrics
//! - `GeoModel`: the UEM1 / UEM2 / GSM weighting strategies
//! - `GeometricExtrapolationModel`: ln γ°, first-order ε and second-order ρ
//!   interaction coefficients for a solvent with one or two solutes
//! - `ExcessModel`: the multicomponent excess energy Q(x) assembled from
//!   subregular binaries, used for second-order coefficients
//!
//! Missing element data never raises an error here; it propagates as NaN.

pub mod excess;
pub mod extrapolation;
pub mod options;
pub mod pair;
pub mod similarity;
pub mod volume;
pub mod weights;

pub use excess::ExcessModel;
pub use extrapolation::{DirectionalWeights, GeometricExtrapolationModel};
pub use options::{Conditions, ModelOptions, OrderState};
pub use pair::{PairInteractionModel, pair_energy};
pub use similarity::SimilarityMetric;
pub use weights::{GeoModel, Uem2Variant, split_share};
