//! mc-core: stable foundation for meltcalc.
//!
//! Contains:
//! - units (uom SI types + constructors, gas constant)
//! - numeric (Real + tolerances + float helpers + quadrature)
//! - cache (get-or-compute memoization shared by the model crates)
//! - error (shared error types)

pub mod cache;
pub mod error;
pub mod numeric;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use cache::{DEFAULT_MEMO_CAPACITY, FloatKey, MemoCache};
pub use error::{CoreError, CoreResult};
pub use numeric::*;
pub use units::*;
