//! mc-elements: element data and compositions for meltcalc.
//!
//! Provides:
//! - Per-element physical constants (`ElementData`) and the `Element` handle
//!   that degrades to NaN for unknown symbols
//! - The `ElementStore` lookup contract with a built-in table and YAML
//!   override files
//! - `PhaseState` (liquid/solid) and the constants it selects
//! - Alloy formula parsing into normalized mole fractions (`Composition`)
//!
//! # Example
//!
//! ```
//! use mc_elements::{BuiltinElements, Composition, ElementStore};
//!
//! let comp = Composition::with_solvent("Fe", "Mn0.1Si0.02").unwrap();
//! assert!(comp.contains("Si"));
//!
//! let fe = BuiltinElements.element("Fe");
//! assert!(fe.exists());
//! assert!(BuiltinElements.element("Xx").phi().is_nan());
//! ```

pub mod composition;
pub mod element;
pub mod error;
pub mod phase;
pub mod store;

// Re-exports for ergonomics
pub use composition::{Composition, parse_formula};
pub use element::{Element, ElementData, HybridClass};
pub use error::{ElementError, ElementResult};
pub use phase::PhaseState;
pub use store::{BuiltinElements, ElementStore, ElementTable, is_periodic_symbol};
