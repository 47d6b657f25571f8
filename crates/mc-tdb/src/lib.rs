//! mc-tdb: reader for CALPHAD-style thermodynamic databases.
//!
//! Parses `ELEMENT`, `FUNCTION` and `PARAMETER` statements into segmented
//! Gibbs-energy functions, evaluates them with reference resolution and
//! derives fusion enthalpies of pure elements at their melting points.
//!
//! ```
//! use mc_tdb::ThermoDatabase;
//!
//! let db = ThermoDatabase::parse(
//!     "FUNCTION GHSERCU 298.15 -7770.458+130.485235*T-24.112392*T*LN(T); 1358 N !
//!      FUNCTION GCULIQ 298.15 +12964.736-9.511904*T+GHSERCU#; 3200 N !",
//! )
//! .unwrap();
//! let h = db.fusion_enthalpy("Cu", 1357.77).unwrap();
//! assert!((h.value - 12964.736).abs() < 1e-6);
//! ```

pub mod database;
pub mod error;
pub mod function;

pub use database::{ElementRecord, FusionEnthalpy, FusionMethod, ThermoDatabase};
pub use error::{TdbError, TdbResult};
pub use function::{FunctionRef, GibbsFunction, GibbsSegment, PowerTerm};
