//! Liquidus temperatures of a solvent in a multicomponent melt.

use crate::error::{LiquidusError, SolveResult};
use crate::root::{RootConfig, RootMethod, RootResult, SchroederVanLaar};
use mc_activity::{ActivityCoefficientEngine, Formalism, SolventMode};
use mc_core::ensure_finite;
use mc_elements::{Composition, PhaseState};
use mc_miedema::Conditions;
use mc_tdb::{FusionMethod, ThermoDatabase};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Solvent fraction above which the melt is treated as pure.
pub const PURE_SOLVENT_FRACTION: f64 = 0.9999;

/// Solvent activity evaluator seen by the solver.
pub trait SolventActivity: Sync {
    /// ln a of the solvent at `t_k` in `state`.
    fn ln_activity(&self, formalism: Formalism, t_k: f64, state: PhaseState) -> f64;

    /// ln a of the solvent in a solid solution of the same composition.
    fn ln_solid_activity(&self, t_k: f64) -> f64 {
        self.ln_activity(Formalism::Pelton, t_k, PhaseState::Solid)
    }
}

/// [`SolventActivity`] backed by the activity engine.
pub struct EngineActivity<'a> {
    pub engine: &'a ActivityCoefficientEngine,
    pub composition: &'a Composition,
    pub solvent: &'a str,
    pub mode: SolventMode,
}

impl SolventActivity for EngineActivity<'_> {
    fn ln_activity(&self, formalism: Formalism, t_k: f64, state: PhaseState) -> f64 {
        let cond = Conditions::liquid(t_k).with_state(state);
        self.engine
            .ln_solvent_activity(formalism, self.mode, self.composition, self.solvent, &cond)
    }

    fn ln_solid_activity(&self, t_k: f64) -> f64 {
        self.engine.ln_solvent_activity(
            Formalism::Pelton,
            SolventMode::ClosedForm,
            self.composition,
            self.solvent,
            &Conditions::solid(t_k),
        )
    }
}

/// Trust in a liquidus estimate, judged from the activity the solvent would
/// have in a solid solution of the same composition at the solved T.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Good,
    Warning,
    Caution,
}

impl Verdict {
    pub fn from_solid_activity(a: f64) -> Self {
        if a > 0.95 {
            Verdict::Good
        } else if a > 0.85 {
            Verdict::Warning
        } else {
            Verdict::Caution
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            Verdict::Good => "good",
            Verdict::Warning => "warning",
            Verdict::Caution => "caution",
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.key())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FusionSource {
    User,
    Database(FusionMethod),
}

/// T_m and ΔH_f of the solvent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FusionData {
    pub tm_k: f64,
    /// [J/mol]
    pub enthalpy: f64,
    pub source: FusionSource,
}

/// User-supplied melting data; unset fields come from the element store and
/// the database.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FusionOverride {
    pub tm_k: Option<f64>,
    pub enthalpy: Option<f64>,
}

/// Liquidus of one formalism.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormalismLiquidus {
    pub formalism: Formalism,
    pub t_liquidus_k: f64,
    /// Solvent activity in the melt at the liquidus
    pub activity: f64,
    /// Solvent activity in a solid of the same composition at the liquidus
    pub solid_activity: f64,
    pub verdict: Verdict,
    pub iterations: usize,
    pub converged: bool,
    pub method: RootMethod,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LiquidusResult {
    pub solvent: String,
    pub composition: Vec<(String, f64)>,
    pub solvent_fraction: f64,
    pub fusion: FusionData,
    /// Closed form gives the same melt activity, hence the same T, for every formalism.
    pub solvent_mode: SolventMode,
    pub formalisms: Vec<FormalismLiquidus>,
}

impl LiquidusResult {
    pub fn get(&self, formalism: Formalism) -> Option<&FormalismLiquidus> {
        self.formalisms.iter().find(|f| f.formalism == formalism)
    }

    /// Least trusted verdict over all formalisms.
    pub fn verdict(&self) -> Verdict {
        self.formalisms
            .iter()
            .map(|f| f.verdict)
            .max_by_key(|v| *v as u8)
            .unwrap_or(Verdict::Good)
    }
}

/// Couples the activity engine and a Gibbs-energy database through the
/// Schröder–van Laar relation.
pub struct LiquidusSolver<'a> {
    engine: &'a ActivityCoefficientEngine,
    database: Option<&'a ThermoDatabase>,
    config: RootConfig,
    mode: SolventMode,
}

impl<'a> LiquidusSolver<'a> {
    pub fn new(engine: &'a ActivityCoefficientEngine) -> Self {
        Self {
            engine,
            database: None,
            config: RootConfig::default(),
            mode: SolventMode::ClosedForm,
        }
    }

    pub fn with_database(mut self, database: &'a ThermoDatabase) -> Self {
        self.database = Some(database);
        self
    }

    pub fn with_config(mut self, config: RootConfig) -> Self {
        self.config = config;
        self
    }

    /// Evaluate the melt activity with the Gibbs–Duhem integral of each
    /// formalism instead of the closed-form solvent term.
    ///
    /// The closed form does not depend on the formalism, so formalisms only
    /// give different liquidus temperatures in accurate mode.
    pub fn accurate(mut self, on: bool) -> Self {
        self.mode = if on { SolventMode::GibbsDuhem } else { SolventMode::ClosedForm };
        self
    }

    pub fn config(&self) -> &RootConfig {
        &self.config
    }

    /// T_m and ΔH_f of `solvent`, overrides first.
    pub fn fusion_data(&self, solvent: &str, overrides: FusionOverride) -> SolveResult<FusionData> {
        let tm_k = overrides
            .tm_k
            .unwrap_or_else(|| self.engine.element(solvent).tm());
        if !(tm_k.is_finite() && tm_k > 0.0) {
            return Err(LiquidusError::MissingMeltingPoint {
                solvent: solvent.to_string(),
            });
        }
        if let Some(enthalpy) = overrides.enthalpy {
            let enthalpy = ensure_finite(enthalpy, "fusion enthalpy").map_err(|e| LiquidusError::InvalidArg {
                what: e.to_string(),
            })?;
            return Ok(FusionData {
                tm_k,
                enthalpy,
                source: FusionSource::User,
            });
        }
        let Some(db) = self.database.filter(|db| db.is_loaded()) else {
            return Err(LiquidusError::NeedsFusionEnthalpy {
                solvent: solvent.to_string(),
            });
        };
        let fusion = db.fusion_enthalpy(solvent, tm_k).map_err(|e| {
            tracing::warn!(solvent, error = %e, "database has no fusion enthalpy");
            LiquidusError::NeedsFusionEnthalpy {
                solvent: solvent.to_string(),
            }
        })?;
        Ok(FusionData {
            tm_k,
            enthalpy: fusion.value,
            source: FusionSource::Database(fusion.method),
        })
    }

    /// Liquidus of `solvent` in `comp` for each of `formalisms`.
    pub fn solve_all(
        &self,
        comp: &Composition,
        solvent: &str,
        formalisms: &[Formalism],
        overrides: FusionOverride,
    ) -> SolveResult<LiquidusResult> {
        if !comp.contains(solvent) {
            return Err(LiquidusError::InvalidArg {
                what: format!("solvent {solvent} is not part of the composition"),
            });
        }
        let fusion = self.fusion_data(solvent, overrides)?;
        let activity = EngineActivity {
            engine: self.engine,
            composition: comp,
            solvent,
            mode: self.mode,
        };
        let x1 = comp.mole_fraction(solvent);
        let formalisms = solve_formalisms(&activity, x1, &fusion, formalisms, &self.config);
        Ok(LiquidusResult {
            solvent: solvent.to_string(),
            composition: comp.iter().map(|(s, x)| (s.to_string(), x)).collect(),
            solvent_fraction: x1,
            fusion,
            solvent_mode: self.mode,
            formalisms,
        })
    }

    pub fn solve(
        &self,
        comp: &Composition,
        solvent: &str,
        formalism: Formalism,
        overrides: FusionOverride,
    ) -> SolveResult<FormalismLiquidus> {
        let result = self.solve_all(comp, solvent, &[formalism], overrides)?;
        result
            .formalisms
            .into_iter()
            .next()
            .ok_or_else(|| LiquidusError::InvalidArg {
                what: "no formalism solved".into(),
            })
    }
}

/// Solve every formalism in parallel against one activity evaluator.
pub fn solve_formalisms<A: SolventActivity>(
    activity: &A,
    solvent_fraction: f64,
    fusion: &FusionData,
    formalisms: &[Formalism],
    config: &RootConfig,
) -> Vec<FormalismLiquidus> {
    formalisms
        .par_iter()
        .map(|&f| solve_formalism(activity, solvent_fraction, fusion, f, config))
        .collect()
}

pub fn solve_formalism<A: SolventActivity + ?Sized>(
    activity: &A,
    solvent_fraction: f64,
    fusion: &FusionData,
    formalism: Formalism,
    config: &RootConfig,
) -> FormalismLiquidus {
    if solvent_fraction >= PURE_SOLVENT_FRACTION {
        return FormalismLiquidus {
            formalism,
            t_liquidus_k: fusion.tm_k,
            activity: 1.0,
            solid_activity: 1.0,
            verdict: Verdict::Good,
            iterations: 0,
            converged: true,
            method: RootMethod::PureSolvent,
        };
    }

    let svl = SchroederVanLaar {
        tm_k: fusion.tm_k,
        fusion_enthalpy: fusion.enthalpy,
    };
    let RootResult {
        t_k,
        iterations,
        converged,
        method,
        ..
    } = svl.solve(|t| activity.ln_activity(formalism, t, PhaseState::Liquid), config);

    let solid_activity = activity.ln_solid_activity(t_k).exp();
    let verdict = Verdict::from_solid_activity(solid_activity);
    tracing::debug!(%formalism, t_k, %verdict, "liquidus solved");
    FormalismLiquidus {
        formalism,
        t_liquidus_k: t_k,
        activity: activity.ln_activity(formalism, t_k, PhaseState::Liquid).exp(),
        solid_activity,
        verdict,
        iterations,
        converged,
        method,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verdict_thresholds() {
        assert_eq!(Verdict::from_solid_activity(0.97), Verdict::Good);
        assert_eq!(Verdict::from_solid_activity(0.90), Verdict::Warning);
        assert_eq!(Verdict::from_solid_activity(0.60), Verdict::Caution);
        assert_eq!(Verdict::from_solid_activity(0.85), Verdict::Caution);
        assert_eq!(Verdict::from_solid_activity(f64::NAN), Verdict::Caution);
    }

    struct Ideal;

    impl SolventActivity for Ideal {
        fn ln_activity(&self, _: Formalism, _: f64, _: PhaseState) -> f64 {
            0.9_f64.ln()
        }
    }

    #[test]
    fn pure_solvent_shortcut() {
        let fusion = FusionData {
            tm_k: 1811.0,
            enthalpy: 13800.0,
            source: FusionSource::User,
        };
        let out = solve_formalisms(&Ideal, 0.99995, &fusion, &Formalism::ALL, &RootConfig::default());
        assert_eq!(out.len(), 3);
        for f in out {
            assert_eq!(f.t_liquidus_k, 1811.0);
            assert_eq!(f.activity, 1.0);
            assert_eq!(f.method, RootMethod::PureSolvent);
        }
    }

    #[test]
    fn worst_verdict_wins() {
        let entry = |verdict| FormalismLiquidus {
            formalism: Formalism::Pelton,
            t_liquidus_k: 1000.0,
            activity: 0.9,
            solid_activity: 0.9,
            verdict,
            iterations: 1,
            converged: true,
            method: RootMethod::Newton,
        };
        let result = LiquidusResult {
            solvent: "Fe".into(),
            composition: vec![],
            solvent_fraction: 0.9,
            fusion: FusionData {
                tm_k: 1811.0,
                enthalpy: 13800.0,
                source: FusionSource::User,
            },
            solvent_mode: SolventMode::ClosedForm,
            formalisms: vec![entry(Verdict::Good), entry(Verdict::Caution), entry(Verdict::Warning)],
        };
        assert_eq!(result.verdict(), Verdict::Caution);
    }
}
