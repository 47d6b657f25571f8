//! Reports printed by the subcommands, as text or JSON.

use crate::error::CliResult;
use clap::ValueEnum;
use mc_activity::{ActivityCoefficientEngine, Formalism, InteractionCoefficients, SolventMode};
use mc_elements::{Composition, PhaseState};
use mc_liquidus::LiquidusResult;
use mc_miedema::Conditions;
use mc_tdb::FusionEnthalpy;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Format {
    #[default]
    Text,
    Json,
}

pub fn emit<T: Serialize + fmt::Display>(format: Format, report: &T) -> CliResult<()> {
    match format {
        Format::Text => print!("{report}"),
        Format::Json => println!("{}", serde_json::to_string_pretty(report)?),
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize)]
pub struct ActivityRow {
    pub formalism: Formalism,
    pub target: String,
    pub ln_gamma: f64,
    pub activity: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ActivityReport {
    pub solvent: String,
    pub composition: Vec<(String, f64)>,
    pub t_k: f64,
    pub state: PhaseState,
    pub geo: String,
    pub rows: Vec<ActivityRow>,
}

impl ActivityReport {
    /// ln γ and a of each target (all components when empty) per formalism.
    pub fn compute(
        engine: &ActivityCoefficientEngine,
        comp: &Composition,
        solvent: &str,
        targets: &[String],
        formalisms: &[Formalism],
        cond: &Conditions,
    ) -> Self {
        let targets: Vec<String> = if targets.is_empty() {
            comp.symbols().into_iter().map(str::to_string).collect()
        } else {
            targets.to_vec()
        };
        let mut rows = Vec::new();
        for &formalism in formalisms {
            for target in &targets {
                let ln_gamma = engine.ln_gamma(formalism, comp, target, solvent, cond);
                rows.push(ActivityRow {
                    formalism,
                    target: target.clone(),
                    ln_gamma,
                    activity: comp.mole_fraction(target) * ln_gamma.exp(),
                });
            }
        }
        Self {
            solvent: solvent.to_string(),
            composition: comp.iter().map(|(s, x)| (s.to_string(), x)).collect(),
            t_k: cond.t_k(),
            state: cond.state,
            geo: engine.model().geo().to_string(),
            rows,
        }
    }
}

fn write_composition(f: &mut fmt::Formatter<'_>, composition: &[(String, f64)]) -> fmt::Result {
    let parts: Vec<String> = composition.iter().map(|(s, x)| format!("{s}={x:.5}")).collect();
    writeln!(f, "composition: {}", parts.join(" "))
}

impl fmt::Display for ActivityReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "solvent {} at {:.2} K ({}), geometric model {}", self.solvent, self.t_k, self.state, self.geo)?;
        write_composition(f, &self.composition)?;
        writeln!(f, "{:<10} {:<6} {:>14} {:>14}", "formalism", "target", "ln gamma", "activity")?;
        for row in &self.rows {
            writeln!(
                f,
                "{:<10} {:<6} {:>14.6} {:>14.6e}",
                row.formalism.key(),
                row.target,
                row.ln_gamma,
                row.activity
            )?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct InteractionReport(pub InteractionCoefficients);

impl fmt::Display for InteractionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = &self.0;
        writeln!(f, "solvent {} with {} and {} at {:.2} K, geometric model {}", c.solvent, c.i, c.j, c.t_k, c.geo)?;
        writeln!(f, "  ln gamma0 {:<3} {:>14.6}", c.i, c.ln_gamma0_i)?;
        writeln!(f, "  ln gamma0 {:<3} {:>14.6}", c.j, c.ln_gamma0_j)?;
        writeln!(f, "  eps {}^{:<7} {:>14.6}", c.i, c.j, c.epsilon_ij)?;
        writeln!(f, "  eps {}^{:<7} {:>14.6}", c.i, c.i, c.epsilon_ii)?;
        writeln!(f, "  rho {}^{}{:<5} {:>14.6}", c.i, c.i, c.i, c.rho_i_ii)?;
        writeln!(f, "  rho {}^{}{:<5} {:>14.6}", c.i, c.i, c.j, c.rho_i_ij)?;
        writeln!(f, "  rho {}^{}{:<5} {:>14.6}", c.i, c.j, c.j, c.rho_i_jj)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MixingReport {
    pub a: String,
    pub b: String,
    pub t_k: f64,
    pub state: PhaseState,
    /// (x_a, ΔH_mix [kJ/mol])
    pub curve: Vec<(f64, f64)>,
}

impl fmt::Display for MixingReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}-{} at {:.2} K ({})", self.a, self.b, self.t_k, self.state)?;
        writeln!(f, "{:>8} {:>14}", format!("x_{}", self.a), "dH [kJ/mol]")?;
        for (x, h) in &self.curve {
            writeln!(f, "{x:>8.4} {h:>14.6}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TdbReport {
    Functions(Vec<String>),
    Value { function: String, t_k: f64, g: f64 },
    Fusion(FusionEnthalpy),
}

impl fmt::Display for TdbReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TdbReport::Functions(names) => {
                for name in names {
                    writeln!(f, "{name}")?;
                }
                Ok(())
            }
            TdbReport::Value { function, t_k, g } => writeln!(f, "{function}({t_k:.2} K) = {g:.4} J/mol"),
            TdbReport::Fusion(h) => writeln!(
                f,
                "fusion enthalpy of {} at {:.2} K = {:.4} J/mol ({:?}, {})",
                h.element, h.t_k, h.value, h.method, h.liquid_function
            ),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct LiquidusReport(pub LiquidusResult);

impl fmt::Display for LiquidusReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let r = &self.0;
        writeln!(
            f,
            "solvent {} (x = {:.5}), Tm = {:.2} K, dHf = {:.1} J/mol ({:?})",
            r.solvent, r.solvent_fraction, r.fusion.tm_k, r.fusion.enthalpy, r.fusion.source
        )?;
        write_composition(f, &r.composition)?;
        writeln!(
            f,
            "{:<10} {:>12} {:>10} {:>10} {:>9} {:>6}",
            "formalism", "T_liq [K]", "a_liq", "a_solid", "verdict", "iter"
        )?;
        for row in &r.formalisms {
            writeln!(
                f,
                "{:<10} {:>12.3} {:>10.5} {:>10.5} {:>9} {:>6}{}",
                row.formalism.key(),
                row.t_liquidus_k,
                row.activity,
                row.solid_activity,
                row.verdict,
                row.iterations,
                if row.converged { "" } else { "  (not converged)" }
            )?;
        }
        if r.solvent_mode == SolventMode::ClosedForm && r.formalisms.len() > 1 {
            writeln!(f, "closed-form solvent term: formalisms agree, use --accurate to compare them")?;
        }
        Ok(())
    }
}

/// Job output: activities and, when requested, the liquidus.
#[derive(Debug, Clone, Serialize)]
pub struct JobReport {
    pub activity: ActivityReport,
    pub liquidus: Option<LiquidusReport>,
}

impl fmt::Display for JobReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.activity)?;
        if let Some(liquidus) = &self.liquidus {
            writeln!(f)?;
            write!(f, "{liquidus}")?;
        }
        Ok(())
    }
}
