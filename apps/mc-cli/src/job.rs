//! YAML job files.
//!
//! ```yaml
//! solvent: Fe
//! solutes: Mn0.01Si0.005C0.02
//! temperature: 1873
//! state: liquid
//! geo: uem2
//! formalisms: [wagner, pelton, elliott]
//! targets: [Si, C]
//! model: { excess_entropy: false, lambda: 0 }
//! activity: { prefer_references: true }
//! references: refs.yaml
//! liquidus:
//!   tdb: unary.tdb
//!   tm: 1811
//!   accurate: false
//! ```
//!
//! Relative paths are resolved against the job file's directory.

use crate::error::{CliError, CliResult};
use crate::report::{ActivityReport, JobReport, LiquidusReport};
use crate::setup::{ModelSetup, read_text, resolve};
use mc_activity::{ActivityOptions, Formalism};
use mc_elements::{Composition, PhaseState};
use mc_liquidus::{FusionOverride, LiquidusSolver, RootConfig};
use mc_miedema::{Conditions, GeoModel, ModelOptions};
use mc_tdb::ThermoDatabase;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Job {
    pub solvent: String,
    #[serde(default)]
    pub solutes: String,
    /// [K]
    pub temperature: f64,
    #[serde(default = "default_state")]
    pub state: String,
    #[serde(default = "default_geo")]
    pub geo: String,
    #[serde(default)]
    pub formalisms: Vec<String>,
    #[serde(default)]
    pub targets: Vec<String>,
    #[serde(default)]
    pub model: ModelOptions,
    #[serde(default)]
    pub activity: ActivityOptions,
    pub elements: Option<PathBuf>,
    pub references: Option<PathBuf>,
    pub liquidus: Option<LiquidusJob>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LiquidusJob {
    pub tdb: Option<PathBuf>,
    pub tm: Option<f64>,
    pub fusion_enthalpy: Option<f64>,
    #[serde(default)]
    pub accurate: bool,
    #[serde(default)]
    pub root: RootConfig,
}

fn default_state() -> String {
    PhaseState::Liquid.key().to_string()
}

fn default_geo() -> String {
    GeoModel::default().key().to_string()
}

/// Parse formalism names; none means all of them.
pub fn parse_formalisms(names: &[String]) -> CliResult<Vec<Formalism>> {
    if names.is_empty() || names.iter().any(|n| n.eq_ignore_ascii_case("all")) {
        return Ok(Formalism::ALL.to_vec());
    }
    names
        .iter()
        .map(|n| n.parse::<Formalism>().map_err(CliError::InvalidArg))
        .collect()
}

impl Job {
    pub fn from_yaml_str(yaml: &str) -> CliResult<Self> {
        serde_yaml::from_str(yaml).map_err(|e| CliError::Job(e.to_string()))
    }

    pub fn load(path: &Path) -> CliResult<Self> {
        Self::from_yaml_str(&read_text(path)?)
    }

    pub fn composition(&self) -> CliResult<Composition> {
        Ok(Composition::with_solvent(&self.solvent, &self.solutes)?)
    }

    pub fn conditions(&self) -> CliResult<Conditions> {
        let state: PhaseState = self.state.parse().map_err(CliError::InvalidArg)?;
        if !(self.temperature.is_finite() && self.temperature > 0.0) {
            return Err(CliError::InvalidArg(format!("temperature {} K", self.temperature)));
        }
        Ok(Conditions::liquid(self.temperature).with_state(state))
    }

    pub fn setup(&self, base: Option<&Path>) -> CliResult<ModelSetup> {
        Ok(ModelSetup {
            geo: self.geo.parse().map_err(CliError::InvalidArg)?,
            model: self.model,
            activity: self.activity,
            elements: self.elements.as_deref().map(|p| resolve(base, p)),
            references: self.references.as_deref().map(|p| resolve(base, p)),
        })
    }

    /// Run the job; `base` is the directory relative paths refer to.
    pub fn run(&self, base: Option<&Path>) -> CliResult<JobReport> {
        let comp = self.composition()?;
        let cond = self.conditions()?;
        let formalisms = parse_formalisms(&self.formalisms)?;
        let engine = self.setup(base)?.engine()?;
        tracing::info!(solvent = %self.solvent, solutes = %self.solutes, t_k = cond.t_k(), "running job");

        let activity = ActivityReport::compute(&engine, &comp, &self.solvent, &self.targets, &formalisms, &cond);

        let liquidus = match &self.liquidus {
            None => None,
            Some(job) => {
                let database = match &job.tdb {
                    Some(path) => Some(ThermoDatabase::load(&resolve(base, path))?),
                    None => None,
                };
                let mut solver = LiquidusSolver::new(&engine)
                    .with_config(job.root)
                    .accurate(job.accurate);
                if let Some(db) = &database {
                    solver = solver.with_database(db);
                }
                let overrides = FusionOverride {
                    tm_k: job.tm,
                    enthalpy: job.fusion_enthalpy,
                };
                Some(LiquidusReport(solver.solve_all(&comp, &self.solvent, &formalisms, overrides)?))
            }
        };
        Ok(JobReport { activity, liquidus })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_job_uses_defaults() {
        let job = Job::from_yaml_str("solvent: Fe\nsolutes: Si0.01\ntemperature: 1873\n").unwrap();
        assert_eq!(job.geo, "uem1");
        assert_eq!(job.state, "liquid");
        assert!(job.liquidus.is_none());
        assert_eq!(parse_formalisms(&job.formalisms).unwrap().len(), 3);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(Job::from_yaml_str("solvent: Fe\ntemperature: 1873\ncolour: red\n").is_err());
    }

    #[test]
    fn bad_names_are_invalid_arguments() {
        assert!(parse_formalisms(&["hillert".into()]).is_err());
        let job = Job::from_yaml_str("solvent: Fe\ntemperature: 1873\ngeo: kohler\n").unwrap();
        assert!(job.setup(None).is_err());
        let job = Job::from_yaml_str("solvent: Fe\ntemperature: -5\n").unwrap();
        assert!(job.conditions().is_err());
    }

    #[test]
    fn runs_activity_and_liquidus() {
        let yaml = r#"
solvent: Fe
solutes: Ni0.02
temperature: 1873
geo: gsm
formalisms: [pelton]
liquidus:
  tm: 1811
  fusion_enthalpy: 13800
"#;
        let report = Job::from_yaml_str(yaml).unwrap().run(None).unwrap();
        assert_eq!(report.activity.rows.len(), 2);
        assert!(report.activity.rows.iter().all(|r| r.ln_gamma.is_finite()));
        let liquidus = report.liquidus.unwrap().0;
        let pelton = liquidus.get(Formalism::Pelton).unwrap();
        assert!(pelton.t_liquidus_k < 1861.0);
        let text = report.activity.to_string();
        assert!(text.contains("pelton"));
    }

    #[test]
    fn liquidus_without_enthalpy_needs_one() {
        let yaml = "solvent: Fe\nsolutes: Ni0.02\ntemperature: 1873\nliquidus: {}\n";
        let err = Job::from_yaml_str(yaml).unwrap().run(None).unwrap_err();
        assert!(err.to_string().contains(mc_liquidus::NEEDS_FUSION_ENTHALPY));
    }
}
