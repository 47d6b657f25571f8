//! Activity-coefficient engine.
//!
//! Resolves a composition against the element store, gathers the interaction
//! coefficients of its solutes (from the extrapolation model, or from the
//! reference table when preferred) and evaluates the chosen formalism.

use crate::coefficients::CoefficientSet;
use crate::error::ActivityResult;
use crate::formalism::{ActivityOptions, Formalism, SolventMode};
use crate::reference::ReferenceTable;
use mc_elements::{BuiltinElements, Composition, Element, ElementStore};
use mc_miedema::{Conditions, GeoModel, GeometricExtrapolationModel, ModelOptions};
use serde::Serialize;
use std::sync::Arc;

/// ln γ°, ε and ρ of a solvent k with solutes i and j.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InteractionCoefficients {
    pub solvent: String,
    pub i: String,
    pub j: String,
    pub geo: String,
    pub t_k: f64,
    pub ln_gamma0_i: f64,
    pub ln_gamma0_j: f64,
    pub epsilon_ij: f64,
    pub epsilon_ii: f64,
    pub rho_i_ii: f64,
    pub rho_i_ij: f64,
    pub rho_i_jj: f64,
}

pub struct ActivityCoefficientEngine {
    store: Arc<dyn ElementStore>,
    model: GeometricExtrapolationModel,
    references: Option<ReferenceTable>,
    options: ActivityOptions,
}

impl ActivityCoefficientEngine {
    pub fn new(store: Arc<dyn ElementStore>, model: GeometricExtrapolationModel) -> Self {
        Self {
            store,
            model,
            references: None,
            options: ActivityOptions::default(),
        }
    }

    /// Engine over the built-in element table.
    pub fn builtin(options: ModelOptions, geo: GeoModel) -> Self {
        Self::new(Arc::new(BuiltinElements), GeometricExtrapolationModel::new(options, geo))
    }

    pub fn with_options(mut self, options: ActivityOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_references(mut self, references: ReferenceTable) -> Self {
        self.references = Some(references);
        self
    }

    pub fn options(&self) -> &ActivityOptions {
        &self.options
    }

    pub fn model(&self) -> &GeometricExtrapolationModel {
        &self.model
    }

    pub fn element(&self, symbol: &str) -> Element {
        self.store.element(symbol)
    }

    fn mass_of(&self, symbol: &str) -> f64 {
        self.store.element(symbol).mass()
    }

    fn preferred_references(&self) -> Option<&ReferenceTable> {
        if self.options.prefer_references {
            self.references.as_ref()
        } else {
            None
        }
    }

    /// ln γ° of `solute` in `solvent`.
    pub fn ln_gamma_infinite(&self, solvent: &Element, solute: &Element, cond: &Conditions) -> f64 {
        if let Some(refs) = self.preferred_references() {
            if let Some(v) = refs.ln_gamma_infinite(solvent.symbol(), solute.symbol(), cond.t_k()) {
                tracing::debug!(solvent = solvent.symbol(), solute = solute.symbol(), v, "reference ln γ°");
                return v;
            }
        }
        self.model.infinite_dilution_term(solvent, solute, cond)
    }

    /// ε_i^j in `solvent`.
    pub fn epsilon(&self, solvent: &Element, i: &Element, j: &Element, cond: &Conditions) -> f64 {
        if let Some(refs) = self.preferred_references() {
            let found = refs.interaction(solvent.symbol(), i.symbol(), j.symbol(), cond.t_k(), |s| {
                self.mass_of(s)
            });
            if let Some(v) = found {
                tracing::debug!(solvent = solvent.symbol(), i = i.symbol(), j = j.symbol(), v, "reference ε");
                return v;
            }
        }
        self.model.first_order_interaction(solvent, i, j, cond)
    }

    /// Coefficients of `solutes` in `solvent`; ρ only when asked for.
    pub fn coefficients(
        &self,
        solvent: &Element,
        solutes: &[Element],
        cond: &Conditions,
        second_order: bool,
    ) -> CoefficientSet {
        let ln_gamma0 = solutes
            .iter()
            .map(|s| self.ln_gamma_infinite(solvent, s, cond))
            .collect();
        let epsilon = solutes
            .iter()
            .map(|i| solutes.iter().map(|j| self.epsilon(solvent, i, j, cond)).collect())
            .collect();

        let rho = second_order.then(|| {
            let refs: Vec<&Element> = solutes.iter().collect();
            let q = self.model.excess_model(solvent, &refs, cond);
            let n = solutes.len();
            (0..n)
                .map(|i| {
                    (0..n)
                        .map(|j| {
                            (0..n)
                                .map(|k| {
                                    if j == k {
                                        q.rho_self(0, i + 1, j + 1)
                                    } else {
                                        q.rho_cross(0, i + 1, j + 1, k + 1)
                                    }
                                })
                                .collect()
                        })
                        .collect()
                })
                .collect()
        });

        CoefficientSet {
            solvent: solvent.symbol().to_string(),
            solutes: solutes.iter().map(|s| s.symbol().to_string()).collect(),
            ln_gamma0,
            epsilon,
            rho,
        }
    }

    /// Resolve the solutes of `comp` and their mole fractions.
    fn resolve(&self, comp: &Composition, solvent: &str) -> (Vec<Element>, Vec<f64>) {
        comp.solutes(solvent)
            .map(|(s, x)| (self.store.element(s), x))
            .unzip()
    }

    /// ln γ of `target` in `comp` with `solvent` as the reference solvent.
    ///
    /// Returns NaN (and logs a warning) when the solvent or the target is not
    /// part of the composition. A target equal to the solvent yields the
    /// solvent's ln γ.
    pub fn ln_gamma(
        &self,
        formalism: Formalism,
        comp: &Composition,
        target: &str,
        solvent: &str,
        cond: &Conditions,
    ) -> f64 {
        if !comp.contains(solvent) {
            tracing::warn!(solvent, "solvent is not part of the composition");
            return f64::NAN;
        }
        if target == solvent {
            return self.ln_gamma_solvent(formalism, comp, solvent, cond);
        }
        if !comp.contains(target) {
            tracing::warn!(solute = target, "solute is not part of the composition");
            return f64::NAN;
        }

        let solvent_el = self.store.element(solvent);
        let (solutes, x) = self.resolve(comp, solvent);
        let set = self.coefficients(&solvent_el, &solutes, cond, formalism.needs_second_order());
        match set.index_of(target) {
            Some(i) => set.solute_ln_gamma(formalism, i, &x),
            None => f64::NAN,
        }
    }

    pub fn wagner(&self, comp: &Composition, target: &str, solvent: &str, cond: &Conditions) -> f64 {
        self.ln_gamma(Formalism::Wagner, comp, target, solvent, cond)
    }

    pub fn pelton(&self, comp: &Composition, target: &str, solvent: &str, cond: &Conditions) -> f64 {
        self.ln_gamma(Formalism::Pelton, comp, target, solvent, cond)
    }

    pub fn elliott(&self, comp: &Composition, target: &str, solvent: &str, cond: &Conditions) -> f64 {
        self.ln_gamma(Formalism::Elliott, comp, target, solvent, cond)
    }

    /// Solvent ln γ using the configured solvent mode.
    pub fn ln_gamma_solvent(&self, formalism: Formalism, comp: &Composition, solvent: &str, cond: &Conditions) -> f64 {
        self.ln_gamma_solvent_with(formalism, self.options.solvent_mode, comp, solvent, cond)
    }

    pub fn ln_gamma_solvent_with(
        &self,
        formalism: Formalism,
        mode: SolventMode,
        comp: &Composition,
        solvent: &str,
        cond: &Conditions,
    ) -> f64 {
        if !comp.contains(solvent) {
            tracing::warn!(solvent, "solvent is not part of the composition");
            return f64::NAN;
        }
        let (solutes, x) = self.resolve(comp, solvent);
        if solutes.is_empty() {
            return 0.0;
        }
        let solvent_el = self.store.element(solvent);
        match mode {
            SolventMode::ClosedForm => {
                let set = self.coefficients(&solvent_el, &solutes, cond, false);
                set.solvent_ln_gamma_closed_form(&x)
            }
            SolventMode::GibbsDuhem => {
                let set = self.coefficients(&solvent_el, &solutes, cond, formalism.needs_second_order());
                set.solvent_ln_gamma_gibbs_duhem(formalism, &x, self.options.gibbs_duhem_intervals)
            }
        }
    }

    /// ln a of the solvent: ln x_1 + ln γ_1.
    pub fn ln_solvent_activity(
        &self,
        formalism: Formalism,
        mode: SolventMode,
        comp: &Composition,
        solvent: &str,
        cond: &Conditions,
    ) -> f64 {
        let x1 = comp.mole_fraction(solvent);
        x1.ln() + self.ln_gamma_solvent_with(formalism, mode, comp, solvent, cond)
    }

    /// Activity a = x γ of `target`.
    pub fn activity(
        &self,
        formalism: Formalism,
        comp: &Composition,
        target: &str,
        solvent: &str,
        cond: &Conditions,
    ) -> f64 {
        comp.mole_fraction(target) * self.ln_gamma(formalism, comp, target, solvent, cond).exp()
    }

    /// Parse `solutes` against `solvent` and evaluate ln γ of `target`.
    pub fn ln_gamma_for_formula(
        &self,
        formalism: Formalism,
        solvent: &str,
        solutes: &str,
        target: &str,
        cond: &Conditions,
    ) -> ActivityResult<f64> {
        let comp = Composition::with_solvent(solvent, solutes)?;
        Ok(self.ln_gamma(formalism, &comp, target, solvent, cond))
    }

    /// First- and second-order coefficients of the triple (solvent, i, j).
    pub fn interaction_coefficients(&self, solvent: &str, i: &str, j: &str, cond: &Conditions) -> InteractionCoefficients {
        let (k, ei, ej) = (self.element(solvent), self.element(i), self.element(j));
        InteractionCoefficients {
            solvent: solvent.to_string(),
            i: i.to_string(),
            j: j.to_string(),
            geo: self.model.geo().to_string(),
            t_k: cond.t_k(),
            ln_gamma0_i: self.ln_gamma_infinite(&k, &ei, cond),
            ln_gamma0_j: self.ln_gamma_infinite(&k, &ej, cond),
            epsilon_ij: self.epsilon(&k, &ei, &ej, cond),
            epsilon_ii: self.epsilon(&k, &ei, &ei, cond),
            rho_i_ii: self.model.second_order_self(&k, &ei, cond),
            rho_i_ij: self.model.second_order_cross(&k, &ei, &ej, cond),
            rho_i_jj: self.model.second_order_mixed(&k, &ei, &ej, cond),
        }
    }
}
