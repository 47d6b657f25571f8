//! Activity engine integration tests on steel-like melts.

use mc_activity::{ActivityCoefficientEngine, ActivityOptions, Formalism, ReferenceTable, SolventMode};
use mc_elements::Composition;
use mc_miedema::{Conditions, GeoModel, ModelOptions};

fn engine(geo: GeoModel) -> ActivityCoefficientEngine {
    ActivityCoefficientEngine::builtin(ModelOptions::default(), geo)
}

#[test]
fn pure_solvent_limit_for_every_formalism_and_scheme() {
    let comp = Composition::pure("Fe");
    let cond = Conditions::liquid(1873.0);
    for geo in GeoModel::ALL {
        let e = engine(geo);
        for f in Formalism::ALL {
            assert_eq!(e.ln_gamma(f, &comp, "Fe", "Fe", &cond), 0.0, "{geo} {f}");
        }
    }
}

#[test]
fn steel_melt_coefficients_are_finite() {
    let e = engine(GeoModel::Uem2(Default::default()));
    let comp = Composition::with_solvent("Fe", "Mn0.01Si0.005C0.02").unwrap();
    let cond = Conditions::liquid(1873.0);
    for target in ["Mn", "Si", "C", "Fe"] {
        for f in Formalism::ALL {
            let v = e.ln_gamma(f, &comp, target, "Fe", &cond);
            assert!(v.is_finite(), "{target} {f}: {v}");
        }
    }
}

#[test]
fn gibbs_duhem_solvent_matches_closed_form_for_pelton() {
    let e = engine(GeoModel::Gsm);
    let comp = Composition::with_solvent("Fe", "Si0.03C0.02").unwrap();
    let cond = Conditions::liquid(1873.0);
    let closed = e.ln_gamma_solvent_with(Formalism::Pelton, SolventMode::ClosedForm, &comp, "Fe", &cond);
    let integrated = e.ln_gamma_solvent_with(Formalism::Pelton, SolventMode::GibbsDuhem, &comp, "Fe", &cond);
    assert!((closed - integrated).abs() < 1e-6 * closed.abs().max(1.0), "{closed} vs {integrated}");
}

#[test]
fn duplicate_solutes_are_summed() {
    let e = engine(GeoModel::Uem1);
    let cond = Conditions::liquid(1873.0);
    let once = e
        .ln_gamma_for_formula(Formalism::Pelton, "Fe", "Si0.02", "Si", &cond)
        .unwrap();
    let split = e
        .ln_gamma_for_formula(Formalism::Pelton, "Fe", "Si0.01Si0.01", "Si", &cond)
        .unwrap();
    assert!((once - split).abs() < 1e-12);
}

#[test]
fn literature_values_override_the_model() {
    let yaml = r#"
interactions:
  - { solvent: Fe, i: Si, j: Si, value: 6.4, temperature: T }
dilution:
  - { solvent: Fe, solute: Si, value: -6.2, temperature: T }
"#;
    let refs = ReferenceTable::from_yaml_str(yaml).unwrap();
    let e = engine(GeoModel::Uem1)
        .with_references(refs)
        .with_options(ActivityOptions {
            prefer_references: true,
            ..ActivityOptions::default()
        });
    let comp = Composition::with_solvent("Fe", "Si0.01").unwrap();
    let x = comp.mole_fraction("Si");
    let v = e.wagner(&comp, "Si", "Fe", &Conditions::liquid(1873.0));
    assert!((v - (-6.2 + 6.4 * x)).abs() < 1e-12);
}

#[test]
fn unknown_solute_propagates_nan() {
    let e = engine(GeoModel::Uem1);
    let comp = Composition::with_solvent("Fe", "Xx0.01").unwrap();
    assert!(e.pelton(&comp, "Xx", "Fe", &Conditions::liquid(1873.0)).is_nan());
}

#[test]
fn closed_form_solvent_ignores_the_formalism() {
    let e = engine(GeoModel::Uem1);
    let comp = Composition::with_solvent("Fe", "Mn0.01Si0.005C0.02").unwrap();
    let cond = Conditions::liquid(1873.0);
    let wagner = e.ln_gamma_solvent_with(Formalism::Wagner, SolventMode::ClosedForm, &comp, "Fe", &cond);
    for f in Formalism::ALL {
        let v = e.ln_gamma_solvent_with(f, SolventMode::ClosedForm, &comp, "Fe", &cond);
        assert_eq!(v, wagner, "{f}");
    }
    assert!(wagner.is_finite());
}
