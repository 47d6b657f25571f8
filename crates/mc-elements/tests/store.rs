//! Element store and composition behavior as seen by downstream crates.

use mc_elements::{BuiltinElements, Composition, ElementStore, ElementTable};
use std::path::PathBuf;

fn overrides() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/data/overrides.yaml")
}

#[test]
fn file_overrides_replace_and_extend_the_builtin_table() {
    let mut table = ElementTable::with_builtin();
    let before = table.len();
    assert_eq!(table.merge_yaml_file(&overrides()).unwrap(), 2);

    assert_eq!(table.element("Fe").phi(), 4.50);
    assert_ne!(BuiltinElements.element("Fe").phi(), 4.50);
    assert!(table.element("Tc").exists());
    assert_eq!(table.element("Tc").dh_trans(), 0.0);
    let added = usize::from(BuiltinElements.lookup("Tc").is_none());
    assert_eq!(table.len(), before + added);
}

#[test]
fn missing_file_is_a_table_error() {
    let mut table = ElementTable::new();
    assert!(table.merge_yaml_file(&PathBuf::from("no/such/file.yaml")).is_err());
    assert!(table.is_empty());
}

#[test]
fn unknown_elements_degrade_to_nan() {
    let xx = BuiltinElements.element("Xx");
    assert!(!xx.exists());
    for v in [xx.phi(), xx.nws13(), xx.v23(), xx.mass(), xx.tm()] {
        assert!(v.is_nan());
    }
}

#[test]
fn steel_composition() {
    let comp = Composition::with_solvent("Fe", "C0.02Mn0.01Si0.005").unwrap();
    let total: f64 = comp.iter().map(|(_, x)| x).sum();
    assert!((total - 1.0).abs() < 1e-12);
    assert_eq!(comp.solutes("Fe").count(), 3);
    assert!(comp.mole_fraction("Fe") > 0.96);
    let mass = comp.molar_mass(|s| BuiltinElements.element(s).mass());
    assert!(mass > 50.0 && mass < 56.0, "{mass}");
}

#[test]
fn pure_detection() {
    assert_eq!(Composition::pure("Ni").is_pure(), Some("Ni"));
    assert_eq!(Composition::with_solvent("Ni", "").unwrap().is_pure(), Some("Ni"));
    assert!(Composition::parse("Fe2Ni1").unwrap().is_pure().is_none());
}
