//! Integration tests on a small unary database file.

use mc_tdb::{FusionMethod, TdbError, ThermoDatabase};
use std::path::PathBuf;

fn unary() -> ThermoDatabase {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/data/unary.tdb");
    ThermoDatabase::load(&path).unwrap()
}

#[test]
fn loads_all_statements() {
    let db = unary();
    assert!(db.is_loaded());
    assert_eq!(db.elements().len(), 3);
    assert_eq!(db.function_names().count(), 6);
    assert_eq!(db.function("GHSERAL").unwrap().segments.len(), 3);
}

#[test]
fn iron_fusion_enthalpy() {
    let db = unary();
    let h = db.fusion_enthalpy("Fe", 1811.0).unwrap();
    assert_eq!(h.method, FusionMethod::Analytic);
    assert!((h.value - 13448.99).abs() < 1e-6 * 13448.99 + 0.01, "{}", h.value);
}

#[test]
fn analytic_and_numeric_enthalpies_agree() {
    let db = unary();
    for (el, tm) in [("Fe", 1811.0), ("Al", 933.47), ("Cu", 1357.77)] {
        let analytic = db.fusion_enthalpy(el, tm).unwrap().value;
        let liquid = db.liquid_function(el).unwrap().name.clone();
        // Half a step below the breakpoint keeps both functions on one segment.
        let t = tm - 0.05;
        let numeric = db.numeric_enthalpy(&liquid, t).unwrap()
            - db.numeric_enthalpy(&format!("GHSER{}", el.to_uppercase()), t).unwrap();
        assert!((analytic - numeric).abs() < 5.0, "{el}: {analytic} vs {numeric}");
    }
}

#[test]
fn segments_meet_at_breakpoints() {
    let db = unary();
    for name in ["GHSERFE", "GFELIQ"] {
        let f = db.function(name).unwrap();
        let low = db.evaluate_segment(f, 0, 1811.0).unwrap();
        let high = db.evaluate_segment(f, 1, 1811.0).unwrap();
        assert!((low - high).abs() < 2.0, "{name}: {low} vs {high}");
    }
}

#[test]
fn liquid_above_solid_below_melting() {
    let db = unary();
    let g_liq = db.evaluate("GFELIQ", 1700.0).unwrap();
    let g_sol = db.evaluate("GHSERFE", 1700.0).unwrap();
    assert!(g_liq > g_sol);
    let g_liq = db.evaluate("GFELIQ", 1900.0).unwrap();
    let g_sol = db.evaluate("GHSERFE", 1900.0).unwrap();
    assert!(g_liq < g_sol);
}

#[test]
fn missing_file_reports_the_path() {
    let err = ThermoDatabase::load(std::path::Path::new("does/not/exist.tdb")).unwrap_err();
    match err {
        TdbError::Io { path, .. } => assert!(path.contains("exist.tdb")),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn reload_replaces_contents() {
    let mut db = ThermoDatabase::parse("FUNCTION GA 298.15 +1; 6000 N !").unwrap();
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/data/unary.tdb");
    db.reload(&path).unwrap();
    assert!(db.function("GA").is_none());
    assert!(db.function("GHSERCU").is_some());
}

#[test]
fn fusion_method_reads_back_from_json() {
    let method: FusionMethod = serde_json::from_str("\"analytic\"").unwrap();
    assert_eq!(method, FusionMethod::Analytic);
    assert_eq!(serde_json::to_string(&FusionMethod::Numeric).unwrap(), "\"numeric\"");
}
