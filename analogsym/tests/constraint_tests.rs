//! Round-trip and fallback tests for the two constraint serializations

use analogsym::constraint::{document, sym_format};
use analogsym::{SymError, SymmetryCore, SymmetryKind};

#[test]
fn text_roundtrip_preserves_axis_and_triples() {
    let original = "\
SYMMETRY_AXIS 42.5
SYMMETRY_PAIR M1 M2 DIFFERENTIAL
SYMMETRY_PAIR M3 M4 CROSS_COUPLED
SYMMETRY_PAIR M5 M6
";
    let parsed = sym_format::parse_str(original);
    let regenerated = sym_format::generate(&parsed);
    let round = sym_format::parse_str(&regenerated);

    assert_eq!(round.axis(), Some(42.5));
    assert_eq!(round.len(), 3);
    let triples: Vec<_> = round
        .iter()
        .map(|p| (p.device1.as_str(), p.device2.as_str(), p.kind))
        .collect();
    assert_eq!(
        triples,
        vec![
            ("M1", "M2", SymmetryKind::Differential),
            ("M3", "M4", SymmetryKind::CrossCoupled),
            ("M5", "M6", SymmetryKind::Vertical),
        ]
    );
}

#[test]
fn legacy_horizontal_token_parses_as_vertical() {
    let parsed = sym_format::parse_str("SYMMETRY_PAIR M1 M2 HORIZONTAL\n");
    assert_eq!(parsed.pairs()[0].kind, SymmetryKind::Vertical);

    // and stays vertical (token omitted) when regenerated
    let regenerated = sym_format::generate(&parsed);
    assert!(regenerated.contains("SYMMETRY_PAIR M1 M2\n"));
}

#[test]
fn duplicate_device_in_file_is_dropped() {
    // M2 cannot be in two pairs; second line is rejected, not fatal
    let parsed = sym_format::parse_str("SYMMETRY_PAIR M1 M2\nSYMMETRY_PAIR M2 M3\n");
    assert_eq!(parsed.len(), 1);
    assert!(!parsed.is_claimed("M3"));
}

#[test]
fn constraint_files_roundtrip_on_disk() {
    let dir = tempfile::tempdir().expect("tempdir");
    let detected = sym_format::parse_str("SYMMETRY_AXIS 7.25\nSYMMETRY_PAIR MA MB DIFFERENTIAL\n");

    let sym_path = dir.path().join("constraints.sym");
    SymmetryCore::save_constraints(&detected, &sym_path).expect("write .sym");
    let from_sym = SymmetryCore::load_constraints(&sym_path).expect("read .sym");
    assert_eq!(from_sym.axis(), Some(7.25));
    assert_eq!(from_sym.pairs()[0].kind, SymmetryKind::Differential);

    let json_path = dir.path().join("constraints.json");
    SymmetryCore::save_constraints(&detected, &json_path).expect("write .json");
    let from_json = SymmetryCore::load_constraints(&json_path).expect("read .json");
    assert_eq!(from_json.axis(), Some(7.25));
    assert_eq!(from_json.pairs(), detected.pairs());
}

#[test]
fn unsupported_extension_is_rejected() {
    let constraint = sym_format::parse_str("SYMMETRY_PAIR M1 M2\n");
    let err = SymmetryCore::save_constraints(&constraint, std::path::Path::new("out.xml"))
        .expect_err("xml is not a constraint format");
    assert!(matches!(err, SymError::UnsupportedFormat(_)));
}

#[test]
fn document_preserves_options_and_metadata() {
    let json = r#"{
        "global": { "axis_x": 3.5 },
        "pairs": [
            {
                "d1": "M1", "d2": "M2",
                "type": "differential", "pattern": "common_centroid",
                "options": {
                    "add_dummy": true, "guard_ring": "deep_nwell",
                    "match_orientation": false, "tolerance": 5e-9
                },
                "score": 0.95,
                "metadata": { "stage": "input" }
            }
        ]
    }"#;
    let constraint = document::from_json_str(json).expect("valid document");
    let round = document::from_json_str(&document::to_json_string(&constraint).expect("serialize"))
        .expect("roundtrip");

    let pair = &round.pairs()[0];
    assert!(pair.options.add_dummy);
    assert!(!pair.options.match_orientation);
    assert_eq!(pair.options.tolerance, 5e-9);
    assert_eq!(pair.score, 0.95);
    assert_eq!(pair.metadata.get("stage").map(String::as_str), Some("input"));
}

#[test]
fn unknown_document_enums_fall_back_not_fail() {
    let json = r#"{
        "pairs": [ { "d1": "A", "d2": "B", "type": "radial", "pattern": "weave" } ]
    }"#;
    let constraint = document::from_json_str(json).expect("fallbacks apply");
    let pair = &constraint.pairs()[0];
    assert_eq!(pair.kind, SymmetryKind::Vertical);
    assert_eq!(pair.pattern, analogsym::LayoutPattern::SimpleMirror);
}
