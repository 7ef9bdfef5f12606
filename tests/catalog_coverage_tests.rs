//! One small parse+validate round-trip per catalog entry, so a future
//! catalog addition that never wires into the grammar gets caught here
//! instead of surfacing as a silent gap downstream.

use cdl::{api, validate};
use rstest::rstest;

#[rstest]
#[case("cubic")]
#[case("hexagonal")]
#[case("trigonal")]
#[case("tetragonal")]
#[case("orthorhombic")]
#[case("monoclinic")]
#[case("triclinic")]
fn every_system_has_a_parseable_default_point_group_form(#[case] system: &str) {
    let source = format!("{}:{{111}}", system);
    let (ok, message) = validate(&source);
    assert!(ok, "{} failed to validate: {:?}", source, message);
}

#[rstest]
#[case("cubic", "23")]
#[case("cubic", "m3")]
#[case("cubic", "432")]
#[case("cubic", "-43m")]
#[case("cubic", "m3m")]
#[case("hexagonal", "6")]
#[case("hexagonal", "-6")]
#[case("hexagonal", "6/m")]
#[case("hexagonal", "622")]
#[case("hexagonal", "6mm")]
#[case("hexagonal", "-6m2")]
#[case("hexagonal", "6/mmm")]
#[case("trigonal", "3")]
#[case("trigonal", "-3")]
#[case("trigonal", "32")]
#[case("trigonal", "3m")]
#[case("trigonal", "-3m")]
#[case("tetragonal", "4")]
#[case("tetragonal", "-4")]
#[case("tetragonal", "4/m")]
#[case("tetragonal", "422")]
#[case("tetragonal", "4mm")]
#[case("tetragonal", "-42m")]
#[case("tetragonal", "4/mmm")]
#[case("orthorhombic", "222")]
#[case("orthorhombic", "mm2")]
#[case("orthorhombic", "mmm")]
#[case("monoclinic", "2")]
#[case("monoclinic", "m")]
#[case("monoclinic", "2/m")]
#[case("triclinic", "1")]
#[case("triclinic", "-1")]
fn every_point_group_is_accepted_for_its_system(#[case] system: &str, #[case] group: &str) {
    let source = format!("{}[{}]:{{111}}", system, group);
    let (ok, message) = validate(&source);
    assert!(ok, "{} failed to validate: {:?}", source, message);
}

#[rstest]
#[case("cube")]
#[case("octahedron")]
#[case("dodecahedron")]
#[case("trapezohedron")]
#[case("trisoctahedron")]
#[case("tetrahexahedron")]
#[case("hexoctahedron")]
fn every_cubic_named_form_resolves(#[case] name: &str) {
    let source = format!("cubic[m3m]:{}", name);
    let (ok, message) = validate(&source);
    assert!(ok, "{} failed to validate: {:?}", source, message);
}

#[rstest]
#[case("prism")]
#[case("prism_1")]
#[case("prism_2")]
#[case("basal")]
#[case("pinacoid")]
#[case("rhombohedron")]
#[case("rhombohedron_r")]
#[case("rhombohedron_z")]
#[case("pyramid")]
#[case("dipyramid")]
#[case("scalenohedron")]
fn every_hex_trig_named_form_resolves(#[case] name: &str) {
    let source = format!("hexagonal:{}", name);
    let (ok, message) = validate(&source);
    assert!(ok, "{} failed to validate: {:?}", source, message);
}

#[rstest]
#[case("prism")]
#[case("prism_1")]
#[case("prism_2")]
#[case("pyramid")]
#[case("dipyramid")]
#[case("bipyramid")]
fn every_tetragonal_named_form_resolves(#[case] name: &str) {
    let source = format!("tetragonal:{}", name);
    let (ok, message) = validate(&source);
    assert!(ok, "{} failed to validate: {:?}", source, message);
}

#[rstest]
#[case("spinel")]
#[case("spinel_law")]
#[case("iron_cross")]
#[case("fluorite")]
#[case("brazil")]
#[case("dauphine")]
#[case("japan")]
#[case("carlsbad")]
#[case("baveno")]
#[case("manebach")]
#[case("albite")]
#[case("pericline")]
#[case("gypsum_swallow")]
#[case("staurolite_60")]
#[case("staurolite_90")]
#[case("trilling")]
#[case("sixling")]
fn every_twin_law_is_accepted(#[case] law: &str) {
    let source = format!("cubic[m3m]:{{111}} | twin({})", law);
    let (ok, message) = validate(&source);
    assert!(ok, "{} failed to validate: {:?}", source, message);
}

#[rstest]
#[case("opalescent")]
#[case("glassy")]
#[case("waxy")]
#[case("resinous")]
#[case("cryptocrystalline")]
fn every_amorphous_subtype_is_accepted(#[case] subtype: &str) {
    let source = format!("amorphous[{}]:{{massive}}", subtype);
    let (ok, message) = validate(&source);
    assert!(ok, "{} failed to validate: {:?}", source, message);
}

#[rstest]
#[case("massive")]
#[case("botryoidal")]
#[case("reniform")]
#[case("stalactitic")]
#[case("mammillary")]
#[case("nodular")]
#[case("conchoidal")]
fn every_amorphous_shape_is_accepted(#[case] shape: &str) {
    let source = format!("amorphous:{{{}}}", shape);
    let (ok, message) = validate(&source);
    assert!(ok, "{} failed to validate: {:?}", source, message);
}

#[rstest]
#[case("parallel")]
#[case("random")]
#[case("radial")]
#[case("epitaxial")]
#[case("druse")]
#[case("cluster")]
fn every_aggregate_arrangement_is_accepted(#[case] arrangement: &str) {
    let source = format!("cubic[m3m]:{{111}} ~ {}[4]", arrangement);
    let (ok, message) = validate(&source);
    assert!(ok, "{} failed to validate: {:?}", source, message);
}

#[rstest]
#[case("aligned")]
#[case("random")]
#[case("planar")]
#[case("spherical")]
fn every_aggregate_orientation_is_accepted(#[case] orientation: &str) {
    let source = format!("cubic[m3m]:{{111}} ~ cluster[4][{}]", orientation);
    let (ok, message) = validate(&source);
    assert!(ok, "{} failed to validate: {:?}", source, message);
}

#[rstest]
#[case("elongate")]
#[case("truncate")]
#[case("taper")]
#[case("flatten")]
#[case("bevel")]
fn every_modification_kind_is_accepted(#[case] kind: &str) {
    let source = format!("cubic[m3m]:{{111}} | {}(axis: c)", kind);
    let (ok, message) = validate(&source);
    assert!(ok, "{} failed to validate: {:?}", source, message);
}

#[test]
fn catalog_enumeration_matches_what_the_grammar_accepts() {
    for system in api::crystal_systems() {
        if *system == "amorphous" {
            continue;
        }
        for name in api::named_form_names(system) {
            let source = format!("{}:{}", system, name);
            let (ok, _) = validate(&source);
            assert!(ok, "named form '{}' under '{}' did not validate", name, system);
        }
        for group in api::point_groups_for(system).unwrap() {
            let source = format!("{}[{}]:{{111}}", system, group);
            let (ok, _) = validate(&source);
            assert!(ok, "point group '{}' under '{}' did not validate", group, system);
        }
    }
    for law in api::twin_laws() {
        let source = format!("cubic[m3m]:{{111}} | twin({})", law);
        let (ok, _) = validate(&source);
        assert!(ok, "twin law '{}' did not validate", law);
    }
}
