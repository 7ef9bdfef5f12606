//! Domain catalog: immutable tables describing recognized crystal systems,
//! point groups, named forms, twin laws, and amorphous/aggregate vocabulary.
//!
//! All tables are process-wide constants. Nothing here mutates at runtime;
//! the lexer, parser, and validator consult these tables by read-only
//! reference.

use crate::ast::MillerIndex;

/// The seven crystalline systems, plus `amorphous`.
pub const CRYSTAL_SYSTEMS: &[&str] = &[
    "cubic",
    "hexagonal",
    "trigonal",
    "tetragonal",
    "orthorhombic",
    "monoclinic",
    "triclinic",
    "amorphous",
];

pub fn is_crystal_system(name: &str) -> bool {
    CRYSTAL_SYSTEMS.contains(&name)
}

/// Whether a system uses 4-index Miller-Bravais notation.
pub fn uses_miller_bravais(system: &str) -> bool {
    matches!(system, "hexagonal" | "trigonal")
}

struct SystemPointGroups {
    system: &'static str,
    groups: &'static [&'static str],
    default: &'static str,
}

const POINT_GROUPS: &[SystemPointGroups] = &[
    SystemPointGroups {
        system: "cubic",
        groups: &["23", "m3", "432", "-43m", "m3m"],
        default: "m3m",
    },
    SystemPointGroups {
        system: "hexagonal",
        groups: &["6", "-6", "6/m", "622", "6mm", "-6m2", "6/mmm"],
        default: "6/mmm",
    },
    SystemPointGroups {
        system: "trigonal",
        groups: &["3", "-3", "32", "3m", "-3m"],
        default: "-3m",
    },
    SystemPointGroups {
        system: "tetragonal",
        groups: &["4", "-4", "4/m", "422", "4mm", "-42m", "4/mmm"],
        default: "4/mmm",
    },
    SystemPointGroups {
        system: "orthorhombic",
        groups: &["222", "mm2", "mmm"],
        default: "mmm",
    },
    SystemPointGroups {
        system: "monoclinic",
        groups: &["2", "m", "2/m"],
        default: "2/m",
    },
    SystemPointGroups {
        system: "triclinic",
        groups: &["1", "-1"],
        default: "-1",
    },
];

/// The set of point groups valid for `system`, or `None` if the system is
/// not recognized (or is `amorphous`, which has no point groups).
pub fn point_groups_for(system: &str) -> Option<&'static [&'static str]> {
    POINT_GROUPS
        .iter()
        .find(|s| s.system == system)
        .map(|s| s.groups)
}

/// The highest-symmetry default point group for `system`.
pub fn default_point_group(system: &str) -> Option<&'static str> {
    POINT_GROUPS.iter().find(|s| s.system == system).map(|s| s.default)
}

pub fn is_point_group_valid(system: &str, group: &str) -> bool {
    point_groups_for(system)
        .map(|groups| groups.contains(&group))
        .unwrap_or(false)
}

/// Named forms for the cubic system. All 3-index.
const CUBIC_NAMED_FORMS: &[(&str, i32, i32, i32)] = &[
    ("cube", 1, 0, 0),
    ("octahedron", 1, 1, 1),
    ("dodecahedron", 1, 1, 0),
    ("trapezohedron", 2, 1, 1),
    ("trisoctahedron", 2, 2, 1),
    ("tetrahexahedron", 2, 1, 0),
    ("hexoctahedron", 3, 2, 1),
];

/// Named forms for the hexagonal/trigonal family, as `(name, h, k, l, i)`.
/// `i` is populated for the Miller-Bravais 4-index members and always
/// satisfies `i == -(h + k)`.
const HEX_TRIG_NAMED_FORMS: &[(&str, i32, i32, i32, Option<i32>)] = &[
    ("prism", 1, 0, 0, Some(-1)),
    ("prism_1", 1, 0, 0, Some(-1)),
    ("prism_2", 1, 1, 0, Some(-2)),
    ("basal", 0, 0, 1, Some(0)),
    ("pinacoid", 0, 0, 1, Some(0)),
    ("rhombohedron", 1, 0, 1, Some(-1)),
    ("rhombohedron_r", 1, 0, 1, Some(-1)),
    ("rhombohedron_z", 0, 1, 1, Some(-1)),
    ("pyramid", 1, 0, 1, Some(-1)),
    ("dipyramid", 1, 1, 1, Some(-2)),
    ("scalenohedron", 2, 1, 1, Some(-3)),
];

/// Look up a named form's Miller index. `tetragonal` reuses a subset of
/// names (`prism`, `prism_1`, `prism_2`, `pyramid`, `dipyramid`,
/// `bipyramid`) but with plain 3-index Millers, so it is resolved
/// separately.
const TETRAGONAL_NAMED_FORMS: &[(&str, i32, i32, i32)] = &[
    ("prism", 1, 0, 0),
    ("prism_1", 1, 0, 0),
    ("prism_2", 1, 1, 0),
    ("pyramid", 1, 0, 1),
    ("dipyramid", 1, 1, 1),
    ("bipyramid", 1, 1, 1),
];

/// Resolve a named form for `system`. Each system family has its own table:
/// tetragonal shares several names with the hexagonal/trigonal family but
/// denotes plain 3-index forms, and cubic's names are disjoint from both.
/// Systems with no named-form vocabulary (orthorhombic, monoclinic,
/// triclinic, amorphous) always return `None`.
pub fn resolve_named_form(system: &str, name: &str) -> Option<MillerIndex> {
    match system {
        "tetragonal" => TETRAGONAL_NAMED_FORMS
            .iter()
            .find(|(n, ..)| *n == name)
            .map(|(_, h, k, l)| MillerIndex::new_3(*h, *k, *l)),
        "cubic" => CUBIC_NAMED_FORMS
            .iter()
            .find(|(n, ..)| *n == name)
            .map(|(_, h, k, l)| MillerIndex::new_3(*h, *k, *l)),
        "hexagonal" | "trigonal" => {
            HEX_TRIG_NAMED_FORMS.iter().find(|(n, ..)| *n == name).map(|(_, h, k, l, i)| match i {
                Some(i) => MillerIndex::new_4(*h, *k, *l, *i),
                None => MillerIndex::new_3(*h, *k, *l),
            })
        }
        _ => None,
    }
}

pub fn is_named_form(system: &str, name: &str) -> bool {
    resolve_named_form(system, name).is_some()
}

/// The bareword names of every named form recognized for `system`, for
/// catalog enumeration (e.g. the CLI's `list-forms`).
pub fn named_form_names(system: &str) -> Vec<&'static str> {
    match system {
        "tetragonal" => TETRAGONAL_NAMED_FORMS.iter().map(|(n, ..)| *n).collect(),
        "cubic" => CUBIC_NAMED_FORMS.iter().map(|(n, ..)| *n).collect(),
        "hexagonal" | "trigonal" => HEX_TRIG_NAMED_FORMS.iter().map(|(n, ..)| *n).collect(),
        _ => Vec::new(),
    }
}

pub const TWIN_LAWS: &[&str] = &[
    "spinel",
    "spinel_law",
    "iron_cross",
    "fluorite",
    "brazil",
    "dauphine",
    "japan",
    "carlsbad",
    "baveno",
    "manebach",
    "albite",
    "pericline",
    "gypsum_swallow",
    "staurolite_60",
    "staurolite_90",
    "trilling",
    "sixling",
];

pub fn is_twin_law(name: &str) -> bool {
    TWIN_LAWS.contains(&name)
}

pub const AMORPHOUS_SUBTYPES: &[&str] =
    &["opalescent", "glassy", "waxy", "resinous", "cryptocrystalline"];

pub fn is_amorphous_subtype(name: &str) -> bool {
    AMORPHOUS_SUBTYPES.contains(&name)
}

pub const AMORPHOUS_SHAPES: &[&str] = &[
    "massive",
    "botryoidal",
    "reniform",
    "stalactitic",
    "mammillary",
    "nodular",
    "conchoidal",
];

pub fn is_amorphous_shape(name: &str) -> bool {
    AMORPHOUS_SHAPES.contains(&name)
}

pub const AGGREGATE_ARRANGEMENTS: &[&str] =
    &["parallel", "random", "radial", "epitaxial", "druse", "cluster"];

pub fn is_aggregate_arrangement(name: &str) -> bool {
    AGGREGATE_ARRANGEMENTS.contains(&name)
}

pub const AGGREGATE_ORIENTATIONS: &[&str] = &["aligned", "random", "planar", "spherical"];

pub fn is_aggregate_orientation(name: &str) -> bool {
    AGGREGATE_ORIENTATIONS.contains(&name)
}

pub const MODIFICATIONS: &[&str] = &["elongate", "truncate", "taper", "flatten", "bevel"];

pub fn is_modification_kind(name: &str) -> bool {
    MODIFICATIONS.contains(&name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_point_groups_are_members_of_their_own_set() {
        for sys in CRYSTAL_SYSTEMS {
            if *sys == "amorphous" {
                continue;
            }
            let default = default_point_group(sys).unwrap();
            assert!(is_point_group_valid(sys, default));
        }
    }

    #[test]
    fn octahedron_resolves_to_111() {
        let idx = resolve_named_form("cubic", "octahedron").unwrap();
        assert_eq!(idx.as_triple(), (1, 1, 1));
    }

    #[test]
    fn tetragonal_prism_is_3_index() {
        let idx = resolve_named_form("tetragonal", "prism").unwrap();
        assert!(idx.i.is_none());
    }

    #[test]
    fn hexagonal_prism_is_4_index_and_balanced() {
        let idx = resolve_named_form("hexagonal", "prism").unwrap();
        let i = idx.i.unwrap();
        assert_eq!(i, -(idx.h + idx.k));
    }

    #[test]
    fn unknown_system_has_no_point_groups() {
        assert!(point_groups_for("quartzite").is_none());
    }
}
