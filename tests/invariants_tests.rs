//! Property-style checks over generated inputs, for invariants that a
//! handful of fixed examples can't exercise thoroughly: the Miller-Bravais
//! identity, scale non-negativity, and `>`'s right-associative shape.

use cdl::ast::FormNode;
use cdl::parser::miller::decode;
use cdl::{parse, validate, Description};
use proptest::prelude::*;

fn crystal_form(text: &str) -> cdl::ast::CrystalForm {
    match parse(text).unwrap() {
        Description::Crystalline(d) => match d.forms.into_iter().next().unwrap() {
            FormNode::CrystalForm(f) => f,
            other => panic!("expected a crystal form, got {:?}", other),
        },
        Description::Amorphous(_) => panic!("expected crystalline description"),
    }
}

proptest! {
    /// Any space-separated 4-index payload built from independent h/k
    /// values, with `i` computed to satisfy the identity up front, always
    /// decodes to a `MillerIndex` with `i == -(h + k)`.
    #[test]
    fn decoded_four_index_miller_satisfies_bravais_identity(h in 0i32..10, k in 0i32..10) {
        let i = -(h + k);
        let raw = format!("{} {} {} 1", h, k, i);
        let pos = cdl::error::Position::new(0, 1, 1);
        let idx = decode(&raw, pos).unwrap();
        prop_assert_eq!(idx.i, Some(i));
        prop_assert_eq!(idx.h + idx.k + idx.i.unwrap(), 0);
    }

    /// Any non-negative scale round-trips through the parser unchanged,
    /// and validation never rejects it on the scale check.
    #[test]
    fn non_negative_scale_round_trips(scale in 0.0f64..1000.0) {
        let source = format!("cubic[m3m]:{{111}}@{:.4}", scale);
        let form = crystal_form(&source);
        prop_assert!((form.scale - scale).abs() < 1e-6);
        let (ok, _) = validate(&source);
        prop_assert!(ok);
    }

    /// Any strictly negative scale is rejected by validation, regardless
    /// of magnitude.
    #[test]
    fn negative_scale_is_always_rejected(scale in 0.001f64..1000.0) {
        let source = format!("cubic[m3m]:{{111}}@-{:.4}", scale);
        let (ok, message) = validate(&source);
        prop_assert!(!ok);
        prop_assert!(message.is_some());
    }

    /// A chain of N `>`-joined plain Miller terms nests right-associatively
    /// no matter how long the chain is: the base of the outermost growth is
    /// always a single `CrystalForm`, never another `NestedGrowth`.
    #[test]
    fn gt_chain_of_any_length_nests_to_the_right(n in 2usize..6) {
        let source = format!(
            "cubic[m3m]:{}",
            (0..n).map(|_| "{111}").collect::<Vec<_>>().join(" > ")
        );
        let d = match parse(&source).unwrap() {
            Description::Crystalline(d) => d,
            Description::Amorphous(_) => panic!("expected crystalline description"),
        };
        prop_assert_eq!(d.forms.len(), 1);
        match &d.forms[0] {
            FormNode::NestedGrowth(growth) => {
                prop_assert!(matches!(growth.base, FormNode::CrystalForm(_)));
            }
            other => panic!("expected nested growth, got {:?}", other),
        }
    }
}
