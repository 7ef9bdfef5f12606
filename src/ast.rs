//! Typed description tree for CDL v2.
//!
//! Mirrors the data model in the language specification: a document is
//! either a [`CrystallineDescription`] or an [`AmorphousDescription`], each
//! carrying an ordered tree of [`FormNode`]s and an optional twin or
//! phenomenon specification. Named forms and `$name` references are
//! resolved by the parser; nothing in this tree refers back to source text.

use serde::{Deserialize, Serialize};

/// Top-level parse result: either shape, uniformly reachable via `.system()`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Description {
    Crystalline(CrystallineDescription),
    Amorphous(AmorphousDescription),
}

impl Description {
    pub fn system(&self) -> &str {
        match self {
            Description::Crystalline(d) => &d.system,
            Description::Amorphous(_) => "amorphous",
        }
    }

    pub fn doc_comment(&self) -> Option<&str> {
        match self {
            Description::Crystalline(d) => d.doc_comment.as_deref(),
            Description::Amorphous(d) => d.doc_comment.as_deref(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrystallineDescription {
    pub system: String,
    pub point_group: String,
    pub forms: Vec<FormNode>,
    pub modifications: Vec<Modification>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub twin: Option<TwinSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phenomenon: Option<PhenomenonSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc_comment: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmorphousDescription {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtype: Option<String>,
    pub shapes: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub features: Option<Vec<Feature>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phenomenon: Option<PhenomenonSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc_comment: Option<String>,
}

impl AmorphousDescription {
    /// Convenience accessor so callers can treat amorphous descriptions
    /// uniformly with crystalline ones.
    pub fn system(&self) -> &str {
        "amorphous"
    }
}

/// A Miller (or Miller-Bravais) index. `i` is `Some` only for 4-index forms,
/// in which case the validator enforces `i == -(h + k)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MillerIndex {
    pub h: i32,
    pub k: i32,
    pub l: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub i: Option<i32>,
}

impl MillerIndex {
    pub fn new_3(h: i32, k: i32, l: i32) -> Self {
        Self { h, k, l, i: None }
    }

    pub fn new_4(h: i32, k: i32, l: i32, i: i32) -> Self {
        Self {
            h,
            k,
            l,
            i: Some(i),
        }
    }

    /// The 3-index view: drops `i` if present.
    pub fn as_triple(&self) -> (i32, i32, i32) {
        (self.h, self.k, self.l)
    }

    pub fn is_four_index(&self) -> bool {
        self.i.is_some()
    }
}

/// The four shapes a form expression can take, per the precedence grammar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "node")]
pub enum FormNode {
    CrystalForm(CrystalForm),
    FormGroup(FormGroup),
    NestedGrowth(Box<NestedGrowth>),
    AggregateSpec(Box<AggregateSpec>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrystalForm {
    pub miller: MillerIndex,
    pub scale: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub features: Option<Vec<Feature>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl CrystalForm {
    pub fn new(miller: MillerIndex) -> Self {
        Self {
            miller,
            scale: 1.0,
            name: None,
            features: None,
            label: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormGroup {
    pub members: Vec<FormNode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub features: Option<Vec<Feature>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub twin: Option<TwinSpec>,
}

/// `base > overgrowth`, right-associative: `a > b > c` is
/// `NestedGrowth(a, NestedGrowth(b, c))`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NestedGrowth {
    pub base: FormNode,
    pub overgrowth: FormNode,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateSpec {
    pub inner: FormNode,
    pub arrangement: String,
    pub count: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spacing: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orientation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orientation_param: Option<f64>,
}

/// A parameterized shape change, e.g. `elongate(axis: c)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Modification {
    pub kind: String,
    pub params: Vec<(String, ParamValue)>,
}

/// A named twin law (with optional repeat count) or a custom axis/angle twin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "form")]
pub enum TwinSpec {
    Named {
        law: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        repeat: Option<i32>,
    },
    Custom {
        axis: (i32, i32, i32),
        angle: f64,
        #[serde(skip_serializing_if = "Option::is_none")]
        twin_type: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhenomenonSpec {
    pub kind: String,
    pub params: Vec<(String, ParamValue)>,
}

/// A feature annotation on a form or group, e.g. `striations: parallel` or
/// `color: pink-white-green`. Feature names are forward-compatible: the
/// validator never rejects an unrecognized one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    pub name: String,
    pub values: Vec<FeatureValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureValue {
    Integer(i32),
    Float(f64),
    Identifier(String),
    /// A hyphen-joined chain such as `pink-white-green`.
    ColorSpec(Vec<String>),
}

/// A modification/twin/phenomenon parameter value: either a number or a
/// bareword identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Number(f64),
    Identifier(String),
}

/// A `@name = expr` definition captured from the document prelude. The
/// expression is resolved into the finished tree at the point of reference,
/// so `Definition` itself is not part of the final `Description`.
#[derive(Debug, Clone, PartialEq)]
pub struct Definition {
    pub name: String,
    pub tokens: Vec<crate::lexer::Token>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn miller_index_triple_view_drops_i() {
        let idx = MillerIndex::new_4(1, 0, -1, 0);
        assert_eq!(idx.as_triple(), (1, 0, -1));
    }

    #[test]
    fn description_system_accessor_is_uniform() {
        let amorphous = Description::Amorphous(AmorphousDescription {
            subtype: None,
            shapes: vec![],
            features: None,
            phenomenon: None,
            doc_comment: None,
        });
        assert_eq!(amorphous.system(), "amorphous");
    }
}
