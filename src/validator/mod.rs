//! Validator — Phase 3 of the CDL pipeline.
//!
//! Walks an already-parsed [`Description`] and checks the semantic
//! constraints that the grammar alone cannot express: catalog membership,
//! the Miller-Bravais invariant, and the handful of non-negativity rules
//! recorded as Open Question decisions in the design notes. Checks run in
//! the fixed order below; the first violation wins, matching the parser's
//! own no-recovery policy.

use crate::ast::*;
use crate::catalog;
use crate::error::ValidationError;

/// Runs every check against `description`, in specification order.
pub fn validate_tree(description: &Description) -> Result<(), ValidationError> {
    match description {
        Description::Crystalline(d) => validate_crystalline(d),
        Description::Amorphous(d) => validate_amorphous(d),
    }
}

fn validate_crystalline(d: &CrystallineDescription) -> Result<(), ValidationError> {
    check_system(&d.system)?;
    check_point_group(&d.system, &d.point_group)?;

    for form in &d.forms {
        check_form_tree(&d.system, form)?;
    }

    if let Some(twin) = &d.twin {
        check_twin(twin)?;
    }

    for modification in &d.modifications {
        check_modification(modification)?;
    }

    Ok(())
}

fn validate_amorphous(d: &AmorphousDescription) -> Result<(), ValidationError> {
    if let Some(subtype) = &d.subtype {
        if !catalog::is_amorphous_subtype(subtype) {
            return Err(ValidationError::UnknownAmorphousSubtype(subtype.clone()));
        }
    }
    for shape in &d.shapes {
        if !catalog::is_amorphous_shape(shape) {
            return Err(ValidationError::UnknownAmorphousShape(shape.clone()));
        }
    }
    Ok(())
}

fn check_system(system: &str) -> Result<(), ValidationError> {
    if catalog::is_crystal_system(system) {
        Ok(())
    } else {
        Err(ValidationError::UnknownSystem(system.to_string()))
    }
}

fn check_point_group(system: &str, group: &str) -> Result<(), ValidationError> {
    if catalog::is_point_group_valid(system, group) {
        Ok(())
    } else {
        Err(ValidationError::PointGroupNotPermitted {
            system: system.to_string(),
            group: group.to_string(),
        })
    }
}

/// Recurses through a form node, checking every `CrystalForm`'s Miller
/// index and scale, and every `AggregateSpec`'s arrangement/orientation.
/// `FormGroup` contributes its own twin spec (if any) and recurses into
/// its members; `NestedGrowth` recurses into both sides.
fn check_form_tree(system: &str, node: &FormNode) -> Result<(), ValidationError> {
    match node {
        FormNode::CrystalForm(f) => check_crystal_form(system, f),
        FormNode::FormGroup(g) => {
            for member in &g.members {
                check_form_tree(system, member)?;
            }
            if let Some(twin) = &g.twin {
                check_twin(twin)?;
            }
            Ok(())
        }
        FormNode::NestedGrowth(n) => {
            check_form_tree(system, &n.base)?;
            check_form_tree(system, &n.overgrowth)
        }
        FormNode::AggregateSpec(a) => {
            check_form_tree(system, &a.inner)?;
            check_aggregate(a)
        }
    }
}

fn check_crystal_form(system: &str, form: &CrystalForm) -> Result<(), ValidationError> {
    if form.scale < 0.0 {
        return Err(ValidationError::NegativeScale(form.scale));
    }
    check_miller(system, &form.miller)
}

/// Checks the Miller-Bravais invariant `i = -(h + k)` for 4-index forms,
/// and that 4-index forms only appear under hexagonal/trigonal systems.
fn check_miller(system: &str, miller: &MillerIndex) -> Result<(), ValidationError> {
    if let Some(i) = miller.i {
        if !catalog::uses_miller_bravais(system) {
            return Err(ValidationError::FourIndexOutsideHexagonal {
                system: system.to_string(),
            });
        }
        if i != -(miller.h + miller.k) {
            return Err(ValidationError::MillerBravaisViolation {
                h: miller.h,
                k: miller.k,
                i,
            });
        }
    }
    Ok(())
}

fn check_aggregate(a: &AggregateSpec) -> Result<(), ValidationError> {
    if !catalog::is_aggregate_arrangement(&a.arrangement) {
        return Err(ValidationError::UnknownAggregateArrangement(a.arrangement.clone()));
    }
    if let Some(orientation) = &a.orientation {
        if !catalog::is_aggregate_orientation(orientation) {
            return Err(ValidationError::UnknownAggregateOrientation(orientation.clone()));
        }
    }
    if a.count < 0 {
        return Err(ValidationError::NegativeAggregateCount);
    }
    Ok(())
}

fn check_twin(twin: &TwinSpec) -> Result<(), ValidationError> {
    if let TwinSpec::Named { law, repeat } = twin {
        if !catalog::is_twin_law(law) {
            return Err(ValidationError::UnknownTwinLaw(law.clone()));
        }
        if let Some(n) = repeat {
            if *n < 2 {
                return Err(ValidationError::BadRepeatCount(*n));
            }
        }
    }
    Ok(())
}

fn check_modification(modification: &Modification) -> Result<(), ValidationError> {
    if catalog::is_modification_kind(&modification.kind) {
        Ok(())
    } else {
        Err(ValidationError::UnknownModificationKind(modification.kind.clone()))
    }
}
