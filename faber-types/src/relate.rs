#![forbid(unsafe_code)]

use crate::ty::{PrimitiveName, SemanticType};

/// Structural equality used by assignability.
///
/// Names compare case-insensitively. Nullability and primitive modifiers are
/// ignored. Union members are compared positionally, so `A | B` and `B | A`
/// are not equal.
pub fn types_equal(a: &SemanticType, b: &SemanticType) -> bool {
    match (a, b) {
        (SemanticType::Primitive(x), SemanticType::Primitive(y)) => x.name == y.name,
        (SemanticType::Generic(x), SemanticType::Generic(y)) => {
            x.name.eq_ignore_ascii_case(&y.name) && all_equal(&x.type_parameters, &y.type_parameters)
        }
        (SemanticType::Function(x), SemanticType::Function(y)) => {
            x.is_async == y.is_async
                && all_equal(&x.parameter_types, &y.parameter_types)
                && types_equal(&x.return_type, &y.return_type)
        }
        (SemanticType::Union { types: xs }, SemanticType::Union { types: ys }) => all_equal(xs, ys),
        (SemanticType::Unknown { .. }, SemanticType::Unknown { .. }) => true,
        (SemanticType::User(x), SemanticType::User(y)) => x.name.eq_ignore_ascii_case(&y.name),
        _ => false,
    }
}

fn all_equal(xs: &[SemanticType], ys: &[SemanticType]) -> bool {
    xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| types_equal(x, y))
}

/// Whether a value of `source` may be stored where `target` is expected.
pub fn is_assignable_to(source: &SemanticType, target: &SemanticType) -> bool {
    if source.is_unknown() || target.is_unknown() {
        return true;
    }

    if source.is_primitive(PrimitiveName::Nihil) {
        return target.nullable();
    }

    if let SemanticType::Union { types } = target {
        return types.iter().any(|t| is_assignable_to(source, t));
    }

    if let SemanticType::Union { types } = source {
        return types.iter().all(|s| is_assignable_to(s, target));
    }

    types_equal(source, target)
}
