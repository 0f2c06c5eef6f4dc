#![forbid(unsafe_code)]

//! Type annotations to semantic types.

use faber_ast::{TypeAnnotation, TypeAnnotationKind, TypeArg};
use faber_types::{Ownership, PrimitiveName, PrimitiveType, SemanticType, BUILTIN_GENERICS};

/// Resolves an annotation with no type aliases in view.
pub fn resolve_type(annotation: &TypeAnnotation) -> SemanticType {
    resolve_type_with(annotation, &|_| None)
}

/// Resolves an annotation, asking `aliases` about names that are neither
/// primitives nor builtin generics.
pub fn resolve_type_with(
    annotation: &TypeAnnotation,
    aliases: &dyn Fn(&str) -> Option<SemanticType>,
) -> SemanticType {
    let ty = match &annotation.kind {
        TypeAnnotationKind::Named { name, args } => resolve_named(&name.node, args, aliases),
        TypeAnnotationKind::Union(members) => {
            SemanticType::union(members.iter().map(|m| resolve_type_with(m, aliases)).collect())
        }
        TypeAnnotationKind::Function {
            params,
            returns,
            is_async,
        } => SemanticType::function(
            params.iter().map(|p| resolve_type_with(p, aliases)).collect(),
            resolve_type_with(returns, aliases),
            *is_async,
        ),
    };
    if annotation.nullable {
        ty.with_nullable(true)
    } else {
        ty
    }
}

fn resolve_named(
    name: &str,
    args: &[TypeArg],
    aliases: &dyn Fn(&str) -> Option<SemanticType>,
) -> SemanticType {
    if name.eq_ignore_ascii_case("ignotum") {
        return SemanticType::unknown();
    }
    if let Some(prim) = PrimitiveName::from_name(name) {
        return SemanticType::Primitive(primitive_with_modifiers(prim, args));
    }

    let is_builtin = BUILTIN_GENERICS.iter().any(|g| g.eq_ignore_ascii_case(name));
    if is_builtin || !args.is_empty() {
        let params = args
            .iter()
            .filter_map(|a| match a {
                TypeArg::Type(t) => Some(resolve_type_with(t, aliases)),
                TypeArg::Size(_) => None,
            })
            .collect();
        return SemanticType::generic(name, params);
    }

    aliases(name).unwrap_or_else(|| SemanticType::user(name))
}

/// `numerus<32, Naturalis, Proprius, Mutabilis>`: numbers set the bit width,
/// the capitalised names set sign, ownership and mutability. Anything else
/// is ignored.
fn primitive_with_modifiers(name: PrimitiveName, args: &[TypeArg]) -> PrimitiveType {
    let mut prim = PrimitiveType::new(name);
    for arg in args {
        match arg {
            TypeArg::Size(bits) => prim.size = Some(*bits),
            TypeArg::Type(t) => {
                let TypeAnnotationKind::Named { name: modifier, .. } = &t.kind else {
                    continue;
                };
                match modifier.node.as_str() {
                    "Naturalis" => prim.unsigned = true,
                    "Proprius" => prim.ownership = Some(Ownership::Proprius),
                    "Alienus" => prim.ownership = Some(Ownership::Alienus),
                    "Mutabilis" => prim.mutable = true,
                    _ => {}
                }
            }
        }
    }
    prim
}
