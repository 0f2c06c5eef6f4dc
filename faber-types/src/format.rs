#![forbid(unsafe_code)]

use std::fmt;

use crate::ty::{PrimitiveName, SemanticType};

/// Renders a type the way diagnostics print it.
pub fn format_type(ty: &SemanticType) -> String {
    match ty {
        SemanticType::Primitive(p) => {
            let mut mods = Vec::new();
            if let Some(size) = p.size {
                mods.push(size.to_string());
            }
            if p.unsigned {
                mods.push("Naturalis".to_string());
            }
            if let Some(own) = p.ownership {
                mods.push(own.as_str().to_string());
            }
            if p.mutable {
                mods.push("Mutabilis".to_string());
            }

            let mut out = p.name.as_str().to_string();
            if !mods.is_empty() {
                out.push('<');
                out.push_str(&mods.join(", "));
                out.push('>');
            }
            if p.nullable && p.name != PrimitiveName::Nihil {
                out.push('?');
            }
            out
        }
        SemanticType::Generic(g) => {
            let mut out = g.name.clone();
            if !g.type_parameters.is_empty() {
                let args = g
                    .type_parameters
                    .iter()
                    .map(format_type)
                    .collect::<Vec<_>>()
                    .join(", ");
                out.push('<');
                out.push_str(&args);
                out.push('>');
            }
            if g.nullable {
                out.push('?');
            }
            out
        }
        SemanticType::Function(f) => {
            let params = f
                .parameter_types
                .iter()
                .map(format_type)
                .collect::<Vec<_>>()
                .join(", ");
            let prefix = if f.is_async { "futura " } else { "" };
            format!("{prefix}({params}) -> {}", format_type(&f.return_type))
        }
        SemanticType::Union { types } => types.iter().map(format_type).collect::<Vec<_>>().join(" | "),
        SemanticType::Unknown { .. } => "ignotum".to_string(),
        SemanticType::User(u) => {
            if u.nullable {
                format!("{}?", u.name)
            } else {
                u.name.clone()
            }
        }
    }
}

impl fmt::Display for SemanticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_type(self))
    }
}
