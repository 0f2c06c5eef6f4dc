#![forbid(unsafe_code)]

//! Type strings used by export signatures in the registry data,
//! e.g. `"lista<textus>?"` or `"textus | nihil"`.

use faber_types::{PrimitiveName, SemanticType};

pub fn parse_type_str(src: &str) -> Result<SemanticType, String> {
    let mut p = TypeStrParser { src, pos: 0 };
    let ty = p.union()?;
    p.skip_ws();
    if p.pos != src.len() {
        return Err(format!("unexpected '{}' in type '{src}'", &src[p.pos..]));
    }
    Ok(ty)
}

struct TypeStrParser<'a> {
    src: &'a str,
    pos: usize,
}

impl TypeStrParser<'_> {
    fn skip_ws(&mut self) {
        let rest = &self.src[self.pos..];
        self.pos += rest.len() - rest.trim_start().len();
    }

    fn eat(&mut self, c: char) -> bool {
        self.skip_ws();
        if self.src[self.pos..].starts_with(c) {
            self.pos += c.len_utf8();
            true
        } else {
            false
        }
    }

    fn union(&mut self) -> Result<SemanticType, String> {
        let mut members = vec![self.single()?];
        while self.eat('|') {
            members.push(self.single()?);
        }
        if members.len() == 1 {
            Ok(members.remove(0))
        } else {
            Ok(SemanticType::union(members))
        }
    }

    fn single(&mut self) -> Result<SemanticType, String> {
        self.skip_ws();
        let rest = &self.src[self.pos..];
        let len = rest
            .find(|c: char| !(c.is_alphanumeric() || c == '_'))
            .unwrap_or(rest.len());
        if len == 0 {
            return Err(format!("expected a type name in '{}'", self.src));
        }
        let name = &rest[..len];
        self.pos += len;

        let mut args = Vec::new();
        if self.eat('<') {
            loop {
                args.push(self.union()?);
                if self.eat(',') {
                    continue;
                }
                if self.eat('>') {
                    break;
                }
                return Err(format!("unclosed '<' in '{}'", self.src));
            }
        }
        let nullable = self.eat('?');

        let ty = if name.eq_ignore_ascii_case("ignotum") {
            SemanticType::unknown()
        } else if let Some(prim) = PrimitiveName::from_name(name) {
            SemanticType::primitive(prim)
        } else if !args.is_empty()
            || faber_types::BUILTIN_GENERICS
                .iter()
                .any(|g| g.eq_ignore_ascii_case(name))
        {
            SemanticType::generic(name, args)
        } else {
            SemanticType::user(name)
        };
        Ok(if nullable { ty.with_nullable(true) } else { ty })
    }
}
