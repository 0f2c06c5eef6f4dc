#![forbid(unsafe_code)]

//! Placeholder substitution for template translations.
//!
//! `§N` expands to the value bound to `params[N]`; a bare `§` expands to the
//! next param in declaration order. Param `ego` binds the receiver, `curator`
//! binds the allocator expression, every other param binds the next call
//! argument.

pub const PLACEHOLDER: char = '§';
pub const RECEIVER_PARAM: &str = "ego";
pub const CURATOR_PARAM: &str = "curator";
pub const DEFAULT_CURATOR: &str = "curator";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Slot {
    Indexed(usize),
    Next,
}

#[derive(Debug, PartialEq, Eq)]
enum Piece<'a> {
    Text(&'a str),
    Slot(Slot),
}

fn pieces(template: &str) -> Vec<Piece<'_>> {
    let mut out = Vec::new();
    let mut text_start = 0;
    let mut iter = template.char_indices().peekable();

    while let Some((i, c)) = iter.next() {
        if c != PLACEHOLDER {
            continue;
        }
        if text_start < i {
            out.push(Piece::Text(&template[text_start..i]));
        }
        let digits_start = i + c.len_utf8();
        let mut digits_end = digits_start;
        while let Some(&(j, d)) = iter.peek() {
            if !d.is_ascii_digit() {
                break;
            }
            digits_end = j + d.len_utf8();
            iter.next();
        }
        let slot = template[digits_start..digits_end]
            .parse::<usize>()
            .map(Slot::Indexed)
            .unwrap_or(Slot::Next);
        out.push(Piece::Slot(slot));
        text_start = digits_end;
    }
    if text_start < template.len() {
        out.push(Piece::Text(&template[text_start..]));
    }
    out
}

/// Param indices referenced by `template`, in order of appearance.
pub fn placeholder_indices(template: &str) -> Vec<usize> {
    let mut next = 0;
    pieces(template)
        .into_iter()
        .filter_map(|p| match p {
            Piece::Text(_) => None,
            Piece::Slot(Slot::Indexed(i)) => Some(i),
            Piece::Slot(Slot::Next) => {
                next += 1;
                Some(next - 1)
            }
        })
        .collect()
}

pub fn apply_template(template: &str, params: &[String], receiver: &str, args: &[String]) -> String {
    apply_template_with_curator(template, params, receiver, args, DEFAULT_CURATOR)
}

pub fn apply_template_with_curator(
    template: &str,
    params: &[String],
    receiver: &str,
    args: &[String],
    curator: &str,
) -> String {
    let mut remaining = args.iter();
    let bound: Vec<&str> = params
        .iter()
        .map(|p| match p.as_str() {
            RECEIVER_PARAM => receiver,
            CURATOR_PARAM => curator,
            _ => remaining.next().map(String::as_str).unwrap_or(""),
        })
        .collect();

    let mut out = String::with_capacity(template.len() + receiver.len());
    let mut next = 0;
    for piece in pieces(template) {
        match piece {
            Piece::Text(t) => out.push_str(t),
            Piece::Slot(slot) => {
                let index = match slot {
                    Slot::Indexed(i) => i,
                    Slot::Next => {
                        next += 1;
                        next - 1
                    }
                };
                out.push_str(bound.get(index).copied().unwrap_or(""));
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(xs: &[&str]) -> Vec<String> {
        xs.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_placeholders_follow_param_order() {
        let out = apply_template("[...§, §]", &strings(&["ego", "elem"]), "numeri", &strings(&["7"]));
        assert_eq!(out, "[...numeri, 7]");
    }

    #[test]
    fn indexed_placeholders_can_repeat() {
        let out = apply_template(
            "§0.splice(0, §0.length, ...§0.filter(§1))",
            &strings(&["ego", "pred"]),
            "xs",
            &strings(&["(x) => x > 0"]),
        );
        assert_eq!(out, "xs.splice(0, xs.length, ...xs.filter((x) => x > 0))");
    }

    #[test]
    fn curator_binds_allocator_not_an_argument() {
        let params = strings(&["ego", "curator", "elem"]);
        let out = apply_template("§0.append(§1, §2) catch unreachable", &params, "xs", &strings(&["3"]));
        assert_eq!(out, "xs.append(curator, 3) catch unreachable");

        let out = apply_template_with_curator("§0.append(§1, §2)", &params, "xs", &strings(&["3"]), "alloc");
        assert_eq!(out, "xs.append(alloc, 3)");
    }

    #[test]
    fn missing_arguments_render_empty() {
        let out = apply_template("f(§, §)", &strings(&["ego", "a"]), "r", &[]);
        assert_eq!(out, "f(r, )");
    }

    #[test]
    fn placeholder_indices_counts_bare_slots_separately() {
        assert_eq!(placeholder_indices("§ + §2 + §"), vec![0, 2, 1]);
        assert!(placeholder_indices("no slots").is_empty());
    }
}
