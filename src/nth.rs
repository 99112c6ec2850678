//! The CSS `<An+B>` microsyntax, used by `:nth-child()`-style pseudo-classes.
//!
//! Grounded on `gosub_css3::parser::anplusb::parse_anplusb` and its helpers
//! (`do_dimension_block`, `do_negative_block`, `do_plus_block`, `parse_anplusb_b`), reworked
//! against this crate's syntax-only [`crate::node::Node`] stream. The tokenizer fuses the `n`
//! and a following signed integer into one `Dimension` unit whenever there is no whitespace
//! and the sign is `-` (e.g. `10n-5` tokenizes as `Dimension(10, "n-5")`), which is why the
//! dimension-unit branch below re-splits the unit string instead of only matching `"n"`.

use crate::node::{Node, NodeKind};

/// Parse a component-value sequence as `<An+B>`, returning `(a, b)` on success.
pub fn parse_nth(nodes: &[Node]) -> Option<(i64, i64)> {
    let mut tokens: Vec<&Node> =
        nodes.iter().filter(|n| !n.is_whitespace() && !n.is_comment()).collect();

    if tokens.is_empty() {
        return None;
    }

    // A leading signless `+` directly before `n`/`-n`/`An` is valid (e.g. `+n-3`) and is
    // otherwise indistinguishable from the tokenizer's `+`-number lookahead, so it always
    // arrives as its own `Literal("+")` rather than fused into the following token.
    if tokens.len() > 1 && tokens[0].is_literal("+") {
        tokens.remove(0);
    }

    if tokens.len() == 1 {
        return parse_single_token(tokens[0]);
    }

    let (a, consumed) = match &*tokens[0].kind {
        NodeKind::Ident(v) => match parse_ident_anb(v)? {
            // A fused form like "n-3" already supplies both `a` and `b`; any further
            // tokens after it (we're only here because `tokens.len() > 1`) are invalid.
            (_, Some(_)) => return None,
            (a, None) => (a, 1),
        },
        NodeKind::Dimension { int_value, unit, .. } => {
            if unit.eq_ignore_ascii_case("n") {
                (int_value.or(Some(1))?, 1)
            } else if let Some(rest) = strip_n_prefix(unit) {
                let a = int_value.or(Some(1))?;
                let b: i64 = rest.parse().ok()?;
                return Some((a, b));
            } else {
                return None;
            }
        }
        _ => return None,
    };

    let remaining = &tokens[consumed..];
    if remaining.is_empty() {
        return Some((a, 0));
    }

    match remaining {
        [number] => {
            if let NodeKind::Number { int_value: Some(b), representation, .. } = &*number.kind {
                if representation.starts_with('+') || representation.starts_with('-') {
                    return Some((a, *b));
                }
            }
            None
        }
        [sign, number] => {
            let sign = match &*sign.kind {
                NodeKind::Literal(s) if s == "+" => 1,
                NodeKind::Literal(s) if s == "-" => -1,
                _ => return None,
            };
            if let NodeKind::Number { int_value: Some(b), representation, .. } = &*number.kind {
                if !representation.starts_with('+') && !representation.starts_with('-') {
                    return Some((a, sign * b));
                }
            }
            None
        }
        _ => None,
    }
}

fn parse_single_token(node: &Node) -> Option<(i64, i64)> {
    match &*node.kind {
        NodeKind::Ident(v) if v.eq_ignore_ascii_case("odd") => Some((2, 1)),
        NodeKind::Ident(v) if v.eq_ignore_ascii_case("even") => Some((2, 0)),
        NodeKind::Ident(v) => parse_ident_anb(v).map(|(a, b)| (a, b.unwrap_or(0))),
        NodeKind::Number { int_value: Some(b), .. } => Some((0, *b)),
        NodeKind::Dimension { int_value, unit, .. } => {
            if unit.eq_ignore_ascii_case("n") {
                Some((int_value.or(Some(1))?, 0))
            } else {
                strip_n_prefix(unit).and_then(|rest| {
                    let a = int_value.or(Some(1))?;
                    rest.parse::<i64>().ok().map(|b| (a, b))
                })
            }
        }
        _ => None,
    }
}

/// Parse an ident token that spells out `n`, `-n`, or a fused `An+B`/`An-B` form with no
/// internal whitespace (`n-3`, `-n-3`): the tokenizer's ident-sequence production accepts
/// `-` and digits as continuation characters, so "n" followed directly by a sign and digits
/// is a single `Ident` token rather than three separate ones. Returns `(a, Some(b))` when the
/// ident fully spells out both, or `(a, None)` when only the coefficient is present and a
/// separate `B` term (if any) must come from subsequent tokens.
fn parse_ident_anb(ident: &str) -> Option<(i64, Option<i64>)> {
    let (sign, body) = match ident.strip_prefix('-') {
        Some(rest) => (-1i64, rest),
        None => (1i64, ident),
    };
    if body.eq_ignore_ascii_case("n") {
        return Some((sign, None));
    }
    let rest = strip_n_prefix(body)?;
    let b: i64 = rest.parse().ok()?;
    Some((sign, Some(b)))
}

/// `"n-5"` -> `Some("-5")`, case-insensitively on the leading `n`; `None` if the unit does
/// not start with `n` followed by a sign.
fn strip_n_prefix(unit: &str) -> Option<&str> {
    let mut chars = unit.char_indices();
    let (_, first) = chars.next()?;
    if !first.eq_ignore_ascii_case(&'n') {
        return None;
    }
    let rest = &unit[1..];
    if rest.starts_with('-') || rest.starts_with('+') {
        Some(rest)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::component_value::parse_component_value_list;

    fn nth(input: &str) -> Option<(i64, i64)> {
        parse_nth(&parse_component_value_list(input, true))
    }

    #[test]
    fn handles_keywords() {
        assert_eq!(nth("odd"), Some((2, 1)));
        assert_eq!(nth("even"), Some((2, 0)));
    }

    #[test]
    fn handles_plain_integer() {
        assert_eq!(nth("5"), Some((0, 5)));
        assert_eq!(nth("-5"), Some((0, -5)));
    }

    #[test]
    fn handles_an_b_forms() {
        assert_eq!(nth("1n+2"), Some((1, 2)));
        assert_eq!(nth("1n-2"), Some((1, -2)));
        assert_eq!(nth("-1n+2"), Some((-1, 2)));
        assert_eq!(nth("-1n-20"), Some((-1, -20)));
        assert_eq!(nth("-1n+20"), Some((-1, 20)));
        assert_eq!(nth("1n"), Some((1, 0)));
        assert_eq!(nth("10n-5"), Some((10, -5)));
        assert_eq!(nth("0n+5"), Some((0, 5)));
        assert_eq!(nth("1n+0"), Some((1, 0)));
        assert_eq!(nth("n+0"), Some((1, 0)));
        assert_eq!(nth("n"), Some((1, 0)));
        assert_eq!(nth("2n+0"), Some((2, 0)));
        assert_eq!(nth("2n"), Some((2, 0)));
        assert_eq!(nth("3n-6"), Some((3, -6)));
        assert_eq!(nth("3n + 1"), Some((3, 1)));
        assert_eq!(nth("+3n - 2"), Some((3, -2)));
        assert_eq!(nth("-n+ 6"), Some((-1, 6)));
        assert_eq!(nth("-n+6"), Some((-1, 6)));
        assert_eq!(nth("-n +6"), Some((-1, 6)));
    }

    #[test]
    fn handles_leading_signless_plus() {
        assert_eq!(nth("+n-3"), Some((1, -3)));
        assert_eq!(nth("+n"), Some((1, 0)));
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(nth("foo"), None);
        assert_eq!(nth(""), None);
    }
}
