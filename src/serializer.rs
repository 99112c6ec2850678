//! CSS Syntax Level 3 §5.2-ish serialization, rebuilding CSS text from a parsed node tree.
//!
//! `gosub_css3` has no serializer of its own (its consumer rebuilds a semantic CSSOM and
//! never needs to print CSS back out), so the token-pair safety rules below are grounded
//! directly on the algorithm CSS Syntax 3 §5 describes, shaped the way
//! `mozilla-servo-rust-cssparser::ast`'s `ToCss` implementations lay out their `write!` calls
//! one node kind at a time.

use crate::node::{Node, NodeKind};

/// Serialize a sequence of nodes back into CSS text, inserting a comment between adjacent
/// tokens whenever concatenating them verbatim would re-tokenize differently than the
/// original sequence (CSS Syntax 3 §5, "serialization").
pub fn serialize(nodes: &[Node]) -> String {
    let mut out = String::new();
    let mut prev: Option<&Node> = None;
    for node in nodes {
        if let Some(prev) = prev {
            if needs_separator(prev, node) {
                out.push_str("/**/");
            }
        }
        write_node(node, &mut out);
        prev = Some(node);
    }
    out
}

fn write_node(node: &Node, out: &mut String) {
    match &*node.kind {
        NodeKind::Whitespace(v) => out.push_str(v),
        NodeKind::Literal(v) => out.push_str(v),
        NodeKind::Ident(v) => out.push_str(&serialize_identifier(v).unwrap_or_else(|| v.clone())),
        NodeKind::AtKeyword(v) => {
            out.push('@');
            out.push_str(&serialize_identifier(v).unwrap_or_else(|| v.clone()));
        }
        NodeKind::Hash { value, is_identifier } => {
            out.push('#');
            if *is_identifier {
                out.push_str(&serialize_identifier(value).unwrap_or_else(|| value.clone()));
            } else {
                out.push_str(&escape_non_printable(value));
            }
        }
        NodeKind::QuotedString { value, quote } => {
            out.push(*quote);
            for c in value.chars() {
                match c {
                    c if c == *quote || c == '\\' => {
                        out.push('\\');
                        out.push(c);
                    }
                    '\n' => out.push_str("\\A "),
                    '\u{1}'..='\u{1f}' | '\u{7f}' => {
                        out.push_str(&format!("\\{:x} ", c as u32));
                    }
                    c => out.push(c),
                }
            }
            out.push(*quote);
        }
        NodeKind::Url(v) => {
            out.push_str("url(");
            out.push_str(&escape_url_component(v));
            out.push(')');
        }
        NodeKind::Number { representation, .. } => out.push_str(representation),
        NodeKind::Percentage { representation, .. } => {
            out.push_str(representation);
            out.push('%');
        }
        NodeKind::Dimension { representation, unit, .. } => {
            out.push_str(representation);
            out.push_str(unit);
        }
        NodeKind::UnicodeRange { start, end } => {
            if start == end {
                out.push_str(&format!("U+{start:X}"));
            } else {
                out.push_str(&format!("U+{start:X}-{end:X}"));
            }
        }
        NodeKind::Comment(v) => {
            out.push_str("/*");
            out.push_str(v);
            out.push_str("*/");
        }
        NodeKind::ParseError { .. } => {}

        NodeKind::ParenthesesBlock { content } => {
            out.push('(');
            out.push_str(&serialize(content));
            out.push(')');
        }
        NodeKind::SquareBracketsBlock { content } => {
            out.push('[');
            out.push_str(&serialize(content));
            out.push(']');
        }
        NodeKind::CurlyBracketsBlock { content } => {
            out.push('{');
            out.push_str(&serialize(content));
            out.push('}');
        }
        NodeKind::FunctionBlock { name, arguments } => {
            out.push_str(&serialize_identifier(name).unwrap_or_else(|| name.clone()));
            out.push('(');
            out.push_str(&serialize(arguments));
            out.push(')');
        }

        NodeKind::QualifiedRule { prelude, content } => {
            out.push_str(&serialize(prelude));
            out.push('{');
            out.push_str(&serialize(content));
            out.push('}');
        }
        NodeKind::AtRule { name, prelude, content } => {
            out.push('@');
            out.push_str(&serialize_identifier(name).unwrap_or_else(|| name.clone()));
            out.push_str(&serialize(prelude));
            match content {
                Some(content) => {
                    out.push('{');
                    out.push_str(&serialize(content));
                    out.push('}');
                }
                None => out.push(';'),
            }
        }
        NodeKind::Declaration { name, value, important } => {
            out.push_str(&serialize_identifier(name).unwrap_or_else(|| name.clone()));
            out.push(':');
            out.push_str(&serialize(value));
            if *important {
                out.push_str("!important");
            }
        }
    }
}

/// Whether concatenating `a` immediately followed by `b` would not round-trip to the same
/// token sequence, per the teacher-independent CSS Syntax 3 serialization table. Only the
/// pairings that can actually occur at the top of a serialized node (idents, `@`-keywords,
/// hashes, numeric tokens, and a handful of delimiter clashes) are checked.
fn needs_separator(a: &Node, b: &Node) -> bool {
    let a_last = last_char_class(a);
    let b_first = first_char_class(b);
    match (a_last, b_first) {
        (Some(CharClass::IdentLike), Some(CharClass::IdentLike)) => true,
        (Some(CharClass::IdentLike), Some(CharClass::Digit)) => true,
        (Some(CharClass::Digit), Some(CharClass::IdentLike)) => true,
        (Some(CharClass::Digit), Some(CharClass::Digit)) => true,
        (Some(CharClass::Hash), Some(CharClass::IdentLike)) => true,
        (Some(CharClass::AtKeyword), Some(CharClass::IdentLike)) => true,
        (Some(CharClass::Delim('/')), Some(CharClass::Delim('*'))) => true,
        (Some(CharClass::Delim('-')), Some(CharClass::Digit)) => true,
        (Some(CharClass::Delim('-')), Some(CharClass::Delim('-'))) => true,
        _ => false,
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum CharClass {
    IdentLike,
    Digit,
    Hash,
    AtKeyword,
    Delim(char),
}

fn last_char_class(node: &Node) -> Option<CharClass> {
    match &*node.kind {
        NodeKind::Ident(_) | NodeKind::Url(_) => Some(CharClass::IdentLike),
        NodeKind::Dimension { unit, .. } => {
            if unit.is_empty() {
                Some(CharClass::Digit)
            } else {
                Some(CharClass::IdentLike)
            }
        }
        NodeKind::Number { .. } | NodeKind::Percentage { .. } => Some(CharClass::Digit),
        NodeKind::Literal(v) => v.chars().last().map(CharClass::Delim),
        _ => None,
    }
}

fn first_char_class(node: &Node) -> Option<CharClass> {
    match &*node.kind {
        NodeKind::Ident(_) => Some(CharClass::IdentLike),
        NodeKind::Hash { .. } => Some(CharClass::Hash),
        NodeKind::AtKeyword(_) => Some(CharClass::AtKeyword),
        NodeKind::Number { representation, .. } | NodeKind::Dimension { representation, .. } => {
            if representation.starts_with('-') || representation.starts_with('+') {
                Some(CharClass::Delim(representation.chars().next().unwrap_or('0')))
            } else {
                Some(CharClass::Digit)
            }
        }
        NodeKind::Literal(v) => v.chars().next().map(CharClass::Delim),
        _ => None,
    }
}

/// CSS Syntax 3 §12.2, "serialize an identifier": escape characters that cannot appear
/// literally in an identifier, returning `None` if `name` is empty or is a bare `-` (which
/// cannot be escaped into a valid ident-sequence start — a single escaped hyphen still reads
/// back as a delimiter, not an identifier).
pub fn serialize_identifier(name: &str) -> Option<String> {
    if name.is_empty() || name == "-" {
        return None;
    }
    let mut out = String::with_capacity(name.len());
    for (i, c) in name.char_indices() {
        match c {
            '\u{0}' => out.push('\u{FFFD}'),
            '\u{1}'..='\u{1f}' | '\u{7f}' => {
                out.push_str(&format!("\\{:x} ", c as u32));
            }
            c if c.is_ascii_digit() && i == 0 => {
                out.push_str(&format!("\\{:x} ", c as u32));
            }
            c if i == 1 && name.starts_with('-') && c.is_ascii_digit() => {
                out.push_str(&format!("\\{:x} ", c as u32));
            }
            c if is_ident_char(c) || !c.is_ascii() => out.push(c),
            c => {
                out.push('\\');
                out.push(c);
            }
        }
    }
    Some(out)
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

/// CSS Syntax 3 §4.3.11-ish hash/non-ident serialization: escape non-printable codepoints
/// the same way [`serialize_identifier`] does, but without the ident-start digit/hyphen
/// rules (a non-identifier hash's first character was never required to be ident-start).
fn escape_non_printable(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\u{0}' => out.push('\u{FFFD}'),
            '\u{1}'..='\u{1f}' | '\u{7f}' => out.push_str(&format!("\\{:x} ", c as u32)),
            c => out.push(c),
        }
    }
    out
}

/// Escape `"`, `'`, `\`, whitespace, `(` and `)` inside an unquoted `url(...)` token's
/// contents, per CSS Syntax 3 §4.3.6's forbidden-character set for `<url-token>`.
fn escape_url_component(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '"' | '\'' | '\\' | '(' | ')' => {
                out.push('\\');
                out.push(c);
            }
            '\u{1}'..='\u{1f}' | '\u{7f}' => out.push_str(&format!("\\{:x} ", c as u32)),
            c if c.is_whitespace() => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::component_value::parse_component_value_list;

    #[test]
    fn round_trips_simple_declaration_text() {
        let nodes = parse_component_value_list("10px solid red", false);
        assert_eq!(serialize(&nodes), "10px solid red");
    }

    #[test]
    fn inserts_separator_between_adjacent_idents() {
        let a = Node::new(NodeKind::Ident("foo".into()), Default::default());
        let b = Node::new(NodeKind::Ident("bar".into()), Default::default());
        assert_eq!(serialize(&[a, b]), "foo/**/bar");
    }

    #[test]
    fn no_separator_needed_between_ident_and_punctuation() {
        let a = Node::new(NodeKind::Ident("foo".into()), Default::default());
        let b = Node::new(NodeKind::Literal(":".into()), Default::default());
        assert_eq!(serialize(&[a, b]), "foo:");
    }

    #[test]
    fn serializes_function_block() {
        let nodes = parse_component_value_list("rgb(1, 2, 3)", false);
        assert_eq!(serialize(&nodes), "rgb(1, 2, 3)");
    }

    #[test]
    fn serialize_identifier_escapes_leading_digit() {
        let escaped = serialize_identifier("1a").expect("non-empty");
        assert!(escaped.starts_with("\\31"));
    }

    #[test]
    fn serialize_identifier_rejects_empty() {
        assert_eq!(serialize_identifier(""), None);
    }

    #[test]
    fn serialize_identifier_rejects_bare_hyphen() {
        assert_eq!(serialize_identifier("-"), None);
    }

    #[test]
    fn serializes_url_token_escaping_parens_and_whitespace() {
        let node = Node::new(NodeKind::Url("a b(c)".into()), Default::default());
        assert_eq!(serialize(&[node]), "url(a\\ b\\(c\\))");
    }

    #[test]
    fn serializes_identifier_token_with_escape() {
        let node = Node::new(NodeKind::Ident("foo bar".into()), Default::default());
        assert_eq!(serialize(&[node]), "foo\\ bar");
    }
}
