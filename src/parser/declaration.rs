//! Declaration parsing and the CSS-nesting-aware `parse_blocks_contents`: CSS Syntax 3
//! §5.3.6-5.3.8 and the CSS Nesting extension to "consume the contents of a block".
//!
//! Grounded on `gosub_css3::parser::declaration::{parse_declaration, parse_declaration_internal}`
//! for `!important` detection, and `gosub_css3::parser::block::parse_block` for the
//! declaration-vs-nested-rule dispatch (the teacher dispatches on a leading `&` delimiter,
//! predating the finalized CSS Nesting grammar; this crate instead dispatches on whether the
//! upcoming tokens look like `<ident> <whitespace>* ':'`, which is what the shipped CSS
//! Nesting specification actually uses to disambiguate a declaration from a nested rule).

use crate::node::{Node, NodeKind, ParseErrorKind};
use crate::parser::at_rule::consume_at_rule;
use crate::parser::component_value::{consume_one_component_value, TokenCursor};
use crate::parser::rule::consume_qualified_rule;
use crate::token::TokenKind;

/// CSS Nesting's "parse the contents of a block" (formerly "parse a list of declarations",
/// still exposed under that name below for callers migrating from the pre-nesting API).
pub fn parse_blocks_contents(text: &str, skip_comments: bool, skip_whitespace: bool) -> Vec<Node> {
    let mut cursor = TokenCursor::from_str(text);
    let mut items = consume_blocks_contents(&mut cursor);
    if skip_comments {
        items.retain(|n| !n.is_comment());
    }
    if skip_whitespace {
        items.retain(|n| !n.is_whitespace());
    }
    items
}

pub(crate) fn consume_blocks_contents(cursor: &mut TokenCursor) -> Vec<Node> {
    let mut items = Vec::new();
    loop {
        match &cursor.peek().kind {
            TokenKind::Whitespace(v) => {
                let v = v.clone();
                let loc = cursor.peek().location;
                cursor.next();
                items.push(Node::new(NodeKind::Whitespace(v), loc));
            }
            TokenKind::Comment(v) => {
                let v = v.clone();
                let loc = cursor.peek().location;
                cursor.next();
                items.push(Node::new(NodeKind::Comment(v), loc));
            }
            TokenKind::Semicolon => {
                cursor.next();
            }
            TokenKind::Eof | TokenKind::RCurly => break,
            TokenKind::AtKeyword(_) => {
                items.push(consume_at_rule(cursor));
            }
            TokenKind::Ident(_) if looks_like_declaration(cursor) => {
                items.push(consume_declaration(cursor));
            }
            _ => match consume_qualified_rule(cursor) {
                Some(rule) => items.push(rule),
                None => {
                    items.push(Node::parse_error(
                        ParseErrorKind::InvalidRule,
                        "nested rule never found a block",
                        cursor.peek().location,
                    ));
                }
            },
        }
    }
    items
}

/// Same as [`parse_blocks_contents`], but takes an already-parsed component-value sequence.
pub fn parse_blocks_contents_from_nodes(
    nodes: &[Node],
    skip_comments: bool,
    skip_whitespace: bool,
) -> Vec<Node> {
    parse_blocks_contents(
        &crate::source::Source::Nodes(nodes).into_text(),
        skip_comments,
        skip_whitespace,
    )
}

/// Look ahead (without consuming) past the current ident to see whether the next
/// non-whitespace/comment token is a colon, the CSS Nesting disambiguation between a
/// declaration and a nested style rule.
fn looks_like_declaration(cursor: &TokenCursor) -> bool {
    let mut n = 1;
    loop {
        match cursor.peek_n(n).map(|t| &t.kind) {
            Some(TokenKind::Whitespace(_)) | Some(TokenKind::Comment(_)) => n += 1,
            Some(TokenKind::Colon) => return true,
            _ => return false,
        }
    }
}

/// Consume one declaration (name already confirmed to be followed by a colon). Returns a
/// `Declaration` node, or a `ParseError` if the value is empty.
fn consume_declaration(cursor: &mut TokenCursor) -> Node {
    let start_loc = cursor.peek().location;
    let name = match cursor.next().kind {
        TokenKind::Ident(name) => name,
        _ => unreachable!("consume_declaration called without a leading ident"),
    };
    log::trace!("consume_declaration: {name}");

    skip_whitespace_comments(cursor);
    debug_assert!(matches!(cursor.peek().kind, TokenKind::Colon));
    cursor.next();

    let mut value = Vec::new();
    loop {
        match &cursor.peek().kind {
            TokenKind::Semicolon => {
                cursor.next();
                break;
            }
            TokenKind::Eof | TokenKind::RCurly => break,
            _ => value.push(consume_one_component_value(cursor)),
        }
    }

    let important = strip_trailing_important(&mut value);
    trim_whitespace_and_comments(&mut value);

    if value.is_empty() {
        return Node::parse_error(
            ParseErrorKind::EmptyDeclarationValue,
            format!("declaration '{name}' has an empty value"),
            start_loc,
        );
    }

    Node::new(NodeKind::Declaration { name, value, important }, start_loc)
}

/// CSS Syntax 3 §5.4.6's `!important` detection: a trailing `!`, optional whitespace/
/// comments, the ident `important` (case-insensitive), all removed from `value` if found.
fn strip_trailing_important(value: &mut Vec<Node>) -> bool {
    let mut idx = value.len();
    while idx > 0 && (value[idx - 1].is_whitespace() || value[idx - 1].is_comment()) {
        idx -= 1;
    }
    if idx == 0 || !value[idx - 1].is_ident("important") {
        return false;
    }
    idx -= 1;
    while idx > 0 && (value[idx - 1].is_whitespace() || value[idx - 1].is_comment()) {
        idx -= 1;
    }
    if idx == 0 || !value[idx - 1].is_literal("!") {
        return false;
    }
    idx -= 1;
    value.truncate(idx);
    true
}

fn trim_whitespace_and_comments(value: &mut Vec<Node>) {
    while matches!(value.last(), Some(n) if n.is_whitespace() || n.is_comment()) {
        value.pop();
    }
    while matches!(value.first(), Some(n) if n.is_whitespace() || n.is_comment()) {
        value.remove(0);
    }
}

fn skip_whitespace_comments(cursor: &mut TokenCursor) {
    while matches!(cursor.peek().kind, TokenKind::Whitespace(_) | TokenKind::Comment(_)) {
        cursor.next();
    }
}

/// CSS Syntax 3 §5.3.8, "parse a declaration": exactly one declaration.
pub fn parse_one_declaration(text: &str) -> Node {
    let mut cursor = TokenCursor::new_skip_leading_whitespace(text);

    if !matches!(cursor.peek().kind, TokenKind::Ident(_)) {
        return Node::parse_error(
            ParseErrorKind::InvalidDeclaration,
            "expected an identifier to start a declaration",
            cursor.peek().location,
        );
    }

    if !matches!(next_significant(&cursor), TokenKind::Colon) {
        return Node::parse_error(
            ParseErrorKind::InvalidDeclaration,
            "expected ':' after declaration name",
            cursor.peek().location,
        );
    }

    consume_declaration(&mut cursor)
}

/// Same as [`parse_one_declaration`], but takes an already-parsed component-value sequence.
pub fn parse_one_declaration_from_nodes(nodes: &[Node]) -> Node {
    parse_one_declaration(&crate::source::Source::Nodes(nodes).into_text())
}

/// Look past the current token, skipping whitespace/comments, and return the next
/// significant token kind (or `Eof`).
fn next_significant(cursor: &TokenCursor) -> TokenKind {
    let mut n = 1;
    loop {
        match cursor.peek_n(n).map(|t| t.kind.clone()) {
            Some(TokenKind::Whitespace(_)) | Some(TokenKind::Comment(_)) => n += 1,
            Some(other) => return other,
            None => return TokenKind::Eof,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_declaration_with_important() {
        let node = parse_one_declaration("color: red !important");
        let (name, value, important) = node.as_declaration().expect("declaration");
        assert_eq!(name, "color");
        assert_eq!(value.len(), 1);
        assert!(important);
    }

    #[test]
    fn parses_declaration_without_important() {
        let node = parse_one_declaration("width: 50%");
        let (name, _value, important) = node.as_declaration().expect("declaration");
        assert_eq!(name, "width");
        assert!(!important);
    }

    #[test]
    fn empty_declaration_value_is_an_error() {
        let node = parse_one_declaration("color:");
        assert!(node.is_parse_error());
    }

    #[test]
    fn blocks_contents_parses_nested_rule_and_declaration() {
        let nodes = parse_blocks_contents("color: red; &:hover { color: blue; }", true, true);
        assert_eq!(nodes.len(), 2);
        assert!(nodes[0].as_declaration().is_some());
        assert!(nodes[1].as_qualified_rule().is_some());
    }

    #[test]
    fn custom_property_is_a_declaration() {
        let node = parse_one_declaration("--main-color: #ff0000");
        let (name, _, _) = node.as_declaration().expect("declaration");
        assert_eq!(name, "--main-color");
    }
}
