//! Generic at-rule consumption: CSS Syntax 3 §5.4.2 / §5.4.5 "consume an at-rule".
//!
//! Grounded on `gosub_css3::parser::at_rule::{parse_at_rule, parse_at_rule_internal}`'s
//! overall shape (accumulate prelude until `;` or a block, dispatching on which is found
//! first), but without the teacher's per-at-rule-name semantic prelude parsers (`@media`,
//! `@import`, `@font-face`, ...) — those interpret the prelude grammar, which is out of
//! scope for a syntax-level crate; here every at-rule's prelude is just its raw component
//! value sequence.

use crate::node::{Node, NodeKind};
use crate::parser::component_value::{consume_block_contents, consume_one_component_value, TokenCursor};
use crate::token::TokenKind;

/// Consume one at-rule. Assumes `cursor` is positioned at an `AtKeyword` token.
pub(crate) fn consume_at_rule(cursor: &mut TokenCursor) -> Node {
    let start_loc = cursor.peek().location;
    let name = match cursor.next().kind {
        TokenKind::AtKeyword(name) => name,
        _ => unreachable!("consume_at_rule called without an AtKeyword token"),
    };

    log::trace!("consume_at_rule: @{name}");

    let mut prelude = Vec::new();
    loop {
        match &cursor.peek().kind {
            TokenKind::Semicolon => {
                cursor.next();
                return Node::new(NodeKind::AtRule { name, prelude, content: None }, start_loc);
            }
            TokenKind::Eof => {
                return Node::new(NodeKind::AtRule { name, prelude, content: None }, start_loc);
            }
            TokenKind::LCurly => {
                cursor.next();
                let content = consume_block_contents(cursor, &TokenKind::RCurly);
                return Node::new(
                    NodeKind::AtRule { name, prelude, content: Some(content) },
                    start_loc,
                );
            }
            _ => prelude.push(consume_one_component_value(cursor)),
        }
    }
}
