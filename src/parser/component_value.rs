//! The component-value / block / function builder: CSS Syntax 3 §5.4-5.6, "consume a
//! component value", "consume a simple block", "consume a function".
//!
//! Grounded on `gosub_css3::parser::block` (nested-block consumption loop) and
//! `gosub_css3::parser::url` (the `url(...)` vs. `Function("url", ...)` distinction), but
//! operating over this crate's own flat [`crate::token::Token`] stream and syntax-only
//! [`crate::node::Node`] tree rather than the teacher's semantic `NodeType`.

use crate::node::{Node, NodeKind, ParseErrorKind};
use crate::token::{Token, TokenKind};
use crate::tokenizer::Tokenizer;

/// A cursor over a token slice, used by every layer of the parser above the tokenizer.
pub struct TokenCursor {
    tokens: Vec<Token>,
    pos: usize,
}

impl TokenCursor {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, pos: 0 }
    }

    pub fn from_str(source: &str) -> Self {
        Self::new(Tokenizer::new(source).tokenize_all())
    }

    pub fn peek(&self) -> &Token {
        self.tokens.get(self.pos).unwrap_or_else(|| self.tokens.last().unwrap_or(&EOF_FALLBACK))
    }

    pub fn peek_n(&self, n: usize) -> Option<&Token> {
        self.tokens.get(self.pos + n)
    }

    pub fn next(&mut self) -> Token {
        let t = self.tokens.get(self.pos).cloned().unwrap_or(Token {
            kind: TokenKind::Eof,
            location: crate::location::Location::default(),
        });
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        t
    }

    pub fn eof(&self) -> bool {
        matches!(self.peek().kind, TokenKind::Eof)
    }
}

// A static fallback avoids allocating a fresh EOF token on every out-of-bounds peek.
static EOF_FALLBACK: Token = Token {
    kind: TokenKind::Eof,
    location: crate::location::Location { line: 0, column: 0, offset: 0 },
};

/// Consume one component value: a preserved token, a block, or a function call.
pub fn consume_one_component_value(cursor: &mut TokenCursor) -> Node {
    let token = cursor.next();
    let loc = token.location;

    match token.kind {
        TokenKind::LParen => {
            let content = consume_block_contents(cursor, &TokenKind::RParen);
            Node::new(NodeKind::ParenthesesBlock { content }, loc)
        }
        TokenKind::LBracket => {
            let content = consume_block_contents(cursor, &TokenKind::RBracket);
            Node::new(NodeKind::SquareBracketsBlock { content }, loc)
        }
        TokenKind::LCurly => {
            let content = consume_block_contents(cursor, &TokenKind::RCurly);
            Node::new(NodeKind::CurlyBracketsBlock { content }, loc)
        }
        TokenKind::Function(name) => {
            let arguments = consume_block_contents(cursor, &TokenKind::RParen);
            Node::new(NodeKind::FunctionBlock { name, arguments }, loc)
        }
        other => preserved_token_to_node(other, loc),
    }
}

/// Consume component values until (and consuming) `closer`, or EOF (unterminated blocks are
/// accepted without error, per spec).
pub(crate) fn consume_block_contents(cursor: &mut TokenCursor, closer: &TokenKind) -> Vec<Node> {
    let mut content = Vec::new();
    loop {
        if cursor.eof() {
            break;
        }
        if std::mem::discriminant(&cursor.peek().kind) == std::mem::discriminant(closer) {
            cursor.next();
            break;
        }
        content.push(consume_one_component_value(cursor));
    }
    content
}

fn preserved_token_to_node(kind: TokenKind, loc: crate::location::Location) -> Node {
    let node_kind = match kind {
        TokenKind::Whitespace(v) => NodeKind::Whitespace(v),
        TokenKind::Comment(v) => NodeKind::Comment(v),
        TokenKind::Ident(v) => NodeKind::Ident(v),
        TokenKind::AtKeyword(v) => NodeKind::AtKeyword(v),
        TokenKind::Hash { value, is_identifier } => NodeKind::Hash { value, is_identifier },
        TokenKind::QuotedString { value, quote } => NodeKind::QuotedString { value, quote },
        TokenKind::Url(v) => NodeKind::Url(v),
        TokenKind::BadString => {
            NodeKind::ParseError { kind: ParseErrorKind::BadString, message: "bad string token".into() }
        }
        TokenKind::BadUrl => {
            NodeKind::ParseError { kind: ParseErrorKind::BadUrl, message: "bad url token".into() }
        }
        TokenKind::Delim(c) => NodeKind::Literal(c.to_string()),
        TokenKind::Number { value, int_value, representation } => {
            NodeKind::Number { value, int_value, representation }
        }
        TokenKind::Percentage { value, representation } => {
            NodeKind::Percentage { value, representation }
        }
        TokenKind::Dimension { value, int_value, representation, unit } => {
            NodeKind::Dimension { value, int_value, representation, unit }
        }
        TokenKind::UnicodeRange { start, end } => NodeKind::UnicodeRange { start, end },
        TokenKind::Cdo => NodeKind::Literal("<!--".into()),
        TokenKind::Cdc => NodeKind::Literal("-->".into()),
        TokenKind::Colon => NodeKind::Literal(":".into()),
        TokenKind::Semicolon => NodeKind::Literal(";".into()),
        TokenKind::Comma => NodeKind::Literal(",".into()),
        TokenKind::LBracket | TokenKind::RBracket | TokenKind::LParen | TokenKind::RParen
        | TokenKind::LCurly | TokenKind::RCurly | TokenKind::Function(_) | TokenKind::Eof => {
            unreachable!("block/function openers and Eof are handled by the caller")
        }
    };
    Node::new(node_kind, loc)
}

/// Parse a full component-value list from text (CSS Syntax 3 §5.3.1, "parse a list of
/// component values").
pub fn parse_component_value_list(text: &str, skip_comments: bool) -> Vec<Node> {
    let mut cursor = TokenCursor::new(Tokenizer::new(text).tokenize_all());
    let mut nodes = Vec::new();
    while !cursor.eof() {
        nodes.push(consume_one_component_value(&mut cursor));
    }
    if skip_comments {
        nodes.retain(|n| !n.is_comment());
    }
    nodes
}

/// Same as [`parse_one_component_value`], but takes an already-parsed component-value
/// sequence (collapsing it back down to exactly one, or a `ParseError`).
pub fn parse_one_component_value_from_nodes(nodes: &[Node]) -> Node {
    parse_one_component_value(&crate::source::Source::Nodes(nodes).into_text())
}

/// CSS Syntax 3 §5.3.2, "parse a component value": exactly one, erroring if input remains.
pub fn parse_one_component_value(text: &str) -> Node {
    let mut cursor = TokenCursor::new(Tokenizer::new(text).tokenize_all());
    while matches!(cursor.peek().kind, TokenKind::Whitespace(_)) {
        cursor.next();
    }
    if cursor.eof() {
        return Node::parse_error(
            ParseErrorKind::UnexpectedToken,
            "empty input",
            crate::location::Location::default(),
        );
    }
    let value = consume_one_component_value(&mut cursor);
    while matches!(cursor.peek().kind, TokenKind::Whitespace(_)) {
        cursor.next();
    }
    if !cursor.eof() {
        return Node::parse_error(
            ParseErrorKind::UnexpectedToken,
            "unexpected content after component value",
            value.location,
        );
    }
    value
}
