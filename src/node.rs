//! The syntax-level AST produced by this crate's parsers.
//!
//! Shaped after `gosub_css3::node::{Node, NodeType}` (the `Box<NodeType> + Location` header,
//! and the `is_x`/`as_x` accessor convention), but the variant set itself is grounded on the
//! historical `mozilla-servo-rust-cssparser::ast::ComponentValue`/`Rule`/`Declaration` types,
//! since those are syntax-only (no selector/media-query semantics), matching this crate's
//! scope exactly where `gosub_css3::node::NodeType` goes well beyond it.

use crate::location::Location;

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ParseErrorKind {
    BadString,
    BadUrl,
    InvalidRule,
    InvalidDeclaration,
    InvalidAtRule,
    EmptyDeclarationValue,
    UnexpectedToken,
    UnclosedBlock,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NodeKind {
    // -- preserved tokens --
    Whitespace(String),
    Literal(String),
    Ident(String),
    AtKeyword(String),
    Hash { value: String, is_identifier: bool },
    QuotedString { value: String, quote: char },
    Url(String),
    Number { value: f64, int_value: Option<i64>, representation: String },
    Percentage { value: f64, representation: String },
    Dimension { value: f64, int_value: Option<i64>, representation: String, unit: String },
    UnicodeRange { start: u32, end: u32 },
    Comment(String),
    ParseError { kind: ParseErrorKind, message: String },

    // -- blocks --
    ParenthesesBlock { content: Vec<Node> },
    SquareBracketsBlock { content: Vec<Node> },
    CurlyBracketsBlock { content: Vec<Node> },
    FunctionBlock { name: String, arguments: Vec<Node> },

    // -- rules --
    QualifiedRule { prelude: Vec<Node>, content: Vec<Node> },
    AtRule { name: String, prelude: Vec<Node>, content: Option<Vec<Node>> },
    Declaration { name: String, value: Vec<Node>, important: bool },
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Node {
    pub kind: Box<NodeKind>,
    pub location: Location,
}

impl Node {
    pub fn new(kind: NodeKind, location: Location) -> Self {
        Self { kind: Box::new(kind), location }
    }

    pub fn is_whitespace(&self) -> bool {
        matches!(*self.kind, NodeKind::Whitespace(_))
    }

    pub fn is_comment(&self) -> bool {
        matches!(*self.kind, NodeKind::Comment(_))
    }

    pub fn is_parse_error(&self) -> bool {
        matches!(*self.kind, NodeKind::ParseError { .. })
    }

    pub fn is_literal(&self, value: &str) -> bool {
        matches!(&*self.kind, NodeKind::Literal(v) if v == value)
    }

    pub fn is_ident(&self, value: &str) -> bool {
        matches!(&*self.kind, NodeKind::Ident(v) if v.eq_ignore_ascii_case(value))
    }

    pub fn as_ident(&self) -> Option<&str> {
        match &*self.kind {
            NodeKind::Ident(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<(&str, &[Node])> {
        match &*self.kind {
            NodeKind::FunctionBlock { name, arguments } => Some((name, arguments)),
            _ => None,
        }
    }

    pub fn as_declaration(&self) -> Option<(&str, &[Node], bool)> {
        match &*self.kind {
            NodeKind::Declaration { name, value, important } => Some((name, value, *important)),
            _ => None,
        }
    }

    pub fn as_qualified_rule(&self) -> Option<(&[Node], &[Node])> {
        match &*self.kind {
            NodeKind::QualifiedRule { prelude, content } => Some((prelude, content)),
            _ => None,
        }
    }

    pub fn as_at_rule(&self) -> Option<(&str, &[Node], Option<&[Node]>)> {
        match &*self.kind {
            NodeKind::AtRule { name, prelude, content } => {
                Some((name, prelude, content.as_deref()))
            }
            _ => None,
        }
    }

    pub fn parse_error(kind: ParseErrorKind, message: impl Into<String>, location: Location) -> Self {
        Self::new(NodeKind::ParseError { kind, message: message.into() }, location)
    }
}

/// Remove `Whitespace` nodes from a top-level sequence, per the `skip_whitespace` flag on the
/// public entry points.
pub fn filter_whitespace(nodes: Vec<Node>) -> Vec<Node> {
    nodes.into_iter().filter(|n| !n.is_whitespace()).collect()
}

/// Remove `Comment` nodes from a top-level sequence, per the `skip_comments` flag.
pub fn filter_comments(nodes: Vec<Node>) -> Vec<Node> {
    nodes.into_iter().filter(|n| !n.is_comment()).collect()
}
