//! The `Source` abstraction: every "parse one X" entry point in CSS Syntax 3 is defined over
//! an *input* that may be either a string or an already-tokenized list of component values.
//! `gosub_css3` only ever parses from text, so there is no teacher file to ground this on
//! directly; the implementation below is the direct reading of the spec's own "input" wording,
//! realized here by re-serializing a `Node` list back to text and reusing the text-based
//! entry point — which is lossless because every preserved-token node keeps its exact source
//! `representation`.

use crate::node::Node;
use crate::serializer::serialize;

/// Either raw CSS text or an already-parsed component-value sequence.
pub enum Source<'a> {
    Text(&'a str),
    Nodes(&'a [Node]),
}

impl<'a> Source<'a> {
    pub(crate) fn into_text(self) -> std::borrow::Cow<'a, str> {
        match self {
            Source::Text(text) => std::borrow::Cow::Borrowed(text),
            Source::Nodes(nodes) => std::borrow::Cow::Owned(serialize(nodes)),
        }
    }
}

impl<'a> From<&'a str> for Source<'a> {
    fn from(text: &'a str) -> Self {
        Source::Text(text)
    }
}

impl<'a> From<&'a [Node]> for Source<'a> {
    fn from(nodes: &'a [Node]) -> Self {
        Source::Nodes(nodes)
    }
}
