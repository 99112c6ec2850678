//! Source position tracking, modeled on `gosub_shared::byte_stream::Location`.

use std::fmt;

/// A 1-based line/column position plus a 0-based codepoint offset into the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Location {
    pub line: usize,
    pub column: usize,
    pub offset: usize,
}

impl Location {
    pub fn new(line: usize, column: usize, offset: usize) -> Self {
        Self { line, column, offset }
    }

    pub fn start() -> Self {
        Self { line: 1, column: 1, offset: 0 }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Tracks the current position as codepoints are consumed, bumping line/column on `\n`.
///
/// Input is assumed to already be preprocessed (CRLF/CR/FF collapsed to `\n`, NUL replaced
/// with U+FFFD) by [`crate::cursor`], so this handler only needs to special-case `\n` itself.
#[derive(Debug, Clone)]
pub struct LocationHandler {
    cur: Location,
}

impl LocationHandler {
    pub fn new(start: Location) -> Self {
        Self { cur: start }
    }

    pub fn current(&self) -> Location {
        self.cur
    }

    /// Advance the position past a single consumed codepoint.
    pub fn advance(&mut self, ch: char) {
        if ch == '\n' {
            self.cur.line += 1;
            self.cur.column = 1;
        } else {
            self.cur.column += 1;
        }
        self.cur.offset += 1;
    }
}

impl Default for LocationHandler {
    fn default() -> Self {
        Self::new(Location::start())
    }
}
