//! Source preprocessing and a codepoint cursor, modeled on the preprocessing and
//! lookahead/advance surface of `gosub_shared::byte_stream::ByteStream`.

use crate::location::{Location, LocationHandler};

/// Normalize newlines (`\r\n`, lone `\r`, `\f`) to `\n` and replace NUL with U+FFFD, per
/// CSS Syntax Level 3 §3 "preprocess a stream of code points".
pub fn preprocess(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                out.push('\n');
            }
            '\u{000C}' => out.push('\n'),
            '\u{0000}' => out.push('\u{FFFD}'),
            other => out.push(other),
        }
    }
    out
}

/// A codepoint cursor over already-preprocessed source text, tracking line/column position.
pub struct Cursor<'a> {
    chars: Vec<char>,
    pos: usize,
    location: LocationHandler,
}

impl<'a> Cursor<'a> {
    /// Preprocesses `source` (CRLF/CR/FF → `\n`, NUL → U+FFFD) before collecting it, so every
    /// caller gets CSS Syntax 3 §3's "preprocess a stream of code points" step for free — this
    /// is the one chokepoint every text-taking entry point in the crate routes through.
    pub fn new(source: &'a str) -> Self {
        Self { chars: preprocess(source).chars().collect(), pos: 0, location: LocationHandler::default() }
    }

    pub fn with_start(source: &'a str, start: Location) -> Self {
        Self { chars: preprocess(source).chars().collect(), pos: 0, location: LocationHandler::new(start) }
    }

    pub fn current_location(&self) -> Location {
        self.location.current()
    }

    pub fn eof(&self) -> bool {
        self.pos >= self.chars.len()
    }

    /// Look ahead `n` codepoints from the current position without consuming; `None` at EOF.
    pub fn peek(&self, n: usize) -> Option<char> {
        self.chars.get(self.pos + n).copied()
    }

    pub fn peek_str(&self, n: usize) -> String {
        self.chars.iter().skip(self.pos).take(n).collect()
    }

    pub fn starts_with(&self, s: &str) -> bool {
        self.peek_str(s.chars().count()) == s
    }

    /// Advance past one codepoint, returning it, and bump the position tracker.
    pub fn advance(&mut self) -> Option<char> {
        let ch = self.chars.get(self.pos).copied()?;
        self.pos += 1;
        self.location.advance(ch);
        Some(ch)
    }

    /// Advance past `n` codepoints unconditionally.
    pub fn advance_n(&mut self, n: usize) {
        for _ in 0..n {
            self.advance();
        }
    }

    pub fn tell(&self) -> usize {
        self.pos
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_crlf() {
        assert_eq!(preprocess("a\r\nb\rc\u{000C}d"), "a\nb\nc\nd");
    }

    #[test]
    fn replaces_nul() {
        assert_eq!(preprocess("a\u{0000}b"), "a\u{FFFD}b");
    }

    #[test]
    fn cursor_preprocesses_on_construction() {
        let mut cursor = Cursor::new("a\r\nb\u{0000}c");
        let mut collected = String::new();
        while let Some(c) = cursor.advance() {
            collected.push(c);
        }
        assert_eq!(collected, "a\nb\u{FFFD}c");
    }

    #[test]
    fn cursor_tracks_lines() {
        let mut cursor = Cursor::new("ab\ncd");
        cursor.advance();
        cursor.advance();
        assert_eq!(cursor.current_location(), Location::new(1, 3, 2));
        cursor.advance();
        assert_eq!(cursor.current_location(), Location::new(2, 1, 3));
    }
}
