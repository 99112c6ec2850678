//! CSS Syntax Level 3 §4 tokenizer.
//!
//! Grounded on `gosub_css3::tokenizer::Tokenizer::consume_token` and its helpers
//! (`consume_comment`, `consume_numeric_token`, `consume_string_token`, `consume_number`,
//! `consume_ident_like_seq`, `consume_url`, `consume_escaped_token`, `consume_ident`), kept
//! in the same per-codepoint dispatch shape but rewritten against [`crate::cursor::Cursor`]
//! instead of `gosub_shared::ByteStream`, and extended with `representation` preservation on
//! numeric tokens (needed for lossless serialization, which the teacher's crate does not
//! require since it rebuilds a semantic CSSOM rather than round-tripping source text).

use crate::cursor::Cursor;
use crate::location::Location;
use crate::token::{Token, TokenKind};
use cow_utils::CowUtils;

const REPLACEMENT_CHARACTER: char = '\u{FFFD}';

pub struct Tokenizer<'a> {
    cursor: Cursor<'a>,
}

impl<'a> Tokenizer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self { cursor: Cursor::new(source) }
    }

    pub fn with_start(source: &'a str, start: Location) -> Self {
        Self { cursor: Cursor::with_start(source, start) }
    }

    /// Tokenize the whole input into a flat `Vec<Token>`, ending with a single `Eof` token.
    pub fn tokenize_all(mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let token = self.consume_token();
            let is_eof = token.is_eof();
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        tokens
    }

    pub fn consume_token(&mut self) -> Token {
        let loc = self.cursor.current_location();

        if self.cursor.starts_with("/*") {
            return self.consume_comment_token(loc);
        }

        let Some(ch) = self.cursor.peek(0) else {
            return Token::new(TokenKind::Eof, loc);
        };

        match ch {
            c if is_whitespace(c) => self.consume_whitespace_token(loc),
            '"' | '\'' => self.consume_string_token(loc),
            '#' => self.consume_hash_token(loc),
            '(' => {
                self.cursor.advance();
                Token::new(TokenKind::LParen, loc)
            }
            ')' => {
                self.cursor.advance();
                Token::new(TokenKind::RParen, loc)
            }
            '[' => {
                self.cursor.advance();
                Token::new(TokenKind::LBracket, loc)
            }
            ']' => {
                self.cursor.advance();
                Token::new(TokenKind::RBracket, loc)
            }
            '{' => {
                self.cursor.advance();
                Token::new(TokenKind::LCurly, loc)
            }
            '}' => {
                self.cursor.advance();
                Token::new(TokenKind::RCurly, loc)
            }
            ',' => {
                self.cursor.advance();
                Token::new(TokenKind::Comma, loc)
            }
            ':' => {
                self.cursor.advance();
                Token::new(TokenKind::Colon, loc)
            }
            ';' => {
                self.cursor.advance();
                Token::new(TokenKind::Semicolon, loc)
            }
            '+' | '.' => {
                if self.starts_number() {
                    self.consume_numeric_token(loc)
                } else {
                    self.cursor.advance();
                    Token::new(TokenKind::Delim(ch), loc)
                }
            }
            '-' => {
                if self.starts_number() {
                    self.consume_numeric_token(loc)
                } else if self.cursor.peek(1) == Some('-') && self.cursor.peek(2) == Some('>') {
                    self.cursor.advance_n(3);
                    Token::new(TokenKind::Cdc, loc)
                } else if self.starts_ident_sequence() {
                    self.consume_ident_like_token(loc)
                } else {
                    self.cursor.advance();
                    Token::new(TokenKind::Delim(ch), loc)
                }
            }
            '<' => {
                if self.cursor.peek(1) == Some('!')
                    && self.cursor.peek(2) == Some('-')
                    && self.cursor.peek(3) == Some('-')
                {
                    self.cursor.advance_n(4);
                    Token::new(TokenKind::Cdo, loc)
                } else {
                    self.cursor.advance();
                    Token::new(TokenKind::Delim(ch), loc)
                }
            }
            '@' => {
                self.cursor.advance();
                if self.starts_ident_sequence() {
                    let name = self.consume_ident();
                    Token::new(TokenKind::AtKeyword(name), loc)
                } else {
                    Token::new(TokenKind::Delim('@'), loc)
                }
            }
            '\\' => {
                if self.is_start_of_escape(0) {
                    self.consume_ident_like_token(loc)
                } else {
                    self.cursor.advance();
                    Token::new(TokenKind::Delim('\\'), loc)
                }
            }
            'u' | 'U' if self.starts_unicode_range() => self.consume_unicode_range_token(loc),
            c if c.is_ascii_digit() => self.consume_numeric_token(loc),
            c if is_ident_start(c) => self.consume_ident_like_token(loc),
            _ => {
                self.cursor.advance();
                Token::new(TokenKind::Delim(ch), loc)
            }
        }
    }

    /// Consume one `/* ... */` comment and return it as a preserved `Comment` token. An
    /// unterminated comment at EOF is not an error (per spec), its content runs to EOF.
    fn consume_comment_token(&mut self, loc: Location) -> Token {
        self.cursor.advance_n(2);
        let mut value = String::new();
        loop {
            if self.cursor.eof() {
                break;
            }
            if self.cursor.starts_with("*/") {
                self.cursor.advance_n(2);
                break;
            }
            if let Some(c) = self.cursor.advance() {
                value.push(c);
            }
        }
        Token::new(TokenKind::Comment(value), loc)
    }

    fn consume_whitespace_token(&mut self, loc: Location) -> Token {
        let mut value = String::new();
        while let Some(c) = self.cursor.peek(0) {
            if is_whitespace(c) {
                value.push(c);
                self.cursor.advance();
            } else {
                break;
            }
        }
        Token::new(TokenKind::Whitespace(value), loc)
    }

    fn consume_string_token(&mut self, loc: Location) -> Token {
        let quote = self.cursor.advance().unwrap_or('"');
        let mut value = String::new();
        loop {
            match self.cursor.peek(0) {
                None => break,
                Some(c) if c == quote => {
                    self.cursor.advance();
                    break;
                }
                Some('\n') => {
                    return Token::new(TokenKind::BadString, loc);
                }
                Some('\\') => {
                    if self.cursor.peek(1).is_none() {
                        self.cursor.advance();
                    } else if self.cursor.peek(1) == Some('\n') {
                        self.cursor.advance_n(2);
                    } else {
                        self.cursor.advance();
                        value.push(self.consume_escaped_codepoint());
                    }
                }
                Some(c) => {
                    value.push(c);
                    self.cursor.advance();
                }
            }
        }
        Token::new(TokenKind::QuotedString { value, quote }, loc)
    }

    fn consume_hash_token(&mut self, loc: Location) -> Token {
        self.cursor.advance();
        if self.starts_ident_sequence() || self.is_ident_char_at(0) {
            let is_identifier = self.starts_ident_sequence();
            let value = self.consume_ident();
            Token::new(TokenKind::Hash { value, is_identifier }, loc)
        } else if self.cursor.peek(0).is_some() {
            let value = self.consume_ident();
            Token::new(TokenKind::Hash { value, is_identifier: false }, loc)
        } else {
            Token::new(TokenKind::Delim('#'), loc)
        }
    }

    fn consume_numeric_token(&mut self, loc: Location) -> Token {
        let (value, int_value, representation) = self.consume_number();

        if self.starts_ident_sequence() {
            let unit = self.consume_ident().cow_to_ascii_lowercase().into_owned();
            return Token::new(
                TokenKind::Dimension { value, int_value, representation, unit },
                loc,
            );
        }

        if self.cursor.peek(0) == Some('%') {
            self.cursor.advance();
            return Token::new(TokenKind::Percentage { value, representation }, loc);
        }

        Token::new(TokenKind::Number { value, int_value, representation }, loc)
    }

    /// Consume a `<number-token>` numeric value, returning the parsed value, the integer
    /// value if it is representable as one (no `.` and no exponent in the source), and the
    /// exact source representation (preserved for lossless serialization).
    fn consume_number(&mut self) -> (f64, Option<i64>, String) {
        let mut repr = String::new();
        let mut is_integer = true;

        if matches!(self.cursor.peek(0), Some('+') | Some('-')) {
            repr.push(self.cursor.advance().unwrap());
        }
        while let Some(c) = self.cursor.peek(0) {
            if c.is_ascii_digit() {
                repr.push(c);
                self.cursor.advance();
            } else {
                break;
            }
        }
        if self.cursor.peek(0) == Some('.') && self.cursor.peek(1).is_some_and(|c| c.is_ascii_digit())
        {
            is_integer = false;
            repr.push(self.cursor.advance().unwrap());
            while let Some(c) = self.cursor.peek(0) {
                if c.is_ascii_digit() {
                    repr.push(c);
                    self.cursor.advance();
                } else {
                    break;
                }
            }
        }
        if matches!(self.cursor.peek(0), Some('e') | Some('E')) {
            let sign_offset = if matches!(self.cursor.peek(1), Some('+') | Some('-')) { 2 } else { 1 };
            if self.cursor.peek(sign_offset).is_some_and(|c| c.is_ascii_digit()) {
                is_integer = false;
                repr.push(self.cursor.advance().unwrap());
                if matches!(self.cursor.peek(0), Some('+') | Some('-')) {
                    repr.push(self.cursor.advance().unwrap());
                }
                while let Some(c) = self.cursor.peek(0) {
                    if c.is_ascii_digit() {
                        repr.push(c);
                        self.cursor.advance();
                    } else {
                        break;
                    }
                }
            }
        }

        #[allow(clippy::expect_used)]
        let value: f64 = repr.parse().expect("consume_number only accumulates valid float syntax");
        let int_value = if is_integer { repr.parse::<i64>().ok() } else { None };
        (value, int_value, repr)
    }

    fn consume_ident_like_token(&mut self, loc: Location) -> Token {
        let name = self.consume_ident();

        if name.eq_ignore_ascii_case("url") && self.cursor.peek(0) == Some('(') {
            self.cursor.advance();
            // Skip whitespace, then check whether a quote follows: if so this is a
            // `url( <string-token> )`-shaped call, which the block/function builder turns
            // into a `FunctionBlock`. Otherwise tokenize the raw URL contents here.
            let mut lookahead = 0;
            while matches!(self.cursor.peek(lookahead), Some(c) if is_whitespace(c)) {
                lookahead += 1;
            }
            match self.cursor.peek(lookahead) {
                Some('"') | Some('\'') => Token::new(TokenKind::Function("url".into()), loc),
                _ => self.consume_url_token(loc),
            }
        } else if self.cursor.peek(0) == Some('(') {
            self.cursor.advance();
            Token::new(TokenKind::Function(name), loc)
        } else {
            Token::new(TokenKind::Ident(name), loc)
        }
    }

    fn consume_url_token(&mut self, loc: Location) -> Token {
        let mut value = String::new();
        while matches!(self.cursor.peek(0), Some(c) if is_whitespace(c)) {
            self.cursor.advance();
        }
        loop {
            match self.cursor.peek(0) {
                None => break,
                Some(')') => {
                    self.cursor.advance();
                    break;
                }
                Some(c) if is_whitespace(c) => {
                    while matches!(self.cursor.peek(0), Some(c) if is_whitespace(c)) {
                        self.cursor.advance();
                    }
                    match self.cursor.peek(0) {
                        Some(')') | None => {
                            self.cursor.advance();
                            break;
                        }
                        _ => return self.consume_bad_url(loc),
                    }
                }
                Some('"') | Some('\'') | Some('(') => return self.consume_bad_url(loc),
                Some(c) if is_non_printable(c) => return self.consume_bad_url(loc),
                Some('\\') => {
                    if self.is_start_of_escape(0) {
                        self.cursor.advance();
                        value.push(self.consume_escaped_codepoint());
                    } else {
                        return self.consume_bad_url(loc);
                    }
                }
                Some(c) => {
                    value.push(c);
                    self.cursor.advance();
                }
            }
        }
        Token::new(TokenKind::Url(value), loc)
    }

    fn consume_bad_url(&mut self, loc: Location) -> Token {
        loop {
            match self.cursor.peek(0) {
                None => break,
                Some(')') => {
                    self.cursor.advance();
                    break;
                }
                Some('\\') if self.is_start_of_escape(0) => {
                    self.cursor.advance();
                    self.consume_escaped_codepoint();
                }
                Some(_) => {
                    self.cursor.advance();
                }
            }
        }
        Token::new(TokenKind::BadUrl, loc)
    }

    fn consume_ident(&mut self) -> String {
        let mut value = String::new();
        loop {
            match self.cursor.peek(0) {
                Some(c) if is_ident_char(c) => {
                    value.push(c);
                    self.cursor.advance();
                }
                Some('\\') if self.is_start_of_escape(0) => {
                    self.cursor.advance();
                    value.push(self.consume_escaped_codepoint());
                }
                _ => break,
            }
        }
        value
    }

    /// Consume one escaped codepoint after the leading `\` has already been consumed.
    fn consume_escaped_codepoint(&mut self) -> char {
        match self.cursor.peek(0) {
            None => REPLACEMENT_CHARACTER,
            Some(c) if c.is_ascii_hexdigit() => {
                let mut hex = String::new();
                for _ in 0..6 {
                    match self.cursor.peek(0) {
                        Some(c) if c.is_ascii_hexdigit() => {
                            hex.push(c);
                            self.cursor.advance();
                        }
                        _ => break,
                    }
                }
                if matches!(self.cursor.peek(0), Some(c) if is_whitespace(c)) {
                    self.cursor.advance();
                }
                #[allow(clippy::expect_used)]
                let code = u32::from_str_radix(&hex, 16).expect("hex digits only");
                if code == 0 || code > 0x10FFFF || (0xD800..=0xDFFF).contains(&code) {
                    REPLACEMENT_CHARACTER
                } else {
                    char::from_u32(code).unwrap_or(REPLACEMENT_CHARACTER)
                }
            }
            Some(c) => {
                self.cursor.advance();
                c
            }
        }
    }

    fn is_start_of_escape(&self, offset: usize) -> bool {
        self.cursor.peek(offset) == Some('\\') && self.cursor.peek(offset + 1) != Some('\n')
            && self.cursor.peek(offset + 1).is_some()
    }

    fn is_ident_char_at(&self, offset: usize) -> bool {
        matches!(self.cursor.peek(offset), Some(c) if is_ident_char(c))
    }

    /// Check whether the three code points starting at the current position would start an
    /// ident sequence, per CSS Syntax 3 §4.3.9.
    fn starts_ident_sequence(&self) -> bool {
        match self.cursor.peek(0) {
            Some('-') => match self.cursor.peek(1) {
                Some(c) if is_ident_start(c) || c == '-' => true,
                Some('\\') => self.is_start_of_escape(1),
                _ => false,
            },
            Some(c) if is_ident_start(c) => true,
            Some('\\') => self.is_start_of_escape(0),
            _ => false,
        }
    }

    /// Check whether the input at the current position is `u+`/`U+` followed by a hex digit
    /// or `?`, per CSS Syntax 3 §4.3.9's unicode-range note. This must be checked before the
    /// ident-like dispatch, and before `+` is allowed to fall into a numeric token, since
    /// `u+0025` would otherwise tokenize as `Ident("u")` followed by `Number{representation:
    /// "+0025"}` with no trace of the unicode-range microsyntax left in the token stream.
    fn starts_unicode_range(&self) -> bool {
        matches!(self.cursor.peek(0), Some('u') | Some('U'))
            && self.cursor.peek(1) == Some('+')
            && matches!(self.cursor.peek(2), Some(c) if c.is_ascii_hexdigit() || c == '?')
    }

    /// Consume a `<unicode-range-token>`, CSS Syntax 3 §4.3.9. `u`/`U` and `+` have not yet
    /// been consumed by the caller.
    fn consume_unicode_range_token(&mut self, loc: Location) -> Token {
        let prefix = self.cursor.peek(0).unwrap_or('u');
        self.cursor.advance_n(2);
        let mut body = String::new();
        while body.len() < 6 {
            match self.cursor.peek(0) {
                Some(c) if c.is_ascii_hexdigit() || c == '?' => {
                    body.push(c);
                    self.cursor.advance();
                }
                _ => break,
            }
        }
        if !body.contains('?')
            && self.cursor.peek(0) == Some('-')
            && self.cursor.peek(1).is_some_and(|c| c.is_ascii_hexdigit())
        {
            body.push('-');
            self.cursor.advance();
            let mut end_len = 0;
            while end_len < 6 {
                match self.cursor.peek(0) {
                    Some(c) if c.is_ascii_hexdigit() => {
                        body.push(c);
                        self.cursor.advance();
                        end_len += 1;
                    }
                    _ => break,
                }
            }
        }
        match parse_unicode_range(&body) {
            Some((start, end)) => Token::new(TokenKind::UnicodeRange { start, end }, loc),
            None => Token::new(TokenKind::Ident(format!("{prefix}+{body}")), loc),
        }
    }

    /// Check whether the input at the current position would start a number, per
    /// CSS Syntax 3 §4.3.10.
    fn starts_number(&self) -> bool {
        match self.cursor.peek(0) {
            Some('+') | Some('-') => match self.cursor.peek(1) {
                Some(c) if c.is_ascii_digit() => true,
                Some('.') => self.cursor.peek(2).is_some_and(|c| c.is_ascii_digit()),
                _ => false,
            },
            Some('.') => self.cursor.peek(1).is_some_and(|c| c.is_ascii_digit()),
            Some(c) => c.is_ascii_digit(),
            None => false,
        }
    }
}

fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n')
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || !c.is_ascii()
}

fn is_ident_char(c: char) -> bool {
    is_ident_start(c) || c.is_ascii_digit() || c == '-'
}

fn is_non_printable(c: char) -> bool {
    matches!(c, '\u{0}'..='\u{8}' | '\u{b}' | '\u{e}'..='\u{1f}' | '\u{7f}')
}

/// Parse a CSS `<unicode-range-token>` body (the part after `u+`/`U+`, already collected by
/// [`Tokenizer::consume_unicode_range_token`]) into `(start, end)`.
pub fn parse_unicode_range(body: &str) -> Option<(u32, u32)> {
    let body = body.trim();
    if let Some((start, end)) = body.split_once('-') {
        if start.chars().all(|c| c.is_ascii_hexdigit()) && end.chars().all(|c| c.is_ascii_hexdigit())
        {
            let start = u32::from_str_radix(start, 16).ok()?;
            let end = u32::from_str_radix(end, 16).ok()?;
            return Some((start, end));
        }
        return None;
    }
    if body.chars().all(|c| c.is_ascii_hexdigit() || c == '?') && !body.is_empty() {
        let digits = body.chars().count();
        if digits > 6 {
            return None;
        }
        let wildcards = body.chars().filter(|&c| c == '?').count();
        let fixed: String = body.chars().take_while(|&c| c != '?').collect();
        if body[fixed.len()..].chars().any(|c| c != '?') {
            return None;
        }
        let start_str = format!("{fixed}{}", "0".repeat(wildcards));
        let end_str = format!("{fixed}{}", "F".repeat(wildcards));
        let start = u32::from_str_radix(&start_str, 16).ok()?;
        let end = u32::from_str_radix(&end_str, 16).ok()?;
        return Some((start, end));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        Tokenizer::new(source).tokenize_all().into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn tokenizes_basic_rule() {
        let k = kinds("a { color: red; }");
        assert_eq!(
            k,
            vec![
                TokenKind::Ident("a".into()),
                TokenKind::Whitespace(" ".into()),
                TokenKind::LCurly,
                TokenKind::Whitespace(" ".into()),
                TokenKind::Ident("color".into()),
                TokenKind::Colon,
                TokenKind::Whitespace(" ".into()),
                TokenKind::Ident("red".into()),
                TokenKind::Semicolon,
                TokenKind::Whitespace(" ".into()),
                TokenKind::RCurly,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn tokenizes_numbers_with_representation() {
        let k = kinds("12.5px -3 +4");
        assert_eq!(
            k[0],
            TokenKind::Dimension {
                value: 12.5,
                int_value: None,
                representation: "12.5".into(),
                unit: "px".into()
            }
        );
        assert_eq!(
            k[2],
            TokenKind::Number { value: -3.0, int_value: Some(-3), representation: "-3".into() }
        );
    }

    #[test]
    fn escapes_decode_in_idents() {
        let k = kinds("\\2D red");
        assert_eq!(k[0], TokenKind::Ident("-red".into()));
    }

    #[test]
    fn bad_string_on_unescaped_newline() {
        let source = "\"abc\ndef\"";
        let k = kinds(source);
        assert_eq!(k[0], TokenKind::BadString);
    }

    #[test]
    fn unquoted_url_token() {
        let k = kinds("url(foo.png)");
        assert_eq!(k[0], TokenKind::Url("foo.png".into()));
    }

    #[test]
    fn quoted_url_becomes_function_token() {
        let k = kinds("url(\"foo.png\")");
        assert_eq!(k[0], TokenKind::Function("url".into()));
    }

    #[test]
    fn cdo_cdc_tokens() {
        let k = kinds("<!-- -->");
        assert_eq!(k[0], TokenKind::Cdo);
        assert_eq!(k[2], TokenKind::Cdc);
    }

    #[test]
    fn hash_identifier_flag() {
        let k = kinds("#foo #123");
        assert_eq!(k[0], TokenKind::Hash { value: "foo".into(), is_identifier: true });
        assert_eq!(k[2], TokenKind::Hash { value: "123".into(), is_identifier: false });
    }

    #[test]
    fn comments_are_preserved_tokens() {
        let k = kinds("a/* comment */b");
        assert_eq!(
            k,
            vec![
                TokenKind::Ident("a".into()),
                TokenKind::Comment(" comment ".into()),
                TokenKind::Ident("b".into()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn unicode_range_body_parses() {
        assert_eq!(parse_unicode_range("26"), Some((0x26, 0x26)));
        assert_eq!(parse_unicode_range("0-7F"), Some((0x0, 0x7F)));
        assert_eq!(parse_unicode_range("0??"), Some((0x000, 0x0FF)));
    }

    #[test]
    fn unicode_range_token_end_to_end() {
        assert_eq!(kinds("U+0025-00FF")[0], TokenKind::UnicodeRange { start: 0x0025, end: 0x00FF });
        assert_eq!(kinds("u+26")[0], TokenKind::UnicodeRange { start: 0x26, end: 0x26 });
        assert_eq!(kinds("U+0??")[0], TokenKind::UnicodeRange { start: 0x000, end: 0x0FF });
    }

    #[test]
    fn crlf_and_nul_are_preprocessed_before_tokenizing() {
        let k = kinds("a\r\n\u{0000}b");
        assert_eq!(
            k,
            vec![
                TokenKind::Ident("a".into()),
                TokenKind::Whitespace("\n".into()),
                TokenKind::Ident("\u{FFFD}b".into()),
                TokenKind::Eof,
            ]
        );
    }
}
