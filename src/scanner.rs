//! # Scanner
//!
//! Converts a source buffer into a pull-stream of [`Token`]s with line/column
//! provenance. The scanner is UTF-8 aware and never aborts on bad input:
//! malformed lexical forms are reported as [`ScanError`] values, not
//! exceptions, so the compiler can keep scanning and report more than one
//! problem per compile (see [`crate::compiler::Compiler::synchronize`]).
//!
//! ## Design
//! - `scan_token` is pull-based: callers ask for one token at a time. There
//!   is no intermediate token vector.
//! - Whitespace (ASCII and Unicode separators) and `//` line comments are
//!   skipped before each token; newlines advance `line` and reset `column`.
//! - Identifiers may start with an ASCII letter, `_`, or a Unicode letter
//!   drawn from a fixed set of code-point ranges (see [`is_unicode_ident_start`]);
//!   continuation characters additionally allow ASCII digits.
//! - Source bytes are assumed to already be valid UTF-8 (`&str` guarantees
//!   this at the type level). Invalid UTF-8 in the original input is caught
//!   by the caller before scanning begins (see [`crate::cli::read_source`]) and
//!   reported using the same [`ScanErrorKind::InvalidUtf8`] variant, so callers
//!   of the scanner only ever see well-formed `&str` input.

use crate::token::{keyword, Token, TokenKind};

/// The kind of lexical error the scanner can report.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScanErrorKind {
    UnexpectedCharacter,
    UnterminatedString,
    InvalidNumber,
    InvalidUtf8,
}

/// A scan error: a category, a source position, a human message, and
/// (when relevant) the offending code point.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScanError {
    pub kind: ScanErrorKind,
    pub line: u32,
    pub column: u32,
    pub message: String,
    pub codepoint: Option<char>,
}

impl ScanError {
    fn new(kind: ScanErrorKind, line: u32, column: u32, message: impl Into<String>) -> Self {
        ScanError {
            kind,
            line,
            column,
            message: message.into(),
            codepoint: None,
        }
    }

    fn with_codepoint(mut self, c: char) -> Self {
        self.codepoint = Some(c);
        self
    }

    /// Build an `InvalidUtf8` error for bytes that failed UTF-8 validation
    /// before scanning could even begin (see [`crate::cli::read_source`]).
    /// There is no meaningful line/column for a whole-file decode failure.
    pub fn invalid_utf8(message: impl Into<String>) -> Self {
        ScanError::new(ScanErrorKind::InvalidUtf8, 0, 0, message)
    }
}

/// Fixed code-point ranges (beyond ASCII) that may begin or continue an
/// identifier, per `spec.md` §4.1: Latin extended, Greek, Cyrillic, Hebrew,
/// Arabic, CJK basic, Hiragana, Katakana.
fn is_unicode_ident_start(c: char) -> bool {
    matches!(c as u32,
        0x00C0..=0x024F   // Latin-1 Supplement letters + Latin Extended-A/B
        | 0x0370..=0x03FF // Greek and Coptic
        | 0x0400..=0x04FF // Cyrillic
        | 0x0590..=0x05FF // Hebrew
        | 0x0600..=0x06FF // Arabic
        | 0x4E00..=0x9FFF // CJK Unified Ideographs (basic)
        | 0x3040..=0x309F // Hiragana
        | 0x30A0..=0x30FF // Katakana
    )
}

fn is_ident_start(c: char) -> bool {
    c == '_' || c.is_ascii_alphabetic() || is_unicode_ident_start(c)
}

fn is_ident_continue(c: char) -> bool {
    is_ident_start(c) || c.is_ascii_digit()
}

/// Pull-based lexical scanner over a source buffer.
///
/// The scanner walks `source` byte offset by byte offset (always on UTF-8
/// character boundaries; `source` is a `&str`, so the type system already
/// guarantees this). `start` marks the beginning of the token currently being
/// scanned; `current` is the scan position. `line`/`column` describe the
/// position of `current`.
pub struct Scanner<'src> {
    source: &'src str,
    start: usize,
    current: usize,
    line: u32,
    column: u32,
}

impl<'src> Scanner<'src> {
    pub fn new(source: &'src str) -> Self {
        Scanner {
            source,
            start: 0,
            current: 0,
            line: 1,
            column: 1,
        }
    }

    fn is_at_end(&self) -> bool {
        self.current >= self.source.len()
    }

    fn rest(&self) -> &'src str {
        &self.source[self.current..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn peek_next(&self) -> Option<char> {
        let mut chars = self.rest().chars();
        chars.next();
        chars.next()
    }

    /// Consume and return the current character, advancing position and
    /// line/column bookkeeping. `\r` is treated as ordinary whitespace and
    /// does not itself affect line/column (callers skip it like any other
    /// space before scanning a token).
    fn advance(&mut self) -> char {
        let c = self.peek().expect("advance called at end of source");
        self.current += c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        c
    }

    fn advance_if(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn lexeme(&self) -> &'src str {
        &self.source[self.start..self.current]
    }

    /// Skip whitespace (ASCII and Unicode separators, `\r` included) and
    /// `//` line comments.
    fn skip_trivia(&mut self) {
        loop {
            match self.peek() {
                Some(c) if c == '\r' || (c.is_whitespace() && c != '\n') => {
                    self.advance();
                }
                Some('\n') => {
                    self.advance();
                }
                Some('/') if self.peek_next() == Some('/') => {
                    while self.peek().map(|c| c != '\n').unwrap_or(false) {
                        self.advance();
                    }
                }
                _ => break,
            }
        }
    }

    fn make(&self, kind: TokenKind, line: u32, column: u32) -> Token<'src> {
        Token::new(kind, self.lexeme(), line, column)
    }

    fn string(&mut self, line: u32, column: u32) -> Result<Token<'src>, ScanError> {
        while self.peek().map(|c| c != '"').unwrap_or(false) {
            self.advance();
        }
        if self.is_at_end() {
            return Err(ScanError::new(
                ScanErrorKind::UnterminatedString,
                line,
                column,
                "Unterminated string.",
            ));
        }
        self.advance(); // closing quote
        // Lexeme excludes the surrounding quotes.
        let inner = &self.source[self.start + 1..self.current - 1];
        Ok(Token::new(TokenKind::String, inner, line, column))
    }

    fn number(&mut self, line: u32, column: u32) -> Result<Token<'src>, ScanError> {
        while self.peek().map(|c| c.is_ascii_digit()).unwrap_or(false) {
            self.advance();
        }
        if self.peek() == Some('.') {
            if self.peek_next().map(|c| c.is_ascii_digit()).unwrap_or(false) {
                self.advance(); // '.'
                while self.peek().map(|c| c.is_ascii_digit()).unwrap_or(false) {
                    self.advance();
                }
            } else {
                // Trailing '.' with no following digit: consume it so the
                // error token's lexeme includes it, then report.
                self.advance();
                return Err(ScanError::new(
                    ScanErrorKind::InvalidNumber,
                    line,
                    column,
                    "Invalid number literal.",
                ));
            }
        }
        Ok(self.make(TokenKind::Number, line, column))
    }

    fn identifier(&mut self, line: u32, column: u32) -> Token<'src> {
        while self.peek().map(is_ident_continue).unwrap_or(false) {
            self.advance();
        }
        let lexeme = self.lexeme();
        let kind = keyword(lexeme).unwrap_or(TokenKind::Identifier);
        self.make(kind, line, column)
    }

    /// Scan and return the next token, or a [`ScanError`] describing why the
    /// input at the current position is not a valid token. Reaching the end
    /// of `source` yields a `TokenKind::Eof` token whose position is the
    /// scanner's current (post-trivia) position.
    pub fn scan_token(&mut self) -> Result<Token<'src>, ScanError> {
        self.skip_trivia();
        self.start = self.current;
        let line = self.line;
        let column = self.column;

        if self.is_at_end() {
            return Ok(self.make(TokenKind::Eof, line, column));
        }

        let c = self.advance();

        if is_ident_start(c) {
            return Ok(self.identifier(line, column));
        }
        if c.is_ascii_digit() {
            return self.number(line, column);
        }

        let kind = match c {
            '(' => TokenKind::LeftParen,
            ')' => TokenKind::RightParen,
            '{' => TokenKind::LeftBrace,
            '}' => TokenKind::RightBrace,
            ',' => TokenKind::Comma,
            '.' => TokenKind::Dot,
            ';' => TokenKind::Semicolon,
            '-' => {
                if self.advance_if('=') {
                    TokenKind::MinusEqual
                } else {
                    TokenKind::Minus
                }
            }
            '+' => {
                if self.advance_if('=') {
                    TokenKind::PlusEqual
                } else {
                    TokenKind::Plus
                }
            }
            '*' => {
                if self.advance_if('=') {
                    TokenKind::StarEqual
                } else {
                    TokenKind::Star
                }
            }
            '/' => {
                if self.advance_if('=') {
                    TokenKind::SlashEqual
                } else {
                    TokenKind::Slash
                }
            }
            '!' => {
                if self.advance_if('=') {
                    TokenKind::BangEqual
                } else {
                    TokenKind::Bang
                }
            }
            '=' => {
                if self.advance_if('=') {
                    TokenKind::EqualEqual
                } else {
                    TokenKind::Equal
                }
            }
            '<' => {
                if self.advance_if('=') {
                    TokenKind::LessEqual
                } else {
                    TokenKind::Less
                }
            }
            '>' => {
                if self.advance_if('=') {
                    TokenKind::GreaterEqual
                } else {
                    TokenKind::Greater
                }
            }
            '"' => return self.string(line, column),
            _ => {
                return Err(ScanError::new(
                    ScanErrorKind::UnexpectedCharacter,
                    line,
                    column,
                    format!("Unexpected character '{}'.", c),
                )
                .with_codepoint(c));
            }
        };

        Ok(self.make(kind, line, column))
    }
}
