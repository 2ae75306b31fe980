//! Module `scanner` implements a one‑pass, streaming lexer for Eelios source.
//!
//! It transforms a `&str` into a sequence of `Token<'a>`s, skipping whitespace
//! and `#` comments, and emitting exactly one `EOF` token at the end. Designed
//! as a `FusedIterator`, it can be chained safely with other iterator adapters.
//!
//! # Public API
//!
//! - `Scanner::new(src: &'a str) -> Scanner<'a>`
//!   Create a new lexer over the input text.
//!
//! - `impl Iterator for Scanner<'a>`
//!   Yields `Result<Token<'a>, SyntaxError>` on each `.next()`. After an error
//!   the scanner resumes at the next byte, so several errors can be reported
//!   in one pass.
//!
//! # Token Recognition (`scan_token`)
//!
//! - Single‑character tokens: `(`, `)`, `[`, `]`, `,`, `.`, `:`, `+`, `*`,
//!   `/`, `^`, `%`, `&`, `|`.
//! - Two‑character operators: `!=`, `<=`, `>=`, `<-`, `->`, `=>`.
//! - String literals: `"` … `"` on a single line, with `\` escapes.
//! - Numeric literals: integer and optional fractional part.
//! - Identifiers/keywords: alphanumeric/_ sequences, resolved via a
//!   perfect‑hash `KEYWORDS` map.
//!
//! # Example
//!
//! ```rust
//! use eelios::scanner::Scanner;
//!
//! let scanner = Scanner::new("print(123) # example");
//! for result in scanner {
//!     match result {
//!         Ok(token) => println!("{}", token),
//!         Err(err) => eprintln!("Lex error: {}", err),
//!     }
//! }
//! ```

use crate::error::SyntaxError;
use crate::token::{Span, Token, TokenType};
use log::{debug, info};
use memchr::memchr;
use phf::phf_map;
use std::iter::FusedIterator;

type Result<T> = std::result::Result<T, SyntaxError>;

// ─────────────────────────────────────────────────────────────────────────────
// Static keyword map (compile‑time perfect hash)
// ─────────────────────────────────────────────────────────────────────────────

static KEYWORDS: phf::Map<&'static [u8], TokenType> = phf_map! {
    b"and"       => TokenType::AND,
    b"do"        => TokenType::DO,
    b"else"      => TokenType::ELSE,
    b"eval"      => TokenType::EVAL,
    b"exec"      => TokenType::EXEC,
    b"false"     => TokenType::FALSE,
    b"if"        => TokenType::IF,
    b"input"     => TokenType::INPUT,
    b"isBoolean" => TokenType::IS_BOOLEAN,
    b"isNumber"  => TokenType::IS_NUMBER,
    b"len"       => TokenType::LEN,
    b"or"        => TokenType::OR,
    b"print"     => TokenType::PRINT,
    b"then"      => TokenType::THEN,
    b"toBoolean" => TokenType::TO_BOOLEAN,
    b"toNumber"  => TokenType::TO_NUMBER,
    b"toString"  => TokenType::TO_STRING,
    b"true"      => TokenType::TRUE,
    b"while"     => TokenType::WHILE,
};

/// A single pass **scanner / lexer** that converts source text into a
/// sequence of [`Token`]s.  The lifetime `'a` ties every emitted token's
/// `lexeme` slice back to the original source.
pub struct Scanner<'a> {
    src: &'a str,
    bytes: &'a [u8],
    start: usize,               // index of the *first* byte of the current lexeme
    curr: usize,                // index *one past* the last byte examined
    line: usize,                // 1‑based line counter (\n increments)
    pending: Option<TokenType>, // recognised token kind waiting to be emitted
}

impl<'a> Scanner<'a> {
    /// Create a new lexer over `src`.
    #[inline]
    pub fn new(src: &'a str) -> Self {
        info!("Scanner created over {} bytes", src.len());

        Self {
            src,
            bytes: src.as_bytes(),
            start: 0,
            curr: 0,
            line: 1,
            pending: None,
        }
    }

    // ───────────────────────────── primitive helpers ────────────────────────

    #[inline(always)]
    const fn len(&self) -> usize {
        self.bytes.len()
    }

    #[inline(always)]
    fn is_at_end(&self) -> bool {
        self.curr >= self.len()
    }

    /// Advance one byte and return it.  Callers guard with [`is_at_end`].
    #[inline(always)]
    fn advance(&mut self) -> u8 {
        let b = self.bytes[self.curr];
        self.curr += 1;
        b
    }

    /// Peek at the current byte without consuming it.  Returns `0` past EOF.
    #[inline(always)]
    fn peek(&self) -> u8 {
        if self.is_at_end() {
            0
        } else {
            self.bytes[self.curr]
        }
    }

    /// Peek one byte beyond [`peek`].  Safe at EOF.
    #[inline(always)]
    fn peek_next(&self) -> u8 {
        if self.curr + 1 >= self.len() {
            0
        } else {
            self.bytes[self.curr + 1]
        }
    }

    /// Conditionally consume a byte **iff** it matches `expected`.
    #[inline(always)]
    fn match_byte(&mut self, expected: u8) -> bool {
        if !self.is_at_end() && self.peek() == expected {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Pick `double` if the next byte is `second`, else `single`.
    #[inline(always)]
    fn either(&mut self, second: u8, double: TokenType, single: TokenType) -> TokenType {
        if self.match_byte(second) {
            double
        } else {
            single
        }
    }

    #[inline(always)]
    fn span(&self) -> Span {
        Span::new(self.start, self.curr)
    }

    // ───────────────────────────── core lexing ─────────────────────────────

    /// Scan a *single* token starting at `self.curr`.  If the lexeme produces
    /// an actual token the kind is stored in `self.pending`.  Whitespace and
    /// comments are skipped by returning `Ok(())` with `pending = None`.
    fn scan_token(&mut self) -> Result<()> {
        let b = self.advance();

        let tt = match b {
            // ── single‑character punctuators ──────────────────────────────
            b'(' => TokenType::LEFT_PAREN,
            b')' => TokenType::RIGHT_PAREN,
            b'[' => TokenType::LEFT_BRACKET,
            b']' => TokenType::RIGHT_BRACKET,
            b',' => TokenType::COMMA,
            b'.' => TokenType::DOT,
            b':' => TokenType::COLON,
            b'+' => TokenType::PLUS,
            b'*' => TokenType::STAR,
            b'/' => TokenType::SLASH,
            b'^' => TokenType::CARET,
            b'%' => TokenType::PERCENT,
            b'&' => TokenType::AMPERSAND,
            b'|' => TokenType::PIPE,

            // ── one‑or‑two‑character operators ───────────────────────────
            b'-' => self.either(b'>', TokenType::MINUS_GREATER, TokenType::MINUS),
            b'=' => self.either(b'>', TokenType::EQUAL_GREATER, TokenType::EQUAL),
            b'>' => self.either(b'=', TokenType::GREATER_EQUAL, TokenType::GREATER),
            b'<' => {
                if self.match_byte(b'=') {
                    TokenType::LESS_EQUAL
                } else if self.match_byte(b'-') {
                    TokenType::LESS_MINUS
                } else {
                    TokenType::LESS
                }
            }
            b'!' if self.match_byte(b'=') => TokenType::BANG_EQUAL,

            // ── whitespace / newline ─────────────────────────────────────
            b' ' | b'\r' | b'\t' => return Ok(()),

            b'\n' => {
                self.line += 1;
                return Ok(());
            }

            // ── comments (# … until newline) ─────────────────────────────
            b'#' => {
                match memchr(b'\n', &self.bytes[self.curr..]) {
                    Some(pos) => self.curr += pos,
                    None => self.curr = self.len(),
                }
                return Ok(());
            }

            b'"' => return self.parse_string(),

            b'0'..=b'9' => self.parse_number(),

            b'a'..=b'z' | b'A'..=b'Z' | b'_' => self.parse_identifier(),

            // ── unexpected character ─────────────────────────────────────
            _ => {
                // Step over the whole UTF‑8 sequence so later slices stay on
                // character boundaries.
                while !self.is_at_end() && !self.src.is_char_boundary(self.curr) {
                    self.curr += 1;
                }

                let character = self.src[self.start..self.curr]
                    .chars()
                    .next()
                    .unwrap_or(char::REPLACEMENT_CHARACTER);

                debug!("Unexpected character {:?} on line {}", character, self.line);

                return Err(SyntaxError::UnexpectedCharacter {
                    character,
                    span: self.span(),
                });
            }
        };

        self.pending = Some(tt);

        Ok(())
    }

    /// Parse a double‑quoted, single‑line string literal.
    ///
    /// * `self.start` still points to the opening `"`.
    /// * When we return, `self.curr` points **past** the closing `"`.
    fn parse_string(&mut self) -> Result<()> {
        let mut value = String::new();
        let mut segment = self.curr;

        loop {
            if self.is_at_end() || self.peek() == b'\n' {
                debug!("Unterminated string on line {}", self.line);
                return Err(SyntaxError::UnterminatedString { span: self.span() });
            }

            match self.peek() {
                b'"' => break,
                b'\\' => {
                    value.push_str(&self.src[segment..self.curr]);
                    self.advance();

                    if self.is_at_end() || self.peek() == b'\n' {
                        return Err(SyntaxError::UnterminatedString { span: self.span() });
                    }

                    let escaped_start = self.curr;
                    self.advance();
                    while !self.is_at_end() && !self.src.is_char_boundary(self.curr) {
                        self.curr += 1;
                    }

                    match &self.src[escaped_start..self.curr] {
                        "n" => value.push('\n'),
                        "t" => value.push('\t'),
                        other => value.push_str(other),
                    }

                    segment = self.curr;
                }
                _ => {
                    self.advance();
                }
            }
        }

        value.push_str(&self.src[segment..self.curr]);
        self.advance(); // consume closing quote

        self.pending = Some(TokenType::STRING(value));

        Ok(())
    }

    /// Parse a numeric literal (`123`, `3.14`).  Fractions are optional and
    /// need a digit after the dot, so `0.` lexes as `NUMBER DOT`.
    fn parse_number(&mut self) -> TokenType {
        while self.peek().is_ascii_digit() {
            self.advance();
        }

        if self.peek() == b'.' && self.peek_next().is_ascii_digit() {
            self.advance(); // consume "."

            while self.peek().is_ascii_digit() {
                self.advance();
            }
        }

        // Only ASCII digits and one dot were consumed, so parsing cannot fail.
        let n: f64 = self.src[self.start..self.curr].parse().unwrap_or(0.0);

        TokenType::NUMBER(n)
    }

    /// Parse an identifier and decide if it is a **keyword** or a generic
    /// `IDENTIFIER` token.
    fn parse_identifier(&mut self) -> TokenType {
        while {
            let c: u8 = self.peek();
            c.is_ascii_alphanumeric() || c == b'_'
        } {
            self.advance();
        }

        KEYWORDS
            .get(&self.bytes[self.start..self.curr])
            .cloned()
            .unwrap_or(TokenType::IDENTIFIER)
    }
}

// ───────────────────────── Iterator implementation ─────────────────────────

impl<'a> Iterator for Scanner<'a> {
    type Item = Result<Token<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        // Loop until we either emit a token, hit EOF, or see an error.
        while self.curr <= self.len() {
            // 1. EOF guard – emit exactly one EOF then terminate.
            if self.curr == self.len() {
                self.curr += 1; // ensure fused semantics
                let end = self.len();
                return Some(Ok(Token::new(
                    TokenType::EOF,
                    "",
                    Span::new(end, end),
                    self.line,
                )));
            }

            // 2. Reset per‑token state.
            self.start = self.curr;
            self.pending = None;

            // 3. Attempt to scan a token.
            if let Err(e) = self.scan_token() {
                return Some(Err(e));
            }

            // 4. If a real token was recognised, build and return it.
            if let Some(tt) = self.pending.take() {
                let lexeme: &'a str = &self.src[self.start..self.curr];
                debug!("Scanned token ({:?}) on line {}", tt, self.line);

                return Some(Ok(Token::new(tt, lexeme, self.span(), self.line)));
            }
            // Otherwise it was whitespace / comment → continue loop.
        }

        None // already yielded EOF
    }
}

impl<'a> FusedIterator for Scanner<'a> {}
