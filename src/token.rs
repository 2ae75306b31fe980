use log::trace;
use serde::Serialize;
use std::borrow::Cow;
use std::fmt;
use std::mem;

/// A half‑open byte range `[start, end)` into the source text.
///
/// Spans are carried by tokens, AST nodes and runtime values so every error
/// can point back at the code that caused it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Smallest span covering both `self` and `other`.
    pub fn to(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// 1‑based `(line, column)` of the span start within `source`.
    ///
    /// Columns count characters, not bytes. Offsets past the end of the
    /// source resolve to the position just after the last character.
    pub fn location(&self, source: &str) -> (usize, usize) {
        let mut line = 1;
        let mut column = 1;

        for (offset, c) in source.char_indices() {
            if offset >= self.start {
                break;
            }

            if c == '\n' {
                line += 1;
                column = 1;
            } else {
                column += 1;
            }
        }

        (line, column)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// The different kinds of tokens recognized by the Eelios scanner.
///
/// Variants without data represent punctuation, operators or keywords.
/// `STRING(String)` carries the unescaped contents and `NUMBER(f64)` the
/// parsed value. Type names such as `Number` or `Array` are plain
/// identifiers; the parser gives them meaning in type position.
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Serialize)]
pub enum TokenType {
    /// '('
    LEFT_PAREN,

    /// ')'
    RIGHT_PAREN,

    /// '['
    LEFT_BRACKET,

    /// ']'
    RIGHT_BRACKET,

    /// ','
    COMMA,

    /// '.'
    DOT,

    /// ':'
    COLON,

    /// '-'
    MINUS,

    /// '+'
    PLUS,

    /// '/'
    SLASH,

    /// '*'
    STAR,

    /// '^'
    CARET,

    /// '%'
    PERCENT,

    /// '&'
    AMPERSAND,

    /// '|'
    PIPE,

    /// '='
    EQUAL,

    /// '!='
    BANG_EQUAL,

    /// '>'
    GREATER,

    /// '>='
    GREATER_EQUAL,

    /// '<'
    LESS,

    /// '<='
    LESS_EQUAL,

    /// '<-'
    LESS_MINUS,

    /// '->'
    MINUS_GREATER,

    /// '=>'
    EQUAL_GREATER,

    /// A user‑defined identifier
    IDENTIFIER,

    /// A string literal (contents without quotes, escapes resolved)
    STRING(String),

    /// A numeric literal
    #[serde(rename = "NUMBER")]
    NUMBER(f64),

    TRUE,
    FALSE,
    AND,
    OR,
    PRINT,
    EVAL,
    EXEC,
    IF,
    THEN,
    ELSE,
    WHILE,
    DO,
    LEN,
    INPUT,
    TO_STRING,
    TO_NUMBER,
    TO_BOOLEAN,
    IS_NUMBER,
    IS_BOOLEAN,

    /// End‑of‑file marker
    EOF,
}

impl TokenType {
    /// Upper‑case variant name without payload, as printed by `tokenize`.
    pub fn name(&self) -> &'static str {
        match self {
            TokenType::LEFT_PAREN => "LEFT_PAREN",
            TokenType::RIGHT_PAREN => "RIGHT_PAREN",
            TokenType::LEFT_BRACKET => "LEFT_BRACKET",
            TokenType::RIGHT_BRACKET => "RIGHT_BRACKET",
            TokenType::COMMA => "COMMA",
            TokenType::DOT => "DOT",
            TokenType::COLON => "COLON",
            TokenType::MINUS => "MINUS",
            TokenType::PLUS => "PLUS",
            TokenType::SLASH => "SLASH",
            TokenType::STAR => "STAR",
            TokenType::CARET => "CARET",
            TokenType::PERCENT => "PERCENT",
            TokenType::AMPERSAND => "AMPERSAND",
            TokenType::PIPE => "PIPE",
            TokenType::EQUAL => "EQUAL",
            TokenType::BANG_EQUAL => "BANG_EQUAL",
            TokenType::GREATER => "GREATER",
            TokenType::GREATER_EQUAL => "GREATER_EQUAL",
            TokenType::LESS => "LESS",
            TokenType::LESS_EQUAL => "LESS_EQUAL",
            TokenType::LESS_MINUS => "LESS_MINUS",
            TokenType::MINUS_GREATER => "MINUS_GREATER",
            TokenType::EQUAL_GREATER => "EQUAL_GREATER",
            TokenType::IDENTIFIER => "IDENTIFIER",
            TokenType::STRING(_) => "STRING",
            TokenType::NUMBER(_) => "NUMBER",
            TokenType::TRUE => "TRUE",
            TokenType::FALSE => "FALSE",
            TokenType::AND => "AND",
            TokenType::OR => "OR",
            TokenType::PRINT => "PRINT",
            TokenType::EVAL => "EVAL",
            TokenType::EXEC => "EXEC",
            TokenType::IF => "IF",
            TokenType::THEN => "THEN",
            TokenType::ELSE => "ELSE",
            TokenType::WHILE => "WHILE",
            TokenType::DO => "DO",
            TokenType::LEN => "LEN",
            TokenType::INPUT => "INPUT",
            TokenType::TO_STRING => "TO_STRING",
            TokenType::TO_NUMBER => "TO_NUMBER",
            TokenType::TO_BOOLEAN => "TO_BOOLEAN",
            TokenType::IS_NUMBER => "IS_NUMBER",
            TokenType::IS_BOOLEAN => "IS_BOOLEAN",
            TokenType::EOF => "EOF",
        }
    }
}

impl PartialEq for TokenType {
    /// Two TokenTypes are equal if they share the same variant
    /// (ignoring any inner data). Uses `mem::discriminant` to compare.
    fn eq(&self, other: &Self) -> bool {
        mem::discriminant(self) == mem::discriminant(other)
    }
}

/// A scanned token, including its type, the original lexeme,
/// its byte span and the line number where it was found.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Token<'a> {
    /// The category of this token.
    pub token_type: TokenType,

    /// The exact substring from the source that produced this token.
    pub lexeme: &'a str,

    /// Byte range of the lexeme in the source.
    pub span: Span,

    /// 1‑based line number in the source.
    pub line: usize,
}

impl<'a> Token<'a> {
    pub fn new(token_type: TokenType, lexeme: &'a str, span: Span, line: usize) -> Self {
        trace!(
            "Creating new token: type={:?}, lexeme={}, span={}",
            token_type,
            lexeme,
            span
        );

        Self {
            token_type,
            lexeme,
            span,
            line,
        }
    }
}

impl<'a> fmt::Display for Token<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let literal: Cow<'_, str> = match &self.token_type {
            TokenType::STRING(s) => Cow::Borrowed(s),
            TokenType::NUMBER(n) => {
                // 3 → "3.0", 3.14 → "3.14"
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    let mut buf = itoa::Buffer::new();
                    Cow::Owned(format!("{}.0", buf.format(*n as i64)))
                } else {
                    Cow::Owned(n.to_string())
                }
            }
            _ => Cow::Borrowed("null"),
        };

        write!(f, "{} {} {}", self.token_type.name(), self.lexeme, literal)
    }
}
