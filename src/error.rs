//! Error types for the SQL front end
//!
//! Defines a unified error type for lexing, parsing, charset conversion and
//! configuration. Lexical and syntax errors carry the byte offset of the
//! failure and a short window of the surrounding source text so that
//! diagnostics look the same regardless of which layer raised them.

use std::fmt;
use std::io;

/// Bytes of source text shown before the failure offset
const WINDOW_BEFORE: usize = 12;
/// Bytes of source text shown from the failure offset onwards
const WINDOW_AFTER: usize = 13;

/// Extract the diagnostic window around `offset`.
///
/// The window spans roughly 25 bytes centered on the offset and is decoded
/// lossily, so a window boundary falling inside a multi-byte character never
/// fails.
pub fn source_window(source: &[u8], offset: usize) -> String {
    let offset = offset.min(source.len());
    let start = offset.saturating_sub(WINDOW_BEFORE);
    let end = (offset + WINDOW_AFTER).min(source.len());
    String::from_utf8_lossy(&source[start..end]).trim_end().to_string()
}

/// What went wrong while scanning
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexicalErrorKind {
    /// String literal without a closing quote
    UnterminatedString,
    /// Back-tick identifier without a closing back-tick
    UnterminatedIdentifier,
    /// `/* ...` without `*/`
    UnterminatedComment,
    /// `${name` without `}`
    UnterminatedPlaceholder,
    /// Malformed `x'..'` literal
    InvalidHexLiteral,
    /// Malformed `b'..'` literal
    InvalidBitLiteral,
    /// `@` not followed by a variable name
    InvalidVariable,
    /// Byte that does not start any token
    UnexpectedCharacter(u8),
}

impl fmt::Display for LexicalErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LexicalErrorKind::UnterminatedString => write!(f, "unterminated string literal"),
            LexicalErrorKind::UnterminatedIdentifier => write!(f, "unterminated quoted identifier"),
            LexicalErrorKind::UnterminatedComment => write!(f, "unterminated block comment"),
            LexicalErrorKind::UnterminatedPlaceholder => write!(f, "unterminated placeholder"),
            LexicalErrorKind::InvalidHexLiteral => write!(f, "invalid hexadecimal literal"),
            LexicalErrorKind::InvalidBitLiteral => write!(f, "invalid bit-field literal"),
            LexicalErrorKind::InvalidVariable => write!(f, "invalid variable name"),
            LexicalErrorKind::UnexpectedCharacter(b) if b.is_ascii_graphic() => {
                write!(f, "unexpected character '{}'", *b as char)
            }
            LexicalErrorKind::UnexpectedCharacter(b) => {
                write!(f, "unexpected character 0x{:02x}", b)
            }
        }
    }
}

/// A failure raised by the lexer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexicalError {
    pub kind: LexicalErrorKind,
    /// Byte offset of the offending token start
    pub offset: usize,
    /// Source text around the offset
    pub near: String,
}

/// A failure raised by a grammar parser
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    pub message: String,
    pub offset: usize,
    pub near: String,
}

impl SyntaxError {
    pub fn new(message: impl Into<String>, source: &[u8], offset: usize) -> Self {
        Self {
            message: message.into(),
            offset,
            near: source_window(source, offset),
        }
    }
}

/// Unified error type for parser operations
#[derive(Debug)]
pub enum SqlError {
    /// Malformed token
    Lexical(LexicalError),
    /// Unexpected token shape
    Syntax(SyntaxError),
    /// Text cannot be represented in the requested charset
    Charset(String),
    /// Invalid configuration
    Config(String),
    /// I/O error (config files, CLI input)
    Io(io::Error),
}

impl SqlError {
    /// Create a lexical error with its diagnostic window
    pub fn lexical(kind: LexicalErrorKind, source: &[u8], offset: usize) -> Self {
        SqlError::Lexical(LexicalError {
            kind,
            offset,
            near: source_window(source, offset),
        })
    }

    /// Create a syntax error with its diagnostic window
    pub fn syntax(message: impl Into<String>, source: &[u8], offset: usize) -> Self {
        SqlError::Syntax(SyntaxError::new(message, source, offset))
    }

    /// Byte offset of the failure, when the error came from the source text
    pub fn offset(&self) -> Option<usize> {
        match self {
            SqlError::Lexical(e) => Some(e.offset),
            SqlError::Syntax(e) => Some(e.offset),
            _ => None,
        }
    }
}

impl fmt::Display for SqlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlError::Lexical(e) => {
                write!(f, "{} at offset {} near '{}'", e.kind, e.offset, e.near)
            }
            SqlError::Syntax(e) => {
                write!(f, "{} at offset {} near '{}'", e.message, e.offset, e.near)
            }
            SqlError::Charset(msg) => write!(f, "{}", msg),
            SqlError::Config(msg) => write!(f, "{}", msg),
            SqlError::Io(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for SqlError {}

impl From<io::Error> for SqlError {
    fn from(e: io::Error) -> Self {
        SqlError::Io(e)
    }
}

impl From<serde_json::Error> for SqlError {
    fn from(e: serde_json::Error) -> Self {
        SqlError::Config(e.to_string())
    }
}

/// Result type alias for parser operations
pub type Result<T> = std::result::Result<T, SqlError>;

/// MySQL error codes (subset relevant to the front end)
#[allow(dead_code)]
pub mod mysql_error_codes {
    pub const ER_PARSE_ERROR: u16 = 1064;
    pub const ER_UNKNOWN_CHARACTER_SET: u16 = 1115;
    pub const ER_UNKNOWN_ERROR: u16 = 1105;
}

impl SqlError {
    /// Get the MySQL error code for this error
    pub fn mysql_error_code(&self) -> u16 {
        match self {
            SqlError::Lexical(_) | SqlError::Syntax(_) => mysql_error_codes::ER_PARSE_ERROR,
            SqlError::Charset(_) => mysql_error_codes::ER_UNKNOWN_CHARACTER_SET,
            _ => mysql_error_codes::ER_UNKNOWN_ERROR,
        }
    }

    /// Get the SQL state for this error
    pub fn sql_state(&self) -> &'static str {
        match self {
            SqlError::Lexical(_) | SqlError::Syntax(_) => "42000",
            _ => "HY000",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_is_centered() {
        let sql = b"SELECT a, b, c FROM some_table WHERE id = 1";
        let window = source_window(sql, 20);
        assert_eq!(window, ", b, c FROM some_table WH");
    }

    #[test]
    fn test_window_clamps_at_edges() {
        assert_eq!(source_window(b"SELECT", 0), "SELECT");
        assert_eq!(source_window(b"SELECT", 100), "SELECT");
    }

    #[test]
    fn test_display_embeds_window() {
        let err = SqlError::syntax("Unexpected token", b"SELECT FROM", 7);
        assert_eq!(err.to_string(), "Unexpected token at offset 7 near 'SELECT FROM'");
        assert_eq!(err.mysql_error_code(), 1064);
        assert_eq!(err.sql_state(), "42000");
    }
}
