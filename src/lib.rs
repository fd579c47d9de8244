//! minisql-parser - a MySQL-dialect SQL front end
//!
//! The crate turns SQL text into a syntax tree and writes trees back out as
//! normalized SQL. It is meant to sit in front of a MySQL-compatible server
//! or proxy that needs to inspect, rewrite or re-bind statements.
//!
//! Architecture Overview:
//! ```text
//!   SQL bytes ──► Lexer (keyword trie, vendor comments, `?` numbering)
//!                   │
//!                   ▼
//!                 Parser (recursive descent, one token of lookahead)
//!                   │
//!                   ▼
//!                 AST ──► Visitor (walks, collectors)
//!                   │
//!                   ▼
//!                 OutputVisitor (normalized SQL + re-ordered arguments)
//! ```

use log::debug;

pub mod ast;
pub mod charset;
pub mod config;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod types;
pub mod visitor;

pub use crate::ast::{Expr, Statement};
pub use crate::charset::Charset;
pub use crate::error::{Result, SqlError};
pub use crate::lexer::Lexer;
pub use crate::parser::Parser;
pub use crate::types::Value;
pub use crate::visitor::{OutputVisitor, Visitor};

/// Parse one statement from UTF-8 text
pub fn parse(sql: &str) -> Result<Statement> {
    debug!("Parsing: {}", sql);
    Parser::parse(sql)
}

/// Parse one statement after encoding `sql` in `charset`
pub fn parse_with_charset(sql: &str, charset: Charset) -> Result<Statement> {
    let bytes = charset.encode(sql)?;
    parse_bytes(&bytes, charset)
}

/// Parse one statement from bytes already in `charset`
pub fn parse_bytes(input: &[u8], charset: Charset) -> Result<Statement> {
    debug!("Parsing {} bytes ({})", input.len(), charset);
    let mut parser = Parser::new(Lexer::with_charset(input, charset))?;
    parser.parse_single()
}

/// Parse one statement and count its `?` markers
pub fn parse_prepared(sql: &str) -> Result<(Statement, u32)> {
    debug!("Preparing: {}", sql);
    Parser::parse_prepared(sql)
}

/// Parse `;`-separated statements
pub fn parse_script(sql: &str) -> Result<Vec<Statement>> {
    let mut parser = Parser::new(Lexer::new(sql.as_bytes()))?;
    parser.parse_statements()
}

/// Parse a standalone expression
pub fn parse_expression(sql: &str) -> Result<Expr> {
    let mut parser = Parser::new(Lexer::new(sql.as_bytes()))?;
    parser.parse_standalone_expression()
}

/// Normalized SQL text of a statement
pub fn regenerate(stmt: &Statement) -> String {
    let mut out = OutputVisitor::new(String::new(), &[]);
    out.visit_statement(stmt);
    out.into_sql()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regenerate_normalizes_spacing() {
        let stmt = parse("select a+b*c from t where x=1").unwrap();
        assert_eq!(regenerate(&stmt), "SELECT a + b * c FROM t WHERE x = 1");
    }

    #[test]
    fn test_parse_prepared_counts_markers() {
        let (_, count) = parse_prepared("UPDATE t SET a = ? WHERE id = ?").unwrap();
        assert_eq!(count, 2);
    }

    #[test]
    fn test_parse_latin1_bytes() {
        let stmt = parse_bytes(b"SELECT '\xe9t\xe9'", Charset::Latin1).unwrap();
        assert_eq!(regenerate(&stmt), "SELECT 'été'");
    }

    #[test]
    fn test_parse_script() {
        let statements = parse_script("USE db; SELECT 1;").unwrap();
        assert_eq!(statements.len(), 2);
    }
}
