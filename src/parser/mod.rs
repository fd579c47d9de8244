//! Reference grammar for the MySQL dialect
//!
//! A hand-written recursive descent parser over the [`Lexer`] token stream.
//! It covers:
//! - queries: SELECT with joins, grouping, ordering, limits and row locks;
//!   UNION of plain or parenthesized terms
//! - DML: INSERT, REPLACE, UPDATE, DELETE, CALL
//! - DAL / transactions: SET, USE, SHOW, DESCRIBE, START TRANSACTION, COMMIT,
//!   ROLLBACK
//! - DDL: CREATE TABLE / INDEX, ALTER TABLE, DROP, TRUNCATE, RENAME TABLE
//! - stored program bodies: blocks, IF, CASE, loops, DECLARE, cursors,
//!   handlers, SIGNAL and GET DIAGNOSTICS
//!
//! The parser keeps exactly one token of lookahead and asks the lexer for a
//! second one through push-back where the grammar needs it.

use log::debug;

use crate::ast::{Expr, Statement};
use crate::error::Result;
use crate::lexer::{Lexer, Token, TokenKind};

mod clauses;
mod compound;
mod ddl;
mod dml;
mod expressions;
mod functions;
mod other;
mod select;
mod utils;

//=============================================================================
// Parser
//=============================================================================

/// SQL Parser
pub struct Parser {
    pub(super) lexer: Lexer,
    /// Lookahead token
    pub(super) tok: Token,
    /// Primary already parsed by a caller that had to look past a parenthesis
    pub(super) pending_primary: Option<Expr>,
    /// Current parsing context for better error messages
    pub(super) context_stack: Vec<utils::ParserContext>,
}

impl Parser {
    pub fn new(mut lexer: Lexer) -> Result<Self> {
        let tok = lexer.next_token()?;
        Ok(Parser {
            lexer,
            tok,
            pending_primary: None,
            context_stack: Vec::new(),
        })
    }

    /// Parse a SQL string into a statement
    pub fn parse(sql: &str) -> Result<Statement> {
        let mut parser = Parser::new(Lexer::new(sql.as_bytes()))?;
        parser.parse_single()
    }

    /// Parse a SQL string for prepared statement usage.
    /// Returns the statement and the number of parameter markers found.
    pub fn parse_prepared(sql: &str) -> Result<(Statement, u32)> {
        let mut parser = Parser::new(Lexer::new(sql.as_bytes()))?;
        let stmt = parser.parse_single()?;
        Ok((stmt, parser.param_count()))
    }

    /// Number of `?` markers scanned so far
    pub fn param_count(&self) -> u32 {
        self.lexer.param_index()
    }

    /// Exactly one statement, optionally terminated by `;`
    pub fn parse_single(&mut self) -> Result<Statement> {
        let stmt = self.parse_statement()?;
        self.eat(TokenKind::Semicolon)?;
        self.expect_eof()?;
        Ok(stmt)
    }

    /// `;`-separated statements up to the end of input
    pub fn parse_statements(&mut self) -> Result<Vec<Statement>> {
        let mut statements = Vec::new();
        loop {
            while self.eat(TokenKind::Semicolon)? {}
            if self.at(TokenKind::Eof) {
                break;
            }
            statements.push(self.parse_statement()?);
            if !self.at(TokenKind::Eof) {
                self.expect(TokenKind::Semicolon)?;
            }
        }
        debug!("Parsed {} statements", statements.len());
        Ok(statements)
    }

    /// A standalone expression covering the whole input
    pub fn parse_standalone_expression(&mut self) -> Result<Expr> {
        let expr = self.parse_expr()?;
        self.expect_eof()?;
        Ok(expr)
    }

    pub(super) fn parse_statement(&mut self) -> Result<Statement> {
        self.push_context("SQL statement");
        let result = self.parse_statement_impl();
        self.pop_context();
        result
    }

    fn parse_statement_impl(&mut self) -> Result<Statement> {
        if self.tok.kind == TokenKind::Identifier && self.peek2()?.kind == TokenKind::Colon {
            return self.parse_labeled();
        }
        match self.tok.kind {
            TokenKind::Select | TokenKind::LeftParen => Ok(Statement::Select(self.parse_query()?)),
            TokenKind::Insert => self.parse_insert(),
            TokenKind::Replace => self.parse_replace(),
            TokenKind::Update => self.parse_update(),
            TokenKind::Delete => self.parse_delete(),
            TokenKind::Call => self.parse_call(),
            TokenKind::Set => self.parse_set(),
            TokenKind::Use => self.parse_use(),
            TokenKind::Show => self.parse_show(),
            TokenKind::Describe | TokenKind::Desc => self.parse_describe(),
            TokenKind::Create => self.parse_create(),
            TokenKind::Alter => self.parse_alter(),
            TokenKind::Drop => self.parse_drop(),
            TokenKind::Rename => self.parse_rename(),
            TokenKind::Declare => self.parse_declare(),
            TokenKind::If => self.parse_if(),
            TokenKind::Case => self.parse_case_statement(),
            TokenKind::Loop | TokenKind::While | TokenKind::Repeat => self.parse_loop(None),
            TokenKind::Leave => {
                self.advance()?;
                Ok(Statement::Leave(self.identifier()?))
            }
            TokenKind::Iterate => {
                self.advance()?;
                Ok(Statement::Iterate(self.identifier()?))
            }
            TokenKind::Return => {
                self.advance()?;
                Ok(Statement::Return(self.parse_expr()?))
            }
            TokenKind::Fetch => self.parse_fetch(),
            TokenKind::Signal | TokenKind::Resignal => self.parse_signal(),
            TokenKind::Identifier => match self.upper().as_str() {
                "BEGIN" => self.parse_begin(None),
                "START" => self.parse_start_transaction(),
                "COMMIT" => {
                    self.advance()?;
                    self.eat_word("WORK")?;
                    Ok(Statement::Commit)
                }
                "ROLLBACK" => {
                    self.advance()?;
                    self.eat_word("WORK")?;
                    Ok(Statement::Rollback)
                }
                "TRUNCATE" => self.parse_truncate(),
                "OPEN" => {
                    self.advance()?;
                    Ok(Statement::Open(self.identifier()?))
                }
                "CLOSE" => {
                    self.advance()?;
                    Ok(Statement::Close(self.identifier()?))
                }
                "GET" => self.parse_get_diagnostics(),
                _ => Err(self.unexpected("statement")),
            },
            TokenKind::Eof => Err(self.error_with_context(
                "Empty statement or unexpected end of input".to_string(),
            )),
            _ => Err(self.unexpected("statement")),
        }
    }
}

#[cfg(test)]
mod tests;
