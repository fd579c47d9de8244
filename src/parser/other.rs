//! SET, USE, SHOW, DESCRIBE and transaction control

use crate::ast::*;
use crate::error::Result;
use crate::lexer::TokenKind;

use super::Parser;

impl Parser {
    /// Parse SET statement
    pub(super) fn parse_set(&mut self) -> Result<Statement> {
        self.push_context("SET statement");
        let result = self.parse_set_impl();
        self.pop_context();
        result
    }

    fn parse_set_impl(&mut self) -> Result<Statement> {
        self.expect(TokenKind::Set)?;

        if self.at_word("NAMES") && !self.assignment_follows()? {
            self.advance()?;
            let charset = self.name_or_string()?;
            let collation = if self.eat(TokenKind::Collate)? {
                Some(self.name_or_string()?)
            } else {
                None
            };
            return Ok(Statement::SetNames { charset, collation });
        }

        let mut assignments = Vec::new();
        loop {
            let target = self.parse_set_target()?;
            if !self.eat(TokenKind::Equal)? && !self.eat(TokenKind::Assign)? {
                return Err(self.unexpected("'=' or ':='"));
            }
            let value = self.parse_expr()?;
            assignments.push(SetAssignment { target, value });
            if !self.eat(TokenKind::Comma)? {
                break;
            }
        }
        Ok(Statement::Set(assignments))
    }

    fn assignment_follows(&mut self) -> Result<bool> {
        Ok(matches!(self.peek2()?.kind, TokenKind::Equal | TokenKind::Assign))
    }

    /// `@v`, `@@[scope.]v`, `GLOBAL|SESSION|LOCAL v` or a local variable
    pub(super) fn parse_set_target(&mut self) -> Result<Expr> {
        match self.tok.kind {
            TokenKind::UserVariable | TokenKind::SysVariable => self.parse_primary(),
            TokenKind::Identifier => {
                let scope = VariableScope::from_keyword(&self.upper());
                if let Some(scope) = scope {
                    if !self.assignment_follows()? {
                        self.advance()?;
                        let name = self.identifier()?;
                        return Ok(Expr::SysVariable { scope: Some(scope), name });
                    }
                }
                Ok(Expr::Identifier(Identifier::new(self.identifier()?)))
            }
            TokenKind::QuotedIdentifier => {
                Ok(Expr::Identifier(Identifier::quoted(self.identifier()?)))
            }
            _ => Err(self.unexpected("variable")),
        }
    }

    /// `USE db`
    pub(super) fn parse_use(&mut self) -> Result<Statement> {
        self.expect(TokenKind::Use)?;
        Ok(Statement::Use(self.identifier()?))
    }

    /// `SHOW [FULL] TABLES ..` or `SHOW DATABASES ..`
    pub(super) fn parse_show(&mut self) -> Result<Statement> {
        self.push_context("SHOW statement");
        let result = self.parse_show_impl();
        self.pop_context();
        result
    }

    fn parse_show_impl(&mut self) -> Result<Statement> {
        self.expect(TokenKind::Show)?;
        if self.eat(TokenKind::Databases)? || self.eat(TokenKind::Schemas)? {
            let like = self.parse_show_like()?;
            return Ok(Statement::ShowDatabases { like });
        }
        let full = self.eat_word("FULL")?;
        if !self.eat_word("TABLES")? {
            return Err(self.unexpected("TABLES or DATABASES"));
        }
        let database = if self.eat(TokenKind::From)? || self.eat(TokenKind::In)? {
            Some(self.identifier()?)
        } else {
            None
        };
        let like = self.parse_show_like()?;
        Ok(Statement::ShowTables { full, database, like })
    }

    fn parse_show_like(&mut self) -> Result<Option<String>> {
        if self.eat(TokenKind::Like)? {
            Ok(Some(self.string_literal()?))
        } else {
            Ok(None)
        }
    }

    /// `DESCRIBE t` / `DESC t`
    pub(super) fn parse_describe(&mut self) -> Result<Statement> {
        self.advance()?;
        Ok(Statement::Describe(self.parse_identifier_chain(false)?))
    }

    /// `START TRANSACTION`
    pub(super) fn parse_start_transaction(&mut self) -> Result<Statement> {
        self.expect_word("START")?;
        self.expect_word("TRANSACTION")?;
        Ok(Statement::StartTransaction)
    }

    /// `TRUNCATE [TABLE] t`
    pub(super) fn parse_truncate(&mut self) -> Result<Statement> {
        self.expect_word("TRUNCATE")?;
        self.eat(TokenKind::Table)?;
        Ok(Statement::Truncate(self.parse_identifier_chain(false)?))
    }
}
