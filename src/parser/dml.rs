use crate::ast::*;
use crate::error::Result;
use crate::lexer::TokenKind;

use super::Parser;

impl Parser {
    /// Parse INSERT statement
    pub(super) fn parse_insert(&mut self) -> Result<Statement> {
        self.push_context("INSERT statement");
        let result = self.parse_insert_impl(TokenKind::Insert);
        self.pop_context();
        result.map(Statement::Insert)
    }

    /// Parse REPLACE statement; same shape as INSERT without ON DUPLICATE KEY UPDATE
    pub(super) fn parse_replace(&mut self) -> Result<Statement> {
        self.push_context("REPLACE statement");
        let result = self.parse_insert_impl(TokenKind::Replace);
        self.pop_context();
        result.map(Statement::Replace)
    }

    fn parse_insert_impl(&mut self, keyword: TokenKind) -> Result<InsertStmt> {
        self.expect(keyword)?;

        let priority = match self.tok.kind {
            TokenKind::LowPriority => Some(InsertPriority::LowPriority),
            TokenKind::Delayed => Some(InsertPriority::Delayed),
            TokenKind::HighPriority if keyword == TokenKind::Insert => {
                Some(InsertPriority::HighPriority)
            }
            _ => None,
        };
        if priority.is_some() {
            self.advance()?;
        }
        let ignore = keyword == TokenKind::Insert && self.eat(TokenKind::Ignore)?;
        self.eat(TokenKind::Into)?;
        let table = self.parse_identifier_chain(false)?;

        let mut columns = Vec::new();
        if self.at(TokenKind::LeftParen) && self.peek2()?.kind != TokenKind::Select {
            self.advance()?;
            if !self.at(TokenKind::RightParen) {
                loop {
                    columns.push(self.parse_identifier_chain(false)?);
                    if !self.eat(TokenKind::Comma)? {
                        break;
                    }
                }
            }
            self.expect(TokenKind::RightParen)?;
        }

        let source = if self.eat(TokenKind::Values)? || self.eat_word("VALUE")? {
            InsertSource::Values(self.parse_value_rows()?)
        } else if self.eat(TokenKind::Set)? {
            InsertSource::Set(self.parse_assignments()?)
        } else if self.at(TokenKind::Select) || self.at(TokenKind::LeftParen) {
            InsertSource::Query(Box::new(self.parse_query()?))
        } else {
            return Err(self.unexpected("VALUES, SET or SELECT"));
        };

        let mut on_duplicate = Vec::new();
        if keyword == TokenKind::Insert && self.at(TokenKind::On) {
            self.advance()?;
            self.expect_word("DUPLICATE")?;
            self.expect(TokenKind::Key)?;
            self.expect(TokenKind::Update)?;
            on_duplicate = self.parse_assignments()?;
        }

        Ok(InsertStmt { priority, ignore, table, columns, source, on_duplicate })
    }

    /// `(a, b), (c, d), ..`; a row may be empty
    fn parse_value_rows(&mut self) -> Result<Vec<Vec<Expr>>> {
        self.push_context("VALUES list");
        let result = self.parse_value_rows_impl();
        self.pop_context();
        result
    }

    fn parse_value_rows_impl(&mut self) -> Result<Vec<Vec<Expr>>> {
        let mut rows = Vec::new();
        loop {
            self.expect(TokenKind::LeftParen)?;
            let row = if self.at(TokenKind::RightParen) {
                Vec::new()
            } else {
                self.parse_expr_list()?
            };
            self.expect(TokenKind::RightParen)?;
            rows.push(row);
            if !self.eat(TokenKind::Comma)? {
                break;
            }
        }
        Ok(rows)
    }

    /// `col = expr, ..`
    pub(super) fn parse_assignments(&mut self) -> Result<Vec<Assignment>> {
        let mut assignments = Vec::new();
        loop {
            let column = self.parse_identifier_chain(false)?;
            self.expect(TokenKind::Equal)?;
            let value = self.parse_expr()?;
            assignments.push(Assignment { column, value });
            if !self.eat(TokenKind::Comma)? {
                break;
            }
        }
        Ok(assignments)
    }

    /// Parse UPDATE statement
    pub(super) fn parse_update(&mut self) -> Result<Statement> {
        self.push_context("UPDATE statement");
        let result = self.parse_update_impl();
        self.pop_context();
        result.map(Statement::Update)
    }

    fn parse_update_impl(&mut self) -> Result<UpdateStmt> {
        self.expect(TokenKind::Update)?;
        let low_priority = self.eat(TokenKind::LowPriority)?;
        let ignore = self.eat(TokenKind::Ignore)?;
        let tables = self.parse_table_references()?;
        self.expect(TokenKind::Set)?;
        let assignments = self.parse_assignments()?;
        let where_clause = self.parse_where_clause()?;
        let order_by = self.parse_order_by_clause()?;
        let limit = self.parse_limit_clause()?;
        Ok(UpdateStmt { low_priority, ignore, tables, assignments, where_clause, order_by, limit })
    }

    /// Parse DELETE statement
    pub(super) fn parse_delete(&mut self) -> Result<Statement> {
        self.push_context("DELETE statement");
        let result = self.parse_delete_impl();
        self.pop_context();
        result.map(Statement::Delete)
    }

    fn parse_delete_impl(&mut self) -> Result<DeleteStmt> {
        self.expect(TokenKind::Delete)?;
        let low_priority = self.eat(TokenKind::LowPriority)?;
        let quick = self.eat_word("QUICK")?;
        let ignore = self.eat(TokenKind::Ignore)?;

        let mut targets = Vec::new();
        let mut using = false;
        let from;
        if self.eat(TokenKind::From)? {
            let tables = self.parse_table_references()?;
            if self.eat(TokenKind::Using)? {
                targets = self.delete_targets(tables)?;
                using = true;
                from = self.parse_table_references()?;
            } else {
                from = tables;
            }
        } else {
            loop {
                targets.push(self.parse_identifier_chain(true)?);
                if !self.eat(TokenKind::Comma)? {
                    break;
                }
            }
            self.expect(TokenKind::From)?;
            from = self.parse_table_references()?;
        }

        let where_clause = self.parse_where_clause()?;
        let (order_by, limit) = if targets.is_empty() {
            (self.parse_order_by_clause()?, self.parse_limit_clause()?)
        } else {
            (Vec::new(), None)
        };
        Ok(DeleteStmt {
            low_priority,
            quick,
            ignore,
            targets,
            from,
            using,
            where_clause,
            order_by,
            limit,
        })
    }

    /// Tables named before USING; only plain names are allowed there
    fn delete_targets(&self, tables: Vec<TableRef>) -> Result<Vec<Identifier>> {
        tables
            .into_iter()
            .map(|table| match table {
                TableRef::Factor(TableFactor { name, alias: None, hints }) if hints.is_empty() => {
                    Ok(name)
                }
                _ => Err(self.error_with_context("Expected table name before USING".to_string())),
            })
            .collect()
    }

    /// `CALL name[(args)]`
    pub(super) fn parse_call(&mut self) -> Result<Statement> {
        self.expect(TokenKind::Call)?;
        let name = self.parse_identifier_chain(false)?;
        let mut args = Vec::new();
        if self.eat(TokenKind::LeftParen)? {
            if !self.at(TokenKind::RightParen) {
                args = self.parse_expr_list()?;
            }
            self.expect(TokenKind::RightParen)?;
        }
        Ok(Statement::Call { name, args })
    }
}
