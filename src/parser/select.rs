use crate::ast::*;
use crate::error::Result;
use crate::lexer::TokenKind;

use super::Parser;

impl Parser {
    /// Query expression: a SELECT or a UNION of SELECT terms
    pub(super) fn parse_query(&mut self) -> Result<Query> {
        self.push_context("query");
        let result = self.parse_query_impl();
        self.pop_context();
        result
    }

    fn parse_query_impl(&mut self) -> Result<Query> {
        let (first, first_parenthesized) = self.parse_query_term()?;
        if !self.at(TokenKind::Union) {
            return Ok(Query::select(first));
        }
        if !first_parenthesized && first.has_trailing_clauses() {
            return Err(self.error_with_context(
                "ORDER BY, LIMIT or locking clause before UNION requires parentheses".to_string(),
            ));
        }

        let mut rest = Vec::new();
        let mut last_parenthesized = first_parenthesized;
        while self.eat(TokenKind::Union)? {
            let kind = if self.eat(TokenKind::All)? {
                UnionKind::All
            } else if self.eat(TokenKind::Distinct)? {
                UnionKind::Distinct
            } else {
                UnionKind::Default
            };
            let (term, parenthesized) = self.parse_query_term()?;
            if !parenthesized && term.has_trailing_clauses() && self.at(TokenKind::Union) {
                return Err(self.error_with_context(
                    "ORDER BY, LIMIT or locking clause before UNION requires parentheses"
                        .to_string(),
                ));
            }
            rest.push((kind, term));
            last_parenthesized = parenthesized;
        }

        let mut union = Union { first, rest, order_by: Vec::new(), limit: None };
        if last_parenthesized {
            union.order_by = self.parse_order_by_clause()?;
            union.limit = self.parse_limit_clause()?;
        } else if let Some((_, last)) = union.rest.last_mut() {
            // A bare last term's ORDER BY / LIMIT belong to the whole union
            union.order_by = std::mem::take(&mut last.order_by);
            union.limit = last.limit.take();
        }
        Ok(Query::Union(Box::new(union)))
    }

    /// A SELECT, possibly parenthesized; the flag reports the parentheses
    fn parse_query_term(&mut self) -> Result<(Select, bool)> {
        if self.eat(TokenKind::LeftParen)? {
            let query = self.parse_query()?;
            self.expect(TokenKind::RightParen)?;
            return match query {
                Query::Select(select) => Ok((*select, true)),
                Query::Union(_) => Err(self.error_with_context(
                    "Nested UNION terms are not supported".to_string(),
                )),
            };
        }
        Ok((self.parse_select()?, false))
    }

    pub(super) fn parse_select(&mut self) -> Result<Select> {
        self.push_context("SELECT statement");
        let result = self.parse_select_impl();
        self.pop_context();
        result
    }

    fn parse_select_impl(&mut self) -> Result<Select> {
        self.expect(TokenKind::Select)?;
        let mut select = Select::default();

        loop {
            match self.tok.kind {
                TokenKind::Distinct | TokenKind::Distinctrow => select.distinct = true,
                TokenKind::All => {}
                _ => match SelectOption::from_keyword(&self.upper()) {
                    Some(option) if self.tok.kind != TokenKind::QuotedIdentifier => {
                        select.options.push(option)
                    }
                    _ => break,
                },
            }
            self.advance()?;
        }

        select.columns = self.parse_select_columns()?;

        if self.eat(TokenKind::From)? {
            if !self.eat(TokenKind::Dual)? {
                select.from = self.parse_table_references()?;
            }
        }
        select.where_clause = self.parse_where_clause()?;
        if self.at(TokenKind::Group) {
            self.advance()?;
            self.expect(TokenKind::By)?;
            select.group_by = self.parse_order_items()?;
            if self.at(TokenKind::With) {
                self.advance()?;
                self.expect_word("ROLLUP")?;
                select.with_rollup = true;
            }
        }
        if self.eat(TokenKind::Having)? {
            select.having = Some(self.parse_expr()?);
        }
        select.order_by = self.parse_order_by_clause()?;
        select.limit = self.parse_limit_clause()?;
        select.lock = self.parse_lock_clause()?;
        Ok(select)
    }

    /// Parse the column list in a SELECT statement
    fn parse_select_columns(&mut self) -> Result<Vec<SelectItem>> {
        self.push_context("column list");
        let result = self.parse_select_columns_impl();
        self.pop_context();
        result
    }

    fn parse_select_columns_impl(&mut self) -> Result<Vec<SelectItem>> {
        let mut columns = Vec::new();
        loop {
            let expr = self.parse_expr()?;
            let alias = self.parse_alias()?;
            columns.push(SelectItem { expr, alias });
            if !self.eat(TokenKind::Comma)? {
                break;
            }
        }
        Ok(columns)
    }

    /// `[AS] alias`
    pub(super) fn parse_alias(&mut self) -> Result<Option<String>> {
        if self.eat(TokenKind::As)? {
            return Ok(Some(self.name_or_string()?));
        }
        if self.at_identifier() {
            return Ok(Some(self.identifier()?));
        }
        Ok(None)
    }

    /// `FOR UPDATE` / `LOCK IN SHARE MODE`
    fn parse_lock_clause(&mut self) -> Result<Option<LockMode>> {
        if self.at(TokenKind::For) && self.peek2()?.kind == TokenKind::Update {
            self.advance()?;
            self.advance()?;
            return Ok(Some(LockMode::ForUpdate));
        }
        if self.eat(TokenKind::Lock)? {
            self.expect(TokenKind::In)?;
            self.expect_word("SHARE")?;
            self.expect_word("MODE")?;
            return Ok(Some(LockMode::ShareMode));
        }
        Ok(None)
    }
}
