use crate::ast::*;
use crate::error::Result;
use crate::lexer::TokenKind;

use super::Parser;

impl Parser {
    /// Parse an optional WHERE clause
    pub(super) fn parse_where_clause(&mut self) -> Result<Option<Expr>> {
        if !self.eat(TokenKind::Where)? {
            return Ok(None);
        }
        self.push_context("WHERE clause");
        let result = self.parse_expr();
        self.pop_context();
        Ok(Some(result?))
    }

    /// Parse an optional ORDER BY clause
    pub(super) fn parse_order_by_clause(&mut self) -> Result<Vec<OrderByClause>> {
        if !self.at(TokenKind::Order) {
            return Ok(Vec::new());
        }
        self.advance()?;
        self.expect(TokenKind::By)?;
        self.push_context("ORDER BY clause");
        let result = self.parse_order_items();
        self.pop_context();
        result
    }

    /// `expr [ASC|DESC], ..`
    pub(super) fn parse_order_items(&mut self) -> Result<Vec<OrderByClause>> {
        let mut items = Vec::new();
        loop {
            let expr = self.parse_expr()?;
            let direction = if self.eat(TokenKind::Desc)? {
                SortOrder::Desc
            } else {
                self.eat(TokenKind::Asc)?;
                SortOrder::Asc
            };
            items.push(OrderByClause { expr, direction });
            if !self.eat(TokenKind::Comma)? {
                break;
            }
        }
        Ok(items)
    }

    /// `LIMIT n`, `LIMIT m, n` or `LIMIT n OFFSET m`
    pub(super) fn parse_limit_clause(&mut self) -> Result<Option<Limit>> {
        if !self.eat(TokenKind::Limit)? {
            return Ok(None);
        }
        self.push_context("LIMIT clause");
        let result = self.parse_limit_impl();
        self.pop_context();
        result.map(Some)
    }

    fn parse_limit_impl(&mut self) -> Result<Limit> {
        let first = self.parse_limit_value()?;
        if self.eat(TokenKind::Comma)? {
            let row_count = self.parse_limit_value()?;
            return Ok(Limit { offset: Some(first), row_count });
        }
        if self.eat_word("OFFSET")? {
            let offset = self.parse_limit_value()?;
            return Ok(Limit { offset: Some(offset), row_count: first });
        }
        Ok(Limit { offset: None, row_count: first })
    }

    /// Integer literal or `?`
    fn parse_limit_value(&mut self) -> Result<Expr> {
        match self.tok.kind {
            TokenKind::LiteralInteger | TokenKind::ParamMarker => self.parse_primary(),
            TokenKind::Placeholder => self.parse_primary(),
            _ => Err(self.unexpected("row count")),
        }
    }

    //-------------------------------------------------------------------------
    // Table references
    //-------------------------------------------------------------------------

    /// Comma separated table references
    pub(super) fn parse_table_references(&mut self) -> Result<Vec<TableRef>> {
        self.push_context("table references");
        let result = self.parse_table_references_impl();
        self.pop_context();
        result
    }

    fn parse_table_references_impl(&mut self) -> Result<Vec<TableRef>> {
        let mut tables = vec![self.parse_table_ref()?];
        while self.eat(TokenKind::Comma)? {
            tables.push(self.parse_table_ref()?);
        }
        Ok(tables)
    }

    /// A table factor followed by any number of joins, grouped to the left
    pub(super) fn parse_table_ref(&mut self) -> Result<TableRef> {
        let mut left = self.parse_table_factor()?;
        while let Some(kind) = self.parse_join_kind()? {
            let right = self.parse_table_factor()?;
            let condition = if kind.is_natural() {
                None
            } else if self.eat(TokenKind::On)? {
                Some(JoinCondition::On(self.parse_expr()?))
            } else if self.eat(TokenKind::Using)? {
                Some(JoinCondition::Using(self.parenthesized_identifiers()?))
            } else {
                None
            };
            left = TableRef::join(kind, left, right, condition);
        }
        Ok(left)
    }

    /// Consume a join operator
    fn parse_join_kind(&mut self) -> Result<Option<JoinKind>> {
        let kind = match self.tok.kind {
            TokenKind::Join => JoinKind::Inner,
            TokenKind::Inner => {
                self.advance()?;
                JoinKind::Inner
            }
            TokenKind::Cross => {
                self.advance()?;
                JoinKind::Cross
            }
            TokenKind::StraightJoin => {
                self.advance()?;
                return Ok(Some(JoinKind::Straight));
            }
            TokenKind::Left | TokenKind::Right => {
                let left = self.at(TokenKind::Left);
                self.advance()?;
                self.eat(TokenKind::Outer)?;
                if left { JoinKind::Left } else { JoinKind::Right }
            }
            TokenKind::Natural => {
                self.advance()?;
                let kind = if self.eat(TokenKind::Left)? {
                    JoinKind::NaturalLeft
                } else if self.eat(TokenKind::Right)? {
                    JoinKind::NaturalRight
                } else {
                    JoinKind::Natural
                };
                if kind != JoinKind::Natural {
                    self.eat(TokenKind::Outer)?;
                }
                kind
            }
            _ => return Ok(None),
        };
        self.expect(TokenKind::Join)?;
        Ok(Some(kind))
    }

    /// Named table, derived table or parenthesized join
    fn parse_table_factor(&mut self) -> Result<TableRef> {
        if self.eat(TokenKind::LeftParen)? {
            if self.at(TokenKind::Select) {
                let query = self.parse_query()?;
                self.expect(TokenKind::RightParen)?;
                let alias = match self.parse_alias()? {
                    Some(alias) => alias,
                    None => return Err(self.unexpected("derived table alias")),
                };
                return Ok(TableRef::Subquery { query: Box::new(query), alias });
            }
            let inner = self.parse_table_ref()?;
            self.expect(TokenKind::RightParen)?;
            return Ok(inner);
        }
        let name = self.parse_identifier_chain(false)?;
        let alias = self.parse_alias()?;
        let mut factor = TableFactor { name, alias, hints: Vec::new() };
        while let Some(hint) = self.parse_index_hint()? {
            factor.hints.push(hint);
        }
        Ok(TableRef::Factor(factor))
    }

    /// `{USE|IGNORE|FORCE} {INDEX|KEY} [FOR {JOIN|ORDER BY|GROUP BY}] (names)`
    fn parse_index_hint(&mut self) -> Result<Option<IndexHint>> {
        let kind = match self.tok.kind {
            TokenKind::Use => IndexHintKind::Use,
            TokenKind::Ignore => IndexHintKind::Ignore,
            TokenKind::Force => IndexHintKind::Force,
            _ => return Ok(None),
        };
        if !matches!(self.peek2()?.kind, TokenKind::Index | TokenKind::Key) {
            return Ok(None);
        }
        self.advance()?;
        self.advance()?;
        let scope = if self.eat(TokenKind::For)? {
            match self.tok.kind {
                TokenKind::Join => {
                    self.advance()?;
                    Some(IndexHintScope::Join)
                }
                TokenKind::Order => {
                    self.advance()?;
                    self.expect(TokenKind::By)?;
                    Some(IndexHintScope::OrderBy)
                }
                TokenKind::Group => {
                    self.advance()?;
                    self.expect(TokenKind::By)?;
                    Some(IndexHintScope::GroupBy)
                }
                _ => return Err(self.unexpected("JOIN, ORDER BY or GROUP BY")),
            }
        } else {
            None
        };
        self.expect(TokenKind::LeftParen)?;
        let indexes = if self.at(TokenKind::RightParen) {
            Vec::new()
        } else {
            self.identifier_list()?
        };
        self.expect(TokenKind::RightParen)?;
        Ok(Some(IndexHint { kind, scope, indexes }))
    }
}
