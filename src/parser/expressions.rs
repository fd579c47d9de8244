use crate::ast::*;
use crate::error::Result;
use crate::lexer::TokenKind;

use super::Parser;

impl Parser {
    // Expression parsing with operator precedence, lowest level first
    pub(super) fn parse_expr(&mut self) -> Result<Expr> {
        self.parse_assignment()
    }

    /// `a := b := c` groups to the right
    fn parse_assignment(&mut self) -> Result<Expr> {
        let left = self.parse_or()?;
        if self.eat(TokenKind::Assign)? {
            let right = self.parse_assignment()?;
            return Ok(Expr::binary(BinaryOp::Assign, left, right));
        }
        Ok(left)
    }

    fn parse_or(&mut self) -> Result<Expr> {
        let first = self.parse_xor()?;
        if !matches!(self.tok.kind, TokenKind::Or | TokenKind::DoublePipe) {
            return Ok(first);
        }
        let mut operands = vec![first];
        while self.eat(TokenKind::Or)? || self.eat(TokenKind::DoublePipe)? {
            operands.push(self.parse_xor()?);
        }
        Ok(Expr::polyadic(PolyadicOp::Or, operands))
    }

    fn parse_xor(&mut self) -> Result<Expr> {
        let mut left = self.parse_and()?;
        while self.eat(TokenKind::Xor)? {
            let right = self.parse_and()?;
            left = Expr::binary(BinaryOp::Xor, left, right);
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Expr> {
        let first = self.parse_not()?;
        if !matches!(self.tok.kind, TokenKind::And | TokenKind::DoubleAmpersand) {
            return Ok(first);
        }
        let mut operands = vec![first];
        while self.eat(TokenKind::And)? || self.eat(TokenKind::DoubleAmpersand)? {
            operands.push(self.parse_not()?);
        }
        Ok(Expr::polyadic(PolyadicOp::And, operands))
    }

    fn parse_not(&mut self) -> Result<Expr> {
        if self.pending_primary.is_none() && self.eat(TokenKind::Not)? {
            let operand = self.parse_not()?;
            return Ok(Expr::unary(UnaryOp::Not, operand));
        }
        self.parse_comparison()
    }

    fn comparison_op(&self) -> Option<BinaryOp> {
        let op = match self.tok.kind {
            TokenKind::Equal => BinaryOp::Equal,
            TokenKind::NullSafeEqual => BinaryOp::NullSafeEqual,
            TokenKind::NotEqual => BinaryOp::NotEqual,
            TokenKind::Less => BinaryOp::Less,
            TokenKind::LessEqual => BinaryOp::LessEqual,
            TokenKind::Greater => BinaryOp::Greater,
            TokenKind::GreaterEqual => BinaryOp::GreaterEqual,
            _ => return None,
        };
        Some(op)
    }

    fn parse_comparison(&mut self) -> Result<Expr> {
        let mut left = self.parse_predicate()?;
        loop {
            if let Some(op) = self.comparison_op() {
                self.advance()?;
                if let Some(quantifier) = self.quantifier()? {
                    let subquery = self.parse_parenthesized_query()?;
                    left = Expr::Quantified {
                        op,
                        quantifier,
                        left: Box::new(left),
                        subquery: Box::new(subquery),
                    };
                } else {
                    let right = self.parse_predicate()?;
                    left = Expr::binary(op, left, right);
                }
            } else if self.eat(TokenKind::Is)? {
                let not = self.eat(TokenKind::Not)?;
                let test = match self.tok.kind {
                    TokenKind::LiteralNull => IsTest::Null,
                    TokenKind::LiteralTrue => IsTest::True,
                    TokenKind::LiteralFalse => IsTest::False,
                    TokenKind::Identifier if self.at_word("UNKNOWN") => IsTest::Unknown,
                    _ => return Err(self.unexpected("NULL, TRUE, FALSE or UNKNOWN")),
                };
                self.advance()?;
                left = Expr::is(left, not, test);
            } else {
                return Ok(left);
            }
        }
    }

    /// `ANY` / `SOME` / `ALL` directly followed by `(`
    fn quantifier(&mut self) -> Result<Option<Quantifier>> {
        let quantifier = match self.tok.kind {
            TokenKind::All => Quantifier::All,
            TokenKind::Identifier if self.at_word("ANY") => Quantifier::Any,
            TokenKind::Identifier if self.at_word("SOME") => Quantifier::Some,
            _ => return Ok(None),
        };
        if self.peek2()?.kind != TokenKind::LeftParen {
            return Ok(None);
        }
        self.advance()?;
        Ok(Some(quantifier))
    }

    fn parse_predicate(&mut self) -> Result<Expr> {
        let mut left = self.parse_bit_or()?;
        loop {
            let negated = self.at(TokenKind::Not)
                && matches!(
                    self.peek2()?.kind,
                    TokenKind::Like
                        | TokenKind::Regexp
                        | TokenKind::Rlike
                        | TokenKind::Between
                        | TokenKind::In
                );
            if negated {
                self.advance()?;
            }
            left = match self.tok.kind {
                TokenKind::Like => {
                    self.advance()?;
                    let pattern = self.parse_bit_or()?;
                    if self.eat_word("ESCAPE")? {
                        let escape = self.parse_bit_or()?;
                        let op = if negated { TernaryOp::NotLikeEscape } else { TernaryOp::LikeEscape };
                        Expr::ternary(op, left, pattern, escape)
                    } else {
                        let op = if negated { BinaryOp::NotLike } else { BinaryOp::Like };
                        Expr::binary(op, left, pattern)
                    }
                }
                TokenKind::Regexp | TokenKind::Rlike => {
                    self.advance()?;
                    let pattern = self.parse_bit_or()?;
                    let op = if negated { BinaryOp::NotRegexp } else { BinaryOp::Regexp };
                    Expr::binary(op, left, pattern)
                }
                TokenKind::Between => {
                    self.advance()?;
                    let low = self.parse_bit_or()?;
                    self.expect(TokenKind::And)?;
                    let high = self.parse_bit_or()?;
                    let op = if negated { TernaryOp::NotBetween } else { TernaryOp::Between };
                    Expr::ternary(op, left, low, high)
                }
                TokenKind::In => {
                    self.advance()?;
                    let set = self.parse_in_set()?;
                    Expr::In { operand: Box::new(left), not: negated, set }
                }
                _ => return Ok(left),
            };
        }
    }

    /// `(list)` or `(subquery)` after IN
    fn parse_in_set(&mut self) -> Result<InSet> {
        self.push_context("IN list");
        let result = self.parse_in_set_impl();
        self.pop_context();
        result
    }

    fn parse_in_set_impl(&mut self) -> Result<InSet> {
        self.expect(TokenKind::LeftParen)?;
        if self.at(TokenKind::Select) {
            let query = self.parse_query()?;
            self.expect(TokenKind::RightParen)?;
            return Ok(InSet::Subquery(Box::new(query)));
        }
        if self.at(TokenKind::LeftParen) && self.peek2()?.kind == TokenKind::Select {
            match self.parse_query()? {
                query @ Query::Union(_) => {
                    self.expect(TokenKind::RightParen)?;
                    return Ok(InSet::Subquery(Box::new(query)));
                }
                query => self.pending_primary = Some(Expr::subquery(query)),
            }
        }
        let list = self.parse_expr_list()?;
        self.expect(TokenKind::RightParen)?;
        Ok(InSet::List(list))
    }

    pub(super) fn parse_expr_list(&mut self) -> Result<Vec<Expr>> {
        let mut list = vec![self.parse_expr()?];
        while self.eat(TokenKind::Comma)? {
            list.push(self.parse_expr()?);
        }
        Ok(list)
    }

    pub(super) fn parse_bit_or(&mut self) -> Result<Expr> {
        let mut left = self.parse_bit_and()?;
        while self.eat(TokenKind::Pipe)? {
            let right = self.parse_bit_and()?;
            left = Expr::binary(BinaryOp::BitOr, left, right);
        }
        Ok(left)
    }

    fn parse_bit_and(&mut self) -> Result<Expr> {
        let mut left = self.parse_shift()?;
        while self.eat(TokenKind::Ampersand)? {
            let right = self.parse_shift()?;
            left = Expr::binary(BinaryOp::BitAnd, left, right);
        }
        Ok(left)
    }

    fn parse_shift(&mut self) -> Result<Expr> {
        let mut left = self.parse_additive()?;
        loop {
            let op = match self.tok.kind {
                TokenKind::ShiftLeft => BinaryOp::ShiftLeft,
                TokenKind::ShiftRight => BinaryOp::ShiftRight,
                _ => return Ok(left),
            };
            self.advance()?;
            let right = self.parse_additive()?;
            left = Expr::binary(op, left, right);
        }
    }

    fn parse_additive(&mut self) -> Result<Expr> {
        let mut left = self.parse_multiplicative()?;
        loop {
            let op = match self.tok.kind {
                TokenKind::Plus => BinaryOp::Plus,
                TokenKind::Minus => BinaryOp::Minus,
                _ => return Ok(left),
            };
            self.advance()?;
            let right = self.parse_multiplicative()?;
            left = Expr::binary(op, left, right);
        }
    }

    fn parse_multiplicative(&mut self) -> Result<Expr> {
        let mut left = self.parse_bit_xor()?;
        loop {
            let op = match self.tok.kind {
                TokenKind::Star => BinaryOp::Multiply,
                TokenKind::Slash => BinaryOp::Divide,
                TokenKind::Div => BinaryOp::IntDivide,
                TokenKind::Mod | TokenKind::Percent => BinaryOp::Modulo,
                _ => return Ok(left),
            };
            self.advance()?;
            let right = self.parse_bit_xor()?;
            left = Expr::binary(op, left, right);
        }
    }

    fn parse_bit_xor(&mut self) -> Result<Expr> {
        let mut left = self.parse_unary()?;
        while self.eat(TokenKind::Caret)? {
            let right = self.parse_unary()?;
            left = Expr::binary(BinaryOp::BitXor, left, right);
        }
        Ok(left)
    }

    pub(super) fn parse_unary(&mut self) -> Result<Expr> {
        if self.pending_primary.is_some() {
            return self.parse_collate();
        }
        let op = match self.tok.kind {
            TokenKind::Minus => UnaryOp::Minus,
            TokenKind::Tilde => UnaryOp::BitNot,
            TokenKind::Exclamation => UnaryOp::Bang,
            TokenKind::Plus => {
                self.advance()?;
                return self.parse_unary();
            }
            _ => return self.parse_binary_operator(),
        };
        self.advance()?;
        let operand = self.parse_unary()?;
        Ok(Expr::unary(op, operand))
    }

    /// `BINARY expr`
    fn parse_binary_operator(&mut self) -> Result<Expr> {
        if self.eat(TokenKind::Binary)? {
            let operand = self.parse_binary_operator()?;
            return Ok(Expr::unary(UnaryOp::Binary, operand));
        }
        self.parse_collate()
    }

    fn parse_collate(&mut self) -> Result<Expr> {
        let mut expr = self.parse_primary()?;
        while self.eat(TokenKind::Collate)? {
            let collation = self.name_or_string()?;
            expr = Expr::collate(expr, collation);
        }
        Ok(expr)
    }

    //-------------------------------------------------------------------------
    // Primaries
    //-------------------------------------------------------------------------

    pub(super) fn parse_primary(&mut self) -> Result<Expr> {
        if let Some(expr) = self.pending_primary.take() {
            return Ok(expr);
        }
        // keywords that double as function names when a `(` follows
        let next_is_paren = match self.tok.kind {
            TokenKind::Char
            | TokenKind::If
            | TokenKind::Left
            | TokenKind::Right
            | TokenKind::Replace
            | TokenKind::Insert
            | TokenKind::Mod
            | TokenKind::Database
            | TokenKind::Schema
            | TokenKind::Repeat
            | TokenKind::Values => self.peek2()?.kind == TokenKind::LeftParen,
            _ => false,
        };
        match self.tok.kind {
            TokenKind::LiteralNull => {
                self.advance()?;
                Ok(Expr::null())
            }
            TokenKind::LiteralTrue => {
                self.advance()?;
                Ok(Expr::boolean(true))
            }
            TokenKind::LiteralFalse => {
                self.advance()?;
                Ok(Expr::boolean(false))
            }
            TokenKind::LiteralInteger => {
                let value = self.tok.integer_value().unwrap_or_default();
                self.advance()?;
                Ok(Expr::int(value))
            }
            TokenKind::LiteralDecimal => {
                let text = self.tok.decimal_value().unwrap_or_default().to_string();
                self.advance()?;
                Ok(Expr::decimal(text))
            }
            TokenKind::LiteralString => self.parse_string_literal(None, false),
            TokenKind::LiteralNationalString => {
                let mut value = self.string_content();
                self.advance()?;
                if self.at(TokenKind::LiteralString) {
                    value.push_str(&self.string_literal()?);
                }
                Ok(Expr::Literal(Literal::String(StringLiteral {
                    value,
                    introducer: None,
                    national: true,
                })))
            }
            TokenKind::LiteralHex | TokenKind::LiteralBit => {
                let (digits, quoted) = match self.tok.digits() {
                    Some((digits, quoted)) => (String::from_utf8_lossy(digits).into_owned(), quoted),
                    None => (String::new(), false),
                };
                let literal = if self.at(TokenKind::LiteralHex) {
                    Literal::Hex { digits, quoted }
                } else {
                    Literal::Bit { digits, quoted }
                };
                self.advance()?;
                Ok(Expr::Literal(literal))
            }
            TokenKind::ParamMarker => {
                let index = self.tok.param_index().unwrap_or_default();
                self.advance()?;
                Ok(Expr::param(index))
            }
            TokenKind::Placeholder => {
                let token = self.advance()?;
                Ok(Expr::placeholder(token.identifier_text().unwrap_or_default()))
            }
            TokenKind::UserVariable => {
                let token = self.advance()?;
                Ok(Expr::UserVariable(token.identifier_text().unwrap_or_default().to_string()))
            }
            TokenKind::SysVariable => self.parse_sys_variable(),
            TokenKind::LeftParen => self.parse_parenthesized(),
            TokenKind::Exists => {
                self.advance()?;
                let query = self.parse_parenthesized_query()?;
                Ok(Expr::Exists(Box::new(query)))
            }
            TokenKind::Case => self.parse_case_expr(),
            TokenKind::Interval => {
                self.advance()?;
                let value = self.parse_expr()?;
                let unit = self.interval_unit()?;
                Ok(Expr::Interval { value: Box::new(value), unit })
            }
            TokenKind::Default => {
                if self.peek2()?.kind == TokenKind::LeftParen {
                    return self.parse_generic_call();
                }
                self.advance()?;
                Ok(Expr::Default)
            }
            TokenKind::Star => {
                self.advance()?;
                Ok(Expr::Identifier(Identifier::wildcard()))
            }
            TokenKind::Convert => self.parse_convert(),
            TokenKind::Char if next_is_paren => self.parse_char(),
            TokenKind::CurrentDate
            | TokenKind::CurrentTime
            | TokenKind::CurrentTimestamp
            | TokenKind::CurrentUser
            | TokenKind::Localtime
            | TokenKind::Localtimestamp
            | TokenKind::UtcDate
            | TokenKind::UtcTime
            | TokenKind::UtcTimestamp => {
                if self.peek2()?.kind == TokenKind::LeftParen {
                    return self.parse_generic_call();
                }
                let token = self.advance()?;
                Ok(Expr::Niladic(token.kind.keyword_text().unwrap_or_default().to_string()))
            }
            TokenKind::If
            | TokenKind::Left
            | TokenKind::Right
            | TokenKind::Replace
            | TokenKind::Insert
            | TokenKind::Mod
            | TokenKind::Database
            | TokenKind::Schema
            | TokenKind::Repeat
            | TokenKind::Values
                if next_is_paren =>
            {
                self.parse_generic_call()
            }
            TokenKind::Identifier => {
                let next = self.peek2()?.kind;
                let text = self.tok.identifier_text().unwrap_or_default().to_string();
                if next == TokenKind::LiteralString && text.len() > 1 && text.starts_with('_') {
                    self.advance()?;
                    return self.parse_string_literal(Some(text[1..].to_string()), false);
                }
                if next == TokenKind::LeftParen {
                    return self.parse_function();
                }
                self.parse_column_ref()
            }
            TokenKind::QuotedIdentifier => self.parse_column_ref(),
            _ => Err(self.unexpected("expression")),
        }
    }

    /// String literal at the lookahead, with adjacent literals concatenated
    fn parse_string_literal(&mut self, introducer: Option<String>, national: bool) -> Result<Expr> {
        let value = self.string_literal()?;
        Ok(Expr::Literal(Literal::String(StringLiteral { value, introducer, national })))
    }

    /// `@@name` or `@@global.name`
    fn parse_sys_variable(&mut self) -> Result<Expr> {
        let token = self.advance()?;
        let text = token.identifier_text().unwrap_or_default().to_string();
        let scope = token.identifier_upper().and_then(VariableScope::from_keyword);
        if let Some(scope) = scope {
            if self.eat(TokenKind::Dot)? {
                let name = self.name_after_dot()?;
                return Ok(Expr::SysVariable { scope: Some(scope), name });
            }
        }
        Ok(Expr::SysVariable { scope: None, name: text })
    }

    /// Parenthesized expression, row constructor or subquery
    fn parse_parenthesized(&mut self) -> Result<Expr> {
        self.expect(TokenKind::LeftParen)?;
        if self.at(TokenKind::Select) {
            let query = self.parse_query()?;
            self.expect(TokenKind::RightParen)?;
            return Ok(Expr::subquery(query));
        }
        if self.at(TokenKind::LeftParen) && self.peek2()?.kind == TokenKind::Select {
            match self.parse_query()? {
                query @ Query::Union(_) => {
                    self.expect(TokenKind::RightParen)?;
                    return Ok(Expr::subquery(query));
                }
                query => self.pending_primary = Some(Expr::subquery(query)),
            }
        }
        let first = self.parse_expr()?;
        if self.at(TokenKind::Comma) {
            let mut items = vec![first];
            while self.eat(TokenKind::Comma)? {
                items.push(self.parse_expr()?);
            }
            self.expect(TokenKind::RightParen)?;
            return Ok(Expr::Row(items));
        }
        self.expect(TokenKind::RightParen)?;
        Ok(first)
    }

    /// `(query)`
    pub(super) fn parse_parenthesized_query(&mut self) -> Result<Query> {
        self.expect(TokenKind::LeftParen)?;
        let query = self.parse_query()?;
        self.expect(TokenKind::RightParen)?;
        Ok(query)
    }

    /// `col`, `tb.col`, `db.tb.col`, `tb.*`
    pub(super) fn parse_column_ref(&mut self) -> Result<Expr> {
        Ok(Expr::Identifier(self.parse_identifier_chain(true)?))
    }

    /// Dotted name; `allow_wildcard` accepts a trailing `.*`
    pub(super) fn parse_identifier_chain(&mut self, allow_wildcard: bool) -> Result<Identifier> {
        if !self.at_identifier() {
            return Err(self.unexpected("identifier"));
        }
        let quoted = self.at(TokenKind::QuotedIdentifier);
        let token = self.advance()?;
        let name = token.identifier_text().unwrap_or_default().to_string();
        let mut ident = Identifier { parent: None, name, quoted };
        while self.at(TokenKind::Dot) {
            self.advance()?;
            if allow_wildcard && self.eat(TokenKind::Star)? {
                return Ok(Identifier::wildcard().with_parent(ident));
            }
            let quoted = self.at(TokenKind::QuotedIdentifier);
            let name = self.name_after_dot()?;
            ident = Identifier { parent: Some(Box::new(ident)), name, quoted };
        }
        Ok(ident)
    }

    /// `CASE [operand] WHEN .. THEN .. [ELSE ..] END`
    fn parse_case_expr(&mut self) -> Result<Expr> {
        self.push_context("CASE expression");
        let result = self.parse_case_expr_impl();
        self.pop_context();
        result
    }

    fn parse_case_expr_impl(&mut self) -> Result<Expr> {
        self.expect(TokenKind::Case)?;
        let operand = if self.at(TokenKind::When) {
            None
        } else {
            Some(Box::new(self.parse_expr()?))
        };
        let mut whens = Vec::new();
        while self.eat(TokenKind::When)? {
            let condition = self.parse_expr()?;
            self.expect(TokenKind::Then)?;
            let result = self.parse_expr()?;
            whens.push((condition, result));
        }
        if whens.is_empty() {
            return Err(self.unexpected("WHEN"));
        }
        let else_result = if self.eat(TokenKind::Else)? {
            Some(Box::new(self.parse_expr()?))
        } else {
            None
        };
        self.expect_word("END")?;
        Ok(Expr::Case(CaseExpr { operand, whens, else_result }))
    }

    /// Temporal unit word as in `INTERVAL 1 DAY`
    pub(super) fn interval_unit(&mut self) -> Result<IntervalUnit> {
        let unit = self.tok.identifier_upper().and_then(IntervalUnit::from_keyword);
        match unit {
            Some(unit) => {
                self.advance()?;
                Ok(unit)
            }
            None => Err(self.unexpected("interval unit")),
        }
    }
}
