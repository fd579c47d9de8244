//! Function calls, including the forms with irregular argument syntax

use crate::ast::*;
use crate::error::Result;
use crate::lexer::TokenKind;

use super::Parser;

impl Parser {
    /// Identifier followed by `(`
    pub(super) fn parse_function(&mut self) -> Result<Expr> {
        match self.upper().as_str() {
            "COUNT" => self.parse_count(),
            "CAST" => self.parse_cast(),
            "TRIM" => self.parse_trim(),
            "EXTRACT" => self.parse_extract(),
            "GROUP_CONCAT" => self.parse_group_concat(),
            "TIMESTAMPADD" | "TIMESTAMPDIFF" => self.parse_timestamp_function(),
            "POSITION" => self.parse_position(),
            "SUBSTRING" | "SUBSTR" => self.parse_substring(),
            "ROW" => {
                self.advance()?;
                self.expect(TokenKind::LeftParen)?;
                let items = self.parse_expr_list()?;
                self.expect(TokenKind::RightParen)?;
                Ok(Expr::Row(items))
            }
            _ => self.parse_generic_call(),
        }
    }

    /// `name([DISTINCT] args)`; the name is normalized to uppercase.
    /// Also used for reserved words called as functions, e.g. `IF(..)`, `LEFT(..)`
    pub(super) fn parse_generic_call(&mut self) -> Result<Expr> {
        let name = self.upper();
        self.advance()?;
        self.push_context("function arguments");
        let result = self.parse_call_args();
        self.pop_context();
        let (distinct, args) = result?;
        Ok(Expr::Function(FunctionCall { name, args, distinct }))
    }

    fn parse_call_args(&mut self) -> Result<(bool, Vec<Expr>)> {
        self.expect(TokenKind::LeftParen)?;
        if self.eat(TokenKind::RightParen)? {
            return Ok((false, Vec::new()));
        }
        let distinct = self.eat(TokenKind::Distinct)?;
        let args = self.parse_expr_list()?;
        self.expect(TokenKind::RightParen)?;
        Ok((distinct, args))
    }

    /// `COUNT(*)`, `COUNT([DISTINCT] args)`
    fn parse_count(&mut self) -> Result<Expr> {
        self.advance()?;
        self.expect(TokenKind::LeftParen)?;
        if self.eat(TokenKind::Star)? {
            self.expect(TokenKind::RightParen)?;
            return Ok(Expr::Count { distinct: false, args: Vec::new() });
        }
        let distinct = self.eat(TokenKind::Distinct)?;
        if !distinct {
            self.eat(TokenKind::All)?;
        }
        let args = self.parse_expr_list()?;
        self.expect(TokenKind::RightParen)?;
        Ok(Expr::Count { distinct, args })
    }

    /// `CAST(expr AS type)`
    fn parse_cast(&mut self) -> Result<Expr> {
        self.advance()?;
        self.expect(TokenKind::LeftParen)?;
        let operand = self.parse_expr()?;
        self.expect(TokenKind::As)?;
        let target = self.parse_cast_type()?;
        self.expect(TokenKind::RightParen)?;
        Ok(Expr::Cast { operand: Box::new(operand), target })
    }

    /// `CONVERT(expr, type)` or `CONVERT(expr USING charset)`
    pub(super) fn parse_convert(&mut self) -> Result<Expr> {
        self.expect(TokenKind::Convert)?;
        self.expect(TokenKind::LeftParen)?;
        let operand = self.parse_expr()?;
        let target = if self.eat(TokenKind::Using)? {
            ConvertTarget::Charset(self.name_or_string()?)
        } else {
            self.expect(TokenKind::Comma)?;
            ConvertTarget::Type(self.parse_cast_type()?)
        };
        self.expect(TokenKind::RightParen)?;
        Ok(Expr::Convert { operand: Box::new(operand), target })
    }

    fn parse_cast_type(&mut self) -> Result<CastType> {
        let name = self.upper();
        let known = matches!(
            name.as_str(),
            "BINARY" | "CHAR" | "NCHAR" | "DATE" | "DATETIME" | "TIME" | "DECIMAL" | "SIGNED"
                | "UNSIGNED" | "JSON"
        );
        if !known {
            return Err(self.unexpected("cast type"));
        }
        self.advance()?;
        let mut target = CastType::new(name);
        if self.eat(TokenKind::LeftParen)? {
            target.length = Some(self.integer()?);
            if self.eat(TokenKind::Comma)? {
                target.scale = Some(self.integer()?);
            }
            self.expect(TokenKind::RightParen)?;
        }
        if target.name == "SIGNED" || target.name == "UNSIGNED" {
            if !self.eat(TokenKind::Integer)? {
                self.eat(TokenKind::Int)?;
            }
        }
        target.charset = self.parse_charset_clause()?;
        Ok(target)
    }

    /// `CHARACTER SET cs` or `CHARSET cs`
    pub(super) fn parse_charset_clause(&mut self) -> Result<Option<String>> {
        if self.at(TokenKind::Character) && self.peek2()?.kind == TokenKind::Set {
            self.advance()?;
            self.advance()?;
            return Ok(Some(self.name_or_string()?));
        }
        if self.eat_word("CHARSET")? {
            return Ok(Some(self.name_or_string()?));
        }
        Ok(None)
    }

    /// `CHAR(args [USING cs])`
    pub(super) fn parse_char(&mut self) -> Result<Expr> {
        self.expect(TokenKind::Char)?;
        self.expect(TokenKind::LeftParen)?;
        let args = self.parse_expr_list()?;
        let charset = if self.eat(TokenKind::Using)? {
            Some(self.name_or_string()?)
        } else {
            None
        };
        self.expect(TokenKind::RightParen)?;
        Ok(Expr::Char { args, charset })
    }

    /// `TRIM([[BOTH|LEADING|TRAILING] [remove] FROM] str)`
    fn parse_trim(&mut self) -> Result<Expr> {
        self.advance()?;
        self.expect(TokenKind::LeftParen)?;
        let mode = match self.tok.kind {
            TokenKind::Both => Some(TrimMode::Both),
            TokenKind::Leading => Some(TrimMode::Leading),
            TokenKind::Trailing => Some(TrimMode::Trailing),
            _ => None,
        };
        let (remove, string) = if mode.is_some() {
            self.advance()?;
            if self.eat(TokenKind::From)? {
                (None, self.parse_expr()?)
            } else {
                let remove = self.parse_expr()?;
                self.expect(TokenKind::From)?;
                (Some(Box::new(remove)), self.parse_expr()?)
            }
        } else {
            let first = self.parse_expr()?;
            if self.eat(TokenKind::From)? {
                (Some(Box::new(first)), self.parse_expr()?)
            } else {
                (None, first)
            }
        };
        self.expect(TokenKind::RightParen)?;
        Ok(Expr::Trim { mode, remove, string: Box::new(string) })
    }

    /// `EXTRACT(unit FROM expr)`
    fn parse_extract(&mut self) -> Result<Expr> {
        self.advance()?;
        self.expect(TokenKind::LeftParen)?;
        let unit = self.interval_unit()?;
        self.expect(TokenKind::From)?;
        let operand = self.parse_expr()?;
        self.expect(TokenKind::RightParen)?;
        Ok(Expr::Extract { unit, operand: Box::new(operand) })
    }

    /// `GROUP_CONCAT([DISTINCT] args [ORDER BY ..] [SEPARATOR '..'])`
    fn parse_group_concat(&mut self) -> Result<Expr> {
        self.advance()?;
        self.expect(TokenKind::LeftParen)?;
        let distinct = self.eat(TokenKind::Distinct)?;
        let args = self.parse_expr_list()?;
        let order_by = self.parse_order_by_clause()?;
        let separator = if self.eat(TokenKind::Separator)? {
            Some(self.string_literal()?)
        } else {
            None
        };
        self.expect(TokenKind::RightParen)?;
        Ok(Expr::GroupConcat(GroupConcat { distinct, args, order_by, separator }))
    }

    /// `TIMESTAMPADD(unit, n, ts)` / `TIMESTAMPDIFF(unit, a, b)`
    fn parse_timestamp_function(&mut self) -> Result<Expr> {
        let add = self.upper() == "TIMESTAMPADD";
        self.advance()?;
        self.expect(TokenKind::LeftParen)?;
        let unit = self.interval_unit()?;
        self.expect(TokenKind::Comma)?;
        let first = Box::new(self.parse_expr()?);
        self.expect(TokenKind::Comma)?;
        let second = Box::new(self.parse_expr()?);
        self.expect(TokenKind::RightParen)?;
        Ok(if add {
            Expr::TimestampAdd { unit, interval: first, timestamp: second }
        } else {
            Expr::TimestampDiff { unit, start: first, end: second }
        })
    }

    /// `POSITION(needle IN haystack)`
    fn parse_position(&mut self) -> Result<Expr> {
        self.advance()?;
        self.expect(TokenKind::LeftParen)?;
        let needle = self.parse_bit_or()?;
        self.expect(TokenKind::In)?;
        let haystack = self.parse_expr()?;
        self.expect(TokenKind::RightParen)?;
        Ok(Expr::Position { needle: Box::new(needle), haystack: Box::new(haystack) })
    }

    /// `SUBSTRING(s, from[, len])` or `SUBSTRING(s FROM from [FOR len])`
    fn parse_substring(&mut self) -> Result<Expr> {
        self.advance()?;
        self.expect(TokenKind::LeftParen)?;
        let string = self.parse_expr()?;
        let (from, length) = if self.eat(TokenKind::From)? {
            let from = self.parse_expr()?;
            let length = if self.eat(TokenKind::For)? { Some(self.parse_expr()?) } else { None };
            (from, length)
        } else {
            self.expect(TokenKind::Comma)?;
            let from = self.parse_expr()?;
            let length = if self.eat(TokenKind::Comma)? { Some(self.parse_expr()?) } else { None };
            (from, length)
        };
        self.expect(TokenKind::RightParen)?;
        Ok(Expr::Substring {
            string: Box::new(string),
            from: Box::new(from),
            length: length.map(Box::new),
        })
    }
}
