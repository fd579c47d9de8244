//! Stored program bodies: blocks, flow control, DECLARE, cursors and conditions

use crate::ast::*;
use crate::error::Result;
use crate::lexer::TokenKind;

use super::Parser;

impl Parser {
    /// `label: BEGIN|LOOP|WHILE|REPEAT ..`
    pub(super) fn parse_labeled(&mut self) -> Result<Statement> {
        let label = self.identifier()?;
        self.expect(TokenKind::Colon)?;
        match self.tok.kind {
            TokenKind::Loop | TokenKind::While | TokenKind::Repeat => self.parse_loop(Some(label)),
            _ if self.at_word("BEGIN") => self.parse_begin(Some(label)),
            _ => Err(self.unexpected("BEGIN, LOOP, WHILE or REPEAT after label")),
        }
    }

    /// `BEGIN [WORK]` starts a transaction; otherwise `BEGIN .. END` is a block
    pub(super) fn parse_begin(&mut self, label: Option<String>) -> Result<Statement> {
        self.expect_word("BEGIN")?;
        if label.is_none() && matches!(self.tok.kind, TokenKind::Semicolon | TokenKind::Eof) {
            return Ok(Statement::StartTransaction);
        }
        if label.is_none() && self.eat_word("WORK")? {
            return Ok(Statement::StartTransaction);
        }

        self.push_context("BEGIN .. END block");
        let result = self.parse_body(&["END"]);
        self.pop_context();
        let body = result?;
        self.expect_word("END")?;
        self.parse_end_label(&label)?;
        Ok(Statement::Block { label, body })
    }

    /// Statements, each terminated by `;`, up to one of the `stops` words
    fn parse_body(&mut self, stops: &[&str]) -> Result<Vec<Statement>> {
        let mut body = Vec::new();
        while !stops.iter().any(|stop| self.at_any_word(stop)) {
            if self.at(TokenKind::Eof) {
                return Err(self.unexpected(stops[0]));
            }
            body.push(self.parse_statement()?);
            self.expect(TokenKind::Semicolon)?;
        }
        Ok(body)
    }

    /// Closing label; must repeat the opening one
    fn parse_end_label(&mut self, label: &Option<String>) -> Result<()> {
        if !self.at_identifier() {
            return Ok(());
        }
        let matches = match label {
            Some(label) => self
                .tok
                .identifier_text()
                .is_some_and(|end| end.eq_ignore_ascii_case(label)),
            None => false,
        };
        if !matches {
            return Err(self.error_with_context(format!(
                "End label {} does not match the beginning label",
                super::utils::token_brief(&self.tok)
            )));
        }
        self.advance()?;
        Ok(())
    }

    /// `IF c THEN .. [ELSEIF c THEN ..] [ELSE ..] END IF`
    pub(super) fn parse_if(&mut self) -> Result<Statement> {
        self.push_context("IF statement");
        let result = self.parse_if_impl();
        self.pop_context();
        result
    }

    fn parse_if_impl(&mut self) -> Result<Statement> {
        self.expect(TokenKind::If)?;
        let mut branches = Vec::new();
        loop {
            let condition = self.parse_expr()?;
            self.expect(TokenKind::Then)?;
            let body = self.parse_body(&["ELSEIF", "ELSE", "END"])?;
            branches.push(ConditionalBranch { condition, body });
            if !self.eat(TokenKind::Elseif)? {
                break;
            }
        }
        let else_body = if self.eat(TokenKind::Else)? {
            Some(self.parse_body(&["END"])?)
        } else {
            None
        };
        self.expect_word("END")?;
        self.expect(TokenKind::If)?;
        Ok(Statement::If { branches, else_body })
    }

    /// `CASE [operand] WHEN .. THEN .. [ELSE ..] END CASE`
    pub(super) fn parse_case_statement(&mut self) -> Result<Statement> {
        self.push_context("CASE statement");
        let result = self.parse_case_statement_impl();
        self.pop_context();
        result
    }

    fn parse_case_statement_impl(&mut self) -> Result<Statement> {
        self.expect(TokenKind::Case)?;
        let operand = if self.at(TokenKind::When) { None } else { Some(self.parse_expr()?) };
        let mut branches = Vec::new();
        while self.eat(TokenKind::When)? {
            let condition = self.parse_expr()?;
            self.expect(TokenKind::Then)?;
            let body = self.parse_body(&["WHEN", "ELSE", "END"])?;
            branches.push(ConditionalBranch { condition, body });
        }
        if branches.is_empty() {
            return Err(self.unexpected("WHEN"));
        }
        let else_body = if self.eat(TokenKind::Else)? {
            Some(self.parse_body(&["END"])?)
        } else {
            None
        };
        self.expect_word("END")?;
        self.expect(TokenKind::Case)?;
        Ok(Statement::Case { operand, branches, else_body })
    }

    /// LOOP, WHILE and REPEAT, optionally labeled
    pub(super) fn parse_loop(&mut self, label: Option<String>) -> Result<Statement> {
        self.push_context("loop");
        let result = self.parse_loop_impl(label);
        self.pop_context();
        result
    }

    fn parse_loop_impl(&mut self, label: Option<String>) -> Result<Statement> {
        let keyword = self.advance()?.kind;
        let stmt = match keyword {
            TokenKind::Loop => {
                let body = self.parse_body(&["END"])?;
                self.expect_word("END")?;
                self.expect(TokenKind::Loop)?;
                self.parse_end_label(&label)?;
                Statement::Loop { label, body }
            }
            TokenKind::While => {
                let condition = self.parse_expr()?;
                self.expect_word("DO")?;
                let body = self.parse_body(&["END"])?;
                self.expect_word("END")?;
                self.expect(TokenKind::While)?;
                self.parse_end_label(&label)?;
                Statement::While { label, condition, body }
            }
            TokenKind::Repeat => {
                let body = self.parse_body(&["UNTIL"])?;
                self.expect_word("UNTIL")?;
                let until = self.parse_expr()?;
                self.expect_word("END")?;
                self.expect(TokenKind::Repeat)?;
                self.parse_end_label(&label)?;
                Statement::Repeat { label, body, until }
            }
            _ => return Err(self.unexpected("LOOP, WHILE or REPEAT")),
        };
        Ok(stmt)
    }

    //-------------------------------------------------------------------------
    // DECLARE
    //-------------------------------------------------------------------------

    /// Variables, conditions, cursors and handlers
    pub(super) fn parse_declare(&mut self) -> Result<Statement> {
        self.push_context("DECLARE statement");
        let result = self.parse_declare_impl();
        self.pop_context();
        result
    }

    fn parse_declare_impl(&mut self) -> Result<Statement> {
        self.expect(TokenKind::Declare)?;

        let action = match self.tok.kind {
            TokenKind::Continue => Some(HandlerAction::Continue),
            TokenKind::Exit => Some(HandlerAction::Exit),
            TokenKind::Undo => Some(HandlerAction::Undo),
            _ => None,
        };
        if let Some(action) = action {
            self.advance()?;
            self.expect_word("HANDLER")?;
            self.expect(TokenKind::For)?;
            let mut conditions = vec![self.parse_condition_value()?];
            while self.eat(TokenKind::Comma)? {
                conditions.push(self.parse_condition_value()?);
            }
            let body = Box::new(self.parse_statement()?);
            return Ok(Statement::DeclareHandler { action, conditions, body });
        }

        let name = self.identifier()?;
        if self.eat(TokenKind::Condition)? {
            self.expect(TokenKind::For)?;
            let value = self.parse_condition_value()?;
            return Ok(Statement::DeclareCondition { name, value });
        }
        if self.eat(TokenKind::Cursor)? {
            self.expect(TokenKind::For)?;
            let query = Box::new(self.parse_query()?);
            return Ok(Statement::DeclareCursor { name, query });
        }

        let mut names = vec![name];
        while self.eat(TokenKind::Comma)? {
            names.push(self.identifier()?);
        }
        let data_type = self.parse_data_type()?;
        let default = if self.eat(TokenKind::Default)? { Some(self.parse_expr()?) } else { None };
        Ok(Statement::DeclareVariable { names, data_type, default })
    }

    /// Error code, SQLSTATE, class or named condition
    fn parse_condition_value(&mut self) -> Result<ConditionValue> {
        match self.tok.kind {
            TokenKind::LiteralInteger => Ok(ConditionValue::ErrorCode(self.integer()?)),
            TokenKind::Sqlstate => {
                self.advance()?;
                self.eat_word("VALUE")?;
                Ok(ConditionValue::SqlState(self.string_literal()?))
            }
            TokenKind::Sqlwarning => {
                self.advance()?;
                Ok(ConditionValue::SqlWarning)
            }
            TokenKind::Sqlexception => {
                self.advance()?;
                Ok(ConditionValue::SqlException)
            }
            TokenKind::Not => {
                self.advance()?;
                self.expect_word("FOUND")?;
                Ok(ConditionValue::NotFound)
            }
            _ => Ok(ConditionValue::Name(self.identifier()?)),
        }
    }

    //-------------------------------------------------------------------------
    // Cursors and diagnostics
    //-------------------------------------------------------------------------

    /// `FETCH [[NEXT] FROM] cursor INTO var, ..`
    pub(super) fn parse_fetch(&mut self) -> Result<Statement> {
        self.expect(TokenKind::Fetch)?;
        if self.eat_word("NEXT")? {
            self.expect(TokenKind::From)?;
        } else {
            self.eat(TokenKind::From)?;
        }
        let cursor = self.identifier()?;
        self.expect(TokenKind::Into)?;
        let into = self.identifier_list()?;
        Ok(Statement::Fetch { cursor, into })
    }

    /// `SIGNAL|RESIGNAL [condition] [SET item = value, ..]`
    pub(super) fn parse_signal(&mut self) -> Result<Statement> {
        let resignal = self.advance()?.kind == TokenKind::Resignal;
        let condition = if self.at(TokenKind::Sqlstate) || self.at_identifier() {
            Some(self.parse_condition_value()?)
        } else {
            None
        };
        let mut items = Vec::new();
        if self.eat(TokenKind::Set)? {
            loop {
                if !self.at(TokenKind::Identifier) {
                    return Err(self.unexpected("condition information item"));
                }
                let name = self.upper();
                self.advance()?;
                self.expect(TokenKind::Equal)?;
                let value = self.parse_expr()?;
                items.push(SignalItem { name, value });
                if !self.eat(TokenKind::Comma)? {
                    break;
                }
            }
        } else if !resignal && condition.is_none() {
            return Err(self.unexpected("SQLSTATE or condition name"));
        }
        let signal = SignalStmt { condition, items };
        Ok(if resignal { Statement::Resignal(signal) } else { Statement::Signal(signal) })
    }

    /// `GET [CURRENT|STACKED] DIAGNOSTICS [CONDITION n] target = ITEM, ..`
    pub(super) fn parse_get_diagnostics(&mut self) -> Result<Statement> {
        self.push_context("GET DIAGNOSTICS statement");
        let result = self.parse_get_diagnostics_impl();
        self.pop_context();
        result
    }

    fn parse_get_diagnostics_impl(&mut self) -> Result<Statement> {
        self.expect_word("GET")?;
        let area = if self.eat_word("CURRENT")? {
            Some(DiagnosticsArea::Current)
        } else if self.eat_word("STACKED")? {
            Some(DiagnosticsArea::Stacked)
        } else {
            None
        };
        self.expect_word("DIAGNOSTICS")?;
        let condition = if self.eat(TokenKind::Condition)? {
            Some(self.parse_primary()?)
        } else {
            None
        };
        let mut items = Vec::new();
        loop {
            let target = self.parse_set_target()?;
            self.expect(TokenKind::Equal)?;
            if !self.at(TokenKind::Identifier) {
                return Err(self.unexpected("diagnostics item name"));
            }
            let name = self.upper();
            self.advance()?;
            items.push(DiagnosticsItem { target, name });
            if !self.eat(TokenKind::Comma)? {
                break;
            }
        }
        Ok(Statement::GetDiagnostics(GetDiagnosticsStmt { area, condition, items }))
    }
}
