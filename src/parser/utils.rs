use crate::error::{Result, SqlError};
use crate::lexer::{Token, TokenKind};

use super::Parser;

/// Context for parser error messages
#[derive(Debug, Clone)]
pub(crate) struct ParserContext {
    /// What was being parsed (e.g. "SELECT statement", "WHERE clause", "column definition")
    pub(crate) context: &'static str,
}

impl Parser {
    /// Push a parsing context onto the stack
    pub(super) fn push_context(&mut self, context: &'static str) {
        self.context_stack.push(ParserContext { context });
    }

    /// Pop a parsing context from the stack
    pub(super) fn pop_context(&mut self) {
        self.context_stack.pop();
    }

    /// Syntax error at the lookahead token, annotated with the context chain
    pub(super) fn error_with_context(&self, msg: String) -> SqlError {
        let context_info = if self.context_stack.is_empty() {
            String::new()
        } else {
            let contexts: Vec<_> = self.context_stack.iter().map(|c| c.context).collect();
            format!(" while parsing {}", contexts.join(" > "))
        };
        SqlError::syntax(
            format!("{}{}", msg, context_info),
            self.lexer.source(),
            self.tok.offset,
        )
    }

    /// "Expected X, found Y"
    pub(super) fn unexpected(&self, expected: &str) -> SqlError {
        self.error_with_context(format!("Expected {}, found {}", expected, token_brief(&self.tok)))
    }

    //-------------------------------------------------------------------------
    // Token stream
    //-------------------------------------------------------------------------

    /// Move to the next token, returning the one consumed
    pub(super) fn advance(&mut self) -> Result<Token> {
        let next = self.lexer.next_token()?;
        Ok(std::mem::replace(&mut self.tok, next))
    }

    /// Token after the lookahead, without consuming anything
    pub(super) fn peek2(&mut self) -> Result<Token> {
        let next = self.lexer.next_token()?;
        self.lexer.push_back(next.clone());
        Ok(next)
    }

    pub(super) fn at(&self, kind: TokenKind) -> bool {
        self.tok.kind == kind
    }

    pub(super) fn eat(&mut self, kind: TokenKind) -> Result<bool> {
        if self.at(kind) {
            self.advance()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    pub(super) fn expect(&mut self, kind: TokenKind) -> Result<Token> {
        if self.at(kind) {
            return self.advance();
        }
        if self.at(TokenKind::Eof) {
            return Err(self.error_with_context(format!(
                "Expected {}, but reached end of input",
                kind.describe()
            )));
        }
        Err(self.unexpected(&kind.describe()))
    }

    pub(super) fn expect_eof(&self) -> Result<()> {
        if self.at(TokenKind::Eof) {
            Ok(())
        } else {
            Err(self.unexpected("end of input"))
        }
    }

    /// Uppercase spelling of the lookahead, empty for non-word tokens
    pub(super) fn upper(&self) -> String {
        self.tok.identifier_upper().unwrap_or_default().to_string()
    }

    /// Lookahead is the non-reserved word `word` (uppercase)
    pub(super) fn at_word(&self, word: &str) -> bool {
        self.tok.kind == TokenKind::Identifier && self.tok.identifier_upper() == Some(word)
    }

    pub(super) fn eat_word(&mut self, word: &str) -> Result<bool> {
        if self.at_word(word) {
            self.advance()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    pub(super) fn expect_word(&mut self, word: &str) -> Result<()> {
        if self.eat_word(word)? {
            Ok(())
        } else {
            Err(self.unexpected(word))
        }
    }

    /// Lookahead is a word: identifier or keyword, matching `word` (uppercase)
    pub(super) fn at_any_word(&self, word: &str) -> bool {
        (self.tok.kind == TokenKind::Identifier || self.tok.kind.is_keyword())
            && self.tok.identifier_upper() == Some(word)
    }

    //-------------------------------------------------------------------------
    // Names and simple literals
    //-------------------------------------------------------------------------

    pub(super) fn at_identifier(&self) -> bool {
        matches!(self.tok.kind, TokenKind::Identifier | TokenKind::QuotedIdentifier)
    }

    /// Plain or back-quoted identifier
    pub(super) fn identifier(&mut self) -> Result<String> {
        if !self.at_identifier() {
            return Err(self.unexpected("identifier"));
        }
        let token = self.advance()?;
        Ok(token.identifier_text().unwrap_or_default().to_string())
    }

    pub(super) fn identifier_list(&mut self) -> Result<Vec<String>> {
        let mut names = vec![self.identifier()?];
        while self.eat(TokenKind::Comma)? {
            names.push(self.identifier()?);
        }
        Ok(names)
    }

    /// `(a, b, ..)`
    pub(super) fn parenthesized_identifiers(&mut self) -> Result<Vec<String>> {
        self.expect(TokenKind::LeftParen)?;
        let names = self.identifier_list()?;
        self.expect(TokenKind::RightParen)?;
        Ok(names)
    }

    /// Any word after a `.`; reserved words are valid there
    pub(super) fn name_after_dot(&mut self) -> Result<String> {
        let is_word = self.at_identifier()
            || self.tok.kind.is_keyword()
            || matches!(
                self.tok.kind,
                TokenKind::LiteralNull | TokenKind::LiteralTrue | TokenKind::LiteralFalse
            );
        if !is_word {
            return Err(self.unexpected("identifier"));
        }
        let token = self.advance()?;
        Ok(token.identifier_text().unwrap_or_default().to_string())
    }

    /// Unsigned integer literal
    pub(super) fn integer(&mut self) -> Result<u64> {
        let value = match self.tok.integer_value() {
            Some(v) if self.at(TokenKind::LiteralInteger) => v,
            _ => return Err(self.unexpected("integer")),
        };
        let value = u64::try_from(value)
            .map_err(|_| self.error_with_context(format!("Integer {} out of range", value)))?;
        self.advance()?;
        Ok(value)
    }

    /// String literal content, adjacent parts concatenated
    pub(super) fn string_literal(&mut self) -> Result<String> {
        if !self.at(TokenKind::LiteralString) {
            return Err(self.unexpected("string literal"));
        }
        let mut value = String::new();
        while self.at(TokenKind::LiteralString) {
            value.push_str(&self.string_content());
            self.advance()?;
        }
        Ok(value)
    }

    /// Decoded content of the lookahead string token
    pub(super) fn string_content(&self) -> String {
        self.tok
            .string_bytes()
            .map(|b| self.lexer.charset().decode(b))
            .unwrap_or_default()
    }

    /// Identifier or string literal, as in charset and alias positions
    pub(super) fn name_or_string(&mut self) -> Result<String> {
        if self.at(TokenKind::LiteralString) {
            self.string_literal()
        } else {
            self.identifier()
        }
    }
}

/// Brief, human readable token description for error messages
pub(super) fn token_brief(token: &Token) -> String {
    match token.kind {
        TokenKind::Identifier | TokenKind::QuotedIdentifier => {
            format!("identifier '{}'", token.identifier_text().unwrap_or_default())
        }
        TokenKind::LiteralInteger => match token.integer_value() {
            Some(v) => format!("number '{}'", v),
            None => "number".into(),
        },
        TokenKind::LiteralDecimal => {
            format!("number '{}'", token.decimal_value().unwrap_or_default())
        }
        other => other.describe(),
    }
}
