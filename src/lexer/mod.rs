//! MySQL-dialect lexer
//!
//! Converts SQL bytes into a stream of [`Token`]s:
//! - separators: whitespace, `#` and `-- ` line comments, `/* */` blocks
//! - version-gated `/*!NNNNN ... */` comments whose content is scanned as SQL
//!   when the declared version is within the configured cutoff, and lexed
//!   then dropped when it is above
//! - numbers, with re-classification as identifier when a digit run turns
//!   out to be the start of a name (`1e5x`, `0x1y`, `0b101z`)
//! - quoted strings (`'..'`, `".."`, doubled quotes and backslash escapes),
//!   back-tick identifiers, `${name}` placeholders, `@` / `@@` variables
//! - `?` parameter markers, numbered in scan order
//!
//! Each lexer owns its scratch buffer; nothing is shared between parses
//! except the read-only keyword table and the version cutoff snapshot.

use bytes::Bytes;
use log::trace;

use crate::charset::Charset;
use crate::config;
use crate::error::{LexicalErrorKind, Result, SqlError};

pub mod keywords;
mod scanner;
pub mod token;

pub use self::keywords::KeywordTable;
pub use self::scanner::{ByteScanner, SourceBuffer};
pub use self::token::{Payload, Token, TokenKind};

/// Maximum number of tokens the grammar layer may push back
const PUSH_BACK_DEPTH: usize = 2;

/// Digits in a vendor comment version
const VERSION_DIGITS: usize = 5;

#[inline]
fn is_ident_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$' || b >= 0x80
}

#[inline]
fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_' || b == b'$' || b >= 0x80
}

//=============================================================================
// Lexer
//=============================================================================

/// Lexer state
pub struct Lexer {
    scanner: ByteScanner,
    charset: Charset,
    version_cutoff: u32,
    /// Inside a `/*! */` comment
    in_vendor_comment: bool,
    /// The vendor comment being scanned declares a version above the cutoff;
    /// its tokens are checked and dropped
    vendor_gated: bool,
    /// Offset of the `/*!` that opened the gated comment
    vendor_start: usize,
    /// Version declared by the vendor comment being scanned
    declared_version: Option<u32>,
    /// Number of `?` scanned so far
    param_count: u32,
    pushed: Vec<Token>,
    current: Token,
    prev_kind: TokenKind,
    /// Reused uppercase buffer for keyword lookup
    upper: Vec<u8>,
}

impl Lexer {
    pub fn new(input: &[u8]) -> Self {
        Self::build(input, Charset::Utf8, config::version_cutoff())
    }

    pub fn with_charset(input: &[u8], charset: Charset) -> Self {
        Self::build(input, charset, config::version_cutoff())
    }

    /// Lexer with an explicit cutoff instead of the process-wide one
    pub fn with_version_cutoff(input: &[u8], version_cutoff: u32) -> Self {
        Self::build(input, Charset::Utf8, version_cutoff)
    }

    fn build(input: &[u8], charset: Charset, version_cutoff: u32) -> Self {
        Self {
            scanner: ByteScanner::new(SourceBuffer::new(input)),
            charset,
            version_cutoff,
            in_vendor_comment: false,
            vendor_gated: false,
            vendor_start: 0,
            declared_version: None,
            param_count: 0,
            pushed: Vec::with_capacity(PUSH_BACK_DEPTH),
            current: Token::eof(0),
            prev_kind: TokenKind::Eof,
            upper: Vec::with_capacity(32),
        }
    }

    /// Tokenize the entire input, ending with `Eof`
    pub fn tokenize(input: &[u8]) -> Result<Vec<Token>> {
        let mut lexer = Self::new(input);
        let mut tokens = Vec::new();
        loop {
            let token = lexer.next_token()?;
            let done = token.kind == TokenKind::Eof;
            tokens.push(token);
            if done {
                break;
            }
        }
        Ok(tokens)
    }

    /// Source bytes including the sentinel
    pub fn source(&self) -> &[u8] {
        self.scanner.source().as_bytes()
    }

    pub fn charset(&self) -> Charset {
        self.charset
    }

    pub fn version_cutoff(&self) -> u32 {
        self.version_cutoff
    }

    /// Version declared by the innermost included vendor comment, if any
    pub fn declared_version(&self) -> Option<u32> {
        self.declared_version
    }

    /// Number of parameter markers scanned so far
    pub fn param_index(&self) -> u32 {
        self.param_count
    }

    /// Most recently returned token
    pub fn current(&self) -> &Token {
        &self.current
    }

    pub fn current_token(&self) -> TokenKind {
        self.current.kind
    }

    /// Hand a token back so the next call to [`Lexer::next_token`] returns it.
    ///
    /// # Panics
    /// If more than two tokens are pending.
    pub fn push_back(&mut self, token: Token) {
        assert!(
            self.pushed.len() < PUSH_BACK_DEPTH,
            "lexer push-back is limited to {} tokens",
            PUSH_BACK_DEPTH
        );
        self.pushed.push(token);
    }

    pub fn integer_value(&self) -> Option<u128> {
        self.current.integer_value()
    }

    pub fn decimal_value(&self) -> Option<&str> {
        self.current.decimal_value()
    }

    /// De-escaped content of the current string literal
    pub fn string_value(&self) -> Option<String> {
        self.current.string_bytes().map(|b| self.charset.decode(b))
    }

    pub fn identifier_upper(&self) -> Option<&str> {
        self.current.identifier_upper()
    }

    /// Exact source bytes of the current token
    pub fn raw_bytes(&self) -> Bytes {
        self.scanner.slice(self.current.offset, self.current.offset + self.current.len)
    }

    /// Lexical error at `offset`
    fn err(&self, kind: LexicalErrorKind, offset: usize) -> SqlError {
        SqlError::lexical(kind, self.source(), offset)
    }

    /// Produce the next token
    pub fn next_token(&mut self) -> Result<Token> {
        if let Some(token) = self.pushed.pop() {
            self.current = token.clone();
            return Ok(token);
        }
        self.skip_separators()?;
        while self.vendor_gated {
            self.skip_gated_token()?;
            self.skip_separators()?;
        }
        let token = self.scan_token()?;
        self.prev_kind = token.kind;
        self.current = token.clone();
        Ok(token)
    }

    //-------------------------------------------------------------------------
    // Separators and comments
    //-------------------------------------------------------------------------

    fn skip_separators(&mut self) -> Result<()> {
        loop {
            if self.scanner.at_eof() {
                return Ok(());
            }
            let ch = self.scanner.ch();
            match ch {
                b' ' | b'\t' | b'\n' | b'\r' | 0x0B | 0x0C => {
                    self.scanner.advance();
                }
                b'#' => self.skip_line(),
                b'-' if self.scanner.peek(1) == b'-' && self.scanner.peek(2) <= b' ' => {
                    self.skip_line()
                }
                b'/' if self.scanner.peek(1) == b'*' => self.skip_block_comment()?,
                b'*' if self.in_vendor_comment && self.scanner.peek(1) == b'/' => {
                    self.scanner.advance();
                    self.scanner.advance();
                    self.in_vendor_comment = false;
                    self.vendor_gated = false;
                    self.declared_version = None;
                }
                _ => return Ok(()),
            }
        }
    }

    fn skip_line(&mut self) {
        while !self.scanner.at_eof() && self.scanner.ch() != b'\n' {
            self.scanner.advance();
        }
        self.scanner.advance();
    }

    fn skip_block_comment(&mut self) -> Result<()> {
        let start = self.scanner.pos();
        self.scanner.advance(); // /
        self.scanner.advance(); // *
        if self.scanner.ch() == b'!' && !self.in_vendor_comment {
            self.scanner.advance();
            let declared = self.scan_comment_version();
            let included = declared.map_or(true, |v| v <= self.version_cutoff);
            trace!(
                "vendor comment at {} declares {:?}, cutoff {}: {}",
                start,
                declared,
                self.version_cutoff,
                if included { "scanned" } else { "gated" }
            );
            self.in_vendor_comment = true;
            if included {
                self.declared_version = declared;
            } else {
                self.vendor_gated = true;
                self.vendor_start = start;
            }
            return Ok(());
        }
        loop {
            if self.scanner.at_eof() {
                return Err(self.err(LexicalErrorKind::UnterminatedComment, start));
            }
            if self.scanner.ch() == b'*' && self.scanner.peek(1) == b'/' {
                self.scanner.advance();
                self.scanner.advance();
                return Ok(());
            }
            self.scanner.advance();
        }
    }

    /// Scan and drop one token of a gated vendor comment.
    ///
    /// Markers inside the comment do not take a parameter ordinal.
    fn skip_gated_token(&mut self) -> Result<()> {
        if self.scanner.at_eof() {
            return Err(self.err(LexicalErrorKind::UnterminatedComment, self.vendor_start));
        }
        let param_count = self.param_count;
        let token = self.scan_token()?;
        trace!("dropped {:?} at {} inside gated vendor comment", token.kind, token.offset);
        self.param_count = param_count;
        Ok(())
    }

    /// Read the five digit version after `/*!`; fewer digits are content
    fn scan_comment_version(&mut self) -> Option<u32> {
        let mut version = 0u32;
        for i in 0..VERSION_DIGITS {
            let b = self.scanner.peek(i);
            if !b.is_ascii_digit() {
                return None;
            }
            version = version * 10 + (b - b'0') as u32;
        }
        for _ in 0..VERSION_DIGITS {
            self.scanner.advance();
        }
        Some(version)
    }

    //-------------------------------------------------------------------------
    // Token dispatch
    //-------------------------------------------------------------------------

    fn token(&self, kind: TokenKind, payload: Payload, start: usize) -> Token {
        Token::new(kind, payload, start, self.scanner.pos() - start)
    }

    /// Consume `n` bytes and produce a payload-free token
    fn punct(&mut self, kind: TokenKind, n: usize) -> Token {
        let start = self.scanner.pos();
        for _ in 0..n {
            self.scanner.advance();
        }
        self.token(kind, Payload::None, start)
    }

    fn scan_token(&mut self) -> Result<Token> {
        let start = self.scanner.pos();
        if self.scanner.at_eof() {
            return Ok(Token::eof(start));
        }
        let ch = self.scanner.ch();
        let next = self.scanner.peek(1);
        let token = match ch {
            b'0'..=b'9' => self.scan_number()?,
            b'.' if next.is_ascii_digit() && !self.after_name() => self.scan_number()?,
            b'x' | b'X' if next == b'\'' => self.scan_quoted_digits(TokenKind::LiteralHex)?,
            b'b' | b'B' if next == b'\'' => self.scan_quoted_digits(TokenKind::LiteralBit)?,
            b'n' | b'N' if next == b'\'' => {
                self.scanner.advance();
                self.scan_string(TokenKind::LiteralNationalString, start)?
            }
            b'$' if next == b'{' => self.scan_placeholder()?,
            b'\'' | b'"' => self.scan_string(TokenKind::LiteralString, start)?,
            b'`' => self.scan_quoted_identifier()?,
            b'@' => self.scan_variable()?,
            b'?' => {
                self.param_count += 1;
                self.scanner.advance();
                self.token(TokenKind::ParamMarker, Payload::Param(self.param_count), start)
            }
            _ if is_ident_start(ch) => self.scan_identifier()?,
            b'(' => self.punct(TokenKind::LeftParen, 1),
            b')' => self.punct(TokenKind::RightParen, 1),
            b'{' => self.punct(TokenKind::LeftBrace, 1),
            b'}' => self.punct(TokenKind::RightBrace, 1),
            b',' => self.punct(TokenKind::Comma, 1),
            b';' => self.punct(TokenKind::Semicolon, 1),
            b'.' => self.punct(TokenKind::Dot, 1),
            b'+' => self.punct(TokenKind::Plus, 1),
            b'-' => self.punct(TokenKind::Minus, 1),
            b'*' => self.punct(TokenKind::Star, 1),
            b'/' => self.punct(TokenKind::Slash, 1),
            b'%' => self.punct(TokenKind::Percent, 1),
            b'^' => self.punct(TokenKind::Caret, 1),
            b'~' => self.punct(TokenKind::Tilde, 1),
            b'=' => self.punct(TokenKind::Equal, 1),
            b':' if next == b'=' => self.punct(TokenKind::Assign, 2),
            b':' => self.punct(TokenKind::Colon, 1),
            b'<' => match next {
                b'=' if self.scanner.peek(2) == b'>' => self.punct(TokenKind::NullSafeEqual, 3),
                b'=' => self.punct(TokenKind::LessEqual, 2),
                b'>' => self.punct(TokenKind::NotEqual, 2),
                b'<' => self.punct(TokenKind::ShiftLeft, 2),
                _ => self.punct(TokenKind::Less, 1),
            },
            b'>' => match next {
                b'=' => self.punct(TokenKind::GreaterEqual, 2),
                b'>' => self.punct(TokenKind::ShiftRight, 2),
                _ => self.punct(TokenKind::Greater, 1),
            },
            b'!' if next == b'=' => self.punct(TokenKind::NotEqual, 2),
            b'!' => self.punct(TokenKind::Exclamation, 1),
            b'&' if next == b'&' => self.punct(TokenKind::DoubleAmpersand, 2),
            b'&' => self.punct(TokenKind::Ampersand, 1),
            b'|' if next == b'|' => self.punct(TokenKind::DoublePipe, 2),
            b'|' => self.punct(TokenKind::Pipe, 1),
            other => {
                return Err(self.err(LexicalErrorKind::UnexpectedCharacter(other), start));
            }
        };
        Ok(token)
    }

    /// A `.` right after a name or `)` is a qualifier, not the start of `.5`
    fn after_name(&self) -> bool {
        matches!(
            self.prev_kind,
            TokenKind::Identifier | TokenKind::QuotedIdentifier | TokenKind::RightParen
        )
    }

    //-------------------------------------------------------------------------
    // Numbers
    //-------------------------------------------------------------------------

    /// Numeric literal state machine.
    ///
    /// A digit run (with optional exponent) that runs into identifier bytes
    /// is re-lexed as an identifier from the number start. `digits e sign`
    /// without a following digit backtracks to before the sign, leaving
    /// `digits e` as the identifier.
    fn scan_number(&mut self) -> Result<Token> {
        let start = self.scanner.pos();
        let mut has_dot = false;
        let mut has_exp = false;

        if self.scanner.ch() == b'0' {
            match self.scanner.peek(1) {
                b'x' | b'X' => return self.scan_unquoted_digits(TokenKind::LiteralHex),
                b'b' | b'B' => return self.scan_unquoted_digits(TokenKind::LiteralBit),
                _ => {}
            }
        }

        self.skip_digits();
        if self.scanner.ch() == b'.' {
            has_dot = true;
            self.scanner.advance();
            self.skip_digits();
        }

        if matches!(self.scanner.ch(), b'e' | b'E') {
            let mark = self.scanner.pos();
            let next = self.scanner.peek(1);
            if next.is_ascii_digit() {
                self.scanner.advance();
                self.skip_digits();
                has_exp = true;
            } else if matches!(next, b'+' | b'-') {
                if self.scanner.peek(2).is_ascii_digit() {
                    self.scanner.advance();
                    self.scanner.advance();
                    self.skip_digits();
                    has_exp = true;
                } else if has_dot {
                    // `1.5e+x`: the number ends before the `e`
                    self.scanner.reset(mark);
                } else {
                    // `1e+x`: `1e` is a name, the sign starts the next token
                    self.scanner.advance();
                    return Ok(self.identifier_token(start));
                }
            } else if has_dot {
                self.scanner.reset(mark);
            }
        }

        if !has_dot && is_ident_char(self.scanner.ch()) {
            while is_ident_char(self.scanner.ch()) {
                self.scanner.advance();
            }
            return Ok(self.identifier_token(start));
        }

        let end = self.scanner.pos();
        let text = String::from_utf8_lossy(self.scanner.bytes(start, end)).into_owned();
        if !has_dot && !has_exp {
            if let Ok(v) = text.parse::<u128>() {
                return Ok(self.token(TokenKind::LiteralInteger, Payload::Integer(v), start));
            }
        }
        Ok(self.token(TokenKind::LiteralDecimal, Payload::Decimal(text), start))
    }

    fn skip_digits(&mut self) {
        while self.scanner.ch().is_ascii_digit() {
            self.scanner.advance();
        }
    }

    /// `0x1F` / `0b101`; any trailing name byte turns the run into a name
    fn scan_unquoted_digits(&mut self, kind: TokenKind) -> Result<Token> {
        let start = self.scanner.pos();
        self.scanner.advance(); // 0
        self.scanner.advance(); // x or b
        let valid = |b: u8| match kind {
            TokenKind::LiteralHex => b.is_ascii_hexdigit(),
            _ => b == b'0' || b == b'1',
        };
        let digits_start = self.scanner.pos();
        while valid(self.scanner.ch()) {
            self.scanner.advance();
        }
        let digits_end = self.scanner.pos();
        if digits_start == digits_end || is_ident_char(self.scanner.ch()) {
            while is_ident_char(self.scanner.ch()) {
                self.scanner.advance();
            }
            return Ok(self.identifier_token(start));
        }
        let digits = self.scanner.slice(digits_start, digits_end);
        Ok(self.token(kind, Payload::Digits { digits, quoted: false }, start))
    }

    /// `x'1F'` / `b'101'`
    fn scan_quoted_digits(&mut self, kind: TokenKind) -> Result<Token> {
        let start = self.scanner.pos();
        let (error, valid): (LexicalErrorKind, fn(u8) -> bool) = match kind {
            TokenKind::LiteralHex => (LexicalErrorKind::InvalidHexLiteral, |b: u8| b.is_ascii_hexdigit()),
            _ => (LexicalErrorKind::InvalidBitLiteral, |b: u8| b == b'0' || b == b'1'),
        };
        self.scanner.advance(); // x or b
        self.scanner.advance(); // '
        let digits_start = self.scanner.pos();
        while valid(self.scanner.ch()) {
            self.scanner.advance();
        }
        let digits_end = self.scanner.pos();
        if self.scanner.ch() != b'\'' || self.scanner.at_eof() {
            return Err(self.err(error, start));
        }
        if kind == TokenKind::LiteralHex && (digits_end - digits_start) % 2 != 0 {
            return Err(self.err(error, start));
        }
        self.scanner.advance();
        let digits = self.scanner.slice(digits_start, digits_end);
        Ok(self.token(kind, Payload::Digits { digits, quoted: true }, start))
    }

    //-------------------------------------------------------------------------
    // Strings and quoted names
    //-------------------------------------------------------------------------

    /// Quoted string at the cursor; `start` covers an `N` prefix if present
    fn scan_string(&mut self, kind: TokenKind, start: usize) -> Result<Token> {
        self.read_quoted(start)?;
        let content = self.scanner.scratch_bytes();
        Ok(self.token(kind, Payload::Str(content), start))
    }

    /// De-escape the quoted run at the cursor into the scratch buffer
    fn read_quoted(&mut self, start: usize) -> Result<()> {
        let quote = self.scanner.ch();
        self.scanner.advance();
        self.scanner.scratch_clear();
        loop {
            if self.scanner.at_eof() {
                return Err(self.err(LexicalErrorKind::UnterminatedString, start));
            }
            let ch = self.scanner.ch();
            if ch == quote {
                if self.scanner.peek(1) == quote {
                    self.scanner.scratch_push(quote);
                    self.scanner.advance();
                    self.scanner.advance();
                    continue;
                }
                self.scanner.advance();
                return Ok(());
            }
            if ch == b'\\' {
                self.scanner.advance();
                if self.scanner.at_eof() {
                    return Err(self.err(LexicalErrorKind::UnterminatedString, start));
                }
                let escaped = self.scanner.ch();
                match escaped {
                    b'0' => self.scanner.scratch_push(0),
                    b'b' => self.scanner.scratch_push(0x08),
                    b'n' => self.scanner.scratch_push(b'\n'),
                    b'r' => self.scanner.scratch_push(b'\r'),
                    b't' => self.scanner.scratch_push(b'\t'),
                    b'Z' => self.scanner.scratch_push(0x1A),
                    b'%' | b'_' => {
                        self.scanner.scratch_push(b'\\');
                        self.scanner.scratch_push(escaped);
                    }
                    other => self.scanner.scratch_push(other),
                }
                self.scanner.advance();
                continue;
            }
            self.scanner.scratch_push(ch);
            self.scanner.advance();
        }
    }

    /// Back-tick identifier; a doubled back-tick is an escaped back-tick
    fn scan_quoted_identifier(&mut self) -> Result<Token> {
        let start = self.scanner.pos();
        self.read_backticked(start)?;
        let text = self.decode_scratch();
        let upper = text.to_ascii_uppercase();
        Ok(self.token(TokenKind::QuotedIdentifier, Payload::Ident { text, upper }, start))
    }

    fn read_backticked(&mut self, start: usize) -> Result<()> {
        self.scanner.advance();
        self.scanner.scratch_clear();
        loop {
            if self.scanner.at_eof() {
                return Err(self.err(LexicalErrorKind::UnterminatedIdentifier, start));
            }
            let ch = self.scanner.ch();
            if ch == b'`' {
                if self.scanner.peek(1) == b'`' {
                    self.scanner.scratch_push(b'`');
                    self.scanner.advance();
                    self.scanner.advance();
                    continue;
                }
                self.scanner.advance();
                return Ok(());
            }
            self.scanner.scratch_push(ch);
            self.scanner.advance();
        }
    }

    fn decode_scratch(&self) -> String {
        self.charset.decode(&self.scanner.scratch_bytes())
    }

    /// `${name}`
    fn scan_placeholder(&mut self) -> Result<Token> {
        let start = self.scanner.pos();
        self.scanner.advance(); // $
        self.scanner.advance(); // {
        let name_start = self.scanner.pos();
        while self.scanner.ch() != b'}' {
            if self.scanner.at_eof() {
                return Err(self.err(LexicalErrorKind::UnterminatedPlaceholder, start));
            }
            self.scanner.advance();
        }
        let text = self.charset.decode(self.scanner.bytes(name_start, self.scanner.pos()));
        self.scanner.advance();
        let upper = text.to_ascii_uppercase();
        Ok(self.token(TokenKind::Placeholder, Payload::Ident { text, upper }, start))
    }

    /// `@name`, `@'name'`, `` @`name` `` or `@@name`
    fn scan_variable(&mut self) -> Result<Token> {
        let start = self.scanner.pos();
        self.scanner.advance();
        let kind = if self.scanner.ch() == b'@' {
            self.scanner.advance();
            TokenKind::SysVariable
        } else {
            TokenKind::UserVariable
        };
        let text = match self.scanner.ch() {
            b'\'' | b'"' if kind == TokenKind::UserVariable => {
                self.read_quoted(start)?;
                self.decode_scratch()
            }
            b'`' => {
                self.read_backticked(start)?;
                self.decode_scratch()
            }
            _ => {
                let name_start = self.scanner.pos();
                while is_ident_char(self.scanner.ch())
                    || (kind == TokenKind::UserVariable && self.scanner.ch() == b'.')
                {
                    self.scanner.advance();
                }
                if name_start == self.scanner.pos() {
                    return Err(self.err(LexicalErrorKind::InvalidVariable, start));
                }
                self.charset.decode(self.scanner.bytes(name_start, self.scanner.pos()))
            }
        };
        let upper = text.to_ascii_uppercase();
        Ok(self.token(kind, Payload::Ident { text, upper }, start))
    }

    //-------------------------------------------------------------------------
    // Names
    //-------------------------------------------------------------------------

    fn scan_identifier(&mut self) -> Result<Token> {
        let start = self.scanner.pos();
        while is_ident_char(self.scanner.ch()) {
            self.scanner.advance();
        }
        Ok(self.identifier_token(start))
    }

    /// Classify `start..cursor` as keyword, literal word or identifier
    fn identifier_token(&mut self, start: usize) -> Token {
        let end = self.scanner.pos();
        self.upper.clear();
        self.upper
            .extend(self.scanner.bytes(start, end).iter().map(|b| b.to_ascii_uppercase()));
        let kind = match keywords::lookup(&self.upper) {
            Some(kind) => kind,
            None => match self.upper.as_slice() {
                b"NULL" => TokenKind::LiteralNull,
                b"TRUE" => TokenKind::LiteralTrue,
                b"FALSE" => TokenKind::LiteralFalse,
                _ => TokenKind::Identifier,
            },
        };
        let text = self.charset.decode(self.scanner.bytes(start, end));
        let upper = self.charset.decode(&self.upper);
        self.token(kind, Payload::Ident { text, upper }, start)
    }
}

#[cfg(test)]
mod tests;
