//! Token model
//!
//! A token is a classified lexical unit: a [`TokenKind`], an optional
//! [`Payload`] and the byte range it was scanned from. Tokens are immutable
//! once produced.

use bytes::Bytes;
use serde::Serialize;

/// Classification of a token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TokenKind {
    /// End of input
    Eof,

    // Names
    Identifier,
    /// Back-tick quoted identifier
    QuotedIdentifier,
    /// `${name}`
    Placeholder,
    /// `@name`
    UserVariable,
    /// `@@name`
    SysVariable,
    /// `?`
    ParamMarker,

    // Literals
    LiteralNull,
    LiteralTrue,
    LiteralFalse,
    /// Pure digit run
    LiteralInteger,
    /// Number with a fraction and/or exponent
    LiteralDecimal,
    LiteralString,
    /// `N'...'`
    LiteralNationalString,
    /// `0x1F` or `x'1F'`
    LiteralHex,
    /// `0b101` or `b'101'`
    LiteralBit,

    // Punctuation
    LeftParen,
    RightParen,
    LeftBrace,
    RightBrace,
    Comma,
    Semicolon,
    Dot,
    Colon,

    // Operators
    Assign,          // :=
    Equal,           // =
    NullSafeEqual,   // <=>
    GreaterEqual,    // >=
    Greater,         // >
    LessEqual,       // <=
    Less,            // <
    NotEqual,        // <> or !=
    Plus,            // +
    Minus,           // -
    Star,            // *
    Slash,           // /
    Percent,         // %
    Caret,           // ^
    Ampersand,       // &
    DoubleAmpersand, // &&
    Pipe,            // |
    DoublePipe,      // ||
    Tilde,           // ~
    Exclamation,     // !
    ShiftLeft,       // <<
    ShiftRight,      // >>

    // Reserved words
    Accessible,
    Add,
    All,
    Alter,
    Analyze,
    And,
    As,
    Asc,
    Asensitive,
    Before,
    Between,
    Bigint,
    Binary,
    Blob,
    Both,
    By,
    Call,
    Cascade,
    Case,
    Change,
    Char,
    Character,
    Check,
    Collate,
    Column,
    Condition,
    Constraint,
    Continue,
    Convert,
    Create,
    Cross,
    CurrentDate,
    CurrentTime,
    CurrentTimestamp,
    CurrentUser,
    Cursor,
    Database,
    Databases,
    DayHour,
    DayMicrosecond,
    DayMinute,
    DaySecond,
    Dec,
    Decimal,
    Declare,
    Default,
    Delayed,
    Delete,
    Desc,
    Describe,
    Deterministic,
    Distinct,
    Distinctrow,
    Div,
    Double,
    Drop,
    Dual,
    Each,
    Else,
    Elseif,
    Enclosed,
    Escaped,
    Exists,
    Exit,
    Explain,
    Fetch,
    Float,
    Float4,
    Float8,
    For,
    Force,
    Foreign,
    From,
    Fulltext,
    General,
    Grant,
    Group,
    Having,
    HighPriority,
    HourMicrosecond,
    HourMinute,
    HourSecond,
    If,
    Ignore,
    IgnoreServerIds,
    In,
    Index,
    Infile,
    Inner,
    Inout,
    Insensitive,
    Insert,
    Int,
    Int1,
    Int2,
    Int3,
    Int4,
    Int8,
    Integer,
    Interval,
    Into,
    Is,
    Iterate,
    Join,
    Key,
    Keys,
    Kill,
    Leading,
    Leave,
    Left,
    Like,
    Limit,
    Linear,
    Lines,
    Load,
    Localtime,
    Localtimestamp,
    Lock,
    Long,
    Longblob,
    Longtext,
    Loop,
    LowPriority,
    MasterHeartbeatPeriod,
    MasterSslVerifyServerCert,
    Match,
    Maxvalue,
    Mediumblob,
    Mediumint,
    Mediumtext,
    Middleint,
    MinuteMicrosecond,
    MinuteSecond,
    Mod,
    Modifies,
    Natural,
    Not,
    NoWriteToBinlog,
    Numeric,
    On,
    Optimize,
    Option,
    Optionally,
    Or,
    Order,
    Out,
    Outer,
    Outfile,
    Precision,
    Primary,
    Procedure,
    Purge,
    Range,
    Read,
    Reads,
    ReadWrite,
    Real,
    References,
    Regexp,
    Release,
    Rename,
    Repeat,
    Replace,
    Require,
    Resignal,
    Restrict,
    Return,
    Revoke,
    Right,
    Rlike,
    Schema,
    Schemas,
    SecondMicrosecond,
    Select,
    Sensitive,
    Separator,
    Set,
    Show,
    Signal,
    Slow,
    Smallint,
    Spatial,
    Specific,
    Sql,
    Sqlexception,
    Sqlstate,
    Sqlwarning,
    SqlBigResult,
    SqlCalcFoundRows,
    SqlSmallResult,
    Ssl,
    Starting,
    StraightJoin,
    Table,
    Terminated,
    Then,
    Tinyblob,
    Tinyint,
    Tinytext,
    To,
    Trailing,
    Trigger,
    Undo,
    Union,
    Unique,
    Unlock,
    Unsigned,
    Update,
    Usage,
    Use,
    Using,
    UtcDate,
    UtcTime,
    UtcTimestamp,
    Values,
    Varbinary,
    Varchar,
    Varcharacter,
    Varying,
    When,
    Where,
    While,
    With,
    Write,
    Xor,
    YearMonth,
    Zerofill,
}

impl TokenKind {
    /// Canonical spelling of a reserved word kind
    pub fn keyword_text(self) -> Option<&'static str> {
        let text = match self {
            TokenKind::Accessible => "ACCESSIBLE",
            TokenKind::Add => "ADD",
            TokenKind::All => "ALL",
            TokenKind::Alter => "ALTER",
            TokenKind::Analyze => "ANALYZE",
            TokenKind::And => "AND",
            TokenKind::As => "AS",
            TokenKind::Asc => "ASC",
            TokenKind::Asensitive => "ASENSITIVE",
            TokenKind::Before => "BEFORE",
            TokenKind::Between => "BETWEEN",
            TokenKind::Bigint => "BIGINT",
            TokenKind::Binary => "BINARY",
            TokenKind::Blob => "BLOB",
            TokenKind::Both => "BOTH",
            TokenKind::By => "BY",
            TokenKind::Call => "CALL",
            TokenKind::Cascade => "CASCADE",
            TokenKind::Case => "CASE",
            TokenKind::Change => "CHANGE",
            TokenKind::Char => "CHAR",
            TokenKind::Character => "CHARACTER",
            TokenKind::Check => "CHECK",
            TokenKind::Collate => "COLLATE",
            TokenKind::Column => "COLUMN",
            TokenKind::Condition => "CONDITION",
            TokenKind::Constraint => "CONSTRAINT",
            TokenKind::Continue => "CONTINUE",
            TokenKind::Convert => "CONVERT",
            TokenKind::Create => "CREATE",
            TokenKind::Cross => "CROSS",
            TokenKind::CurrentDate => "CURRENT_DATE",
            TokenKind::CurrentTime => "CURRENT_TIME",
            TokenKind::CurrentTimestamp => "CURRENT_TIMESTAMP",
            TokenKind::CurrentUser => "CURRENT_USER",
            TokenKind::Cursor => "CURSOR",
            TokenKind::Database => "DATABASE",
            TokenKind::Databases => "DATABASES",
            TokenKind::DayHour => "DAY_HOUR",
            TokenKind::DayMicrosecond => "DAY_MICROSECOND",
            TokenKind::DayMinute => "DAY_MINUTE",
            TokenKind::DaySecond => "DAY_SECOND",
            TokenKind::Dec => "DEC",
            TokenKind::Decimal => "DECIMAL",
            TokenKind::Declare => "DECLARE",
            TokenKind::Default => "DEFAULT",
            TokenKind::Delayed => "DELAYED",
            TokenKind::Delete => "DELETE",
            TokenKind::Desc => "DESC",
            TokenKind::Describe => "DESCRIBE",
            TokenKind::Deterministic => "DETERMINISTIC",
            TokenKind::Distinct => "DISTINCT",
            TokenKind::Distinctrow => "DISTINCTROW",
            TokenKind::Div => "DIV",
            TokenKind::Double => "DOUBLE",
            TokenKind::Drop => "DROP",
            TokenKind::Dual => "DUAL",
            TokenKind::Each => "EACH",
            TokenKind::Else => "ELSE",
            TokenKind::Elseif => "ELSEIF",
            TokenKind::Enclosed => "ENCLOSED",
            TokenKind::Escaped => "ESCAPED",
            TokenKind::Exists => "EXISTS",
            TokenKind::Exit => "EXIT",
            TokenKind::Explain => "EXPLAIN",
            TokenKind::Fetch => "FETCH",
            TokenKind::Float => "FLOAT",
            TokenKind::Float4 => "FLOAT4",
            TokenKind::Float8 => "FLOAT8",
            TokenKind::For => "FOR",
            TokenKind::Force => "FORCE",
            TokenKind::Foreign => "FOREIGN",
            TokenKind::From => "FROM",
            TokenKind::Fulltext => "FULLTEXT",
            TokenKind::General => "GENERAL",
            TokenKind::Grant => "GRANT",
            TokenKind::Group => "GROUP",
            TokenKind::Having => "HAVING",
            TokenKind::HighPriority => "HIGH_PRIORITY",
            TokenKind::HourMicrosecond => "HOUR_MICROSECOND",
            TokenKind::HourMinute => "HOUR_MINUTE",
            TokenKind::HourSecond => "HOUR_SECOND",
            TokenKind::If => "IF",
            TokenKind::Ignore => "IGNORE",
            TokenKind::IgnoreServerIds => "IGNORE_SERVER_IDS",
            TokenKind::In => "IN",
            TokenKind::Index => "INDEX",
            TokenKind::Infile => "INFILE",
            TokenKind::Inner => "INNER",
            TokenKind::Inout => "INOUT",
            TokenKind::Insensitive => "INSENSITIVE",
            TokenKind::Insert => "INSERT",
            TokenKind::Int => "INT",
            TokenKind::Int1 => "INT1",
            TokenKind::Int2 => "INT2",
            TokenKind::Int3 => "INT3",
            TokenKind::Int4 => "INT4",
            TokenKind::Int8 => "INT8",
            TokenKind::Integer => "INTEGER",
            TokenKind::Interval => "INTERVAL",
            TokenKind::Into => "INTO",
            TokenKind::Is => "IS",
            TokenKind::Iterate => "ITERATE",
            TokenKind::Join => "JOIN",
            TokenKind::Key => "KEY",
            TokenKind::Keys => "KEYS",
            TokenKind::Kill => "KILL",
            TokenKind::Leading => "LEADING",
            TokenKind::Leave => "LEAVE",
            TokenKind::Left => "LEFT",
            TokenKind::Like => "LIKE",
            TokenKind::Limit => "LIMIT",
            TokenKind::Linear => "LINEAR",
            TokenKind::Lines => "LINES",
            TokenKind::Load => "LOAD",
            TokenKind::Localtime => "LOCALTIME",
            TokenKind::Localtimestamp => "LOCALTIMESTAMP",
            TokenKind::Lock => "LOCK",
            TokenKind::Long => "LONG",
            TokenKind::Longblob => "LONGBLOB",
            TokenKind::Longtext => "LONGTEXT",
            TokenKind::Loop => "LOOP",
            TokenKind::LowPriority => "LOW_PRIORITY",
            TokenKind::MasterHeartbeatPeriod => "MASTER_HEARTBEAT_PERIOD",
            TokenKind::MasterSslVerifyServerCert => "MASTER_SSL_VERIFY_SERVER_CERT",
            TokenKind::Match => "MATCH",
            TokenKind::Maxvalue => "MAXVALUE",
            TokenKind::Mediumblob => "MEDIUMBLOB",
            TokenKind::Mediumint => "MEDIUMINT",
            TokenKind::Mediumtext => "MEDIUMTEXT",
            TokenKind::Middleint => "MIDDLEINT",
            TokenKind::MinuteMicrosecond => "MINUTE_MICROSECOND",
            TokenKind::MinuteSecond => "MINUTE_SECOND",
            TokenKind::Mod => "MOD",
            TokenKind::Modifies => "MODIFIES",
            TokenKind::Natural => "NATURAL",
            TokenKind::Not => "NOT",
            TokenKind::NoWriteToBinlog => "NO_WRITE_TO_BINLOG",
            TokenKind::Numeric => "NUMERIC",
            TokenKind::On => "ON",
            TokenKind::Optimize => "OPTIMIZE",
            TokenKind::Option => "OPTION",
            TokenKind::Optionally => "OPTIONALLY",
            TokenKind::Or => "OR",
            TokenKind::Order => "ORDER",
            TokenKind::Out => "OUT",
            TokenKind::Outer => "OUTER",
            TokenKind::Outfile => "OUTFILE",
            TokenKind::Precision => "PRECISION",
            TokenKind::Primary => "PRIMARY",
            TokenKind::Procedure => "PROCEDURE",
            TokenKind::Purge => "PURGE",
            TokenKind::Range => "RANGE",
            TokenKind::Read => "READ",
            TokenKind::Reads => "READS",
            TokenKind::ReadWrite => "READ_WRITE",
            TokenKind::Real => "REAL",
            TokenKind::References => "REFERENCES",
            TokenKind::Regexp => "REGEXP",
            TokenKind::Release => "RELEASE",
            TokenKind::Rename => "RENAME",
            TokenKind::Repeat => "REPEAT",
            TokenKind::Replace => "REPLACE",
            TokenKind::Require => "REQUIRE",
            TokenKind::Resignal => "RESIGNAL",
            TokenKind::Restrict => "RESTRICT",
            TokenKind::Return => "RETURN",
            TokenKind::Revoke => "REVOKE",
            TokenKind::Right => "RIGHT",
            TokenKind::Rlike => "RLIKE",
            TokenKind::Schema => "SCHEMA",
            TokenKind::Schemas => "SCHEMAS",
            TokenKind::SecondMicrosecond => "SECOND_MICROSECOND",
            TokenKind::Select => "SELECT",
            TokenKind::Sensitive => "SENSITIVE",
            TokenKind::Separator => "SEPARATOR",
            TokenKind::Set => "SET",
            TokenKind::Show => "SHOW",
            TokenKind::Signal => "SIGNAL",
            TokenKind::Slow => "SLOW",
            TokenKind::Smallint => "SMALLINT",
            TokenKind::Spatial => "SPATIAL",
            TokenKind::Specific => "SPECIFIC",
            TokenKind::Sql => "SQL",
            TokenKind::Sqlexception => "SQLEXCEPTION",
            TokenKind::Sqlstate => "SQLSTATE",
            TokenKind::Sqlwarning => "SQLWARNING",
            TokenKind::SqlBigResult => "SQL_BIG_RESULT",
            TokenKind::SqlCalcFoundRows => "SQL_CALC_FOUND_ROWS",
            TokenKind::SqlSmallResult => "SQL_SMALL_RESULT",
            TokenKind::Ssl => "SSL",
            TokenKind::Starting => "STARTING",
            TokenKind::StraightJoin => "STRAIGHT_JOIN",
            TokenKind::Table => "TABLE",
            TokenKind::Terminated => "TERMINATED",
            TokenKind::Then => "THEN",
            TokenKind::Tinyblob => "TINYBLOB",
            TokenKind::Tinyint => "TINYINT",
            TokenKind::Tinytext => "TINYTEXT",
            TokenKind::To => "TO",
            TokenKind::Trailing => "TRAILING",
            TokenKind::Trigger => "TRIGGER",
            TokenKind::Undo => "UNDO",
            TokenKind::Union => "UNION",
            TokenKind::Unique => "UNIQUE",
            TokenKind::Unlock => "UNLOCK",
            TokenKind::Unsigned => "UNSIGNED",
            TokenKind::Update => "UPDATE",
            TokenKind::Usage => "USAGE",
            TokenKind::Use => "USE",
            TokenKind::Using => "USING",
            TokenKind::UtcDate => "UTC_DATE",
            TokenKind::UtcTime => "UTC_TIME",
            TokenKind::UtcTimestamp => "UTC_TIMESTAMP",
            TokenKind::Values => "VALUES",
            TokenKind::Varbinary => "VARBINARY",
            TokenKind::Varchar => "VARCHAR",
            TokenKind::Varcharacter => "VARCHARACTER",
            TokenKind::Varying => "VARYING",
            TokenKind::When => "WHEN",
            TokenKind::Where => "WHERE",
            TokenKind::While => "WHILE",
            TokenKind::With => "WITH",
            TokenKind::Write => "WRITE",
            TokenKind::Xor => "XOR",
            TokenKind::YearMonth => "YEAR_MONTH",
            TokenKind::Zerofill => "ZEROFILL",
            _ => return None,
        };
        Some(text)
    }

    /// Whether this kind is a reserved word
    pub fn is_keyword(self) -> bool {
        self.keyword_text().is_some()
    }

    /// Spelling of punctuation and operator kinds
    pub fn symbol_text(self) -> Option<&'static str> {
        let text = match self {
            TokenKind::LeftParen => "(",
            TokenKind::RightParen => ")",
            TokenKind::LeftBrace => "{",
            TokenKind::RightBrace => "}",
            TokenKind::Comma => ",",
            TokenKind::Semicolon => ";",
            TokenKind::Dot => ".",
            TokenKind::Colon => ":",
            TokenKind::Assign => ":=",
            TokenKind::Equal => "=",
            TokenKind::NullSafeEqual => "<=>",
            TokenKind::GreaterEqual => ">=",
            TokenKind::Greater => ">",
            TokenKind::LessEqual => "<=",
            TokenKind::Less => "<",
            TokenKind::NotEqual => "!=",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Star => "*",
            TokenKind::Slash => "/",
            TokenKind::Percent => "%",
            TokenKind::Caret => "^",
            TokenKind::Ampersand => "&",
            TokenKind::DoubleAmpersand => "&&",
            TokenKind::Pipe => "|",
            TokenKind::DoublePipe => "||",
            TokenKind::Tilde => "~",
            TokenKind::Exclamation => "!",
            TokenKind::ShiftLeft => "<<",
            TokenKind::ShiftRight => ">>",
            TokenKind::ParamMarker => "?",
            _ => return None,
        };
        Some(text)
    }

    /// Short human readable description for error messages
    pub fn describe(self) -> String {
        if let Some(kw) = self.keyword_text() {
            return format!("keyword {}", kw);
        }
        if let Some(sym) = self.symbol_text() {
            return format!("'{}'", sym);
        }
        match self {
            TokenKind::Eof => "end of input".into(),
            TokenKind::Identifier | TokenKind::QuotedIdentifier => "identifier".into(),
            TokenKind::Placeholder => "placeholder".into(),
            TokenKind::UserVariable => "user variable".into(),
            TokenKind::SysVariable => "system variable".into(),
            TokenKind::LiteralNull => "NULL".into(),
            TokenKind::LiteralTrue => "TRUE".into(),
            TokenKind::LiteralFalse => "FALSE".into(),
            TokenKind::LiteralInteger | TokenKind::LiteralDecimal => "number".into(),
            TokenKind::LiteralString | TokenKind::LiteralNationalString => "string literal".into(),
            TokenKind::LiteralHex => "hexadecimal literal".into(),
            TokenKind::LiteralBit => "bit-field literal".into(),
            other => format!("{:?}", other),
        }
    }
}

/// Data carried by a token besides its kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    None,
    /// Magnitude of a pure digit literal
    Integer(u128),
    /// Source text of a decimal literal (or an integer too large for `u128`)
    Decimal(String),
    /// Hex or bit digits without prefix and quotes
    Digits { digits: Bytes, quoted: bool },
    /// De-escaped string content
    Str(Bytes),
    /// Name text as written and its ASCII uppercase form
    Ident { text: String, upper: String },
    /// 1-based ordinal of a `?` marker
    Param(u32),
}

/// A classified lexical unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub payload: Payload,
    /// Byte offset of the first byte of the token
    pub offset: usize,
    /// Length of the token in the source
    pub len: usize,
}

impl Token {
    pub fn new(kind: TokenKind, payload: Payload, offset: usize, len: usize) -> Self {
        Self { kind, payload, offset, len }
    }

    pub fn eof(offset: usize) -> Self {
        Self::new(TokenKind::Eof, Payload::None, offset, 0)
    }

    pub fn integer_value(&self) -> Option<u128> {
        match self.payload {
            Payload::Integer(v) => Some(v),
            _ => None,
        }
    }

    pub fn decimal_value(&self) -> Option<&str> {
        match &self.payload {
            Payload::Decimal(text) => Some(text),
            _ => None,
        }
    }

    /// De-escaped bytes of a string literal or user variable
    pub fn string_bytes(&self) -> Option<&[u8]> {
        match &self.payload {
            Payload::Str(bytes) => Some(bytes),
            _ => None,
        }
    }

    pub fn digits(&self) -> Option<(&[u8], bool)> {
        match &self.payload {
            Payload::Digits { digits, quoted } => Some((digits, *quoted)),
            _ => None,
        }
    }

    /// Name as written (identifiers, keywords, variables, placeholders)
    pub fn identifier_text(&self) -> Option<&str> {
        match &self.payload {
            Payload::Ident { text, .. } => Some(text),
            _ => None,
        }
    }

    pub fn identifier_upper(&self) -> Option<&str> {
        match &self.payload {
            Payload::Ident { upper, .. } => Some(upper),
            _ => None,
        }
    }

    pub fn param_index(&self) -> Option<u32> {
        match self.payload {
            Payload::Param(i) => Some(i),
            _ => None,
        }
    }

    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }
}
