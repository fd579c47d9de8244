//! Expression nodes

use super::precedence::*;
use super::{OrderByClause, Precedence, Query};

/// Literal values
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Null,
    Boolean(bool),
    /// Unsigned digit run; negative numbers are a unary minus over this
    Integer(u128),
    /// Decimal text as written (`1.5`, `2e10`, or an integer too large for `u128`)
    Decimal(String),
    String(StringLiteral),
    /// Hex digits without prefix; `quoted` for the `x'..'` form
    Hex { digits: String, quoted: bool },
    /// Binary digits without prefix; `quoted` for the `b'..'` form
    Bit { digits: String, quoted: bool },
}

/// A string literal after escape processing and concatenation of adjacent parts
#[derive(Debug, Clone, PartialEq)]
pub struct StringLiteral {
    pub value: String,
    /// Charset introducer such as `_utf8`, without the underscore
    pub introducer: Option<String>,
    /// `N'..'` form
    pub national: bool,
}

/// Column, table or schema name, with an optional qualifying parent.
///
/// `db.tb.col` is `col` whose parent is `tb` whose parent is `db`. An
/// unquoted `*` name is the wildcard of `*` or `tb.*`.
#[derive(Debug, Clone, PartialEq)]
pub struct Identifier {
    pub parent: Option<Box<Identifier>>,
    pub name: String,
    /// Written with back-ticks
    pub quoted: bool,
}

impl Identifier {
    pub fn new(name: impl Into<String>) -> Self {
        Self { parent: None, name: name.into(), quoted: false }
    }

    pub fn quoted(name: impl Into<String>) -> Self {
        Self { parent: None, name: name.into(), quoted: true }
    }

    pub fn wildcard() -> Self {
        Self::new("*")
    }

    /// Qualify this name with `parent`
    pub fn with_parent(mut self, parent: Identifier) -> Self {
        self.parent = Some(Box::new(parent));
        self
    }

    pub fn is_wildcard(&self) -> bool {
        !self.quoted && self.name == "*"
    }

    /// Names from the outermost qualifier down to this one
    pub fn parts(&self) -> Vec<&str> {
        let mut parts = match &self.parent {
            Some(parent) => parent.parts(),
            None => Vec::new(),
        };
        parts.push(&self.name);
        parts
    }
}

/// `?` with its 1-based position in the source text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamMarker {
    pub index: u32,
}

/// `${name}` substituted at output time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableScope {
    Global,
    Session,
    Local,
}

impl VariableScope {
    pub fn from_keyword(upper: &str) -> Option<Self> {
        match upper {
            "GLOBAL" => Some(VariableScope::Global),
            "SESSION" => Some(VariableScope::Session),
            "LOCAL" => Some(VariableScope::Local),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            VariableScope::Global => "global",
            VariableScope::Session => "session",
            VariableScope::Local => "local",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// `-`
    Minus,
    /// `~`
    BitNot,
    /// `NOT`
    Not,
    /// `!`
    Bang,
    /// `BINARY`
    Binary,
}

impl UnaryOp {
    pub fn precedence(self) -> Precedence {
        match self {
            UnaryOp::Not => LOGICAL_NOT,
            UnaryOp::Binary => BINARY,
            UnaryOp::Minus | UnaryOp::BitNot | UnaryOp::Bang => UNARY,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            UnaryOp::Minus => "-",
            UnaryOp::BitNot => "~",
            UnaryOp::Not => "NOT",
            UnaryOp::Bang => "!",
            UnaryOp::Binary => "BINARY",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    /// `:=`
    Assign,
    Xor,
    Equal,
    NullSafeEqual,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    Like,
    NotLike,
    Regexp,
    NotRegexp,
    BitOr,
    BitAnd,
    ShiftLeft,
    ShiftRight,
    Plus,
    Minus,
    Multiply,
    Divide,
    /// `DIV`
    IntDivide,
    /// `%` / `MOD`
    Modulo,
    /// `^`
    BitXor,
}

impl BinaryOp {
    pub fn precedence(self) -> Precedence {
        use BinaryOp::*;
        match self {
            Assign => ASSIGNMENT,
            Xor => LOGICAL_XOR,
            Equal | NullSafeEqual | NotEqual | Less | LessEqual | Greater | GreaterEqual => {
                COMPARISON
            }
            Like | NotLike | Regexp | NotRegexp => PREDICATE,
            BitOr => BIT_OR,
            BitAnd => BIT_AND,
            ShiftLeft | ShiftRight => BIT_SHIFT,
            Plus | Minus => ARITHMETIC_TERM,
            Multiply | Divide | IntDivide | Modulo => ARITHMETIC_FACTOR,
            BitXor => BIT_XOR,
        }
    }

    /// `a op b op c` groups as `(a op b) op c`
    pub fn left_combine(self) -> bool {
        self != BinaryOp::Assign
    }

    pub fn is_comparison(self) -> bool {
        self.precedence() == COMPARISON
    }

    pub fn symbol(self) -> &'static str {
        use BinaryOp::*;
        match self {
            Assign => ":=",
            Xor => "XOR",
            Equal => "=",
            NullSafeEqual => "<=>",
            NotEqual => "!=",
            Less => "<",
            LessEqual => "<=",
            Greater => ">",
            GreaterEqual => ">=",
            Like => "LIKE",
            NotLike => "NOT LIKE",
            Regexp => "REGEXP",
            NotRegexp => "NOT REGEXP",
            BitOr => "|",
            BitAnd => "&",
            ShiftLeft => "<<",
            ShiftRight => ">>",
            Plus => "+",
            Minus => "-",
            Multiply => "*",
            Divide => "/",
            IntDivide => "DIV",
            Modulo => "%",
            BitXor => "^",
        }
    }
}

/// Three-operand predicates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TernaryOp {
    Between,
    NotBetween,
    /// `a LIKE b ESCAPE c`
    LikeEscape,
    NotLikeEscape,
}

impl TernaryOp {
    /// Keywords before the second and third operand
    pub fn keywords(self) -> (&'static str, &'static str) {
        match self {
            TernaryOp::Between => ("BETWEEN", "AND"),
            TernaryOp::NotBetween => ("NOT BETWEEN", "AND"),
            TernaryOp::LikeEscape => ("LIKE", "ESCAPE"),
            TernaryOp::NotLikeEscape => ("NOT LIKE", "ESCAPE"),
        }
    }
}

/// Operators collecting a flat list of operands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolyadicOp {
    And,
    Or,
}

impl PolyadicOp {
    pub fn precedence(self) -> Precedence {
        match self {
            PolyadicOp::And => LOGICAL_AND,
            PolyadicOp::Or => LOGICAL_OR,
        }
    }

    pub fn keyword(self) -> &'static str {
        match self {
            PolyadicOp::And => "AND",
            PolyadicOp::Or => "OR",
        }
    }
}

/// Right-hand side of `IS [NOT]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IsTest {
    Null,
    True,
    False,
    Unknown,
}

impl IsTest {
    pub fn keyword(self) -> &'static str {
        match self {
            IsTest::Null => "NULL",
            IsTest::True => "TRUE",
            IsTest::False => "FALSE",
            IsTest::Unknown => "UNKNOWN",
        }
    }
}

/// Right-hand side of `IN`
#[derive(Debug, Clone, PartialEq)]
pub enum InSet {
    List(Vec<Expr>),
    Subquery(Box<Query>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quantifier {
    Any,
    Some,
    All,
}

impl Quantifier {
    pub fn keyword(self) -> &'static str {
        match self {
            Quantifier::Any => "ANY",
            Quantifier::Some => "SOME",
            Quantifier::All => "ALL",
        }
    }
}

/// Units of `INTERVAL`, `EXTRACT`, `TIMESTAMPADD` and `TIMESTAMPDIFF`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntervalUnit {
    Microsecond,
    Second,
    Minute,
    Hour,
    Day,
    Week,
    Month,
    Quarter,
    Year,
    SecondMicrosecond,
    MinuteMicrosecond,
    MinuteSecond,
    HourMicrosecond,
    HourSecond,
    HourMinute,
    DayMicrosecond,
    DaySecond,
    DayMinute,
    DayHour,
    YearMonth,
}

impl IntervalUnit {
    const ALL: [(IntervalUnit, &'static str); 20] = [
        (IntervalUnit::Microsecond, "MICROSECOND"),
        (IntervalUnit::Second, "SECOND"),
        (IntervalUnit::Minute, "MINUTE"),
        (IntervalUnit::Hour, "HOUR"),
        (IntervalUnit::Day, "DAY"),
        (IntervalUnit::Week, "WEEK"),
        (IntervalUnit::Month, "MONTH"),
        (IntervalUnit::Quarter, "QUARTER"),
        (IntervalUnit::Year, "YEAR"),
        (IntervalUnit::SecondMicrosecond, "SECOND_MICROSECOND"),
        (IntervalUnit::MinuteMicrosecond, "MINUTE_MICROSECOND"),
        (IntervalUnit::MinuteSecond, "MINUTE_SECOND"),
        (IntervalUnit::HourMicrosecond, "HOUR_MICROSECOND"),
        (IntervalUnit::HourSecond, "HOUR_SECOND"),
        (IntervalUnit::HourMinute, "HOUR_MINUTE"),
        (IntervalUnit::DayMicrosecond, "DAY_MICROSECOND"),
        (IntervalUnit::DaySecond, "DAY_SECOND"),
        (IntervalUnit::DayMinute, "DAY_MINUTE"),
        (IntervalUnit::DayHour, "DAY_HOUR"),
        (IntervalUnit::YearMonth, "YEAR_MONTH"),
    ];

    pub fn from_keyword(upper: &str) -> Option<Self> {
        // MySQL accepts the SQL_TSI_ prefix in TIMESTAMPADD/TIMESTAMPDIFF
        let upper = upper.strip_prefix("SQL_TSI_").unwrap_or(upper);
        Self::ALL.iter().find(|(_, kw)| *kw == upper).map(|(unit, _)| *unit)
    }

    pub fn keyword(self) -> &'static str {
        Self::ALL
            .iter()
            .find(|(unit, _)| *unit == self)
            .map(|(_, kw)| *kw)
            .unwrap_or("SECOND")
    }
}

/// Target type of `CAST(.. AS type)` and `CONVERT(.., type)`
#[derive(Debug, Clone, PartialEq)]
pub struct CastType {
    /// `BINARY`, `CHAR`, `DATE`, `DATETIME`, `TIME`, `DECIMAL`, `SIGNED` or `UNSIGNED`
    pub name: String,
    pub length: Option<u64>,
    pub scale: Option<u64>,
    /// `CHAR(n) CHARACTER SET cs`
    pub charset: Option<String>,
}

impl CastType {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), length: None, scale: None, charset: None }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConvertTarget {
    Type(CastType),
    /// `CONVERT(.. USING cs)`
    Charset(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrimMode {
    Both,
    Leading,
    Trailing,
}

impl TrimMode {
    pub fn keyword(self) -> &'static str {
        match self {
            TrimMode::Both => "BOTH",
            TrimMode::Leading => "LEADING",
            TrimMode::Trailing => "TRAILING",
        }
    }
}

/// A regular function call `name(args)`, optionally `name(DISTINCT args)`
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionCall {
    pub name: String,
    pub args: Vec<Expr>,
    pub distinct: bool,
}

/// `CASE [operand] WHEN .. THEN .. [ELSE ..] END`
#[derive(Debug, Clone, PartialEq)]
pub struct CaseExpr {
    pub operand: Option<Box<Expr>>,
    pub whens: Vec<(Expr, Expr)>,
    pub else_result: Option<Box<Expr>>,
}

/// `GROUP_CONCAT([DISTINCT] args [ORDER BY ..] [SEPARATOR '..'])`
#[derive(Debug, Clone, PartialEq)]
pub struct GroupConcat {
    pub distinct: bool,
    pub args: Vec<Expr>,
    pub order_by: Vec<OrderByClause>,
    pub separator: Option<String>,
}

/// Expression tree
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(Literal),
    Identifier(Identifier),
    ParamMarker(ParamMarker),
    Placeholder(Placeholder),
    /// `@name`
    UserVariable(String),
    /// `@@[scope.]name`
    SysVariable { scope: Option<VariableScope>, name: String },
    Unary { op: UnaryOp, operand: Box<Expr> },
    Binary { op: BinaryOp, left: Box<Expr>, right: Box<Expr> },
    Ternary { op: TernaryOp, first: Box<Expr>, second: Box<Expr>, third: Box<Expr> },
    /// AND / OR chains with two or more operands
    Polyadic { op: PolyadicOp, operands: Vec<Expr> },
    Is { operand: Box<Expr>, not: bool, test: IsTest },
    In { operand: Box<Expr>, not: bool, set: InSet },
    /// `left op ANY|SOME|ALL (subquery)`
    Quantified { op: BinaryOp, quantifier: Quantifier, left: Box<Expr>, subquery: Box<Query> },
    Exists(Box<Query>),
    Subquery(Box<Query>),
    Row(Vec<Expr>),
    Case(CaseExpr),
    Interval { value: Box<Expr>, unit: IntervalUnit },
    Collate { operand: Box<Expr>, collation: String },
    /// Bare `DEFAULT` in a value list
    Default,
    Function(FunctionCall),
    /// `COUNT(*)` when `args` is empty
    Count { distinct: bool, args: Vec<Expr> },
    Cast { operand: Box<Expr>, target: CastType },
    Convert { operand: Box<Expr>, target: ConvertTarget },
    Trim { mode: Option<TrimMode>, remove: Option<Box<Expr>>, string: Box<Expr> },
    Extract { unit: IntervalUnit, operand: Box<Expr> },
    GroupConcat(GroupConcat),
    TimestampAdd { unit: IntervalUnit, interval: Box<Expr>, timestamp: Box<Expr> },
    TimestampDiff { unit: IntervalUnit, start: Box<Expr>, end: Box<Expr> },
    /// `CHAR(args [USING cs])`
    Char { args: Vec<Expr>, charset: Option<String> },
    /// `POSITION(needle IN haystack)`
    Position { needle: Box<Expr>, haystack: Box<Expr> },
    Substring { string: Box<Expr>, from: Box<Expr>, length: Option<Box<Expr>> },
    /// Keyword functions called without parentheses (`CURRENT_TIMESTAMP`)
    Niladic(String),
}

impl Expr {
    /// Precedence used for output parenthesization
    pub fn precedence(&self) -> Precedence {
        match self {
            Expr::Unary { op, .. } => op.precedence(),
            Expr::Binary { op, .. } => op.precedence(),
            Expr::Ternary { .. } | Expr::In { .. } => PREDICATE,
            Expr::Polyadic { op, .. } => op.precedence(),
            Expr::Is { .. } | Expr::Quantified { .. } => COMPARISON,
            Expr::Collate { .. } => COLLATE,
            _ => PRIMARY,
        }
    }

    /// Whether repeated operators at this level group to the left
    pub fn left_combine(&self) -> bool {
        match self {
            Expr::Binary { op, .. } => op.left_combine(),
            _ => true,
        }
    }

    pub fn null() -> Self {
        Expr::Literal(Literal::Null)
    }

    pub fn boolean(value: bool) -> Self {
        Expr::Literal(Literal::Boolean(value))
    }

    pub fn int(value: u128) -> Self {
        Expr::Literal(Literal::Integer(value))
    }

    pub fn decimal(text: impl Into<String>) -> Self {
        Expr::Literal(Literal::Decimal(text.into()))
    }

    pub fn string(value: impl Into<String>) -> Self {
        Expr::Literal(Literal::String(StringLiteral {
            value: value.into(),
            introducer: None,
            national: false,
        }))
    }

    pub fn ident(name: impl Into<String>) -> Self {
        Expr::Identifier(Identifier::new(name))
    }

    /// `parent.name`
    pub fn qualified(parent: impl Into<String>, name: impl Into<String>) -> Self {
        Expr::Identifier(Identifier::new(name).with_parent(Identifier::new(parent)))
    }

    pub fn param(index: u32) -> Self {
        Expr::ParamMarker(ParamMarker { index })
    }

    pub fn placeholder(name: impl Into<String>) -> Self {
        Expr::Placeholder(Placeholder { name: name.into() })
    }

    pub fn unary(op: UnaryOp, operand: Expr) -> Self {
        Expr::Unary { op, operand: Box::new(operand) }
    }

    pub fn binary(op: BinaryOp, left: Expr, right: Expr) -> Self {
        Expr::Binary { op, left: Box::new(left), right: Box::new(right) }
    }

    pub fn ternary(op: TernaryOp, first: Expr, second: Expr, third: Expr) -> Self {
        Expr::Ternary {
            op,
            first: Box::new(first),
            second: Box::new(second),
            third: Box::new(third),
        }
    }

    pub fn between(operand: Expr, low: Expr, high: Expr) -> Self {
        Self::ternary(TernaryOp::Between, operand, low, high)
    }

    pub fn polyadic(op: PolyadicOp, operands: Vec<Expr>) -> Self {
        Expr::Polyadic { op, operands }
    }

    pub fn is(operand: Expr, not: bool, test: IsTest) -> Self {
        Expr::Is { operand: Box::new(operand), not, test }
    }

    pub fn in_list(operand: Expr, not: bool, list: Vec<Expr>) -> Self {
        Expr::In { operand: Box::new(operand), not, set: InSet::List(list) }
    }

    pub fn function(name: impl Into<String>, args: Vec<Expr>) -> Self {
        Expr::Function(FunctionCall { name: name.into(), args, distinct: false })
    }

    pub fn subquery(query: Query) -> Self {
        Expr::Subquery(Box::new(query))
    }

    pub fn collate(operand: Expr, collation: impl Into<String>) -> Self {
        Expr::Collate { operand: Box::new(operand), collation: collation.into() }
    }
}
