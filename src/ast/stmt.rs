//! Statement nodes

use super::{Expr, Identifier, Limit, OrderByClause, TableRef};

//=============================================================================
// Queries
//=============================================================================

/// SELECT modifiers other than DISTINCT
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectOption {
    HighPriority,
    StraightJoin,
    SqlSmallResult,
    SqlBigResult,
    SqlBufferResult,
    SqlCache,
    SqlNoCache,
    SqlCalcFoundRows,
}

impl SelectOption {
    pub fn from_keyword(upper: &str) -> Option<Self> {
        match upper {
            "HIGH_PRIORITY" => Some(SelectOption::HighPriority),
            "STRAIGHT_JOIN" => Some(SelectOption::StraightJoin),
            "SQL_SMALL_RESULT" => Some(SelectOption::SqlSmallResult),
            "SQL_BIG_RESULT" => Some(SelectOption::SqlBigResult),
            "SQL_BUFFER_RESULT" => Some(SelectOption::SqlBufferResult),
            "SQL_CACHE" => Some(SelectOption::SqlCache),
            "SQL_NO_CACHE" => Some(SelectOption::SqlNoCache),
            "SQL_CALC_FOUND_ROWS" => Some(SelectOption::SqlCalcFoundRows),
            _ => None,
        }
    }

    pub fn keyword(self) -> &'static str {
        match self {
            SelectOption::HighPriority => "HIGH_PRIORITY",
            SelectOption::StraightJoin => "STRAIGHT_JOIN",
            SelectOption::SqlSmallResult => "SQL_SMALL_RESULT",
            SelectOption::SqlBigResult => "SQL_BIG_RESULT",
            SelectOption::SqlBufferResult => "SQL_BUFFER_RESULT",
            SelectOption::SqlCache => "SQL_CACHE",
            SelectOption::SqlNoCache => "SQL_NO_CACHE",
            SelectOption::SqlCalcFoundRows => "SQL_CALC_FOUND_ROWS",
        }
    }
}

/// Row locking clause
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockMode {
    /// `FOR UPDATE`
    ForUpdate,
    /// `LOCK IN SHARE MODE`
    ShareMode,
}

/// Select list entry; `*` and `t.*` are wildcard identifiers
#[derive(Debug, Clone, PartialEq)]
pub struct SelectItem {
    pub expr: Expr,
    pub alias: Option<String>,
}

/// SELECT statement
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Select {
    pub distinct: bool,
    pub options: Vec<SelectOption>,
    pub columns: Vec<SelectItem>,
    pub from: Vec<TableRef>,
    pub where_clause: Option<Expr>,
    pub group_by: Vec<OrderByClause>,
    pub with_rollup: bool,
    pub having: Option<Expr>,
    pub order_by: Vec<OrderByClause>,
    pub limit: Option<Limit>,
    pub lock: Option<LockMode>,
}

impl Select {
    /// Whether the select needs parentheses to be a UNION term
    pub fn has_trailing_clauses(&self) -> bool {
        !self.order_by.is_empty() || self.limit.is_some() || self.lock.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnionKind {
    /// Plain `UNION`
    Default,
    All,
    Distinct,
}

impl UnionKind {
    pub fn keyword(self) -> &'static str {
        match self {
            UnionKind::Default => "UNION",
            UnionKind::All => "UNION ALL",
            UnionKind::Distinct => "UNION DISTINCT",
        }
    }
}

/// `select UNION [ALL] select ... [ORDER BY ..] [LIMIT ..]`
#[derive(Debug, Clone, PartialEq)]
pub struct Union {
    pub first: Select,
    pub rest: Vec<(UnionKind, Select)>,
    pub order_by: Vec<OrderByClause>,
    pub limit: Option<Limit>,
}

impl Union {
    /// All terms in source order
    pub fn selects(&self) -> impl Iterator<Item = &Select> {
        std::iter::once(&self.first).chain(self.rest.iter().map(|(_, s)| s))
    }
}

/// A query expression
#[derive(Debug, Clone, PartialEq)]
pub enum Query {
    Select(Box<Select>),
    Union(Box<Union>),
}

impl Query {
    pub fn select(select: Select) -> Self {
        Query::Select(Box::new(select))
    }
}

//=============================================================================
// DML
//=============================================================================

/// `column = value` in SET lists and ON DUPLICATE KEY UPDATE
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub column: Identifier,
    pub value: Expr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertPriority {
    LowPriority,
    Delayed,
    HighPriority,
}

impl InsertPriority {
    pub fn keyword(self) -> &'static str {
        match self {
            InsertPriority::LowPriority => "LOW_PRIORITY",
            InsertPriority::Delayed => "DELAYED",
            InsertPriority::HighPriority => "HIGH_PRIORITY",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum InsertSource {
    Values(Vec<Vec<Expr>>),
    Set(Vec<Assignment>),
    Query(Box<Query>),
}

/// INSERT or REPLACE statement
#[derive(Debug, Clone, PartialEq)]
pub struct InsertStmt {
    pub priority: Option<InsertPriority>,
    pub ignore: bool,
    pub table: Identifier,
    pub columns: Vec<Identifier>,
    pub source: InsertSource,
    /// Always empty for REPLACE
    pub on_duplicate: Vec<Assignment>,
}

/// UPDATE statement, single or multi-table
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateStmt {
    pub low_priority: bool,
    pub ignore: bool,
    pub tables: Vec<TableRef>,
    pub assignments: Vec<Assignment>,
    pub where_clause: Option<Expr>,
    pub order_by: Vec<OrderByClause>,
    pub limit: Option<Limit>,
}

/// DELETE statement.
///
/// Single-table form has no `targets`. The multi-table forms are
/// `DELETE targets FROM from ..` and `DELETE FROM targets USING from ..`.
#[derive(Debug, Clone, PartialEq)]
pub struct DeleteStmt {
    pub low_priority: bool,
    pub quick: bool,
    pub ignore: bool,
    pub targets: Vec<Identifier>,
    pub from: Vec<TableRef>,
    pub using: bool,
    pub where_clause: Option<Expr>,
    pub order_by: Vec<OrderByClause>,
    pub limit: Option<Limit>,
}

/// `SET target = value`; target is a user, system or local variable
#[derive(Debug, Clone, PartialEq)]
pub struct SetAssignment {
    pub target: Expr,
    pub value: Expr,
}

//=============================================================================
// DDL
//=============================================================================

/// Column or variable type
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DataType {
    /// Uppercase type name (`INT`, `VARCHAR`, `DECIMAL`, ...)
    pub name: String,
    /// Length / precision / scale
    pub args: Vec<u64>,
    /// ENUM / SET members
    pub values: Vec<String>,
    pub unsigned: bool,
    pub zerofill: bool,
    pub charset: Option<String>,
    pub collation: Option<String>,
}

impl DataType {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Self::default() }
    }
}

/// Column definition in CREATE TABLE / ALTER TABLE
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDef {
    pub name: String,
    pub data_type: DataType,
    /// `Some(false)` for NOT NULL, `Some(true)` for an explicit NULL
    pub nullable: Option<bool>,
    pub default: Option<Expr>,
    pub on_update: Option<Expr>,
    pub auto_increment: bool,
    pub unique: bool,
    pub primary_key: bool,
    pub comment: Option<String>,
}

impl ColumnDef {
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            nullable: None,
            default: None,
            on_update: None,
            auto_increment: false,
            unique: false,
            primary_key: false,
            comment: None,
        }
    }
}

/// Column of an index, with optional prefix length
#[derive(Debug, Clone, PartialEq)]
pub struct IndexColumn {
    pub name: String,
    pub length: Option<u64>,
    pub direction: Option<super::SortOrder>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyKind {
    Primary,
    Unique,
    Index,
    Fulltext,
}

/// Index constraint in a table definition
#[derive(Debug, Clone, PartialEq)]
pub struct KeyDef {
    pub kind: KeyKind,
    /// `CONSTRAINT name`
    pub constraint: Option<String>,
    pub name: Option<String>,
    pub columns: Vec<IndexColumn>,
}

/// `FOREIGN KEY (..) REFERENCES t (..) [ON DELETE ..] [ON UPDATE ..]`
#[derive(Debug, Clone, PartialEq)]
pub struct ForeignKeyDef {
    pub constraint: Option<String>,
    pub name: Option<String>,
    pub columns: Vec<String>,
    pub ref_table: Identifier,
    pub ref_columns: Vec<String>,
    /// `RESTRICT`, `CASCADE`, `SET NULL` or `NO ACTION`
    pub on_delete: Option<String>,
    pub on_update: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TableElement {
    Column(ColumnDef),
    Key(KeyDef),
    ForeignKey(ForeignKeyDef),
}

/// `ENGINE=InnoDB`, `DEFAULT CHARSET=utf8`, `COMMENT='..'`, ...
#[derive(Debug, Clone, PartialEq)]
pub struct TableOption {
    /// Uppercase option name
    pub name: String,
    pub value: Expr,
}

/// CREATE TABLE statement
#[derive(Debug, Clone, PartialEq)]
pub struct CreateTableStmt {
    pub temporary: bool,
    pub if_not_exists: bool,
    pub name: Identifier,
    pub elements: Vec<TableElement>,
    pub options: Vec<TableOption>,
}

/// CREATE INDEX statement
#[derive(Debug, Clone, PartialEq)]
pub struct CreateIndexStmt {
    pub unique: bool,
    pub name: String,
    pub table: Identifier,
    pub columns: Vec<IndexColumn>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ColumnPosition {
    First,
    After(String),
}

/// ALTER TABLE actions
#[derive(Debug, Clone, PartialEq)]
pub enum AlterAction {
    AddColumn { column: ColumnDef, position: Option<ColumnPosition> },
    DropColumn(String),
    ModifyColumn { column: ColumnDef, position: Option<ColumnPosition> },
    ChangeColumn { old_name: String, column: ColumnDef, position: Option<ColumnPosition> },
    AddKey(KeyDef),
    AddForeignKey(ForeignKeyDef),
    DropIndex(String),
    DropPrimaryKey,
    DropForeignKey(String),
    RenameTo(Identifier),
    /// Table option such as a storage engine change
    Option(TableOption),
}

/// ALTER TABLE statement
#[derive(Debug, Clone, PartialEq)]
pub struct AlterTableStmt {
    pub table: Identifier,
    pub actions: Vec<AlterAction>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropBehavior {
    Restrict,
    Cascade,
}

//=============================================================================
// Compound statements
//=============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerAction {
    Continue,
    Exit,
    Undo,
}

impl HandlerAction {
    pub fn keyword(self) -> &'static str {
        match self {
            HandlerAction::Continue => "CONTINUE",
            HandlerAction::Exit => "EXIT",
            HandlerAction::Undo => "UNDO",
        }
    }
}

/// Condition named in DECLARE .. CONDITION / HANDLER / SIGNAL
#[derive(Debug, Clone, PartialEq)]
pub enum ConditionValue {
    ErrorCode(u64),
    SqlState(String),
    Name(String),
    SqlWarning,
    NotFound,
    SqlException,
}

/// `SET MESSAGE_TEXT = ..` item of SIGNAL / RESIGNAL
#[derive(Debug, Clone, PartialEq)]
pub struct SignalItem {
    /// Uppercase condition information item name
    pub name: String,
    pub value: Expr,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SignalStmt {
    pub condition: Option<ConditionValue>,
    pub items: Vec<SignalItem>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticsArea {
    Current,
    Stacked,
}

/// `target = ITEM_NAME` of GET DIAGNOSTICS
#[derive(Debug, Clone, PartialEq)]
pub struct DiagnosticsItem {
    pub target: Expr,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GetDiagnosticsStmt {
    pub area: Option<DiagnosticsArea>,
    /// `CONDITION n`; statement information when absent
    pub condition: Option<Expr>,
    pub items: Vec<DiagnosticsItem>,
}

/// Branch of IF / CASE statements
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionalBranch {
    pub condition: Expr,
    pub body: Vec<Statement>,
}

//=============================================================================
// Statement
//=============================================================================

/// Top-level SQL statement
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Select(Query),
    Insert(InsertStmt),
    Replace(InsertStmt),
    Update(UpdateStmt),
    Delete(DeleteStmt),
    Call { name: Identifier, args: Vec<Expr> },
    Set(Vec<SetAssignment>),
    /// `SET NAMES cs [COLLATE c]`
    SetNames { charset: String, collation: Option<String> },
    Use(String),
    ShowTables { full: bool, database: Option<String>, like: Option<String> },
    ShowDatabases { like: Option<String> },
    Describe(Identifier),
    StartTransaction,
    Commit,
    Rollback,
    CreateTable(CreateTableStmt),
    CreateIndex(CreateIndexStmt),
    AlterTable(AlterTableStmt),
    DropTable { temporary: bool, if_exists: bool, tables: Vec<Identifier>, behavior: Option<DropBehavior> },
    DropIndex { name: String, table: Identifier },
    Truncate(Identifier),
    RenameTable(Vec<(Identifier, Identifier)>),
    /// `[label:] BEGIN .. END [label]`
    Block { label: Option<String>, body: Vec<Statement> },
    If { branches: Vec<ConditionalBranch>, else_body: Option<Vec<Statement>> },
    Case { operand: Option<Expr>, branches: Vec<ConditionalBranch>, else_body: Option<Vec<Statement>> },
    Loop { label: Option<String>, body: Vec<Statement> },
    While { label: Option<String>, condition: Expr, body: Vec<Statement> },
    Repeat { label: Option<String>, body: Vec<Statement>, until: Expr },
    Leave(String),
    Iterate(String),
    Return(Expr),
    DeclareVariable { names: Vec<String>, data_type: DataType, default: Option<Expr> },
    DeclareCondition { name: String, value: ConditionValue },
    DeclareCursor { name: String, query: Box<Query> },
    DeclareHandler { action: HandlerAction, conditions: Vec<ConditionValue>, body: Box<Statement> },
    Open(String),
    Fetch { cursor: String, into: Vec<String> },
    Close(String),
    Signal(SignalStmt),
    Resignal(SignalStmt),
    GetDiagnostics(GetDiagnosticsStmt),
}
