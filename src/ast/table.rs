//! Table references and the ORDER BY / LIMIT fragments shared by statements

use super::precedence::{JOIN, PRIMARY};
use super::{Expr, Identifier, Precedence, Query};

/// Sort order (ascending or descending)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

/// ORDER BY / GROUP BY item
#[derive(Debug, Clone, PartialEq)]
pub struct OrderByClause {
    pub expr: Expr,
    pub direction: SortOrder,
}

impl OrderByClause {
    pub fn asc(expr: Expr) -> Self {
        Self { expr, direction: SortOrder::Asc }
    }

    pub fn desc(expr: Expr) -> Self {
        Self { expr, direction: SortOrder::Desc }
    }
}

/// `LIMIT [offset,] row_count`; both are integer literals or parameters.
///
/// `LIMIT n OFFSET m` is stored the same way as `LIMIT m, n`.
#[derive(Debug, Clone, PartialEq)]
pub struct Limit {
    pub offset: Option<Expr>,
    pub row_count: Expr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexHintKind {
    Use,
    Ignore,
    Force,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexHintScope {
    Join,
    OrderBy,
    GroupBy,
}

/// `USE|IGNORE|FORCE INDEX [FOR ..] (names)`
#[derive(Debug, Clone, PartialEq)]
pub struct IndexHint {
    pub kind: IndexHintKind,
    pub scope: Option<IndexHintScope>,
    pub indexes: Vec<String>,
}

/// A named table with optional alias and index hints
#[derive(Debug, Clone, PartialEq)]
pub struct TableFactor {
    pub name: Identifier,
    pub alias: Option<String>,
    pub hints: Vec<IndexHint>,
}

impl TableFactor {
    pub fn new(name: Identifier) -> Self {
        Self { name, alias: None, hints: Vec::new() }
    }
}

/// Type of JOIN operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    Inner,
    Cross,
    Straight,
    Left,
    Right,
    Natural,
    NaturalLeft,
    NaturalRight,
}

impl JoinKind {
    pub fn keyword(self) -> &'static str {
        match self {
            JoinKind::Inner => "INNER JOIN",
            JoinKind::Cross => "CROSS JOIN",
            JoinKind::Straight => "STRAIGHT_JOIN",
            JoinKind::Left => "LEFT JOIN",
            JoinKind::Right => "RIGHT JOIN",
            JoinKind::Natural => "NATURAL JOIN",
            JoinKind::NaturalLeft => "NATURAL LEFT JOIN",
            JoinKind::NaturalRight => "NATURAL RIGHT JOIN",
        }
    }

    /// Natural joins take no ON / USING
    pub fn is_natural(self) -> bool {
        matches!(self, JoinKind::Natural | JoinKind::NaturalLeft | JoinKind::NaturalRight)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum JoinCondition {
    On(Expr),
    Using(Vec<String>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Join {
    pub kind: JoinKind,
    pub left: TableRef,
    pub right: TableRef,
    pub condition: Option<JoinCondition>,
}

/// Element of a FROM list
#[derive(Debug, Clone, PartialEq)]
pub enum TableRef {
    Factor(TableFactor),
    /// `(SELECT ..) [AS] alias`
    Subquery { query: Box<Query>, alias: String },
    Join(Box<Join>),
}

impl TableRef {
    pub fn table(name: impl Into<String>) -> Self {
        TableRef::Factor(TableFactor::new(Identifier::new(name)))
    }

    pub fn join(kind: JoinKind, left: TableRef, right: TableRef, condition: Option<JoinCondition>) -> Self {
        TableRef::Join(Box::new(Join { kind, left, right, condition }))
    }

    pub fn precedence(&self) -> Precedence {
        match self {
            TableRef::Join(_) => JOIN,
            _ => PRIMARY,
        }
    }
}
