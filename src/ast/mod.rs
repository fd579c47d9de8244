//! Syntax tree for the MySQL dialect
//!
//! Nodes own their children outright: every constructor takes already-built
//! children by value, so a node has exactly one parent and the tree cannot
//! contain shared or cyclic references.
//!
//! Each expression reports a fixed precedence level and whether it combines
//! to the left. These are used only to decide where regenerated SQL needs
//! parentheses; the grammar builds trees already correctly shaped.

pub mod eval;
mod expr;
mod stmt;
mod table;

pub use self::expr::*;
pub use self::stmt::*;
pub use self::table::*;

use crate::visitor::Visitor;

/// Binding strength of an expression, low to high
pub type Precedence = u8;

/// Precedence levels
pub mod precedence {
    use super::Precedence;

    pub const QUERY: Precedence = 0;
    pub const ASSIGNMENT: Precedence = 1;
    pub const LOGICAL_OR: Precedence = 2;
    pub const LOGICAL_XOR: Precedence = 3;
    pub const LOGICAL_AND: Precedence = 4;
    pub const LOGICAL_NOT: Precedence = 5;
    pub const COMPARISON: Precedence = 6;
    /// BETWEEN, LIKE, REGEXP, IN
    pub const PREDICATE: Precedence = 7;
    pub const BIT_OR: Precedence = 8;
    pub const BIT_AND: Precedence = 9;
    pub const BIT_SHIFT: Precedence = 10;
    pub const ARITHMETIC_TERM: Precedence = 11;
    pub const ARITHMETIC_FACTOR: Precedence = 12;
    pub const BIT_XOR: Precedence = 13;
    pub const UNARY: Precedence = 14;
    pub const BINARY: Precedence = 15;
    pub const COLLATE: Precedence = 16;
    pub const PRIMARY: Precedence = 17;

    /// Join of two table references
    pub const JOIN: Precedence = 1;
}

/// Double dispatch entry point: a node calls the visitor method for its own type
pub trait Accept {
    fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V);
}

macro_rules! impl_accept {
    ($($node:ty => $method:ident),* $(,)?) => {
        $(
            impl Accept for $node {
                fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V) {
                    visitor.$method(self);
                }
            }
        )*
    };
}

impl_accept! {
    Statement => visit_statement,
    Query => visit_query,
    Select => visit_select,
    Union => visit_union,
    SelectItem => visit_select_item,
    Expr => visit_expr,
    Literal => visit_literal,
    Identifier => visit_identifier,
    ParamMarker => visit_param_marker,
    Placeholder => visit_placeholder,
    FunctionCall => visit_function,
    TableRef => visit_table_ref,
    TableFactor => visit_table_factor,
    Join => visit_join,
    OrderByClause => visit_order_by,
    Limit => visit_limit,
    Assignment => visit_assignment,
    InsertStmt => visit_insert,
    UpdateStmt => visit_update,
    DeleteStmt => visit_delete,
    CreateTableStmt => visit_create_table,
    ColumnDef => visit_column_def,
    AlterTableStmt => visit_alter_table,
}
