//! Visitor dispatch over the syntax tree
//!
//! [`Visitor`] has one `visit_*` method per node type. Each default
//! implementation calls the matching `walk_*` function, which visits every
//! child in declaration order. A visitor overrides only the node types it
//! cares about and calls the `walk_*` function itself when it still wants
//! the children visited.
//!
//! `enter` / `leave` bracket the walk of every node that has children, so a
//! visitor can keep a [`DepthCounter`] to tell top-level from nested nodes.

use crate::ast::*;

mod collect;
mod output;

pub use self::collect::{ParamCollector, TableCollector, TableUse};
pub use self::output::OutputVisitor;

/// Current recursion depth of a walk
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DepthCounter {
    depth: usize,
    max: usize,
}

impl DepthCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self) {
        self.depth += 1;
        self.max = self.max.max(self.depth);
    }

    pub fn pop(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Deepest level reached so far
    pub fn max_depth(&self) -> usize {
        self.max
    }
}

/// Measures nesting by counting enter/leave
impl Visitor for DepthCounter {
    fn enter(&mut self) {
        self.push();
    }

    fn leave(&mut self) {
        self.pop();
    }
}

/// One method per node type; defaults walk the children
#[allow(unused_variables)]
pub trait Visitor {
    fn enter(&mut self) {}
    fn leave(&mut self) {}

    fn visit_statement(&mut self, stmt: &Statement) {
        walk_statement(self, stmt);
    }
    fn visit_query(&mut self, query: &Query) {
        walk_query(self, query);
    }
    fn visit_select(&mut self, select: &Select) {
        walk_select(self, select);
    }
    fn visit_union(&mut self, union: &Union) {
        walk_union(self, union);
    }
    fn visit_select_item(&mut self, item: &SelectItem) {
        walk_select_item(self, item);
    }
    fn visit_expr(&mut self, expr: &Expr) {
        walk_expr(self, expr);
    }
    fn visit_literal(&mut self, literal: &Literal) {}
    fn visit_identifier(&mut self, ident: &Identifier) {
        walk_identifier(self, ident);
    }
    fn visit_param_marker(&mut self, param: &ParamMarker) {}
    fn visit_placeholder(&mut self, placeholder: &Placeholder) {}
    fn visit_function(&mut self, call: &FunctionCall) {
        walk_function(self, call);
    }
    fn visit_table_ref(&mut self, table: &TableRef) {
        walk_table_ref(self, table);
    }
    fn visit_table_factor(&mut self, factor: &TableFactor) {
        walk_table_factor(self, factor);
    }
    fn visit_join(&mut self, join: &Join) {
        walk_join(self, join);
    }
    fn visit_order_by(&mut self, item: &OrderByClause) {
        walk_order_by(self, item);
    }
    fn visit_limit(&mut self, limit: &Limit) {
        walk_limit(self, limit);
    }
    fn visit_assignment(&mut self, assignment: &Assignment) {
        walk_assignment(self, assignment);
    }
    fn visit_insert(&mut self, insert: &InsertStmt) {
        walk_insert(self, insert);
    }
    /// `REPLACE` shares the INSERT tree
    fn visit_replace(&mut self, insert: &InsertStmt) {
        walk_insert(self, insert);
    }
    fn visit_update(&mut self, update: &UpdateStmt) {
        walk_update(self, update);
    }
    fn visit_delete(&mut self, delete: &DeleteStmt) {
        walk_delete(self, delete);
    }
    fn visit_create_table(&mut self, create: &CreateTableStmt) {
        walk_create_table(self, create);
    }
    fn visit_column_def(&mut self, column: &ColumnDef) {
        walk_column_def(self, column);
    }
    fn visit_key_def(&mut self, key: &KeyDef) {}
    fn visit_foreign_key(&mut self, fk: &ForeignKeyDef) {
        walk_foreign_key(self, fk);
    }
    fn visit_alter_table(&mut self, alter: &AlterTableStmt) {
        walk_alter_table(self, alter);
    }
}

//=============================================================================
// Walk functions
//=============================================================================

fn visit_all<V: Visitor + ?Sized>(v: &mut V, exprs: &[Expr]) {
    for e in exprs {
        v.visit_expr(e);
    }
}

fn visit_body<V: Visitor + ?Sized>(v: &mut V, body: &[Statement]) {
    for s in body {
        v.visit_statement(s);
    }
}

fn visit_order_list<V: Visitor + ?Sized>(v: &mut V, items: &[OrderByClause]) {
    for item in items {
        v.visit_order_by(item);
    }
}

fn visit_branches<V: Visitor + ?Sized>(v: &mut V, branches: &[ConditionalBranch]) {
    for branch in branches {
        v.visit_expr(&branch.condition);
        visit_body(v, &branch.body);
    }
}

fn visit_signal<V: Visitor + ?Sized>(v: &mut V, signal: &SignalStmt) {
    for item in &signal.items {
        v.visit_expr(&item.value);
    }
}

pub fn walk_statement<V: Visitor + ?Sized>(v: &mut V, stmt: &Statement) {
    v.enter();
    match stmt {
        Statement::Select(query) => v.visit_query(query),
        Statement::Insert(insert) => v.visit_insert(insert),
        Statement::Replace(insert) => v.visit_replace(insert),
        Statement::Update(update) => v.visit_update(update),
        Statement::Delete(delete) => v.visit_delete(delete),
        Statement::Call { name, args } => {
            v.visit_identifier(name);
            visit_all(v, args);
        }
        Statement::Set(assignments) => {
            for a in assignments {
                v.visit_expr(&a.target);
                v.visit_expr(&a.value);
            }
        }
        Statement::Describe(table) | Statement::Truncate(table) => v.visit_identifier(table),
        Statement::CreateTable(create) => v.visit_create_table(create),
        Statement::CreateIndex(create) => v.visit_identifier(&create.table),
        Statement::AlterTable(alter) => v.visit_alter_table(alter),
        Statement::DropTable { tables, .. } => {
            for t in tables {
                v.visit_identifier(t);
            }
        }
        Statement::DropIndex { table, .. } => v.visit_identifier(table),
        Statement::RenameTable(pairs) => {
            for (from, to) in pairs {
                v.visit_identifier(from);
                v.visit_identifier(to);
            }
        }
        Statement::Block { body, .. } | Statement::Loop { body, .. } => visit_body(v, body),
        Statement::If { branches, else_body } => {
            visit_branches(v, branches);
            if let Some(body) = else_body {
                visit_body(v, body);
            }
        }
        Statement::Case { operand, branches, else_body } => {
            if let Some(e) = operand {
                v.visit_expr(e);
            }
            visit_branches(v, branches);
            if let Some(body) = else_body {
                visit_body(v, body);
            }
        }
        Statement::While { condition, body, .. } => {
            v.visit_expr(condition);
            visit_body(v, body);
        }
        Statement::Repeat { body, until, .. } => {
            visit_body(v, body);
            v.visit_expr(until);
        }
        Statement::Return(e) => v.visit_expr(e),
        Statement::DeclareVariable { default, .. } => {
            if let Some(e) = default {
                v.visit_expr(e);
            }
        }
        Statement::DeclareCursor { query, .. } => v.visit_query(query),
        Statement::DeclareHandler { body, .. } => v.visit_statement(body),
        Statement::Signal(signal) | Statement::Resignal(signal) => visit_signal(v, signal),
        Statement::GetDiagnostics(diag) => {
            if let Some(e) = &diag.condition {
                v.visit_expr(e);
            }
            for item in &diag.items {
                v.visit_expr(&item.target);
            }
        }
        Statement::SetNames { .. }
        | Statement::Use(_)
        | Statement::ShowTables { .. }
        | Statement::ShowDatabases { .. }
        | Statement::StartTransaction
        | Statement::Commit
        | Statement::Rollback
        | Statement::Leave(_)
        | Statement::Iterate(_)
        | Statement::DeclareCondition { .. }
        | Statement::Open(_)
        | Statement::Fetch { .. }
        | Statement::Close(_) => {}
    }
    v.leave();
}

pub fn walk_query<V: Visitor + ?Sized>(v: &mut V, query: &Query) {
    match query {
        Query::Select(select) => v.visit_select(select),
        Query::Union(union) => v.visit_union(union),
    }
}

pub fn walk_select<V: Visitor + ?Sized>(v: &mut V, select: &Select) {
    v.enter();
    for item in &select.columns {
        v.visit_select_item(item);
    }
    for table in &select.from {
        v.visit_table_ref(table);
    }
    if let Some(e) = &select.where_clause {
        v.visit_expr(e);
    }
    visit_order_list(v, &select.group_by);
    if let Some(e) = &select.having {
        v.visit_expr(e);
    }
    visit_order_list(v, &select.order_by);
    if let Some(limit) = &select.limit {
        v.visit_limit(limit);
    }
    v.leave();
}

pub fn walk_union<V: Visitor + ?Sized>(v: &mut V, union: &Union) {
    v.enter();
    for select in union.selects() {
        v.visit_select(select);
    }
    visit_order_list(v, &union.order_by);
    if let Some(limit) = &union.limit {
        v.visit_limit(limit);
    }
    v.leave();
}

pub fn walk_select_item<V: Visitor + ?Sized>(v: &mut V, item: &SelectItem) {
    v.visit_expr(&item.expr);
}

pub fn walk_identifier<V: Visitor + ?Sized>(v: &mut V, ident: &Identifier) {
    if let Some(parent) = &ident.parent {
        v.visit_identifier(parent);
    }
}

pub fn walk_function<V: Visitor + ?Sized>(v: &mut V, call: &FunctionCall) {
    visit_all(v, &call.args);
}

pub fn walk_expr<V: Visitor + ?Sized>(v: &mut V, expr: &Expr) {
    match expr {
        Expr::Literal(lit) => return v.visit_literal(lit),
        Expr::Identifier(ident) => return v.visit_identifier(ident),
        Expr::ParamMarker(p) => return v.visit_param_marker(p),
        Expr::Placeholder(p) => return v.visit_placeholder(p),
        Expr::UserVariable(_) | Expr::SysVariable { .. } | Expr::Default | Expr::Niladic(_) => {
            return
        }
        _ => {}
    }
    v.enter();
    match expr {
        Expr::Unary { operand, .. }
        | Expr::Is { operand, .. }
        | Expr::Collate { operand, .. }
        | Expr::Cast { operand, .. }
        | Expr::Convert { operand, .. }
        | Expr::Extract { operand, .. } => v.visit_expr(operand),
        Expr::Interval { value, .. } => v.visit_expr(value),
        Expr::Binary { left, right, .. } => {
            v.visit_expr(left);
            v.visit_expr(right);
        }
        Expr::Ternary { first, second, third, .. } => {
            v.visit_expr(first);
            v.visit_expr(second);
            v.visit_expr(third);
        }
        Expr::Polyadic { operands, .. } | Expr::Row(operands) => visit_all(v, operands),
        Expr::In { operand, set, .. } => {
            v.visit_expr(operand);
            match set {
                InSet::List(list) => visit_all(v, list),
                InSet::Subquery(query) => v.visit_query(query),
            }
        }
        Expr::Quantified { left, subquery, .. } => {
            v.visit_expr(left);
            v.visit_query(subquery);
        }
        Expr::Exists(query) | Expr::Subquery(query) => v.visit_query(query),
        Expr::Case(case) => {
            if let Some(e) = &case.operand {
                v.visit_expr(e);
            }
            for (when, then) in &case.whens {
                v.visit_expr(when);
                v.visit_expr(then);
            }
            if let Some(e) = &case.else_result {
                v.visit_expr(e);
            }
        }
        Expr::Function(call) => v.visit_function(call),
        Expr::Count { args, .. } | Expr::Char { args, .. } => visit_all(v, args),
        Expr::Trim { remove, string, .. } => {
            if let Some(e) = remove {
                v.visit_expr(e);
            }
            v.visit_expr(string);
        }
        Expr::GroupConcat(gc) => {
            visit_all(v, &gc.args);
            visit_order_list(v, &gc.order_by);
        }
        Expr::TimestampAdd { interval, timestamp, .. } => {
            v.visit_expr(interval);
            v.visit_expr(timestamp);
        }
        Expr::TimestampDiff { start, end, .. } => {
            v.visit_expr(start);
            v.visit_expr(end);
        }
        Expr::Position { needle, haystack } => {
            v.visit_expr(needle);
            v.visit_expr(haystack);
        }
        Expr::Substring { string, from, length } => {
            v.visit_expr(string);
            v.visit_expr(from);
            if let Some(e) = length {
                v.visit_expr(e);
            }
        }
        Expr::Literal(_)
        | Expr::Identifier(_)
        | Expr::ParamMarker(_)
        | Expr::Placeholder(_)
        | Expr::UserVariable(_)
        | Expr::SysVariable { .. }
        | Expr::Default
        | Expr::Niladic(_) => {}
    }
    v.leave();
}

pub fn walk_table_ref<V: Visitor + ?Sized>(v: &mut V, table: &TableRef) {
    match table {
        TableRef::Factor(factor) => v.visit_table_factor(factor),
        TableRef::Subquery { query, .. } => v.visit_query(query),
        TableRef::Join(join) => v.visit_join(join),
    }
}

pub fn walk_table_factor<V: Visitor + ?Sized>(v: &mut V, factor: &TableFactor) {
    v.visit_identifier(&factor.name);
}

pub fn walk_join<V: Visitor + ?Sized>(v: &mut V, join: &Join) {
    v.enter();
    v.visit_table_ref(&join.left);
    v.visit_table_ref(&join.right);
    if let Some(JoinCondition::On(e)) = &join.condition {
        v.visit_expr(e);
    }
    v.leave();
}

pub fn walk_order_by<V: Visitor + ?Sized>(v: &mut V, item: &OrderByClause) {
    v.visit_expr(&item.expr);
}

pub fn walk_limit<V: Visitor + ?Sized>(v: &mut V, limit: &Limit) {
    if let Some(offset) = &limit.offset {
        v.visit_expr(offset);
    }
    v.visit_expr(&limit.row_count);
}

pub fn walk_assignment<V: Visitor + ?Sized>(v: &mut V, assignment: &Assignment) {
    v.visit_identifier(&assignment.column);
    v.visit_expr(&assignment.value);
}

pub fn walk_insert<V: Visitor + ?Sized>(v: &mut V, insert: &InsertStmt) {
    v.visit_identifier(&insert.table);
    for c in &insert.columns {
        v.visit_identifier(c);
    }
    match &insert.source {
        InsertSource::Values(rows) => {
            for row in rows {
                visit_all(v, row);
            }
        }
        InsertSource::Set(assignments) => {
            for a in assignments {
                v.visit_assignment(a);
            }
        }
        InsertSource::Query(query) => v.visit_query(query),
    }
    for a in &insert.on_duplicate {
        v.visit_assignment(a);
    }
}

pub fn walk_update<V: Visitor + ?Sized>(v: &mut V, update: &UpdateStmt) {
    for t in &update.tables {
        v.visit_table_ref(t);
    }
    for a in &update.assignments {
        v.visit_assignment(a);
    }
    if let Some(e) = &update.where_clause {
        v.visit_expr(e);
    }
    visit_order_list(v, &update.order_by);
    if let Some(limit) = &update.limit {
        v.visit_limit(limit);
    }
}

pub fn walk_delete<V: Visitor + ?Sized>(v: &mut V, delete: &DeleteStmt) {
    for t in &delete.targets {
        v.visit_identifier(t);
    }
    for t in &delete.from {
        v.visit_table_ref(t);
    }
    if let Some(e) = &delete.where_clause {
        v.visit_expr(e);
    }
    visit_order_list(v, &delete.order_by);
    if let Some(limit) = &delete.limit {
        v.visit_limit(limit);
    }
}

pub fn walk_create_table<V: Visitor + ?Sized>(v: &mut V, create: &CreateTableStmt) {
    v.visit_identifier(&create.name);
    for element in &create.elements {
        match element {
            TableElement::Column(column) => v.visit_column_def(column),
            TableElement::Key(key) => v.visit_key_def(key),
            TableElement::ForeignKey(fk) => v.visit_foreign_key(fk),
        }
    }
    for option in &create.options {
        v.visit_expr(&option.value);
    }
}

pub fn walk_foreign_key<V: Visitor + ?Sized>(v: &mut V, fk: &ForeignKeyDef) {
    v.visit_identifier(&fk.ref_table);
}

pub fn walk_column_def<V: Visitor + ?Sized>(v: &mut V, column: &ColumnDef) {
    if let Some(e) = &column.default {
        v.visit_expr(e);
    }
    if let Some(e) = &column.on_update {
        v.visit_expr(e);
    }
}

pub fn walk_alter_table<V: Visitor + ?Sized>(v: &mut V, alter: &AlterTableStmt) {
    v.visit_identifier(&alter.table);
    for action in &alter.actions {
        match action {
            AlterAction::AddColumn { column, .. }
            | AlterAction::ModifyColumn { column, .. }
            | AlterAction::ChangeColumn { column, .. } => v.visit_column_def(column),
            AlterAction::AddKey(key) => v.visit_key_def(key),
            AlterAction::AddForeignKey(fk) => v.visit_foreign_key(fk),
            AlterAction::RenameTo(name) => v.visit_identifier(name),
            AlterAction::Option(option) => v.visit_expr(&option.value),
            AlterAction::DropColumn(_)
            | AlterAction::DropIndex(_)
            | AlterAction::DropPrimaryKey
            | AlterAction::DropForeignKey(_) => {}
        }
    }
}
